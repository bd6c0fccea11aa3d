use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gardenplan::api::{compute_garden_metrics, format_area, format_distance, layout_suggestions};
use gardenplan::cfg::{DuplicatePolicy, ResolveCfg, MEASUREMENT_TOLERANCE};
use gardenplan::geodesy::{haversine_distance, initial_bearing};
use gardenplan::model::{GardenData, GpsCoord, MetricsResult};
use gardenplan::units::{convert_unit, Unit};
use gardenplan::validate::{validate_garden, validate_gps};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod import;
mod provenance;

#[derive(Parser)]
#[command(name = "gardenplan")]
#[command(about = "Garden survey metrics from tape measurements or GPS points")]
struct Cmd {
    /// Log resolver diagnostics (DEBUG level) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Resolve positions and compute area, perimeter, angles and diagnostics
    Metrics {
        #[arg(long)]
        input: PathBuf,
        /// Write the report here (plus a provenance sidecar) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Build a survey snapshot from points and measurements tables (CSV or Parquet)
    Import {
        #[arg(long)]
        points: PathBuf,
        #[arg(long)]
        measurements: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Unit for the snapshot and for measurement rows without one
        #[arg(long, default_value = "meters")]
        unit: Unit,
    },
    /// Check a snapshot against the boundary rules; fails if any rule is broken
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
    /// Convert a length between meters and feet
    Convert {
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        #[arg(long)]
        from: Unit,
        #[arg(long)]
        to: Unit,
    },
    /// Great-circle distance and initial bearing between two `lat,lng` coordinates
    Distance {
        #[arg(long, value_parser = parse_gps, allow_hyphen_values = true)]
        from: GpsCoord,
        #[arg(long, value_parser = parse_gps, allow_hyphen_values = true)]
        to: GpsCoord,
        #[arg(long, default_value = "meters")]
        unit: Unit,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone, Debug)]
struct ResolveArgs {
    /// Relative tolerance for intersections and the consistency cross-check
    #[arg(long, default_value_t = MEASUREMENT_TOLERANCE)]
    tolerance: f64,
    /// Distance for the second point when it has no measurement to the first
    #[arg(long)]
    gauge_distance: Option<f64>,
    /// Average repeated measurements of the same pair instead of using the first
    #[arg(long)]
    average_duplicates: bool,
    /// Override the snapshot's working unit
    #[arg(long)]
    unit: Option<Unit>,
}

impl ResolveArgs {
    fn to_cfg(&self) -> ResolveCfg {
        ResolveCfg {
            tolerance: self.tolerance,
            gauge_fallback: self.gauge_distance,
            duplicates: if self.average_duplicates {
                DuplicatePolicy::Average
            } else {
                DuplicatePolicy::FirstMatch
            },
            ..ResolveCfg::default()
        }
    }
}

/// Metrics plus presentation strings and gardening hints.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsReport {
    metrics: MetricsResult,
    area_label: String,
    perimeter_label: String,
    suggestions: Vec<String>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Metrics {
            input,
            out,
            resolve,
        } => metrics(&input, out.as_deref(), &resolve),
        Action::Import {
            points,
            measurements,
            out,
            unit,
        } => run_import(&points, &measurements, &out, unit),
        Action::Validate { input } => validate(&input),
        Action::Convert { value, from, to } => {
            println!("{}", format_distance(convert_unit(value, from, to), to));
            Ok(())
        }
        Action::Distance { from, to, unit } => {
            println!("{}", describe_leg(from, to, unit));
            Ok(())
        }
        Action::Report => report(),
    }
}

fn parse_gps(s: &str) -> Result<GpsCoord, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lng', got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate '{v}': {e}"))
    };
    let c = GpsCoord::new(parse(lat)?, parse(lng)?);
    match validate_gps(c).first() {
        Some(err) => Err(err.to_string()),
        None => Ok(c),
    }
}

/// `"<distance>, bearing <deg>°"`; the bearing is omitted for coincident points.
fn describe_leg(from: GpsCoord, to: GpsCoord, unit: Unit) -> String {
    let meters = haversine_distance(from, to);
    let d = format_distance(convert_unit(meters, Unit::Meters, unit), unit);
    if meters == 0.0 {
        return d;
    }
    format!("{d}, bearing {:.1}°", initial_bearing(from, to))
}

fn load_garden(path: &Path) -> Result<GardenData> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

fn metrics_report(mut garden: GardenData, args: &ResolveArgs) -> MetricsReport {
    if let Some(unit) = args.unit {
        garden.unit = unit;
    }
    let metrics = compute_garden_metrics(&garden, args.to_cfg());
    let suggestions = layout_suggestions(&garden, &metrics);
    MetricsReport {
        area_label: format_area(metrics.area, metrics.unit),
        perimeter_label: format_distance(metrics.perimeter, metrics.unit),
        metrics,
        suggestions,
    }
}

fn metrics(input: &Path, out: Option<&Path>, args: &ResolveArgs) -> Result<()> {
    let garden = load_garden(input)?;
    tracing::info!(
        input = %input.display(),
        points = garden.points.len(),
        measurements = garden.constraints.len(),
        mode = ?garden.mode,
        "metrics"
    );
    let report = metrics_report(garden, args);
    if !report.metrics.is_valid {
        tracing::warn!(
            reason = report.metrics.error_message.as_deref().unwrap_or(""),
            "survey is not consistent"
        );
    }
    match out {
        Some(out) => {
            write_json(out, &report)?;
            let payload = provenance::Payload::new(json!({
                "tolerance": args.tolerance,
                "gauge_distance": args.gauge_distance,
                "average_duplicates": args.average_duplicates,
                "unit": report.metrics.unit,
            }))
            .with_input(input);
            let prov = provenance::write_sidecar(out, payload)?;
            tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote report");
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_import(points: &Path, measurements: &Path, out: &Path, unit: Unit) -> Result<()> {
    let garden = import::import_garden(points, measurements, unit)?;
    tracing::info!(
        points = garden.points.len(),
        measurements = garden.constraints.len(),
        mode = ?garden.mode,
        "imported"
    );
    let problems = validate_garden(&garden);
    for p in &problems {
        tracing::warn!("{p}");
    }
    write_json(out, &garden)
}

fn validate(input: &Path) -> Result<()> {
    let garden = load_garden(input)?;
    let problems = validate_garden(&garden);
    if problems.is_empty() {
        println!(
            "ok: {} points, {} measurements",
            garden.points.len(),
            garden.constraints.len()
        );
        return Ok(());
    }
    for p in &problems {
        println!("{p}");
    }
    bail!("{} problem(s) in {}", problems.len(), input.display())
}

fn report() -> Result<()> {
    let obj = provenance::block(&provenance::Payload::new(json!({})));
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
