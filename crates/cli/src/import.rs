//! Tabular survey import (CSV or Parquet) into a `GardenData` snapshot.
//!
//! Points table: `id,label[,lat,lng][,notes]`. A row with both `lat` and
//! `lng` becomes a GPS reference point.
//! Measurements table: `id,pointA,pointB,distance[,unit]`; rows without a
//! unit use the snapshot's default unit.

use anyhow::{anyhow, bail, Context, Result};
use gardenplan::model::{CoordinateMode, DistanceConstraint, GardenData, Point};
use gardenplan::units::Unit;
use polars::prelude::*;
use std::path::Path;

/// Read a CSV or Parquet file into a DataFrame.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let is_parquet = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    let lf = if is_parquet {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())
            .with_context(|| format!("scanning {}", path.display()))?
    } else {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .finish()
            .with_context(|| format!("scanning {}", path.display()))?
    };
    let df = lf
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        "table_shape"
    );
    Ok(df)
}

fn strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column '{name}'"))?
        .cast(&DataType::String)?;
    Ok(s.str()?.into_iter().map(|v| v.map(str::to_owned)).collect())
}

fn floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column '{name}'"))?
        .cast(&DataType::Float64)?;
    Ok(s.f64()?.into_iter().collect())
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn required(v: Option<String>, column: &str, row: usize) -> Result<String> {
    v.filter(|s| !s.trim().is_empty())
        .ok_or_else(|| anyhow!("row {row}: '{column}' is empty"))
}

pub fn points_from_frame(df: &DataFrame) -> Result<Vec<Point>> {
    let ids = strings(df, "id")?;
    let labels = strings(df, "label")?;
    let n = ids.len();
    let (lat, lng) = if has_column(df, "lat") && has_column(df, "lng") {
        (floats(df, "lat")?, floats(df, "lng")?)
    } else {
        (vec![None; n], vec![None; n])
    };
    let notes = if has_column(df, "notes") {
        strings(df, "notes")?
    } else {
        vec![None; n]
    };

    let mut out = Vec::with_capacity(n);
    for (k, ((((id, label), lat), lng), note)) in ids
        .into_iter()
        .zip(labels)
        .zip(lat)
        .zip(lng)
        .zip(notes)
        .enumerate()
    {
        let id = required(id, "id", k)?;
        let label = required(label, "label", k)?;
        let mut p = match (lat, lng) {
            (Some(lat), Some(lng)) => Point::gps(id, label, lat, lng),
            (None, None) => Point::new(id, label),
            _ => bail!("row {k}: lat and lng must be given together"),
        };
        if let Some(note) = note.filter(|s| !s.is_empty()) {
            p = p.with_notes(note);
        }
        out.push(p);
    }
    Ok(out)
}

pub fn constraints_from_frame(
    df: &DataFrame,
    default_unit: Unit,
) -> Result<Vec<DistanceConstraint>> {
    let ids = strings(df, "id")?;
    let a = strings(df, "pointA")?;
    let b = strings(df, "pointB")?;
    let dist = floats(df, "distance")?;
    let units = if has_column(df, "unit") {
        strings(df, "unit")?
    } else {
        vec![None; ids.len()]
    };

    let mut out = Vec::with_capacity(ids.len());
    for (k, ((((id, a), b), d), unit)) in ids
        .into_iter()
        .zip(a)
        .zip(b)
        .zip(dist)
        .zip(units)
        .enumerate()
    {
        let unit = match unit.filter(|s| !s.trim().is_empty()) {
            Some(u) => u.parse::<Unit>().map_err(|e| anyhow!("row {k}: {e}"))?,
            None => default_unit,
        };
        let d = d.ok_or_else(|| anyhow!("row {k}: 'distance' is empty"))?;
        out.push(DistanceConstraint::new(
            required(id, "id", k)?,
            required(a, "pointA", k)?,
            required(b, "pointB", k)?,
            d,
            unit,
        ));
    }
    Ok(out)
}

/// Build a snapshot from the two tables. GPS mode when any point has coordinates.
pub fn import_garden(points: &Path, measurements: &Path, unit: Unit) -> Result<GardenData> {
    let points = points_from_frame(&read_table(points)?).context("parsing points table")?;
    let constraints = constraints_from_frame(&read_table(measurements)?, unit)
        .context("parsing measurements table")?;
    let mode = if points.iter().any(|p| p.gps_coord().is_some()) {
        CoordinateMode::Gps
    } else {
        CoordinateMode::Local
    };
    Ok(GardenData {
        points,
        constraints,
        unit,
        mode,
        ..GardenData::default()
    })
}
