//! Reproducible synthetic surveys (radial jitter + replay tokens).
//!
//! Purpose
//! - Generate ground-truth convex layouts together with the point registry
//!   and distance constraints a surveyor would record for them. Used by tests
//!   and benchmarks to check that resolution reproduces the truth.
//!
//! Model
//! - `n` jittered angles around the origin, jittered radii, convex hull (CCW).
//! - Constraints: every hull edge plus a fan of diagonals from the first
//!   vertex. That is `2n − 3` measurements, exactly enough for the greedy
//!   resolver to place every point from two references.
//! - Optional relative noise on each recorded distance.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::convex_hull;
use crate::model::{DistanceConstraint, Point};
use crate::units::Unit;

/// Vertex count distribution (before hull reduction).
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SurveyCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing 2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Relative radial jitter: radii are `base_radius * (1 + u)`, `|u| <= radial_jitter`.
    pub radial_jitter: f64,
    /// Base radius in `unit`.
    pub base_radius: f64,
    /// Relative noise on recorded distances: `d * (1 + u)`, `|u| <= noise`.
    pub noise: f64,
    pub unit: Unit,
}

impl Default for SurveyCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(8),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 10.0,
            noise: 0.0,
            unit: Unit::Meters,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Registry, constraints, and the true (CCW) positions they were taken from.
#[derive(Clone, Debug)]
pub struct SyntheticSurvey {
    pub points: Vec<Point>,
    pub constraints: Vec<DistanceConstraint>,
    pub truth: Vec<Vector2<f64>>,
}

/// Draw a convex survey; `None` only if the hull degenerates.
pub fn draw_survey(cfg: SurveyCfg, tok: ReplayToken) -> Option<SyntheticSurvey> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.99);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / n as f64;
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;

    let raw: Vec<Vector2<f64>> = (0..n)
        .map(|k| {
            let th = phase + k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = r0 * (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj);
            Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    let truth = convex_hull(&raw)?;

    let points: Vec<Point> = (0..truth.len())
        .map(|k| Point::new(format!("p{k}"), label_for(k)))
        .collect();

    let noise = cfg.noise.max(0.0);
    let mut record = |a: usize, b: usize| {
        let d = (truth[b] - truth[a]).norm();
        let u = if noise > 0.0 {
            (rng.gen::<f64>() * 2.0 - 1.0) * noise
        } else {
            0.0
        };
        DistanceConstraint::new(
            format!("m{a}-{b}"),
            points[a].id.clone(),
            points[b].id.clone(),
            d * (1.0 + u),
            cfg.unit,
        )
    };
    let mut constraints = Vec::with_capacity(2 * truth.len());
    for k in 1..truth.len() {
        constraints.push(record(k - 1, k));
        if k >= 2 {
            constraints.push(record(0, k));
        }
    }

    Some(SyntheticSurvey {
        points,
        constraints,
        truth,
    })
}

/// Spreadsheet-style labels: A..Z, AA, AB, ...
pub fn label_for(mut k: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (k % 26) as u8);
        if k < 26 {
            break;
        }
        k = k / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
