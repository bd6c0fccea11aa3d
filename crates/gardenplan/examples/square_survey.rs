//! Walk through a small tape-measure survey and print the derived metrics.
//!
//! Usage:
//!   cargo run -p gardenplan --example square_survey
//!   cargo run -p gardenplan --example square_survey -- skewed
//!
//! The `skewed` variant adds a centre stake with one bad measurement so the
//! cross-check flags it.

use gardenplan::metrics::compute_metrics;
use gardenplan::model::{DistanceConstraint, Point};
use gardenplan::units::{format_area, format_distance, Unit};

fn main() {
    let skewed = std::env::args().nth(1).as_deref() == Some("skewed");
    let mut points: Vec<Point> = ["A", "B", "C", "D"]
        .iter()
        .map(|l| Point::new(l.to_lowercase(), *l))
        .collect();
    let m = |a: &str, b: &str, d: f64| {
        DistanceConstraint::new(format!("{a}{b}"), a, b, d, Unit::Meters)
    };
    let mut constraints = vec![
        m("a", "b", 10.0),
        m("b", "c", 10.0),
        m("c", "d", 10.0),
        m("d", "a", 10.0),
        m("a", "c", 200f64.sqrt()),
    ];
    if skewed {
        points.push(Point::new("e", "Centre"));
        let half = 50f64.sqrt();
        constraints.push(m("e", "a", half));
        constraints.push(m("e", "b", half));
        constraints.push(m("e", "d", half + 3.0));
    }

    let r = compute_metrics(&points, &constraints);
    println!("valid:     {}", r.is_valid);
    println!("area:      {}", format_area(r.area, r.unit));
    println!("perimeter: {}", format_distance(r.perimeter, r.unit));
    for p in &r.positions {
        println!(
            "  {:<3} ({:>7.3}, {:>7.3}){}",
            p.id,
            p.position.x,
            p.position.y,
            if p.resolved { "" } else { "  [placeholder]" }
        );
    }
    for (id, deg) in &r.angles {
        println!("  angle at {id}: {deg:.1}°");
    }
    if let Some(msg) = &r.error_message {
        println!("diagnostic: {msg}");
    }
}
