//! Planting and layout hints derived from a snapshot and its metrics.
//!
//! Thresholds are in square meters; feet-based results are converted first.

use crate::model::{GardenData, MetricsResult, ObjectType};
use crate::units::{convert_area, Unit};

const SMALL_GARDEN_M2: f64 = 10.0;
const PATHWAY_GARDEN_M2: f64 = 20.0;
const FEW_POINTS: usize = 4;

fn has_object(garden: &GardenData, kind: ObjectType) -> bool {
    garden
        .sections
        .iter()
        .flat_map(|s| &s.shapes)
        .any(|sh| sh.object_type == Some(kind))
}

/// Human-readable suggestions, in a stable order.
pub fn layout_suggestions(garden: &GardenData, metrics: &MetricsResult) -> Vec<String> {
    let mut out = Vec::new();
    let area_m2 = convert_area(metrics.area, metrics.unit, Unit::Meters);
    let measured = metrics.area > 0.0;

    if measured && area_m2 < SMALL_GARDEN_M2 {
        out.push("Consider container gardening or vertical gardening for small spaces".into());
    }
    if has_object(garden, ObjectType::VegetablePatch) {
        out.push("Ensure vegetable patches receive at least 6-8 hours of sunlight daily".into());
        out.push("Consider crop rotation for vegetable patches to maintain soil health".into());
    }
    if has_object(garden, ObjectType::FlowerBed) {
        out.push("Group plants with similar water and sunlight needs together".into());
        out.push(
            "Consider adding mulch to flower beds to retain moisture and suppress weeds".into(),
        );
    }
    if !has_object(garden, ObjectType::Pathway) && area_m2 > PATHWAY_GARDEN_M2 {
        out.push("Consider adding pathways for easy access to different garden areas".into());
    }
    if has_object(garden, ObjectType::Tree) {
        out.push(
            "Ensure trees have adequate spacing (at least 3-6 meters) for root development".into(),
        );
        out.push("Consider the mature size of trees to avoid overcrowding".into());
    }
    if garden.points.len() < FEW_POINTS {
        out.push("Add more measurement points for more accurate garden planning".into());
    }
    out
}
