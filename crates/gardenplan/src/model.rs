//! Survey data model: points, distance constraints, shapes, and result records.
//!
//! The core never mutates these; it reads a snapshot and returns derived values.
//! All types serialize with camelCase field names so a UI collaborator can hand
//! snapshots over as JSON.

use std::collections::BTreeMap;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Opaque point identifier. Identity of a point; labels are display-only.
pub type PointId = String;

/// Latitude/longitude in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GpsCoord {
    pub lat: f64,
    pub lng: f64,
}

impl GpsCoord {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Planar coordinates in the working unit of the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarPosition {
    pub x: f64,
    pub y: f64,
}

impl PlanarPosition {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    #[inline]
    pub fn to_vec2(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for PlanarPosition {
    #[inline]
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<PlanarPosition> for Vector2<f64> {
    #[inline]
    fn from(p: PlanarPosition) -> Self {
        p.to_vec2()
    }
}

/// How a point's position is known before resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Placement {
    /// No inherent position (local mode); placed entirely by the resolver.
    #[default]
    Free,
    /// Fixed planar hint; seeded as already resolved in local mode.
    Planar { x: f64, y: f64 },
    /// Reference point entered directly as GPS.
    Gps { lat: f64, lng: f64 },
    /// Derived point: distance and bearing (degrees clockwise from north)
    /// from the previous point in registry order.
    Offset { distance: f64, unit: Unit, bearing: f64 },
}

/// A labeled survey point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: PointId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub placement: Placement,
}

impl Point {
    /// Point without an inherent position.
    pub fn new(id: impl Into<PointId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            notes: None,
            placement: Placement::Free,
        }
    }

    pub fn gps(id: impl Into<PointId>, label: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            placement: Placement::Gps { lat, lng },
            ..Self::new(id, label)
        }
    }

    pub fn offset(
        id: impl Into<PointId>,
        label: impl Into<String>,
        distance: f64,
        unit: Unit,
        bearing: f64,
    ) -> Self {
        Self {
            placement: Placement::Offset {
                distance,
                unit,
                bearing,
            },
            ..Self::new(id, label)
        }
    }

    pub fn planar(id: impl Into<PointId>, label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            placement: Placement::Planar { x, y },
            ..Self::new(id, label)
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// True for points anchored by direct GPS entry.
    #[inline]
    pub fn is_reference(&self) -> bool {
        matches!(self.placement, Placement::Gps { .. })
    }

    #[inline]
    pub fn gps_coord(&self) -> Option<GpsCoord> {
        match self.placement {
            Placement::Gps { lat, lng } => Some(GpsCoord::new(lat, lng)),
            _ => None,
        }
    }
}

/// Undirected distance measurement between two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceConstraint {
    pub id: String,
    pub point_a_id: PointId,
    pub point_b_id: PointId,
    pub distance: f64,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DistanceConstraint {
    pub fn new(
        id: impl Into<String>,
        a: impl Into<PointId>,
        b: impl Into<PointId>,
        distance: f64,
        unit: Unit,
    ) -> Self {
        Self {
            id: id.into(),
            point_a_id: a.into(),
            point_b_id: b.into(),
            distance,
            unit,
            notes: None,
        }
    }

    /// Unordered endpoint match.
    #[inline]
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.point_a_id == a && self.point_b_id == b)
            || (self.point_a_id == b && self.point_b_id == a)
    }

    /// Distance expressed in `unit`.
    #[inline]
    pub fn distance_in(&self, unit: Unit) -> f64 {
        self.unit.convert(self.distance, unit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Triangle,
    Polygon,
}

impl ShapeKind {
    /// Allowed number of point ids: `(min, max)`; `None` means unbounded.
    pub fn point_arity(self) -> (usize, Option<usize>) {
        match self {
            ShapeKind::Circle => (1, Some(1)),
            ShapeKind::Triangle => (3, Some(3)),
            ShapeKind::Rectangle => (4, Some(4)),
            ShapeKind::Polygon => (3, None),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Polygon => "polygon",
        }
    }
}

/// What a shape represents in the garden.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    Plant,
    Tree,
    Decoration,
    RetainingWall,
    Steps,
    Pathway,
    FlowerBed,
    VegetablePatch,
    Other,
}

fn visible_default() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub point_ids: Vec<PointId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde(default = "visible_default")]
    pub visible: bool,
}

impl Shape {
    pub fn polygon(id: impl Into<String>, kind: ShapeKind, point_ids: &[&str]) -> Self {
        Self {
            id: id.into(),
            kind,
            point_ids: point_ids.iter().map(|s| s.to_string()).collect(),
            radius: None,
            object_type: None,
            visible: true,
        }
    }

    pub fn circle(id: impl Into<String>, center: &str, radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Self::polygon(id, ShapeKind::Circle, &[center])
        }
    }

    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = Some(object_type);
        self
    }
}

/// Named group of shapes; section areas are keyed by section id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default = "visible_default")]
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    /// Positions come from pairwise distance constraints.
    #[default]
    Local,
    /// Positions come from GPS references and distance/bearing offsets.
    Gps,
}

/// Complete snapshot handed over by the collaborator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenData {
    pub points: Vec<Point>,
    #[serde(default, alias = "measurements")]
    pub constraints: Vec<DistanceConstraint>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub mode: CoordinateMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GardenData {
    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }
}

/// Position of one point after resolution.
///
/// `resolved == false` marks a deterministic placeholder, not a derived value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPoint {
    pub id: PointId,
    pub position: PlanarPosition,
    pub resolved: bool,
}

/// Output of a position resolver, in registry order.
///
/// Every input point appears exactly once; unresolved points carry the
/// configured fallback position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub points: Vec<ResolvedPoint>,
}

impl Resolution {
    pub fn get(&self, id: &str) -> Option<&ResolvedPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Position only if geometrically resolved.
    pub fn resolved_position(&self, id: &str) -> Option<Vector2<f64>> {
        self.get(id)
            .filter(|p| p.resolved)
            .map(|p| p.position.to_vec2())
    }

    /// Resolved positions in registry order, skipping placeholders.
    pub fn resolved_positions(&self) -> Vec<(&str, Vector2<f64>)> {
        self.points
            .iter()
            .filter(|p| p.resolved)
            .map(|p| (p.id.as_str(), p.position.to_vec2()))
            .collect()
    }

    pub fn resolved_count(&self) -> usize {
        self.points.iter().filter(|p| p.resolved).count()
    }

    pub fn is_complete(&self) -> bool {
        self.points.iter().all(|p| p.resolved)
    }

    pub fn unresolved_ids(&self) -> impl Iterator<Item = &str> {
        self.points
            .iter()
            .filter(|p| !p.resolved)
            .map(|p| p.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Result record consumed by the UI.
///
/// Invariant: `is_valid == false` does not imply zeroed numbers; constraint
/// mismatches keep the best-effort area and perimeter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub area: f64,
    pub perimeter: f64,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub angles: BTreeMap<PointId, f64>,
    #[serde(default)]
    pub section_areas: BTreeMap<String, f64>,
    #[serde(default)]
    pub positions: Vec<ResolvedPoint>,
    #[serde(default)]
    pub mismatches: Vec<String>,
    #[serde(default)]
    pub unit: Unit,
}
