use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::ops::{Add, Sub};
use std::sync::Arc;

use crate::geometry::normalize_angle;

/// Round a float to N decimal places.
pub fn round_f64(v: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (v * factor).round() / factor
}

/// Wrapper that rounds f64 to 6 decimal places on serialization.
fn serialize_f64_rounded<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round_f64(*v, 6))
}

// ─── Point ───────────────────────────────────────────────────────────

/// A 2-D coordinate in layout units (millimetres in catalog data).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(serialize_with = "serialize_f64_rounded")]
    pub x: f64,
    #[serde(serialize_with = "serialize_f64_rounded")]
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

// ─── Connectors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    Male,
    Female,
}

impl ConnectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::Male => "male",
            ConnectorKind::Female => "female",
        }
    }
}

/// A physical attachment point on a track piece, in the piece's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConnectorKind,
    pub position: Point,
    /// Facing angle in degrees.
    pub angle: f64,
    /// Coarse vertical channel; two connectors only mate within 1 unit.
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible: Option<Vec<String>>,
}

// ─── Dimensions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

/// Footprint used when a piece carries no explicit bounding box.
const FALLBACK_LENGTH: f64 = 200.0;
const FALLBACK_WIDTH: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_length: Option<f64>,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "mm".to_string()
}

impl Dimensions {
    /// The box used by the collision heuristic.
    pub fn footprint(&self) -> BoundingBox {
        self.bounding_box.unwrap_or(BoundingBox {
            width: self.length.unwrap_or(FALLBACK_LENGTH),
            height: self.width.unwrap_or(FALLBACK_WIDTH),
        })
    }
}

// ─── Geometry descriptor ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Line,
    Arc,
    Composite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PathDefinition {
    Line {
        start: Point,
        end: Point,
    },
    Arc {
        center: Point,
        radius: f64,
        #[serde(rename = "startAngle")]
        start_angle: f64,
        #[serde(rename = "endAngle")]
        end_angle: f64,
        clockwise: bool,
    },
    Composite {
        segments: Vec<PathDefinition>,
    },
    Svg {
        d: String,
    },
}

/// Rendering descriptor; the snap engine never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub path: PathDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_path: Option<PathDefinition>,
}

// ─── Visual / metadata ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    Simple,
    Detailed,
    Realistic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualProperties {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub render_style: RenderStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Current,
    Retired,
    Rare,
    Common,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub manufacturer: String,
    pub product_line: String,
    pub availability: Availability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_includes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_introduced: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discontinued: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ─── Track pieces ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackCategory {
    Straight,
    Curved,
    Switch,
    Special,
    Elevation,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackType {
    StraightShort,
    StraightMedium,
    StraightLong,
    StraightStandard,
    CurveStandard,
    CurveWide,
    CurveTight,
    SwitchLeft,
    SwitchRight,
    SwitchY,
    Crossing,
    Turntable,
    Riser,
    Bridge,
    Station,
    Terminal,
}

/// One catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPiece {
    pub id: String,
    pub name: String,
    pub category: TrackCategory,
    #[serde(rename = "type")]
    pub kind: TrackType,
    pub dimensions: Dimensions,
    pub connections: Vec<Connector>,
    pub geometry: Geometry,
    pub visual: VisualProperties,
    pub metadata: Metadata,
}

impl TrackPiece {
    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connections.iter().find(|c| c.id == id)
    }
}

// ─── Catalog index file ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCatalogPiece {
    pub id: String,
    pub file: String,
    pub category: TrackCategory,
    pub name: String,
    pub common_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCatalogCategory {
    pub id: TrackCategory,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_pieces: usize,
    pub category_counts: HashMap<TrackCategory, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCatalog {
    pub version: String,
    pub last_updated: String,
    pub description: String,
    pub pieces: Vec<TrackCatalogPiece>,
    pub categories: Vec<TrackCatalogCategory>,
    pub stats: CatalogStats,
}

// ─── Placements ──────────────────────────────────────────────────────

/// A piece instance committed to the layout. Position and rotation are
/// fixed at construction; moving a piece means replacing it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPiece {
    id: String,
    piece: Arc<TrackPiece>,
    position: Point,
    rotation: f64,
}

impl PlacedPiece {
    /// Rotation is reduced to [0, 360).
    pub fn new(
        id: impl Into<String>,
        piece: Arc<TrackPiece>,
        position: Point,
        rotation: f64,
    ) -> Self {
        Self {
            id: id.into(),
            piece,
            position,
            rotation: normalize_angle(rotation),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn piece(&self) -> &TrackPiece {
        &self.piece
    }

    pub fn shared_piece(&self) -> Arc<TrackPiece> {
        Arc::clone(&self.piece)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn to_record(&self) -> PlacementRecord {
        PlacementRecord {
            id: self.id.clone(),
            piece_id: self.piece.id.clone(),
            position: self.position,
            rotation: self.rotation,
        }
    }
}

/// Wire form of a placed piece; the piece is referenced by catalog id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub id: String,
    pub piece_id: String,
    pub position: Point,
    #[serde(default, serialize_with = "serialize_f64_rounded")]
    pub rotation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_json_shape() {
        let json = r#"{
            "id": "a",
            "type": "female",
            "position": {"x": -100, "y": 0},
            "angle": 180,
            "height": 0,
            "compatible": ["male"]
        }"#;
        let c: Connector = serde_json::from_str(json).unwrap();
        assert_eq!(c.kind, ConnectorKind::Female);
        assert_eq!(c.position, Point::new(-100.0, 0.0));
        assert_eq!(c.compatible.as_deref(), Some(&["male".to_string()][..]));
    }

    #[test]
    fn test_footprint_fallbacks() {
        let mut dims = Dimensions {
            length: Some(144.0),
            width: None,
            radius: None,
            angle: None,
            arc_length: None,
            height: 12.0,
            clearance_height: None,
            bounding_box: None,
            unit: "mm".to_string(),
        };
        assert_eq!(
            dims.footprint(),
            BoundingBox {
                width: 144.0,
                height: 50.0
            }
        );

        dims.length = None;
        assert_eq!(dims.footprint().width, 200.0);

        dims.bounding_box = Some(BoundingBox {
            width: 80.0,
            height: 40.0,
        });
        assert_eq!(dims.footprint().width, 80.0);
    }

    #[test]
    fn test_path_definition_tagged() {
        let json = r#"{"type": "arc", "center": {"x": 0, "y": 0}, "radius": 190,
                       "startAngle": 0, "endAngle": 45, "clockwise": false}"#;
        let path: PathDefinition = serde_json::from_str(json).unwrap();
        assert!(matches!(path, PathDefinition::Arc { radius, .. } if radius == 190.0));
    }

    #[test]
    fn test_point_serializes_rounded() {
        let p = Point::new(0.1 + 0.2, 1.0000000004);
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"x":0.3,"y":1.0}"#);
    }
}
