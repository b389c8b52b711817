//! Piece builders shared by unit tests.

use crate::types::*;

pub fn connector(id: &str, kind: ConnectorKind, x: f64, y: f64, angle: f64) -> Connector {
    Connector {
        id: id.to_string(),
        kind,
        position: Point::new(x, y),
        angle,
        height: 0.0,
        compatible: None,
    }
}

pub fn piece(id: &str, length: f64, connections: Vec<Connector>) -> TrackPiece {
    TrackPiece {
        id: id.to_string(),
        name: id.to_string(),
        category: TrackCategory::Straight,
        kind: TrackType::StraightStandard,
        dimensions: Dimensions {
            length: Some(length),
            width: Some(40.0),
            radius: None,
            angle: None,
            arc_length: None,
            height: 12.0,
            clearance_height: None,
            bounding_box: Some(BoundingBox {
                width: length,
                height: 40.0,
            }),
            unit: "mm".to_string(),
        },
        connections,
        geometry: Geometry {
            kind: GeometryKind::Line,
            path: PathDefinition::Line {
                start: Point::new(-length / 2.0, 0.0),
                end: Point::new(length / 2.0, 0.0),
            },
            collision_path: None,
        },
        visual: VisualProperties {
            color: "#8b5a2b".to_string(),
            texture: None,
            render_style: RenderStyle::Simple,
            icon: None,
            model_url: None,
        },
        metadata: Metadata {
            sku: None,
            manufacturer: "Test".to_string(),
            product_line: "Test".to_string(),
            availability: Availability::Current,
            set_includes: None,
            year_introduced: None,
            discontinued: None,
            notes: None,
        },
    }
}

/// 200 mm straight: female end at -x facing 180, male end at +x facing 0.
pub fn straight(id: &str) -> TrackPiece {
    piece(
        id,
        200.0,
        vec![
            connector("a", ConnectorKind::Female, -100.0, 0.0, 180.0),
            connector("b", ConnectorKind::Male, 100.0, 0.0, 0.0),
        ],
    )
}
