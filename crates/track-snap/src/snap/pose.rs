use crate::geometry::{normalize_angle, rotate_point};
use crate::types::{Connector, PlacedPiece, Point};

/// Absolute position of `connector` on a piece whose origin sits at `origin`
/// and which is rotated by `rotation` degrees.
pub fn connector_position_at(origin: Point, rotation: f64, connector: &Connector) -> Point {
    origin + rotate_point(connector.position, rotation)
}

/// Absolute facing angle of `connector` on a piece rotated by `rotation`, in [0, 360).
pub fn connector_angle_at(rotation: f64, connector: &Connector) -> f64 {
    normalize_angle(connector.angle + rotation)
}

pub fn absolute_connector_position(piece: &PlacedPiece, connector: &Connector) -> Point {
    connector_position_at(piece.position(), piece.rotation(), connector)
}

pub fn absolute_connector_angle(piece: &PlacedPiece, connector: &Connector) -> f64 {
    connector_angle_at(piece.rotation(), connector)
}
