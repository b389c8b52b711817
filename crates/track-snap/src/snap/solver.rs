use super::pose::{absolute_connector_position, connector_angle_at};
use crate::geometry::{normalize_angle, rotate_point};
use crate::types::{Connector, PlacedPiece, Point};

/// Pieces only ever land on axis-aligned rotations.
pub const ROTATION_STEP: f64 = 90.0;

/// Rotation to apply to the moving piece so `moving` faces opposite `placed`.
///
/// The raw delta is first folded into (-180, 180] so equivalent connector
/// angles agree, then rounded to the nearest multiple of [`ROTATION_STEP`]
/// (halves round away from zero) and reduced to [0, 360).
pub fn calculate_snap_rotation(
    placed: &Connector,
    placed_piece_rotation: f64,
    moving: &Connector,
) -> f64 {
    let placed_angle = connector_angle_at(placed_piece_rotation, placed);
    let required_angle = placed_angle + 180.0;
    let mut delta = normalize_angle(required_angle - moving.angle);
    if delta > 180.0 {
        delta -= 360.0;
    }
    normalize_angle((delta / ROTATION_STEP).round() * ROTATION_STEP)
}

/// Origin for the moving piece such that, rotated by `snap_rotation`, its
/// `moving` connector lands exactly on `placed`.
pub fn calculate_snap_position(
    placed_piece: &PlacedPiece,
    placed: &Connector,
    moving: &Connector,
    snap_rotation: f64,
) -> Point {
    let target = absolute_connector_position(placed_piece, placed);
    target - rotate_point(moving.position, snap_rotation)
}
