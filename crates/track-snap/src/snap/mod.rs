//! Snap-candidate search: finds the placed connector a moving piece should
//! lock onto, and the exact pose that mates the two.

pub mod compat;
pub mod pose;
pub mod solver;

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::geometry::distance;
use crate::types::{Connector, PlacedPiece, Point, TrackPiece};
use compat::{
    angles_opposite, connectors_compatible, connectors_explicitly_compatible,
    DEFAULT_ANGLE_TOLERANCE,
};
use pose::{
    absolute_connector_angle, absolute_connector_position, connector_angle_at,
    connector_position_at,
};
use solver::{calculate_snap_position, calculate_snap_rotation};

/// Snapping options, passed explicitly at each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapSettings {
    /// Turns off all snapping.
    pub enabled: bool,
    /// Maximum connector-to-connector distance for a candidate (inclusive).
    pub threshold: f64,
    /// Rendering hint only; the search ignores it.
    pub show_indicators: bool,
    /// Honor each connector's `compatible` list on top of type/height.
    pub strict_compatibility: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 50.0,
            show_indicators: true,
            strict_compatibility: false,
        }
    }
}

/// A proposed placement that mates `moving_connector` onto `placed_connector`.
/// Only meaningful for the frame it was computed in.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapCandidate<'a> {
    pub placed_piece: &'a PlacedPiece,
    pub placed_connector: &'a Connector,
    pub moving_connector: &'a Connector,
    pub snap_position: Point,
    /// Multiple of 90 in [0, 360).
    pub snap_rotation: f64,
    /// Connector distance under the unsnapped preview pose.
    pub distance: f64,
}

impl SnapCandidate<'_> {
    /// Commit the candidate as a new placed piece.
    pub fn placement(&self, id: impl Into<String>, piece: Arc<TrackPiece>) -> PlacedPiece {
        PlacedPiece::new(id, piece, self.snap_position, self.snap_rotation)
    }

    /// Where the two connectors meet.
    pub fn target_position(&self) -> Point {
        absolute_connector_position(self.placed_piece, self.placed_connector)
    }

    pub fn report(&self) -> SnapReport {
        SnapReport {
            placed_piece_id: self.placed_piece.id().to_string(),
            placed_connector_id: self.placed_connector.id.clone(),
            moving_connector_id: self.moving_connector.id.clone(),
            target_position: self.target_position(),
            snap_position: self.snap_position,
            snap_rotation: self.snap_rotation,
            distance: self.distance,
        }
    }
}

/// Owned, serializable summary of a [`SnapCandidate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapReport {
    pub placed_piece_id: String,
    pub placed_connector_id: String,
    pub moving_connector_id: String,
    pub target_position: Point,
    pub snap_position: Point,
    pub snap_rotation: f64,
    pub distance: f64,
}

/// Every viable snap for `new_piece` previewed at `new_position`/`new_rotation`,
/// closest first. Equal distances keep enumeration order: new-piece
/// connectors, then placed pieces in slice order, then their connectors.
pub fn find_snap_candidates<'a>(
    new_piece: &'a TrackPiece,
    new_position: Point,
    new_rotation: f64,
    placed_pieces: &'a [PlacedPiece],
    settings: &SnapSettings,
) -> Vec<SnapCandidate<'a>> {
    if !settings.enabled || placed_pieces.is_empty() {
        return Vec::new();
    }

    let compatible: fn(&Connector, &Connector) -> bool = if settings.strict_compatibility {
        connectors_explicitly_compatible
    } else {
        connectors_compatible
    };

    let mut candidates = Vec::new();

    for new_conn in &new_piece.connections {
        let new_pos = connector_position_at(new_position, new_rotation, new_conn);
        let new_angle = connector_angle_at(new_rotation, new_conn);

        for placed in placed_pieces {
            for placed_conn in &placed.piece().connections {
                if !compatible(new_conn, placed_conn) {
                    continue;
                }

                let placed_pos = absolute_connector_position(placed, placed_conn);
                let dist = distance(new_pos, placed_pos);
                if dist.is_nan() || dist > settings.threshold {
                    continue;
                }

                let placed_angle = absolute_connector_angle(placed, placed_conn);
                if !angles_opposite(new_angle, placed_angle, DEFAULT_ANGLE_TOLERANCE) {
                    continue;
                }

                let snap_rotation =
                    calculate_snap_rotation(placed_conn, placed.rotation(), new_conn);
                let snap_position =
                    calculate_snap_position(placed, placed_conn, new_conn, snap_rotation);

                candidates.push(SnapCandidate {
                    placed_piece: placed,
                    placed_connector: placed_conn,
                    moving_connector: new_conn,
                    snap_position,
                    snap_rotation,
                    distance: dist,
                });
            }
        }
    }

    // stable: ties stay in enumeration order
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates
}

/// The closest viable snap, if any.
pub fn find_snap_candidate<'a>(
    new_piece: &'a TrackPiece,
    new_position: Point,
    new_rotation: f64,
    placed_pieces: &'a [PlacedPiece],
    settings: &SnapSettings,
) -> Option<SnapCandidate<'a>> {
    let best = find_snap_candidates(new_piece, new_position, new_rotation, placed_pieces, settings)
        .into_iter()
        .next();
    match &best {
        Some(c) => debug!(
            "snap {}:{} -> {}:{} at {:.2}",
            new_piece.id,
            c.moving_connector.id,
            c.placed_piece.id(),
            c.placed_connector.id,
            c.distance
        ),
        None => debug!(
            "no snap for {} at ({:.1}, {:.1})",
            new_piece.id, new_position.x, new_position.y
        ),
    }
    best
}
