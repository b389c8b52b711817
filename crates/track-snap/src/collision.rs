//! Coarse overlap check between piece origins. Advisory only: orientation
//! is ignored, so rotated or elongated pieces can slip through.

use crate::geometry::distance;
use crate::types::{PlacedPiece, Point, TrackPiece};

fn overlaps(new_piece: &TrackPiece, new_position: Point, placed: &PlacedPiece) -> bool {
    let new_width = new_piece.dimensions.footprint().width;
    let placed_width = placed.piece().dimensions.footprint().width;
    distance(new_position, placed.position()) < (new_width + placed_width) / 2.0
}

/// Whether `new_piece` at `new_position` sits on top of any placed piece.
pub fn check_collision(
    new_piece: &TrackPiece,
    new_position: Point,
    placed_pieces: &[PlacedPiece],
) -> bool {
    placed_pieces
        .iter()
        .any(|placed| overlaps(new_piece, new_position, placed))
}

/// Ids of every placed piece `new_piece` would overlap, in slice order.
pub fn find_collisions<'a>(
    new_piece: &TrackPiece,
    new_position: Point,
    placed_pieces: &'a [PlacedPiece],
) -> Vec<&'a str> {
    placed_pieces
        .iter()
        .filter(|placed| overlaps(new_piece, new_position, placed))
        .map(|placed| placed.id())
        .collect()
}
