pub mod catalog;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod snap;
pub mod types;

#[cfg(test)]
mod test_support;

pub use catalog::Catalog;
pub use collision::{check_collision, find_collisions};
pub use error::SnapError;
pub use snap::{find_snap_candidate, find_snap_candidates, SnapCandidate, SnapReport, SnapSettings};
pub use types::{Connector, ConnectorKind, PlacedPiece, PlacementRecord, Point, TrackPiece};
