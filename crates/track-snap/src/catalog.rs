//! Track piece catalog: loading from a data directory, load-time validation,
//! and resolving placement records against the loaded pieces.

use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::error::SnapError;
use crate::types::*;

/// Index file at the root of a catalog directory.
pub const CATALOG_FILE: &str = "track-catalog.json";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    index: Option<TrackCatalog>,
    pieces: Vec<Arc<TrackPiece>>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Load `track-catalog.json` from `dir` and every piece file it lists.
    pub fn load(dir: &Path) -> Result<Self, SnapError> {
        let index_path = dir.join(CATALOG_FILE);
        let index: TrackCatalog = serde_json::from_slice(&std::fs::read(&index_path)?)?;

        let mut pieces = Vec::with_capacity(index.pieces.len());
        for entry in &index.pieces {
            let piece: TrackPiece = serde_json::from_slice(&std::fs::read(dir.join(&entry.file))?)?;
            if piece.id != entry.id {
                return Err(SnapError::PieceMismatch {
                    expected: entry.id.clone(),
                    found: piece.id,
                });
            }
            if piece.category != entry.category {
                warn!(
                    "catalog lists {} as {:?} but its file says {:?}",
                    entry.id, entry.category, piece.category
                );
            }
            pieces.push(piece);
        }

        if index.stats.total_pieces != pieces.len() {
            warn!(
                "catalog stats claim {} pieces, {} listed",
                index.stats.total_pieces,
                pieces.len()
            );
        }

        let mut catalog = Self::from_pieces(pieces)?;
        info!(
            "loaded {} track pieces from {} (catalog v{})",
            catalog.len(),
            dir.display(),
            index.version
        );
        catalog.index = Some(index);
        Ok(catalog)
    }

    /// Build a catalog from already-parsed pieces, validating each.
    pub fn from_pieces(pieces: Vec<TrackPiece>) -> Result<Self, SnapError> {
        let mut catalog = Self::default();
        for piece in pieces {
            validate_piece(&piece)?;
            if catalog.by_id.contains_key(&piece.id) {
                return Err(SnapError::InvalidPiece {
                    piece: piece.id,
                    reason: "duplicate piece id".to_string(),
                });
            }
            catalog.by_id.insert(piece.id.clone(), catalog.pieces.len());
            catalog.pieces.push(Arc::new(piece));
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// The parsed index file, when loaded from disk.
    pub fn index(&self) -> Option<&TrackCatalog> {
        self.index.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<TrackPiece>> {
        self.by_id.get(id).map(|&i| &self.pieces[i])
    }

    pub fn require(&self, id: &str) -> Result<Arc<TrackPiece>, SnapError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| SnapError::UnknownPiece(id.to_string()))
    }

    /// All pieces in catalog order.
    pub fn pieces(&self) -> impl Iterator<Item = &TrackPiece> {
        self.pieces.iter().map(|p| p.as_ref())
    }

    pub fn by_category(&self, category: TrackCategory) -> Vec<&TrackPiece> {
        self.pieces().filter(|p| p.category == category).collect()
    }

    /// Turn wire placements into placed pieces, keeping their order.
    pub fn resolve(&self, records: &[PlacementRecord]) -> Result<Vec<PlacedPiece>, SnapError> {
        records
            .iter()
            .map(|r| {
                let piece = self.require(&r.piece_id)?;
                Ok(PlacedPiece::new(r.id.clone(), piece, r.position, r.rotation))
            })
            .collect()
    }
}

/// Reject catalog data the snap engine cannot work with. The engine itself
/// never validates, so anything non-finite has to be stopped here.
pub fn validate_piece(piece: &TrackPiece) -> Result<(), SnapError> {
    let invalid = |reason: String| SnapError::InvalidPiece {
        piece: piece.id.clone(),
        reason,
    };

    if piece.connections.is_empty() {
        warn!("track piece {} has no connectors and will never snap", piece.id);
    }

    let mut seen = HashSet::with_capacity(piece.connections.len());
    for conn in &piece.connections {
        if !seen.insert(conn.id.as_str()) {
            return Err(invalid(format!("duplicate connector id {}", conn.id)));
        }

        if !conn.position.is_finite() {
            return Err(invalid(format!("connector {} has a non-finite position", conn.id)));
        }
        if !conn.angle.is_finite() {
            return Err(invalid(format!("connector {} has a non-finite angle", conn.id)));
        }
        if !conn.height.is_finite() {
            return Err(invalid(format!("connector {} has a non-finite height", conn.id)));
        }
    }

    if let Some(bbox) = piece.dimensions.bounding_box {
        if !(bbox.width > 0.0 && bbox.height > 0.0) {
            return Err(invalid(format!(
                "bounding box must be positive, got {}x{}",
                bbox.width, bbox.height
            )));
        }
    }

    Ok(())
}
