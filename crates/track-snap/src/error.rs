use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapError {
    #[error("unknown track piece: {0}")]
    UnknownPiece(String),

    #[error("invalid track piece {piece}: {reason}")]
    InvalidPiece { piece: String, reason: String },

    #[error("catalog entry {expected} points at a file declaring piece {found}")]
    PieceMismatch { expected: String, found: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
