use crate::grid::TileId;

/// Errors raised while building stages, loading configs and solving IK.
///
/// Traversal itself never fails: a missing neighbour or a missed level is a
/// `None` (or the hole tile), not an error.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid triangle: sides {l1}, {l2} cannot span {distance}")]
    InvalidTriangle { l1: f32, l2: f32, distance: f32 },
    #[error("Unknown tile: {0}")]
    UnknownTile(TileId),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),
}

pub type PathResult<T> = Result<T, PathError>;
