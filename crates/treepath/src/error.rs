use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from building or loading an address configuration.
///
/// Queries themselves never fail: a lookup without a result is `None` or an
/// empty query set. Only turning text into key paths, strategies, or
/// [`Options`](crate::types::Options) can go wrong.
#[derive(Debug, Error)]
pub enum Error {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty segment at position {position} in key path: {input:?}")]
    EmptySegment { input: String, position: usize },

    #[error("Unknown traversal method: {0}")]
    UnknownTraversal(String),

    #[error("childNodesPath must contain at least one key")]
    EmptyChildNodesPath,
}
