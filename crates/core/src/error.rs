use thiserror::Error;

/// Errors raised while loading configuration or content, or reported by a
/// host that lacks a primitive.
///
/// Engine operations themselves never fail: navigation to a missing element
/// is a no-op and a missing intersection primitive fails open.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid content: {0}")]
    Content(String),
    #[error("intersection observation is not available in this host")]
    IntersectionUnavailable,
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
