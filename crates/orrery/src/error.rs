use thiserror::Error;

use crate::api::types::NodeId;

/// Errors raised while constructing or configuring the orrery.
///
/// Nothing on the per-frame path returns these; the frame loop only
/// does bounds-checked lookups and soft-fails.
#[derive(Debug, Error)]
pub enum OrreryError {
    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("scene already built; tear down the previous graph first")]
    SceneAlreadyBuilt,

    #[error("invalid scene node: {0:?}")]
    InvalidNode(NodeId),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("texture key {key:?} is shared by {first} and {second}")]
    DuplicateTextureKey {
        key: String,
        first: String,
        second: String,
    },

    #[error("texture for {body} is missing or does not contain key {key:?}")]
    MissingTexture { body: String, key: String },
}

/// Result type for orrery operations.
pub type Result<T> = std::result::Result<T, OrreryError>;
