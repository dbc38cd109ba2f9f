//! Error types for thread store operations.

use crate::forum::types::PostId;
use thiserror::Error;

/// Result type alias for thread store operations.
pub type Result<T> = std::result::Result<T, ThreadError>;

/// Main error type for thread store operations.
///
/// Every variant produced by the store itself is recoverable: the rejected
/// operation leaves the forest exactly as it was.
#[derive(Error, Debug)]
pub enum ThreadError {
    /// Input validation errors (empty content, oversize body, stale depth)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reply attempted on a node that already sits at the maximum depth
    #[error("Reply depth limit exceeded: target depth {depth} is at the maximum")]
    DepthLimitExceeded {
        /// Depth of the node the caller tried to reply to.
        depth: usize,
    },

    /// Target id is absent from the forest
    #[error("Post not found: {0}")]
    NotFound(PostId),

    /// Retraction requested on a counter that is already zero
    #[error("No {counter} to retract on post {post}")]
    NothingToRetract {
        /// Post whose counter was targeted.
        post: PostId,
        /// Name of the counter ("like" or "dislike").
        counter: &'static str,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ThreadError {
    /// Creates a new validation error.
    pub fn validation<T: ToString>(msg: T) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Creates a new configuration error.
    pub fn config<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Creates a new serialization error.
    pub fn serialization<T: ToString>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Returns true if this error is a rejected store operation rather than
    /// an environment or I/O failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ThreadError::Validation(_)
                | ThreadError::DepthLimitExceeded { .. }
                | ThreadError::NotFound(_)
                | ThreadError::NothingToRetract { .. }
        )
    }
}

impl From<serde_json::Error> for ThreadError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}
