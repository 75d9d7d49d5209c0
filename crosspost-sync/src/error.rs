//! Error types for crosspost-sync.

use thiserror::Error;

use crosspost_core::{ConfigError, LoadError, PostName, ServiceId, StoreError};

/// Failure of a single publish/update call.
///
/// Always isolated to one (post, service) pair: the executor logs it and
/// moves on to the next post.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Something that must hold before submitting does not.
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("{operation} is not supported on {service}")]
    Unsupported {
        service: ServiceId,
        operation: &'static str,
    },

    /// Transport-level failure (DNS, connect, TLS, read).
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a non-2xx status.
    #[error("{service} API returned HTTP {status}: {body}")]
    Remote {
        service: ServiceId,
        status: u16,
        body: String,
    },

    /// The remote answered 2xx but the payload is not what we expect.
    #[error("unexpected response from {service}: {reason}")]
    InvalidResponse {
        service: ServiceId,
        reason: String,
    },

    /// A cross-post reference points at a post with no record on this service.
    #[error("referenced post '{post}' is not published on {service} yet")]
    MissingReference { post: PostName, service: ServiceId },
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to load posts: {0}")]
    Load(#[from] LoadError),

    #[error("status store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
