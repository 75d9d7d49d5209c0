//! crosspost core library: domain types, post loading, status and config
//! persistence, errors.
//!
//! - [`types`]: [`PostName`], [`ServiceId`], [`ServiceRecord`]
//! - [`post`]: front-matter parsing, fingerprints, canonical links
//! - [`status`]: the per-post, per-service status store
//! - [`config`]: external-services configuration
//! - [`error`]: [`LoadError`], [`StoreError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod post;
pub mod status;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, LoadError, StoreError};
pub use post::{Cover, FrontMatter, Post};
pub use status::StatusStore;
pub use types::{PostName, ServiceId, ServiceRecord};
