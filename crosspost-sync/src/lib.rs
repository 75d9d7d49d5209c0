//! # crosspost-sync
//!
//! Reconciliation and publishing.
//!
//! Call [`pipeline::run`] to load posts, classify them against the status
//! store, confirm, push them through the configured [`Publisher`]s and save
//! the store.

pub mod dev;
pub mod error;
pub mod executor;
pub mod links;
pub mod medium;
pub mod pipeline;
pub mod publisher;
pub mod reconcile;

pub use error::{PublishError, SyncError};
pub use executor::Outcome;
pub use pipeline::{RunReport, Workspace};
pub use publisher::{Publisher, Publishers};
pub use reconcile::{Action, Batch, Plan};
