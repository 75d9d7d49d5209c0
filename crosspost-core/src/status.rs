//! Status store: which post is live on which service, at which fingerprint.
//!
//! # File layout
//!
//! ```text
//! foo.md:
//!   dev:
//!     url: https://dev.to/foo.md
//!     sha256: 3f1c…
//!   medium:
//!     url: https://medium.com/@me/foo-123
//!     sha256: 3f1c…
//! ```
//!
//! Read fully at start, written fully at the end of a run. Writes use the
//! `.tmp` + rename pattern so an interrupted save never truncates the file.
//! Service keys this build does not know are kept as-is.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{store_io, StoreError};
use crate::types::{PostName, ServiceId, ServiceRecord};

/// Per-post map from service key to its record.
pub type ServiceRecords = BTreeMap<String, ServiceRecord>;

/// In-memory status store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusStore {
    posts: BTreeMap<PostName, ServiceRecords>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `post` on `service`, if it was ever published there.
    pub fn get(&self, post: &PostName, service: ServiceId) -> Option<&ServiceRecord> {
        self.posts.get(post)?.get(service.as_str())
    }

    /// Insert or replace the record for `post` on `service`.
    pub fn record(&mut self, post: &PostName, service: ServiceId, record: ServiceRecord) {
        self.posts
            .entry(post.clone())
            .or_default()
            .insert(service.as_str().to_string(), record);
    }

    /// All services a post has records for.
    pub fn services_for(&self, post: &PostName) -> Option<&ServiceRecords> {
        self.posts.get(post)
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }
}

/// Load the status store from `path`.
///
/// Returns an empty store if the file does not exist yet. An empty file is
/// also an empty store.
pub fn load_at(path: &Path) -> Result<StatusStore, StoreError> {
    if !path.exists() {
        tracing::debug!("no status file at {}, starting empty", path.display());
        return Ok(StatusStore::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| store_io(path, e))?;
    if contents.trim().is_empty() {
        return Ok(StatusStore::new());
    }
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save the status store to `path` atomically.
///
/// Writes to `<path>.tmp` in the same directory, then renames over `<path>`.
pub fn save_at(path: &Path, store: &StatusStore) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| store_io(dir, e))?;
    }

    let yaml = serde_yaml::to_string(store)?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, yaml).map_err(|e| store_io(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(store_io(path, e));
    }
    tracing::debug!("saved status for {} post(s) to {}", store.len(), path.display());
    Ok(())
}

/// `<path>.tmp` sibling used while saving.
pub fn tmp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    name.into()
}
