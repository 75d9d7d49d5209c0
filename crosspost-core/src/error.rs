//! Error types for crosspost-core.
//!
//! All three errors here are fatal to a run: they surface before any remote
//! call is made (loading posts, the status file, or the service config).

use std::path::PathBuf;

use thiserror::Error;

/// A post source file could not be turned into a [`crate::Post`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not open with a `---` delimited front-matter block.
    #[error("missing front-matter in {path}")]
    MissingFrontMatter { path: PathBuf },

    /// The front-matter block is not valid YAML (or not a mapping).
    #[error("failed to parse front-matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("front-matter in {path} is missing required field '{field}'")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("invalid date '{value}' in {path}; expected YYYY-MM-DD or RFC 3339")]
    InvalidDate { path: PathBuf, value: String },
}

/// The status file could not be read or written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse status file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The external-services config is unreadable or incomplete.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("service '{service}' is enabled but '{service}.{field}' is not set")]
    MissingCredential {
        service: &'static str,
        field: &'static str,
    },

    #[error("unknown service '{0}'; expected one of: dev, medium")]
    UnknownService(String),
}

pub(crate) fn load_io(path: impl Into<PathBuf>, source: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
