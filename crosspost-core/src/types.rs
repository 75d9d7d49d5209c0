//! Domain types shared by the loader, the status store and the publishers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identity of a post: the basename of its source file (e.g. `foo.md`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostName(pub String);

impl fmt::Display for PostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PostName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PostName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// An external publishing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    Dev,
    Medium,
}

impl ServiceId {
    /// Every known service, in default processing order.
    pub const ALL: [ServiceId; 2] = [ServiceId::Dev, ServiceId::Medium];

    /// Stable key used in the status and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceId::Dev => "dev",
            ServiceId::Medium => "medium",
        }
    }

    /// Human-facing platform name.
    pub fn display_name(self) -> &'static str {
        match self {
            ServiceId::Dev => "DEV",
            ServiceId::Medium => "Medium",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ServiceId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(ServiceId::Dev),
            "medium" => Ok(ServiceId::Medium),
            other => Err(ConfigError::UnknownService(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Outcome of the last successful publish/update of one post on one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub url: String,
    /// Fingerprint of the content the remote accepted.
    pub sha256: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
