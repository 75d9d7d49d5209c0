//! Post loader.
//!
//! A post source file is a `---` delimited YAML front-matter block followed by
//! the markdown body:
//!
//! ```text
//! ---
//! title: Hello, World!
//! date: 2024-01-05
//! tags: [rust, cli]
//! cover:
//!   image: https://example.com/cover.png
//! ---
//! Body text…
//! ```
//!
//! Loading is all-or-nothing: any malformed post aborts the run with a
//! [`LoadError`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::{load_io, LoadError};
use crate::types::PostName;

const DELIMITER: &str = "---";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cover image declared in front-matter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cover {
    pub image: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Validated front-matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub cover: Option<Cover>,
}

/// Front-matter as written; required fields are checked after parsing so the
/// error can name the missing field.
#[derive(Debug, Default, Deserialize)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    cover: Option<Cover>,
}

/// A post loaded from disk for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub name: PostName,
    /// Raw file contents.
    pub text: String,
    /// SHA-256 hex digest of `text`.
    pub sha256: String,
    pub front_matter: FrontMatter,
    /// Everything after the closing front-matter delimiter.
    pub body: String,
    /// Canonical URL on the author's own site.
    pub link: String,
    /// `body` after cross-post references were rewritten for the service
    /// currently being submitted to.
    pub resolved_body: Option<String>,
}

impl Post {
    /// Parse a post from its file name and raw text.
    ///
    /// `source` is only used to annotate errors.
    pub fn parse(
        name: PostName,
        text: String,
        base_url: &str,
        source: &Path,
    ) -> Result<Self, LoadError> {
        let (header, body) = split_front_matter(&text).ok_or_else(|| {
            LoadError::MissingFrontMatter {
                path: source.to_path_buf(),
            }
        })?;
        let front_matter = parse_front_matter(header, source)?;
        let link = canonical_link(base_url, front_matter.date, &front_matter.title);
        let body = body.to_string();

        Ok(Self {
            name,
            sha256: fingerprint(text.as_bytes()),
            text,
            front_matter,
            body,
            link,
            resolved_body: None,
        })
    }

    /// The body to submit: the resolved body when one was set, else the raw
    /// body.
    pub fn submission_body(&self) -> &str {
        self.resolved_body.as_deref().unwrap_or(&self.body)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a single post from `path`.
pub fn load_post(path: &Path, base_url: &str) -> Result<Post, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            load_io(
                path,
                std::io::Error::other("post path has no file name"),
            )
        })?;
    let text = std::fs::read_to_string(path).map_err(|e| load_io(path, e))?;
    let post = Post::parse(PostName::from(name), text, base_url, path)?;
    tracing::debug!("loaded post {} ({})", post.name, post.sha256);
    Ok(post)
}

/// Load every `*.md` file directly under `dir`, sorted by file name.
pub fn load_posts(dir: &Path, base_url: &str) -> Result<Vec<Post>, LoadError> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| load_io(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    paths.iter().map(|p| load_post(p, base_url)).collect()
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// SHA-256 hex digest of raw post bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// URL slug for a title: lower-cased, whitespace runs collapsed to `-`, and
/// anything outside `[a-z0-9_.~-]` stripped.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = lowered.split_whitespace().collect::<Vec<_>>().join("-");
    hyphenated
        .chars()
        .filter(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '~' | '-'))
        .collect()
}

/// Path segment identifying a post: `YYYY-MM-DD-<slug>`.
pub fn link_segment(date: NaiveDate, title: &str) -> String {
    format!("{}-{}", date.format("%Y-%m-%d"), slugify(title))
}

/// `<base_url>/posts/<YYYY-MM-DD-slug>/`
pub fn canonical_link(base_url: &str, date: NaiveDate, title: &str) -> String {
    format!(
        "{}/posts/{}/",
        base_url.trim_end_matches('/'),
        link_segment(date, title)
    )
}

// ---------------------------------------------------------------------------
// Front-matter parsing
// ---------------------------------------------------------------------------

/// Split `text` into (front-matter, body). `None` when the file does not open
/// with a delimiter line or the block is never closed.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some((&text[header_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn parse_front_matter(header: &str, source: &Path) -> Result<FrontMatter, LoadError> {
    let raw: RawFrontMatter = if header.trim().is_empty() {
        RawFrontMatter::default()
    } else {
        serde_yaml::from_str(header).map_err(|e| LoadError::FrontMatter {
            path: source.to_path_buf(),
            source: e,
        })?
    };

    let title = raw
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| LoadError::MissingField {
            path: source.to_path_buf(),
            field: "title",
        })?;
    let date_raw = raw.date.ok_or_else(|| LoadError::MissingField {
        path: source.to_path_buf(),
        field: "date",
    })?;
    let date = parse_date(&date_raw).ok_or_else(|| LoadError::InvalidDate {
        path: source.to_path_buf(),
        value: date_raw.clone(),
    })?;

    Ok(FrontMatter {
        title,
        date,
        tags: raw.tags,
        cover: raw.cover,
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
