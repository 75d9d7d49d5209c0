//! Cross-post link rewriting.
//!
//! Posts link to each other with Hugo short references:
//!
//! ```text
//! See {{< ref "foo.md" >}} and {{< relref "posts/bar.md" >}}.
//! ```
//!
//! Before submitting to a service, each reference is replaced by the URL the
//! referenced post has on that same service. A reference to a post with no
//! record there fails the referencing post.

use std::sync::OnceLock;

use regex::Regex;

use crosspost_core::{PostName, ServiceId, StatusStore};

use crate::error::PublishError;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\{\{[<%]\s*(?:rel)?ref\s+"([^"]+)"\s*[>%]\}\}"#)
            .expect("reference pattern is valid")
    })
}

/// Rewrite every reference in `body` to its URL on `service`.
///
/// A `#fragment` on the reference is kept and appended to the recorded URL.
pub fn resolve_references(
    body: &str,
    service: ServiceId,
    store: &StatusStore,
) -> Result<String, PublishError> {
    let mut resolved = String::with_capacity(body.len());
    let mut last = 0;
    let mut count = 0;
    for caps in reference_pattern().captures_iter(body) {
        let Some(whole) = caps.get(0) else { continue };
        let (target, fragment) = split_target(&caps[1]);
        let record = store
            .get(&target, service)
            .ok_or_else(|| PublishError::MissingReference {
                post: target.clone(),
                service,
            })?;
        resolved.push_str(&body[last..whole.start()]);
        resolved.push_str(&record.url);
        resolved.push_str(fragment);
        last = whole.end();
        count += 1;
    }
    resolved.push_str(&body[last..]);
    if count > 0 {
        tracing::debug!("resolved {count} reference(s) for {service}");
    }
    Ok(resolved)
}

/// `"/posts/foo.md"`, `"posts/foo.md"` and `"foo.md"` all name `foo.md`.
/// The fragment, if any, is returned with its leading `#`.
fn split_target(raw: &str) -> (PostName, &str) {
    let raw = raw.trim();
    let (path, fragment) = match raw.find('#') {
        Some(idx) => raw.split_at(idx),
        None => (raw, ""),
    };
    let name = path.rsplit('/').next().unwrap_or(path);
    (PostName::from(name), fragment)
}
