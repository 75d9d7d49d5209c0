//! Medium adapter.
//!
//! ## `publish` protocol
//!
//! 1. Probe the canonical link with a plain GET; anything but 2xx aborts.
//! 2. Render the Medium flavour of the post (cover header + body + footer).
//! 3. `GET /me` to resolve the author id for the token.
//! 4. `POST /users/{id}/posts` as a draft with tags and canonical URL.
//! 5. Return `data.url` from the response.
//!
//! Updating is not offered by the Medium API and always fails.

use serde::{Deserialize, Serialize};

use crosspost_core::{Post, ServiceId};

use crate::error::PublishError;
use crate::publisher::Publisher;

/// Tag put in front of every post's own tags.
pub const DEFAULT_TAG: &str = "programming";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /users/{id}/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content_format: &'static str,
    pub content: String,
    pub publish_status: &'static str,
    pub tags: Vec<String>,
    pub canonical_url: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    url: String,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Markdown submitted to Medium: optional cover image, the (resolved) body,
/// and an attribution footer pointing at the canonical link.
pub fn render_content(post: &Post) -> String {
    let mut content = String::new();
    if let Some(cover) = &post.front_matter.cover {
        let alt = cover.alt.as_deref().unwrap_or(&post.front_matter.title);
        content.push_str(&format!("![{alt}]({})\n\n", cover.image));
    }
    content.push_str(post.submission_body().trim());
    content.push_str("\n\n---\n\n");
    content.push_str(&format!(
        "*This post was originally published at [{link}]({link}) on {date}.*\n",
        link = post.link,
        date = post.front_matter.date.format("%B %-d, %Y"),
    ));
    content
}

/// Draft creation payload for `post`.
pub fn create_request(post: &Post) -> CreatePostRequest {
    let mut tags = Vec::with_capacity(post.front_matter.tags.len() + 1);
    tags.push(DEFAULT_TAG.to_string());
    tags.extend(post.front_matter.tags.iter().cloned());

    CreatePostRequest {
        title: post.front_matter.title.clone(),
        content_format: "markdown",
        content: render_content(post),
        publish_status: "draft",
        tags,
        canonical_url: post.link.clone(),
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

pub struct MediumPublisher {
    agent: ureq::Agent,
    token: String,
    api_url: String,
}

impl MediumPublisher {
    pub fn new(token: &str, api_url: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            token: token.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fail unless the canonical link answers 2xx.
    pub fn ensure_canonical_exists(&self, post: &Post) -> Result<(), PublishError> {
        match self.agent.get(&post.link).call() {
            Ok(resp) if (200..300).contains(&resp.status()) => Ok(()),
            Ok(resp) => Err(PublishError::Precondition(format!(
                "canonical link {} returned HTTP {}",
                post.link,
                resp.status()
            ))),
            Err(ureq::Error::Status(status, _)) => Err(PublishError::Precondition(format!(
                "canonical link {} returned HTTP {status}",
                post.link
            ))),
            Err(ureq::Error::Transport(t)) => Err(PublishError::Precondition(format!(
                "canonical link {} is unreachable: {t}",
                post.link
            ))),
        }
    }

    fn author_id(&self) -> Result<String, PublishError> {
        let resp = self
            .agent
            .get(&format!("{}/me", self.api_url))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
            .call()
            .map_err(remote_err)?;
        let user: Envelope<User> = resp.into_json().map_err(invalid_response)?;
        Ok(user.data.id)
    }
}

impl Publisher for MediumPublisher {
    fn service(&self) -> ServiceId {
        ServiceId::Medium
    }

    fn publish(&self, post: &Post) -> Result<String, PublishError> {
        self.ensure_canonical_exists(post)?;
        let request = create_request(post);
        let author = self.author_id()?;

        let resp = self
            .agent
            .post(&format!("{}/users/{author}/posts", self.api_url))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
            .send_json(&request)
            .map_err(remote_err)?;
        if !(200..300).contains(&resp.status()) {
            return Err(PublishError::Remote {
                service: ServiceId::Medium,
                status: resp.status(),
                body: resp.into_string().unwrap_or_default(),
            });
        }
        let created: Envelope<CreatedPost> = resp.into_json().map_err(invalid_response)?;
        tracing::info!("created Medium draft for {} at {}", post.name, created.data.url);
        Ok(created.data.url)
    }

    fn update(&self, _post: &Post) -> Result<String, PublishError> {
        Err(PublishError::Unsupported {
            service: ServiceId::Medium,
            operation: "update",
        })
    }
}

fn remote_err(err: ureq::Error) -> PublishError {
    match err {
        ureq::Error::Status(status, resp) => PublishError::Remote {
            service: ServiceId::Medium,
            status,
            body: resp.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(t) => PublishError::Network(t.to_string()),
    }
}

fn invalid_response(err: std::io::Error) -> PublishError {
    PublishError::InvalidResponse {
        service: ServiceId::Medium,
        reason: err.to_string(),
    }
}
