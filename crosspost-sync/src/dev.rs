//! DEV adapter.
//!
//! Publishing is a placeholder: no API call is made, the URL is derived from
//! the post name. Updating is not supported.

use crosspost_core::{Post, ServiceId};

use crate::error::PublishError;
use crate::publisher::Publisher;

const BASE_URL: &str = "https://dev.to";

#[derive(Debug, Default)]
pub struct DevPublisher;

impl DevPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl Publisher for DevPublisher {
    fn service(&self) -> ServiceId {
        ServiceId::Dev
    }

    fn publish(&self, post: &Post) -> Result<String, PublishError> {
        tracing::debug!("DEV placeholder publish for {}", post.name);
        Ok(format!("{BASE_URL}/{}", post.name))
    }

    fn update(&self, _post: &Post) -> Result<String, PublishError> {
        Err(PublishError::Unsupported {
            service: ServiceId::Dev,
            operation: "update",
        })
    }
}
