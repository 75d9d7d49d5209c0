//! Publisher adapter interface and the registry of configured adapters.

use crosspost_core::{Config, ConfigError, Post, ServiceId};

use crate::dev::DevPublisher;
use crate::error::PublishError;
use crate::medium::MediumPublisher;

/// One external publishing platform.
///
/// Adapters submit [`Post::submission_body`], so cross-post references must
/// already be resolved by the caller.
pub trait Publisher {
    fn service(&self) -> ServiceId;

    /// Create the post remotely; returns its public URL.
    fn publish(&self, post: &Post) -> Result<String, PublishError>;

    /// Push new content for an already-published post; returns its URL.
    fn update(&self, post: &Post) -> Result<String, PublishError>;
}

/// Configured adapters, in processing order.
pub struct Publishers {
    adapters: Vec<Box<dyn Publisher>>,
}

impl Publishers {
    /// Build adapters for every service enabled in `config`.
    ///
    /// Fails when an enabled service lacks its credentials.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut adapters: Vec<Box<dyn Publisher>> = Vec::new();
        for service in config.services()? {
            match service {
                ServiceId::Dev => adapters.push(Box::new(DevPublisher::new())),
                ServiceId::Medium => adapters.push(Box::new(MediumPublisher::new(
                    config.medium_token()?,
                    config.medium_api_url(),
                ))),
            }
        }
        Ok(Self { adapters })
    }

    /// Registry over explicit adapters; later duplicates of a service are
    /// ignored.
    pub fn with_adapters(adapters: Vec<Box<dyn Publisher>>) -> Self {
        let mut unique: Vec<Box<dyn Publisher>> = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            if !unique.iter().any(|a| a.service() == adapter.service()) {
                unique.push(adapter);
            }
        }
        Self { adapters: unique }
    }

    /// Enabled services in processing order.
    pub fn services(&self) -> Vec<ServiceId> {
        self.adapters.iter().map(|a| a.service()).collect()
    }

    pub fn get(&self, service: ServiceId) -> Option<&dyn Publisher> {
        self.adapters
            .iter()
            .find(|a| a.service() == service)
            .map(|a| a.as_ref())
    }
}
