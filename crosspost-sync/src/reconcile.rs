//! Reconciler: decide, per service, which posts need publishing or updating.
//!
//! Classification of one (post, service) pair:
//! 1. `Publish`: no record for the pair
//! 2. `Update`: a record exists with a different fingerprint
//! 3. `Unchanged`: a record exists with the same fingerprint
//!
//! The plan is computed once per run, from the store as loaded; the executor
//! never re-classifies.

use crosspost_core::{Post, PostName, ServiceId, StatusStore};

/// What a (post, service) pair needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Publish,
    Update,
    Unchanged,
}

impl Action {
    /// Verb used in progress lines.
    pub fn verb(self) -> &'static str {
        match self {
            Action::Publish => "publish",
            Action::Update => "update",
            Action::Unchanged => "skip",
        }
    }
}

/// Posts to process on one service, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub service: ServiceId,
    pub posts: Vec<PostName>,
}

/// Publish and update batches, one of each per configured service, in
/// configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub publish: Vec<Batch>,
    pub update: Vec<Batch>,
}

impl Plan {
    /// True when no service has anything to publish or update.
    pub fn is_empty(&self) -> bool {
        self.publish
            .iter()
            .chain(self.update.iter())
            .all(|b| b.posts.is_empty())
    }

    /// Total number of operations the plan will attempt.
    pub fn operation_count(&self) -> usize {
        self.publish
            .iter()
            .chain(self.update.iter())
            .map(|b| b.posts.len())
            .sum()
    }
}

/// Classify one post for one service against `store`.
pub fn classify(post: &Post, store: &StatusStore, service: ServiceId) -> Action {
    match store.get(&post.name, service) {
        None => Action::Publish,
        Some(record) if record.sha256 != post.sha256 => Action::Update,
        Some(_) => Action::Unchanged,
    }
}

/// Build the plan for `posts` across `services`.
pub fn reconcile(posts: &[Post], store: &StatusStore, services: &[ServiceId]) -> Plan {
    let mut publish: Vec<Batch> = services
        .iter()
        .map(|&service| Batch {
            service,
            posts: Vec::new(),
        })
        .collect();
    let mut update = publish.clone();

    for post in posts {
        for (idx, &service) in services.iter().enumerate() {
            let action = classify(post, store, service);
            tracing::debug!("{} on {}: {:?}", post.name, service, action);
            match action {
                Action::Publish => publish[idx].posts.push(post.name.clone()),
                Action::Update => update[idx].posts.push(post.name.clone()),
                Action::Unchanged => {}
            }
        }
    }

    Plan { publish, update }
}
