//! Execute a reconciled [`Plan`] against the configured publishers.
//!
//! Publish batches run first, then update batches; within each phase services
//! go in configured order and posts in discovery order. Every call is
//! isolated: a failure becomes a failed [`Outcome`] and the loop continues.
//! Successful calls are written into the in-memory store immediately, so
//! later posts in the same run can reference them.

use crosspost_core::{Post, PostName, ServiceId, ServiceRecord, StatusStore};

use crate::error::PublishError;
use crate::links;
use crate::publisher::Publishers;
use crate::reconcile::{Action, Batch, Plan};

/// Result of one publish/update call.
#[derive(Debug)]
pub struct Outcome {
    pub action: Action,
    pub service: ServiceId,
    pub post: PostName,
    /// Published URL on success.
    pub result: Result<String, PublishError>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every operation in `plan`, recording successes into `store`.
pub fn execute(
    plan: &Plan,
    posts: &mut [Post],
    store: &mut StatusStore,
    publishers: &Publishers,
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(plan.operation_count());
    run_phase(Action::Publish, &plan.publish, posts, store, publishers, &mut outcomes);
    run_phase(Action::Update, &plan.update, posts, store, publishers, &mut outcomes);
    outcomes
}

fn run_phase(
    action: Action,
    batches: &[Batch],
    posts: &mut [Post],
    store: &mut StatusStore,
    publishers: &Publishers,
    outcomes: &mut Vec<Outcome>,
) {
    for batch in batches {
        for name in &batch.posts {
            let Some(post) = posts.iter_mut().find(|p| &p.name == name) else {
                continue;
            };
            let result = attempt(action, batch.service, post, store, publishers);
            match &result {
                Ok(url) => tracing::info!(
                    "{} '{}' on {}: {}",
                    action.verb(),
                    post.name,
                    batch.service,
                    url
                ),
                Err(err) => tracing::warn!(
                    "failed to {} '{}' on {}: {}",
                    action.verb(),
                    post.name,
                    batch.service,
                    err
                ),
            }
            outcomes.push(Outcome {
                action,
                service: batch.service,
                post: post.name.clone(),
                result,
            });
        }
    }
}

fn attempt(
    action: Action,
    service: ServiceId,
    post: &mut Post,
    store: &mut StatusStore,
    publishers: &Publishers,
) -> Result<String, PublishError> {
    let publisher = publishers.get(service).ok_or_else(|| {
        PublishError::Precondition(format!("no adapter configured for {service}"))
    })?;

    post.resolved_body = Some(links::resolve_references(&post.body, service, store)?);

    let url = match action {
        Action::Publish => publisher.publish(post)?,
        Action::Update => publisher.update(post)?,
        Action::Unchanged => return Err(PublishError::Precondition(format!(
            "'{}' is unchanged on {service}",
            post.name
        ))),
    };

    store.record(
        &post.name,
        service,
        ServiceRecord {
            url: url.clone(),
            sha256: post.sha256.clone(),
        },
    );
    Ok(url)
}
