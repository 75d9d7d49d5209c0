//! Single-pass sync pipeline: load → reconcile → confirm → execute → persist.
//!
//! The CLI is a thin shell over [`run`]; everything it touches on disk is
//! named by a [`Workspace`] so tests can point it at a temp directory.

use std::path::{Path, PathBuf};

use crosspost_core::{config, post, status, Config};

use crate::executor::{self, Outcome};
use crate::publisher::Publishers;
use crate::reconcile::{self, Plan};
use crate::SyncError;

pub const DEFAULT_POSTS_DIR: &str = "content/posts";
pub const DEFAULT_STATUS_FILE: &str = "status.yaml";
pub const DEFAULT_CONFIG_FILE: &str = "external-services.yaml";

/// Files and directories a run reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub posts_dir: PathBuf,
    pub status_path: PathBuf,
    pub config_path: PathBuf,
}

impl Workspace {
    /// Default layout rooted at `root`.
    pub fn at(root: &Path) -> Self {
        Self {
            posts_dir: root.join(DEFAULT_POSTS_DIR),
            status_path: root.join(DEFAULT_STATUS_FILE),
            config_path: root.join(DEFAULT_CONFIG_FILE),
        }
    }

    pub fn load_config(&self) -> Result<Config, SyncError> {
        Ok(config::load_at(&self.config_path)?)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunReport {
    /// Every post is current on every service; nothing was prompted or written.
    NothingToDo,
    /// The confirmation was declined; nothing was written.
    Declined { plan: Plan },
    /// The plan was executed and the status file rewritten.
    Completed { plan: Plan, outcomes: Vec<Outcome> },
}

/// Run one sync pass.
///
/// `confirm` is shown the plan and must return `true` to proceed. It is not
/// called when the plan is empty.
pub fn run<F>(
    workspace: &Workspace,
    config: &Config,
    publishers: &Publishers,
    confirm: F,
) -> Result<RunReport, SyncError>
where
    F: FnOnce(&Plan) -> bool,
{
    let mut posts = post::load_posts(&workspace.posts_dir, &config.site.base_url)?;
    let mut store = status::load_at(&workspace.status_path)?;
    tracing::debug!(
        "loaded {} post(s), {} status entr(ies)",
        posts.len(),
        store.len()
    );

    let plan = reconcile::reconcile(&posts, &store, &publishers.services());
    if plan.is_empty() {
        return Ok(RunReport::NothingToDo);
    }
    if !confirm(&plan) {
        return Ok(RunReport::Declined { plan });
    }

    let outcomes = executor::execute(&plan, &mut posts, &mut store, publishers);
    status::save_at(&workspace.status_path, &store)?;

    Ok(RunReport::Completed { plan, outcomes })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;

    use crosspost_core::{PostName, ServiceId};
    use tempfile::TempDir;

    use super::*;
    use crate::dev::DevPublisher;
    use crate::publisher::Publisher;

    fn workspace() -> (TempDir, Workspace) {
        let root = TempDir::new().expect("root");
        let ws = Workspace::at(root.path());
        fs::create_dir_all(&ws.posts_dir).expect("mkdir");
        (root, ws)
    }

    fn config() -> Config {
        Config::from_yaml(
            "site:\n  base_url: https://blog.example.com\nservices: [dev]\n",
            Path::new("external-services.yaml"),
        )
        .expect("config")
    }

    fn dev_only() -> Publishers {
        let adapters: Vec<Box<dyn Publisher>> = vec![Box::new(DevPublisher::new())];
        Publishers::with_adapters(adapters)
    }

    fn write_post(ws: &Workspace, name: &str, body: &str) {
        fs::write(
            ws.posts_dir.join(name),
            format!("---\ntitle: {name}\ndate: 2024-01-05\n---\n{body}"),
        )
        .expect("write post");
    }

    #[test]
    fn default_layout_matches_file_names() {
        let ws = Workspace::at(Path::new("/blog"));
        assert_eq!(ws.posts_dir, PathBuf::from("/blog/content/posts"));
        assert_eq!(ws.status_path, PathBuf::from("/blog/status.yaml"));
        assert_eq!(ws.config_path, PathBuf::from("/blog/external-services.yaml"));
    }

    #[test]
    fn completed_run_persists_records() {
        let (_root, ws) = workspace();
        write_post(&ws, "a.md", "hello");

        let report = run(&ws, &config(), &dev_only(), |_| true).expect("run");
        let RunReport::Completed { outcomes, .. } = report else {
            panic!("expected completed run");
        };
        assert_eq!(outcomes.len(), 1);

        let store = status::load_at(&ws.status_path).expect("load");
        let record = store.get(&PostName::from("a.md"), ServiceId::Dev).expect("record");
        assert_eq!(record.url, "https://dev.to/a.md");
    }

    #[test]
    fn second_run_has_nothing_to_do_and_skips_prompt() {
        let (_root, ws) = workspace();
        write_post(&ws, "a.md", "hello");
        run(&ws, &config(), &dev_only(), |_| true).expect("first run");
        let before = fs::read(&ws.status_path).expect("read");

        let prompted = Cell::new(false);
        let report = run(&ws, &config(), &dev_only(), |_| {
            prompted.set(true);
            true
        })
        .expect("second run");
        assert!(matches!(report, RunReport::NothingToDo));
        assert!(!prompted.get());
        assert_eq!(fs::read(&ws.status_path).expect("read"), before);
    }

    #[test]
    fn declined_confirmation_writes_nothing() {
        let (_root, ws) = workspace();
        write_post(&ws, "a.md", "hello");

        let report = run(&ws, &config(), &dev_only(), |plan| {
            assert_eq!(plan.operation_count(), 1);
            false
        })
        .expect("run");
        assert!(matches!(report, RunReport::Declined { .. }));
        assert!(!ws.status_path.exists());
    }

    #[test]
    fn failed_updates_still_persist_other_successes() {
        let (_root, ws) = workspace();
        write_post(&ws, "a.md", "v1");
        run(&ws, &config(), &dev_only(), |_| true).expect("first run");

        write_post(&ws, "a.md", "v2");
        write_post(&ws, "b.md", "new");
        let report = run(&ws, &config(), &dev_only(), |_| true).expect("second run");
        let RunReport::Completed { outcomes, .. } = report else {
            panic!("expected completed run");
        };
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
        assert_eq!(failed.len(), 1, "DEV update is unsupported");
        assert_eq!(failed[0].post, PostName::from("a.md"));

        let store = status::load_at(&ws.status_path).expect("load");
        assert!(store.get(&PostName::from("b.md"), ServiceId::Dev).is_some());
        let a = store.get(&PostName::from("a.md"), ServiceId::Dev).expect("a");
        assert_ne!(
            a.sha256,
            post::fingerprint(fs::read(ws.posts_dir.join("a.md")).expect("read").as_slice()),
            "failed update must keep the old fingerprint"
        );
    }

    #[test]
    fn malformed_post_aborts_before_any_write() {
        let (_root, ws) = workspace();
        write_post(&ws, "a.md", "fine");
        fs::write(ws.posts_dir.join("bad.md"), "no front-matter").expect("write");

        let err = run(&ws, &config(), &dev_only(), |_| true).unwrap_err();
        assert!(matches!(err, SyncError::Load(_)), "got: {err}");
        assert!(!ws.status_path.exists());
    }
}
