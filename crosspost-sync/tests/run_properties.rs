//! End-to-end properties of a sync run against a temp workspace, using
//! scripted publishers instead of real services.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crosspost_core::{status, Config, Post, PostName, ServiceId};
use crosspost_sync::{
    pipeline::{self, RunReport, Workspace},
    Action, PublishError, Publisher, Publishers,
};
use tempfile::TempDir;

/// Publishes to `https://<service>.example/<name>`; refuses posts in `reject`.
struct Scripted {
    service: ServiceId,
    reject: HashSet<&'static str>,
}

impl Publisher for Scripted {
    fn service(&self) -> ServiceId {
        self.service
    }

    fn publish(&self, post: &Post) -> Result<String, PublishError> {
        if self.reject.contains(post.name.0.as_str()) {
            return Err(PublishError::Remote {
                service: self.service,
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(format!("https://{}.example/{}", self.service.as_str(), post.name))
    }

    fn update(&self, post: &Post) -> Result<String, PublishError> {
        self.publish(post)
    }
}

fn publishers(reject: &[&'static str]) -> Publishers {
    let adapters: Vec<Box<dyn Publisher>> = vec![
        Box::new(Scripted {
            service: ServiceId::Dev,
            reject: reject.iter().copied().collect(),
        }),
        Box::new(Scripted {
            service: ServiceId::Medium,
            reject: HashSet::new(),
        }),
    ];
    Publishers::with_adapters(adapters)
}

fn setup() -> (TempDir, Workspace, Config) {
    let root = TempDir::new().expect("root");
    let ws = Workspace::at(root.path());
    fs::create_dir_all(&ws.posts_dir).expect("mkdir posts");
    let config = Config::from_yaml(
        "site:\n  base_url: https://blog.example.com\n",
        Path::new("external-services.yaml"),
    )
    .expect("config");
    (root, ws, config)
}

fn write_post(ws: &Workspace, name: &str, body: &str) {
    fs::write(
        ws.posts_dir.join(name),
        format!("---\ntitle: {name}\ndate: 2024-01-05\n---\n{body}"),
    )
    .expect("write post");
}

#[test]
fn failed_publish_leaves_no_record_and_is_retried_next_run() {
    let (_root, ws, config) = setup();
    write_post(&ws, "a.md", "a");

    pipeline::run(&ws, &config, &publishers(&["a.md"]), |_| true).expect("run");
    let store = status::load_at(&ws.status_path).expect("load");
    assert!(store.get(&PostName::from("a.md"), ServiceId::Dev).is_none());
    assert!(store.get(&PostName::from("a.md"), ServiceId::Medium).is_some());

    let mut seen = None;
    pipeline::run(&ws, &config, &publishers(&[]), |plan| {
        seen = Some(plan.clone());
        true
    })
    .expect("rerun");
    let plan = seen.expect("prompted");
    assert_eq!(plan.publish[0].service, ServiceId::Dev);
    assert_eq!(plan.publish[0].posts, vec![PostName::from("a.md")]);
    assert!(plan.publish[1].posts.is_empty());
}

#[test]
fn edited_post_is_updated_with_new_fingerprint() {
    let (_root, ws, config) = setup();
    write_post(&ws, "a.md", "v1");
    pipeline::run(&ws, &config, &publishers(&[]), |_| true).expect("first");

    write_post(&ws, "a.md", "v2");
    let report = pipeline::run(&ws, &config, &publishers(&[]), |_| true).expect("second");
    let RunReport::Completed { outcomes, .. } = report else {
        panic!("expected completed run");
    };
    assert!(outcomes.iter().all(|o| o.action == Action::Update && o.is_success()));

    let current = crosspost_core::post::load_post(&ws.posts_dir.join("a.md"), "x").expect("post");
    let store = status::load_at(&ws.status_path).expect("load");
    for service in ServiceId::ALL {
        let record = store.get(&PostName::from("a.md"), service).expect("record");
        assert_eq!(record.sha256, current.sha256);
    }
}

#[test]
fn up_to_date_workspace_leaves_status_file_byte_identical() {
    let (_root, ws, config) = setup();
    write_post(&ws, "a.md", "a");
    pipeline::run(&ws, &config, &publishers(&[]), |_| true).expect("first");
    let before = fs::read(&ws.status_path).expect("read");

    let report = pipeline::run(&ws, &config, &publishers(&[]), |_| panic!("must not prompt"))
        .expect("second");
    assert!(matches!(report, RunReport::NothingToDo));
    assert_eq!(fs::read(&ws.status_path).expect("read"), before);
}

#[test]
fn reference_resolves_per_service_and_fails_where_target_is_missing() {
    let (_root, ws, config) = setup();
    write_post(&ws, "a.md", "target");
    write_post(&ws, "b.md", r#"see {{< ref "a.md" >}}"#);

    // a.md cannot reach DEV, so b.md's reference only resolves on Medium.
    let report = pipeline::run(&ws, &config, &publishers(&["a.md"]), |_| true).expect("run");
    let RunReport::Completed { outcomes, .. } = report else {
        panic!("expected completed run");
    };
    let b_dev = outcomes
        .iter()
        .find(|o| o.post == PostName::from("b.md") && o.service == ServiceId::Dev)
        .expect("b on dev");
    assert!(matches!(b_dev.result, Err(PublishError::MissingReference { .. })));

    let store = status::load_at(&ws.status_path).expect("load");
    assert!(store.get(&PostName::from("b.md"), ServiceId::Dev).is_none());
    assert_eq!(
        store.get(&PostName::from("b.md"), ServiceId::Medium).map(|r| r.url.as_str()),
        Some("https://medium.example/b.md")
    );
}

#[test]
fn missing_status_file_means_everything_is_new() {
    let (_root, ws, config) = setup();
    write_post(&ws, "a.md", "a");
    write_post(&ws, "b.md", "b");

    let report = pipeline::run(&ws, &config, &publishers(&[]), |_| false).expect("run");
    let RunReport::Declined { plan } = report else {
        panic!("expected declined run");
    };
    assert_eq!(plan.operation_count(), 4);
    assert!(plan.update.iter().all(|b| b.posts.is_empty()));
}
