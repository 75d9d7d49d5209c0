//! `crosspost`: reconcile posts with the status file, confirm, publish.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crosspost_sync::{
    pipeline::{self, RunReport, Workspace},
    Action, Batch, Outcome, Plan, Publishers,
};

/// Arguments for a sync run. Relative paths resolve against `--root`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Blog root directory.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Directory holding the `*.md` posts [default: content/posts].
    #[arg(long)]
    pub posts_dir: Option<PathBuf>,

    /// Status file tracking what is live where [default: status.yaml].
    #[arg(long)]
    pub status_file: Option<PathBuf>,

    /// External-services config [default: external-services.yaml].
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show what would be published or updated, then exit without prompting.
    #[arg(long, conflicts_with = "yes")]
    pub dry_run: bool,

    /// Answer the confirmation prompt with yes.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let workspace = self.workspace();
        tracing::debug!("workspace: {workspace:?}");
        let config = workspace.load_config().with_context(|| {
            format!("failed to load config '{}'", workspace.config_path.display())
        })?;
        let publishers =
            Publishers::from_config(&config).context("failed to set up publishing services")?;

        let dry_run = self.dry_run;
        let yes = self.yes;
        let report = pipeline::run(&workspace, &config, &publishers, |plan| {
            print_plan(plan);
            if dry_run {
                return false;
            }
            yes || ask_to_continue()
        })
        .context("sync failed")?;

        match report {
            RunReport::NothingToDo => println!("Nothing to publish or update."),
            RunReport::Declined { .. } if dry_run => println!("[dry-run] no changes made"),
            RunReport::Declined { .. } => println!("Aborted; nothing was published."),
            RunReport::Completed { outcomes, .. } => {
                print_outcomes(&outcomes);
                println!("Saved status to {}", workspace.status_path.display());
            }
        }
        Ok(())
    }

    fn workspace(&self) -> Workspace {
        let mut workspace = Workspace::at(&self.root);
        if let Some(dir) = &self.posts_dir {
            workspace.posts_dir = resolve(&self.root, dir);
        }
        if let Some(file) = &self.status_file {
            workspace.status_path = resolve(&self.root, file);
        }
        if let Some(file) = &self.config {
            workspace.config_path = resolve(&self.root, file);
        }
        workspace
    }
}

/// `root.join` keeps absolute paths as-is.
fn resolve(root: &Path, path: &Path) -> PathBuf {
    root.join(path)
}

fn print_plan(plan: &Plan) {
    for batch in plan.publish.iter().filter(|b| !b.posts.is_empty()) {
        println!(
            "Will publish {} new post(s) to {}",
            batch.posts.len(),
            batch.service
        );
        print_batch(batch);
    }
    for batch in plan.update.iter().filter(|b| !b.posts.is_empty()) {
        println!("Will update {} post(s) on {}", batch.posts.len(), batch.service);
        print_batch(batch);
    }
}

fn print_batch(batch: &Batch) {
    for name in &batch.posts {
        println!("  - {name}");
    }
}

/// Anything but `y`/`yes` (including EOF or a read error) is a no.
fn ask_to_continue() -> bool {
    print!("Is this correct? Continue? (y/N) ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(_) => false,
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_outcomes(outcomes: &[Outcome]) {
    for outcome in outcomes {
        let (done, verb, preposition) = match outcome.action {
            Action::Update => ("Updated", "update", "on"),
            _ => ("Published", "publish", "to"),
        };
        match &outcome.result {
            Ok(url) => println!(
                "{} {done} '{}' {preposition} {}: {url}",
                "✓".green().bold(),
                outcome.post,
                outcome.service
            ),
            Err(err) => println!(
                "{} Failed to {verb} '{}' {preposition} {}: {err}",
                "✗".red().bold(),
                outcome.post,
                outcome.service
            ),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    println!("{} succeeded, {failed} failed", outcomes.len() - failed);
}
