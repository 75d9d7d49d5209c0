//! crosspost: publish local blog posts to DEV and Medium.
//!
//! # Usage
//!
//! ```text
//! crosspost [--root <dir>] [--posts-dir <dir>] [--status-file <file>]
//!           [--config <file>] [--dry-run | --yes]
//! ```
//!
//! With no flags, posts are read from `content/posts`, state from
//! `status.yaml` and credentials from `external-services.yaml`, all relative
//! to the current directory.

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::sync::SyncArgs;

#[derive(Parser, Debug)]
#[command(
    name = "crosspost",
    version,
    about = "Publish local blog posts to external platforms and track what is live",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    cli.sync.run()
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
