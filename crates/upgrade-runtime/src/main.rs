//! # Ink-Upgrade Runtime
//!
//! Deploys the averager implementations and proxy, inserts through the
//! proxy, upgrades it and checks the average before and after.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 2. Load configuration (defaults, then `UP_*` environment, then flags)
//! 3. Validate configuration
//! 4. Connect, wire components, run the workflow
//! 5. Print the report; exit non-zero on any failure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use up_04_proxy_workflow::{ProxyBacking, SequencingMode};
use upgrade_runtime::{RuntimeConfig, UpgradeRuntime};

/// Deploy, upgrade and verify an ink! averager behind a proxy.
#[derive(Parser, Debug)]
#[command(name = "upgrade-runtime")]
#[command(about = "Runs the proxy upgrade workflow against a contracts node")]
struct Args {
    /// WebSocket JSON-RPC endpoint
    #[arg(short, long)]
    url: Option<String>,

    /// Directory containing `<name>/<name>.wasm` and `<name>/metadata.json`
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    /// Signer secret URI
    #[arg(short, long)]
    signer: Option<String>,

    /// Module-error registry (JSON)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Submit the inserts concurrently with consecutive nonces
    #[arg(long)]
    pipelined: bool,

    /// What the proxy points at
    #[arg(long, value_enum)]
    backing: Option<Backing>,

    /// Wait for runtime events instead of resolving on block inclusion
    #[arg(long)]
    await_events: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backing {
    CodeHash,
    Address,
}

impl Args {
    fn apply(self, config: &mut RuntimeConfig) {
        if let Some(url) = self.url {
            config.node.url = url;
        }
        if let Some(root) = self.artifacts {
            config.artifacts.root = root;
        }
        if let Some(uri) = self.signer {
            config.signer.uri = uri;
        }
        if let Some(path) = self.registry {
            config.node.registry_file = Some(path);
        }
        if let Some(secs) = self.timeout {
            config.node.request_timeout_secs = secs;
        }
        if self.pipelined {
            config.workflow.mode = SequencingMode::Pipelined;
        }
        if let Some(backing) = self.backing {
            config.workflow.backing = match backing {
                Backing::CodeHash => ProxyBacking::CodeHash,
                Backing::Address => ProxyBacking::Address,
            };
        }
        config.node.await_events |= self.await_events;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let mut config = RuntimeConfig::from_env();
    Args::parse().apply(&mut config);

    let runtime = UpgradeRuntime::new(config)?;
    info!(
        url = %runtime.config().node.url,
        artifacts = %runtime.config().artifacts.root.display(),
        mode = ?runtime.config().workflow.mode,
        "Starting upgrade workflow"
    );

    match runtime.run().await {
        Ok(report) => {
            let json = serde_json::to_string_pretty(&report).context("failed to render report")?;
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            error!("{e:#}");
            Err(e)
        }
    }
}
