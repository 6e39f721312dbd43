//! # Runtime Configuration
//!
//! Unified configuration for the node connection, artifact location, signer
//! and workflow parameters.
//!
//! ## Sources (lowest to highest precedence)
//!
//! 1. `Default` impls
//! 2. `UP_*` environment variables
//! 3. CLI flags (applied by the binary)

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use up_02_submission::{InclusionPolicy, SubmitterConfig};
use up_04_proxy_workflow::WorkflowConfig;

/// Node endpoint.
pub const ENV_NODE_URL: &str = "UP_NODE_URL";
/// Artifacts root directory.
pub const ENV_ARTIFACTS_DIR: &str = "UP_ARTIFACTS_DIR";
/// Signer secret URI.
pub const ENV_SIGNER_URI: &str = "UP_SIGNER_URI";
/// Per-request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "UP_REQUEST_TIMEOUT_SECS";
/// Module-error registry file.
pub const ENV_REGISTRY_FILE: &str = "UP_REGISTRY_FILE";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Node connection.
    pub node: NodeConfig,
    /// Artifact location.
    pub artifacts: ArtifactConfig,
    /// Signing key.
    pub signer: SignerConfig,
    /// Workflow parameters.
    pub workflow: WorkflowConfig,
}

impl RuntimeConfig {
    /// Defaults overlaid with the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_NODE_URL) {
            config.node.url = url;
        }
        if let Some(dir) = lookup(ENV_ARTIFACTS_DIR) {
            config.artifacts.root = PathBuf::from(dir);
        }
        if let Some(uri) = lookup(ENV_SIGNER_URI) {
            config.signer.uri = uri;
        }
        if let Some(path) = lookup(ENV_REGISTRY_FILE) {
            config.node.registry_file = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            match secs.parse() {
                Ok(secs) => config.node.request_timeout_secs = secs,
                Err(_) => warn!(
                    value = %secs,
                    "{ENV_REQUEST_TIMEOUT_SECS} is not a number, keeping default"
                ),
            }
        }

        config
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.node.url.starts_with("ws://") || self.node.url.starts_with("wss://")) {
            return Err(ConfigError::InvalidNodeUrl(self.node.url.clone()));
        }
        if self.node.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.signer.uri.is_empty() {
            return Err(ConfigError::MissingSigner);
        }
        if self.workflow.inserts.is_empty() {
            return Err(ConfigError::NoInserts);
        }
        if self.workflow.gas_limit == 0 {
            return Err(ConfigError::ZeroGas);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Endpoint is not a WebSocket URL.
    #[error("node url `{0}` must start with ws:// or wss://")]
    InvalidNodeUrl(String),

    /// Request timeout of zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,

    /// No signer URI.
    #[error("signer uri is empty; set {ENV_SIGNER_URI} or --signer")]
    MissingSigner,

    /// Nothing to insert.
    #[error("workflow needs at least one insert value")]
    NoInserts,

    /// Gas budget of zero.
    #[error("gas limit must be non-zero")]
    ZeroGas,
}

/// Node connection configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// WebSocket JSON-RPC endpoint.
    pub url: String,
    /// Timeout for each request/response round trip.
    pub request_timeout_secs: u64,
    /// Module-error registry. Without one every module error is opaque.
    pub registry_file: Option<PathBuf>,
    /// Wait for runtime events instead of resolving on block inclusion.
    pub await_events: bool,
}

impl NodeConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Submitter settings derived from this section.
    #[must_use]
    pub fn submitter(&self) -> SubmitterConfig {
        SubmitterConfig {
            inclusion_policy: if self.await_events {
                InclusionPolicy::AwaitEvents
            } else {
                InclusionPolicy::ResolveOnInclusion
            },
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:9944".into(),
            request_timeout_secs: 30,
            registry_file: None,
            await_events: false,
        }
    }
}

/// Artifact location.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Directory holding `<name>/<name>.wasm` and `<name>/metadata.json`.
    pub root: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("target/ink"),
        }
    }
}

/// Signing key.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Secret URI, e.g. `//Alice`.
    pub uri: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            uri: "//Alice".into(),
        }
    }
}
