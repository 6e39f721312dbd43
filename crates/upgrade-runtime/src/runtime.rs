//! # Runtime Wiring
//!
//! Builds every component from a [`RuntimeConfig`] and runs the workflow.

use crate::config::RuntimeConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use up_01_artifacts::FsArtifactLoader;
use up_02_submission::{
    JsonMetadataRegistry, LocalSigner, MetadataRegistry, NodeConnection, Signer, Submitter,
    TransactionApi, WsNodeConnection,
};
use up_04_proxy_workflow::{ProxyWorkflow, WorkflowReport};

/// Owns the configuration and wires components on demand.
#[derive(Debug, Clone)]
pub struct UpgradeRuntime {
    config: RuntimeConfig,
}

impl UpgradeRuntime {
    /// Create a runtime. Fails if the configuration is invalid.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Connect to the configured node and run the workflow.
    pub async fn run(&self) -> Result<WorkflowReport> {
        let url = &self.config.node.url;
        let connection = WsNodeConnection::connect(url, self.config.node.request_timeout())
            .await
            .with_context(|| format!("failed to connect to {url}"))?;
        info!(%url, "Connected to node");
        self.run_with(Arc::new(connection)).await
    }

    /// Run the workflow over an existing connection.
    pub async fn run_with(&self, connection: Arc<dyn NodeConnection>) -> Result<WorkflowReport> {
        let registry = self.load_registry()?;
        let signer = LocalSigner::from_uri(&self.config.signer.uri, Arc::clone(&connection))
            .context("failed to derive signer")?;
        info!(account = %signer.account(), "Signer ready");

        let submitter = Arc::new(Submitter::new(registry, self.config.node.submitter()));
        let api: Arc<dyn TransactionApi> = submitter.clone();
        let artifacts = Arc::new(FsArtifactLoader::new(&self.config.artifacts.root));
        let workflow =
            ProxyWorkflow::new(artifacts, connection, api, self.config.workflow.clone());

        let result = workflow.run(&signer).await;
        let stats = submitter.stats();
        info!(
            submitted = stats.submitted,
            succeeded = stats.succeeded,
            failed = stats.failed,
            rejected = stats.rejected,
            lost = stats.lost,
            "Submitter statistics"
        );
        result.context("upgrade workflow failed")
    }

    fn load_registry(&self) -> Result<Arc<dyn MetadataRegistry>> {
        match &self.config.node.registry_file {
            Some(path) => {
                let registry = JsonMetadataRegistry::from_file(path)
                    .with_context(|| format!("failed to load registry {}", path.display()))?;
                Ok(Arc::new(registry))
            }
            None => {
                warn!("No module-error registry configured, module errors will be opaque");
                Ok(Arc::new(JsonMetadataRegistry::empty()))
            }
        }
    }
}
