//! # Workflow Service
//!
//! Drives the upgrade scenario end to end:
//!
//! 1. deploy v1
//! 2. deploy the proxy pointed at v1
//! 3. insert each configured value through the proxy
//! 4. query `average` through the proxy
//! 5. deploy v2
//! 6. `upgrade` the proxy to v2
//! 7. query `average` again
//!
//! All three artifacts are loaded before anything is submitted. The first
//! failure aborts the run.

use crate::config::{SequencingMode, WorkflowConfig};
use crate::domain::{backing_arg, implementation_args, ContractSummary, WorkflowReport};
use crate::errors::WorkflowError;
use futures::future::try_join_all;
use shared_types::AccountId;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use up_01_artifacts::{decode_i32, ArgValue, ArtifactSource, ContractArtifact};
use up_02_submission::{
    CallDescriptor, Confirmation, NodeConnection, Signer, SubmitOptions, TransactionApi, TxError,
};
use up_03_deployment::{DeployRequest, DeployedContract, Deployer};

/// Proxy upgrade workflow driver.
pub struct ProxyWorkflow {
    artifacts: Arc<dyn ArtifactSource>,
    node: Arc<dyn NodeConnection>,
    api: Arc<dyn TransactionApi>,
    deployer: Deployer,
    config: WorkflowConfig,
}

impl ProxyWorkflow {
    /// Create a driver.
    ///
    /// `node` serves queries and, in pipelined mode, the starting nonce.
    pub fn new(
        artifacts: Arc<dyn ArtifactSource>,
        node: Arc<dyn NodeConnection>,
        api: Arc<dyn TransactionApi>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            artifacts,
            node,
            deployer: Deployer::new(Arc::clone(&api)),
            api,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run every step with `signer`.
    #[instrument(
        skip_all,
        fields(
            signer = %signer.account(),
            mode = ?self.config.mode,
            backing = ?self.config.backing,
        )
    )]
    pub async fn run(&self, signer: &dyn Signer) -> Result<WorkflowReport, WorkflowError> {
        let config = &self.config;
        let v1_artifact = Arc::new(self.artifacts.load(&config.v1)?);
        let proxy_artifact = Arc::new(self.artifacts.load(&config.proxy)?);
        let v2_artifact = Arc::new(self.artifacts.load(&config.v2)?);

        let v1 = self.deploy_implementation("deploy v1", v1_artifact, signer).await?;

        let proxy_request = DeployRequest::new(
            config.proxy_constructor.as_str(),
            config.endowment,
            config.gas_limit,
        )
        .with_args(vec![backing_arg(config.backing, &v1)]);
        let proxy = self.deploy("deploy proxy", proxy_artifact, signer, proxy_request).await?;

        self.insert_all(&proxy, signer).await?;

        let average_before = self
            .check_average(
                "average before upgrade",
                &proxy,
                signer.account(),
                config.expected_before,
            )
            .await?;

        let v2 = self.deploy_implementation("deploy v2", v2_artifact, signer).await?;

        let upgrade = proxy.call(
            &config.upgrade_message,
            &[backing_arg(config.backing, &v2)],
            config.gas_limit,
        )?;
        self.transact("upgrade", signer, upgrade, SubmitOptions::default())
            .await?;
        info!(
            proxy = %proxy.address,
            target = %v2.address,
            code_hash = %v2.code_hash(),
            "Proxy upgraded"
        );

        let average_after = self
            .check_average("average after upgrade", &proxy, signer.account(), config.expected_after)
            .await?;

        let report = WorkflowReport {
            v1: ContractSummary::from(&v1),
            proxy: ContractSummary::from(&proxy),
            v2: ContractSummary::from(&v2),
            average_before,
            average_after,
        };
        info!(?average_before, ?average_after, "Workflow complete");
        Ok(report)
    }

    async fn deploy_implementation(
        &self,
        step: &str,
        artifact: Arc<ContractArtifact>,
        signer: &dyn Signer,
    ) -> Result<DeployedContract, WorkflowError> {
        let constructor = &self.config.implementation_constructor;
        let args = implementation_args(&artifact, constructor, signer.account())?;
        let request = DeployRequest::new(
            constructor.as_str(),
            self.config.endowment,
            self.config.gas_limit,
        )
        .with_args(args);
        self.deploy(step, artifact, signer, request).await
    }

    async fn deploy(
        &self,
        step: &str,
        artifact: Arc<ContractArtifact>,
        signer: &dyn Signer,
        request: DeployRequest,
    ) -> Result<DeployedContract, WorkflowError> {
        debug!(step, contract = artifact.name(), "Deploying");
        self.deployer
            .deploy(artifact, signer, request)
            .await
            .map_err(|source| WorkflowError::Deploy {
                step: step.to_string(),
                source,
            })
    }

    async fn insert_all(
        &self,
        proxy: &DeployedContract,
        signer: &dyn Signer,
    ) -> Result<(), WorkflowError> {
        let calls = self
            .config
            .inserts
            .iter()
            .map(|value| {
                let call = proxy.call("insert", &[ArgValue::I32(*value)], self.config.gas_limit)?;
                Ok((format!("insert {value}"), call))
            })
            .collect::<Result<Vec<_>, WorkflowError>>()?;

        match self.config.mode {
            SequencingMode::WaitEach => {
                for (step, call) in calls {
                    self.transact(&step, signer, call, SubmitOptions::default())
                        .await?;
                }
            }
            SequencingMode::Pipelined => {
                let base = self
                    .node
                    .account_next_index(&signer.account())
                    .await
                    .map_err(|source| WorkflowError::Transaction {
                        step: "insert".into(),
                        source: TxError::Connection(source),
                    })?;
                debug!(base, count = calls.len(), "Pipelining inserts");

                // The first failure drops the siblings, releasing their
                // subscriptions; a later nonce never executes once its
                // predecessor is refused.
                let submissions = calls.into_iter().zip(base..).map(|((step, call), nonce)| {
                    async move {
                        self.transact(&step, signer, call, SubmitOptions::with_nonce(nonce))
                            .await
                    }
                });
                try_join_all(submissions).await?;
            }
        }
        Ok(())
    }

    async fn check_average(
        &self,
        step: &str,
        proxy: &DeployedContract,
        origin: AccountId,
        expected: Option<i32>,
    ) -> Result<Option<i32>, WorkflowError> {
        let Some(expected) = expected else {
            return Ok(None);
        };

        let query = proxy.query(origin, "average", &[], self.config.gas_limit)?;
        let output = self
            .node
            .query(&query)
            .await
            .map_err(|source| WorkflowError::Query {
                step: step.to_string(),
                source,
            })?;
        let actual = decode_i32(output.as_slice())?;
        info!(step, average = actual, "Queried average");

        if actual != expected {
            return Err(WorkflowError::UnexpectedAverage {
                step: step.to_string(),
                expected,
                actual,
            });
        }
        Ok(Some(actual))
    }

    async fn transact(
        &self,
        step: &str,
        signer: &dyn Signer,
        call: CallDescriptor,
        options: SubmitOptions,
    ) -> Result<Confirmation, WorkflowError> {
        debug!(step, nonce = ?options.nonce, "Submitting");
        self.api
            .submit_and_await(signer, call, options)
            .await
            .map_err(|source| WorkflowError::Transaction {
                step: step.to_string(),
                source,
            })
    }
}
