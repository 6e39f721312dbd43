//! # Deployment Service

use crate::domain::{build_instantiate, DeployRequest, DeployedContract};
use crate::errors::DeployError;
use std::sync::Arc;
use tracing::{info, instrument};
use up_01_artifacts::ContractArtifact;
use up_02_submission::{Signer, TransactionApi};

/// Instantiates contracts through a transaction submitter.
#[derive(Clone)]
pub struct Deployer {
    api: Arc<dyn TransactionApi>,
}

impl Deployer {
    /// Create a deployer submitting through `api`.
    pub fn new(api: Arc<dyn TransactionApi>) -> Self {
        Self { api }
    }

    /// Instantiate `artifact` and wait for its address.
    ///
    /// Transaction failures propagate unchanged. A success that carries no
    /// `Instantiated` event is reported as `MissingAddress`.
    #[instrument(skip_all, fields(contract = artifact.name(), constructor = %request.constructor))]
    pub async fn deploy(
        &self,
        artifact: Arc<ContractArtifact>,
        signer: &dyn Signer,
        request: DeployRequest,
    ) -> Result<DeployedContract, DeployError> {
        let call = build_instantiate(&artifact, &request)?;
        let confirmation = self
            .api
            .submit_and_await(signer, call, request.options())
            .await?;

        let Some(address) = confirmation.contract_address() else {
            return Err(DeployError::MissingAddress {
                contract: artifact.name().to_string(),
                confirmation,
            });
        };

        info!(
            contract = artifact.name(),
            %address,
            code_hash = %artifact.code_hash(),
            "Contract deployed"
        );
        Ok(DeployedContract { artifact, address })
    }
}
