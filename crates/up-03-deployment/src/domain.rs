//! # Deployment Domain
//!
//! Turns a loaded artifact into call descriptors: one instantiation, then
//! messages and queries against the deployed address.

use shared_types::{AccountId, Balance, CodeHash, Gas, Nonce};
use std::sync::Arc;
use up_01_artifacts::{ArgValue, ArtifactError, ContractArtifact};
use up_02_submission::{CallDescriptor, ContractQuery, SubmitOptions};

/// Parameters of one instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Constructor label, e.g. `new`.
    pub constructor: String,
    /// Constructor arguments.
    pub args: Vec<ArgValue>,
    /// Value transferred to the new contract.
    pub endowment: Balance,
    /// Gas budget.
    pub gas_limit: Gas,
    /// Fixed nonce, or `None` for the node's next index.
    pub nonce: Option<Nonce>,
}

impl DeployRequest {
    /// Request for `constructor` with no arguments and no fixed nonce.
    pub fn new(constructor: impl Into<String>, endowment: Balance, gas_limit: Gas) -> Self {
        Self {
            constructor: constructor.into(),
            args: Vec::new(),
            endowment,
            gas_limit,
            nonce: None,
        }
    }

    /// Set constructor arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<ArgValue>) -> Self {
        self.args = args;
        self
    }

    /// Pin the nonce.
    #[must_use]
    pub fn with_nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Submission options for this request.
    #[must_use]
    pub fn options(&self) -> SubmitOptions {
        SubmitOptions { nonce: self.nonce }
    }
}

/// Build the instantiation call: code plus encoded constructor input.
pub fn build_instantiate(
    artifact: &ContractArtifact,
    request: &DeployRequest,
) -> Result<CallDescriptor, ArtifactError> {
    let data = artifact.encode_constructor(&request.constructor, &request.args)?;
    Ok(CallDescriptor::Instantiate {
        code: artifact.code().clone(),
        data,
        endowment: request.endowment,
        gas_limit: request.gas_limit,
    })
}

/// A contract living at an address, with the artifact it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// Artifact the contract was instantiated from.
    pub artifact: Arc<ContractArtifact>,
    /// On-chain address.
    pub address: AccountId,
}

impl DeployedContract {
    /// Contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.artifact.name()
    }

    /// Identity hash of the deployed code.
    #[must_use]
    pub fn code_hash(&self) -> CodeHash {
        self.artifact.code_hash()
    }

    /// State-changing call to `message`.
    pub fn call(
        &self,
        message: &str,
        args: &[ArgValue],
        gas_limit: Gas,
    ) -> Result<CallDescriptor, ArtifactError> {
        Ok(CallDescriptor::Call {
            dest: self.address,
            data: self.artifact.encode_message(message, args)?,
            value: 0,
            gas_limit,
        })
    }

    /// Read-only call to `message` made from `origin`.
    pub fn query(
        &self,
        origin: AccountId,
        message: &str,
        args: &[ArgValue],
        gas_limit: Gas,
    ) -> Result<ContractQuery, ArtifactError> {
        Ok(ContractQuery {
            origin,
            dest: self.address,
            value: 0,
            gas_limit,
            input_data: self.artifact.encode_message(message, args)?,
        })
    }
}
