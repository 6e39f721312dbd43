//! # Workflow Domain
//!
//! Pure helpers the driver uses between steps, plus the final report.

use crate::config::ProxyBacking;
use serde::Serialize;
use shared_types::{AccountId, CodeHash};
use up_01_artifacts::{ArgValue, ArtifactError, ContractArtifact};
use up_03_deployment::DeployedContract;

/// Name, address and code hash of one deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSummary {
    /// Artifact name.
    pub name: String,
    /// On-chain address.
    pub address: AccountId,
    /// Identity hash of the deployed code.
    pub code_hash: CodeHash,
}

impl From<&DeployedContract> for ContractSummary {
    fn from(contract: &DeployedContract) -> Self {
        Self {
            name: contract.name().to_string(),
            address: contract.address,
            code_hash: contract.code_hash(),
        }
    }
}

/// What a completed run deployed and observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowReport {
    /// First implementation.
    pub v1: ContractSummary,
    /// The proxy.
    pub proxy: ContractSummary,
    /// Upgraded implementation.
    pub v2: ContractSummary,
    /// `average` before the upgrade, if queried.
    pub average_before: Option<i32>,
    /// `average` after the upgrade, if queried.
    pub average_after: Option<i32>,
}

/// Constructor arguments for an implementation contract.
///
/// A single-argument constructor receives the signer's account; a
/// zero-argument one receives nothing.
pub fn implementation_args(
    artifact: &ContractArtifact,
    constructor: &str,
    signer: AccountId,
) -> Result<Vec<ArgValue>, ArtifactError> {
    let spec = artifact.constructor(constructor)?;
    Ok(match spec.args.len() {
        0 => Vec::new(),
        _ => vec![ArgValue::AccountId(signer)],
    })
}

/// The value the proxy is constructed or upgraded with.
#[must_use]
pub fn backing_arg(backing: ProxyBacking, target: &DeployedContract) -> ArgValue {
    match backing {
        ProxyBacking::CodeHash => ArgValue::Hash(target.code_hash()),
        ProxyBacking::Address => ArgValue::AccountId(target.address),
    }
}
