//! # Workflow Configuration

use serde::{Deserialize, Serialize};
use shared_types::{Balance, Gas};

/// Default value endowed to every deployed contract.
pub const DEFAULT_ENDOWMENT: Balance = 4_000_000_000_000_000;

/// Default gas budget for every state-changing call and query.
pub const DEFAULT_GAS_LIMIT: Gas = 200_000_000_000_000;

/// How the driver sequences the insert steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequencingMode {
    /// Every step resolves before the next is submitted.
    #[default]
    WaitEach,
    /// Inserts are submitted concurrently with explicit consecutive nonces.
    Pipelined,
}

/// What the proxy is pointed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProxyBacking {
    /// The implementation's code hash.
    #[default]
    CodeHash,
    /// The deployed implementation's address.
    Address,
}

/// Workflow parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Artifact name of the first implementation.
    pub v1: String,
    /// Artifact name of the upgraded implementation.
    pub v2: String,
    /// Artifact name of the proxy.
    pub proxy: String,
    /// Constructor of both implementations. Receives the signer's account
    /// when it declares a single argument.
    pub implementation_constructor: String,
    /// Constructor of the proxy. Receives the backing target.
    pub proxy_constructor: String,
    /// Message that repoints the proxy.
    pub upgrade_message: String,
    /// Value endowed to each deployed contract.
    pub endowment: Balance,
    /// Gas budget for calls and queries.
    pub gas_limit: Gas,
    /// Values inserted through the proxy, in order.
    pub inserts: Vec<i32>,
    /// Expected `average` before the upgrade. `None` skips the query.
    pub expected_before: Option<i32>,
    /// Expected `average` after the upgrade. `None` skips the query.
    pub expected_after: Option<i32>,
    /// Insert sequencing.
    pub mode: SequencingMode,
    /// Proxy target kind.
    pub backing: ProxyBacking,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            v1: "v1".into(),
            v2: "v2".into(),
            proxy: "proxy".into(),
            implementation_constructor: "new".into(),
            proxy_constructor: "new".into(),
            upgrade_message: "upgrade".into(),
            endowment: DEFAULT_ENDOWMENT,
            gas_limit: DEFAULT_GAS_LIMIT,
            inserts: vec![3, 7, 8],
            expected_before: Some(6),
            expected_after: Some(7),
            mode: SequencingMode::WaitEach,
            backing: ProxyBacking::CodeHash,
        }
    }
}
