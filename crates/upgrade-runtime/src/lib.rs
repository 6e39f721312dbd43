//! # Upgrade Runtime Library
//!
//! Configuration and wiring for the `upgrade-runtime` binary, exposed for
//! testing.
//!
//! ```text
//! RuntimeConfig
//!     │
//!     ├── NodeConfig ──────→ WsNodeConnection ──┬──→ LocalSigner
//!     │                      JsonMetadataRegistry ─→ Submitter ──→ Deployer
//!     ├── ArtifactConfig ──→ FsArtifactLoader                        │
//!     └── WorkflowConfig ─────────────────────────→ ProxyWorkflow ←──┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod runtime;

pub use config::{ArtifactConfig, ConfigError, NodeConfig, RuntimeConfig, SignerConfig};
pub use runtime::UpgradeRuntime;
