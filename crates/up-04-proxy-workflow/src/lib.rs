//! # UP-04 Proxy Workflow - Upgrade Scenario Driver
//!
//! **Component ID:** 4
//!
//! Deploys an implementation, fronts it with a proxy, writes through the
//! proxy, swaps the implementation and checks that state survived.
//!
//! ## Steps
//!
//! | # | Step | Check |
//! |---|------|-------|
//! | 1 | deploy v1 | `Instantiated` |
//! | 2 | deploy proxy (v1 hash or address) | `Instantiated` |
//! | 3 | insert 3, 7, 8 | success |
//! | 4 | query `average` | == 6 |
//! | 5 | deploy v2 | `Instantiated` |
//! | 6 | `upgrade` (v2 hash or address) | success |
//! | 7 | query `average` | == 7 |
//!
//! ## Sequencing
//!
//! | Mode | Inserts |
//! |------|---------|
//! | `WaitEach` | one at a time, node-assigned nonces |
//! | `Pipelined` | concurrently, nonces `n, n+1, ..` from the node's next index |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod domain;
pub mod errors;
pub mod service;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::{
        ProxyBacking, SequencingMode, WorkflowConfig, DEFAULT_ENDOWMENT, DEFAULT_GAS_LIMIT,
    };
    pub use crate::domain::{backing_arg, implementation_args, ContractSummary, WorkflowReport};
    pub use crate::errors::WorkflowError;
    pub use crate::service::ProxyWorkflow;
}

pub use prelude::*;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
