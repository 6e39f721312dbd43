//! # UP-03 Deployment - Deployment Orchestrator
//!
//! **Component ID:** 3
//!
//! Builds an instantiation call from a loaded artifact (code, constructor
//! selector, encoded arguments, endowment, gas budget), hands it to the
//! transaction submitter and wraps the reported address.
//!
//! | Outcome | Result |
//! |---------|--------|
//! | `Instantiated` event | `Ok(DeployedContract)` |
//! | Success without address | `Err(MissingAddress)` |
//! | Transaction failure | `Err(Transaction(..))`, unchanged |
//! | Bad constructor/args | `Err(Artifact(..))`, nothing submitted |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod domain;
pub mod errors;
pub mod service;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::{build_instantiate, DeployRequest, DeployedContract};
    pub use crate::errors::DeployError;
    pub use crate::service::Deployer;
}

pub use prelude::*;
