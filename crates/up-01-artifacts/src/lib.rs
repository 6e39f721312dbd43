//! # UP-01 Artifacts - Contract Artifact Loader
//!
//! **Component ID:** 1
//! **Status:** Leaf component, synchronous, local I/O only
//!
//! ## Purpose
//!
//! Resolves a named contract to its code blob and metadata, and encodes
//! constructor/message input data against that metadata. Everything here is
//! fatal before a transaction is ever submitted.
//!
//! ## File Layout
//!
//! | File | Path |
//! |------|------|
//! | Code blob | `<root>/<name>/<name>.wasm` |
//! | Metadata | `<root>/<name>/metadata.json` |
//!
//! ## Failure Modes
//!
//! | Error | Cause |
//! |-------|-------|
//! | `NotFound` | Either file missing |
//! | `Malformed` | Metadata is not JSON, or `source.hash` is not 32 bytes of hex |
//! | `UnknownCall` | No constructor/message with the requested label |
//! | `ArityMismatch` / `TypeMismatch` | Arguments do not fit the declared signature |
//! | `OutputDecode` / `ContractError` | Message output is not the expected SCALE value |
//!
//! ## Usage Example
//!
//! ```ignore
//! use up_01_artifacts::prelude::*;
//!
//! let loader = FsArtifactLoader::new("target/ink");
//! let v1 = loader.load("v1")?;
//! let data = v1.encode_constructor("new", &[])?;
//! println!("code hash {}", v1.code_hash());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{FsArtifactLoader, InMemoryArtifacts, METADATA_FILE};
    pub use crate::domain::{
        decode_i32, decode_output, encode_call, ArgSpec, ArgValue, CallSpec, ContractArtifact,
        ContractMetadata, Selector, TypeSpec,
    };
    pub use crate::errors::ArtifactError;
    pub use crate::ports::ArtifactSource;
}

pub use prelude::*;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
