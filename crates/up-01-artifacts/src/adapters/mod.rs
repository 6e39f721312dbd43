//! # Adapters Layer
//!
//! - `FsArtifactLoader`: reads `<root>/<name>/<name>.wasm` and `metadata.json`
//! - `InMemoryArtifacts`: preloaded artifacts for tests and dry runs

pub mod fs_loader;
pub mod memory;

pub use fs_loader::{FsArtifactLoader, METADATA_FILE};
pub use memory::InMemoryArtifacts;
