//! # Domain Layer
//!
//! Pure artifact types and call encoding. No I/O.

pub mod artifact;
pub mod encoding;
pub mod metadata;

pub use artifact::ContractArtifact;
pub use encoding::{decode_i32, decode_output, encode_call, ArgValue};
pub use metadata::{ArgSpec, CallSpec, ContractMetadata, Selector, TypeSpec};
