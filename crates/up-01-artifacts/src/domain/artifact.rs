//! # Contract Artifact
//!
//! Code blob plus metadata for one named contract. Immutable once loaded.

use crate::domain::encoding::{encode_call, ArgValue};
use crate::domain::metadata::{CallSpec, ContractMetadata};
use crate::errors::ArtifactError;
use shared_types::{Bytes, CodeHash};

/// A loaded contract: code, metadata, and the code's identity hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    name: String,
    code: Bytes,
    metadata: ContractMetadata,
}

impl ContractArtifact {
    /// Assemble an artifact from already-validated parts.
    #[must_use]
    pub fn new(name: impl Into<String>, code: Bytes, metadata: ContractMetadata) -> Self {
        Self {
            name: name.into(),
            code,
            metadata,
        }
    }

    /// Contract name as requested from the loader.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Code blob.
    #[must_use]
    pub fn code(&self) -> &Bytes {
        &self.code
    }

    /// Parsed metadata.
    #[must_use]
    pub fn metadata(&self) -> &ContractMetadata {
        &self.metadata
    }

    /// Identity hash of the code, as declared in the metadata.
    #[must_use]
    pub fn code_hash(&self) -> CodeHash {
        self.metadata.source.hash
    }

    /// Constructor spec by label.
    pub fn constructor(&self, label: &str) -> Result<&CallSpec, ArtifactError> {
        self.metadata
            .constructor(label)
            .ok_or_else(|| self.unknown("constructor", label))
    }

    /// Message spec by label.
    pub fn message(&self, label: &str) -> Result<&CallSpec, ArtifactError> {
        self.metadata
            .message(label)
            .ok_or_else(|| self.unknown("message", label))
    }

    /// Encode constructor input data.
    pub fn encode_constructor(
        &self,
        label: &str,
        args: &[ArgValue],
    ) -> Result<Bytes, ArtifactError> {
        encode_call(self.constructor(label)?, args)
    }

    /// Encode message input data.
    pub fn encode_message(&self, label: &str, args: &[ArgValue]) -> Result<Bytes, ArtifactError> {
        encode_call(self.message(label)?, args)
    }

    fn unknown(&self, kind: &'static str, label: &str) -> ArtifactError {
        ArtifactError::UnknownCall {
            contract: self.name.clone(),
            kind,
            label: label.to_string(),
        }
    }
}
