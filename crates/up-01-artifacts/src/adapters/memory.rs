use crate::domain::ContractArtifact;
use crate::errors::ArtifactError;
use crate::ports::ArtifactSource;
use std::collections::HashMap;
use std::path::PathBuf;

/// Artifact source backed by a map. Used in tests and by callers that
/// already hold the artifacts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifacts {
    artifacts: HashMap<String, ContractArtifact>,
}

impl InMemoryArtifacts {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact under its own name.
    #[must_use]
    pub fn with(mut self, artifact: ContractArtifact) -> Self {
        self.insert(artifact);
        self
    }

    /// Add or replace an artifact.
    pub fn insert(&mut self, artifact: ContractArtifact) {
        self.artifacts.insert(artifact.name().to_string(), artifact);
    }
}

impl ArtifactSource for InMemoryArtifacts {
    fn load(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        self.artifacts
            .get(name)
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound {
                name: name.to_string(),
                path: PathBuf::from(name),
            })
    }
}
