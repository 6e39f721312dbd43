//! Filesystem artifact loader.
//!
//! Reads the Wasm blob and `metadata.json` that an ink! build leaves per contract.

use crate::domain::{ContractArtifact, ContractMetadata};
use crate::errors::ArtifactError;
use crate::ports::ArtifactSource;
use shared_types::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the metadata file inside each contract directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Loads artifacts from the ink! build layout.
///
/// ```text
/// <root>/<name>/<name>.wasm
/// <root>/<name>/metadata.json
/// ```
#[derive(Debug, Clone)]
pub struct FsArtifactLoader {
    root: PathBuf,
}

impl FsArtifactLoader {
    /// Create a loader rooted at `root` (usually `target/ink`).
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Artifacts root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the code blob for `name`.
    #[must_use]
    pub fn code_path(&self, name: &str) -> PathBuf {
        self.root.join(name).join(format!("{name}.wasm"))
    }

    /// Path of the metadata file for `name`.
    #[must_use]
    pub fn metadata_path(&self, name: &str) -> PathBuf {
        self.root.join(name).join(METADATA_FILE)
    }

    fn read(name: &str, path: &Path) -> Result<Vec<u8>, ArtifactError> {
        std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ArtifactError::NotFound {
                name: name.to_string(),
                path: path.to_path_buf(),
            },
            _ => ArtifactError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })
    }
}

impl ArtifactSource for FsArtifactLoader {
    fn load(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let code_path = self.code_path(name);
        let metadata_path = self.metadata_path(name);

        let code = Self::read(name, &code_path)?;
        let raw = Self::read(name, &metadata_path)?;

        let text = String::from_utf8(raw).map_err(|e| ArtifactError::Malformed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let metadata =
            ContractMetadata::from_json(&text).map_err(|e| ArtifactError::Malformed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let artifact = ContractArtifact::new(name, Bytes::from(code), metadata);
        debug!(
            contract = name,
            code_len = artifact.code().len(),
            code_hash = %artifact.code_hash(),
            "Loaded contract artifact"
        );
        Ok(artifact)
    }
}
