//! Module-error registry loaded from JSON.
//!
//! ```json
//! [
//!   { "index": 18, "name": "Contracts",
//!     "errors": [ { "name": "OutOfGas", "docs": ["..."] }, ... ] }
//! ]
//! ```
//!
//! A variant's error index is its position in `errors`.

use crate::ports::{MetadataRegistry, ModuleErrorMeta};
use serde::Deserialize;
use shared_types::ModuleErrorIndex;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors loading a registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File could not be read.
    #[error("failed to read registry {path}: {source}")]
    Io {
        /// Registry path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid registry document.
    #[error("malformed registry: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A pallet declares more than 256 errors.
    #[error("module `{module}` has {count} errors, at most 256 are addressable")]
    TooManyErrors {
        /// Pallet name.
        module: String,
        /// Declared error count.
        count: usize,
    },
}

/// One pallet's error list.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleErrors {
    /// Pallet index.
    pub index: u8,
    /// Pallet name.
    pub name: String,
    /// Error variants in declaration order.
    #[serde(default)]
    pub errors: Vec<ErrorVariant>,
}

/// One error variant.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorVariant {
    /// Variant name.
    pub name: String,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

/// Read-only registry keyed by `(module index, error index)`.
#[derive(Debug, Clone, Default)]
pub struct JsonMetadataRegistry {
    entries: HashMap<(u8, u8), ModuleErrorMeta>,
}

impl JsonMetadataRegistry {
    /// Registry that knows no errors. Every module error decodes as opaque.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from parsed module lists.
    pub fn from_modules(modules: Vec<ModuleErrors>) -> Result<Self, RegistryError> {
        let mut entries = HashMap::new();
        for module in modules {
            if module.errors.len() > 256 {
                return Err(RegistryError::TooManyErrors {
                    module: module.name,
                    count: module.errors.len(),
                });
            }
            for (position, variant) in (0u8..=u8::MAX).zip(module.errors) {
                entries.insert(
                    (module.index, position),
                    ModuleErrorMeta {
                        section: module.name.clone(),
                        method: variant.name,
                        docs: variant.docs,
                    },
                );
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON registry document.
    pub fn from_json(text: &str) -> Result<Self, RegistryError> {
        Self::from_modules(serde_json::from_str(text)?)
    }

    /// Load a JSON registry document from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json(&text)?;
        info!(path = %path.display(), errors = registry.len(), "Loaded module error registry");
        Ok(registry)
    }

    /// Number of known error variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no variants are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataRegistry for JsonMetadataRegistry {
    fn lookup(&self, index: ModuleErrorIndex) -> Option<ModuleErrorMeta> {
        self.entries.get(&(index.index, index.error)).cloned()
    }
}
