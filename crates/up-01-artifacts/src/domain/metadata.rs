//! # Contract Metadata
//!
//! The subset of ink! metadata the client needs: the code hash declared by
//! the toolchain and the selectors/arguments of constructors and messages.
//!
//! Both metadata spellings are accepted: `"label": "new"` and the older
//! `"name": ["new"]`.

use serde::{Deserialize, Deserializer};
use shared_types::{decode_hex, encode_hex, CodeHash};
use std::fmt;

/// Parsed `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    /// Build provenance, including the code hash.
    pub source: SourceInfo,
    /// Contract name and version, when present.
    #[serde(default)]
    pub contract: Option<ContractInfo>,
    /// Callable surface.
    pub spec: ContractSpec,
}

/// `source` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceInfo {
    /// Content hash of the code blob.
    pub hash: CodeHash,
    /// Source language, e.g. `ink! 3.0.0`.
    #[serde(default)]
    pub language: Option<String>,
    /// Compiler used for the build.
    #[serde(default)]
    pub compiler: Option<String>,
}

/// `contract` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractInfo {
    /// Crate name of the contract.
    pub name: String,
    /// Crate version.
    #[serde(default)]
    pub version: Option<String>,
}

/// `spec` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractSpec {
    /// Constructors, in declaration order.
    #[serde(default)]
    pub constructors: Vec<CallSpec>,
    /// Messages, in declaration order.
    #[serde(default)]
    pub messages: Vec<CallSpec>,
}

/// A constructor or message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallSpec {
    /// Callable name.
    #[serde(alias = "name", deserialize_with = "label_or_path")]
    pub label: String,
    /// 4-byte dispatch selector.
    pub selector: Selector,
    /// Declared arguments in order.
    #[serde(default)]
    pub args: Vec<ArgSpec>,
    /// Whether the message changes state.
    #[serde(default)]
    pub mutates: bool,
    /// Whether the call accepts value.
    #[serde(default)]
    pub payable: bool,
    /// Doc lines from the contract source.
    #[serde(default)]
    pub docs: Vec<String>,
}

/// A declared argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArgSpec {
    /// Argument name.
    #[serde(alias = "name", deserialize_with = "label_or_path")]
    pub label: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeSpec,
}

/// Declared argument type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
    /// Path of the display name, e.g. `["ink_env", "AccountId"]`.
    #[serde(default)]
    pub display_name: Vec<String>,
}

impl TypeSpec {
    /// Last segment of the display name, or `"?"` when unknown.
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name.last().map_or("?", String::as_str)
    }
}

/// 4-byte selector of a constructor or message.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector(pub [u8; 4]);

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({})", encode_hex(&self.0))
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = decode_hex(&s).map_err(serde::de::Error::custom)?;
        <[u8; 4]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| serde::de::Error::custom(format!("selector `{s}` is not 4 bytes")))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelRepr {
    Label(String),
    Path(Vec<String>),
}

fn label_or_path<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match LabelRepr::deserialize(deserializer)? {
        LabelRepr::Label(label) => Ok(label),
        LabelRepr::Path(path) => Ok(path.join("::")),
    }
}

impl ContractMetadata {
    /// Parse metadata from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Find a constructor by label.
    #[must_use]
    pub fn constructor(&self, label: &str) -> Option<&CallSpec> {
        self.spec.constructors.iter().find(|c| c.label == label)
    }

    /// Find a message by label. Trait messages (`Averager::insert`) also
    /// match their bare name.
    #[must_use]
    pub fn message(&self, label: &str) -> Option<&CallSpec> {
        self.spec.messages.iter().find(|m| {
            m.label == label || m.label.rsplit("::").next() == Some(label)
        })
    }
}
