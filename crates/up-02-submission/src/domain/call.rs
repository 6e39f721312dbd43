//! # Call Descriptors
//!
//! What a transaction asks the chain to do, before it is signed.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Balance, Bytes, Gas, Nonce};

/// A state-changing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CallDescriptor {
    /// Upload code and run a constructor.
    Instantiate {
        /// Contract code blob.
        code: Bytes,
        /// Constructor selector followed by encoded arguments.
        data: Bytes,
        /// Value transferred to the new contract.
        endowment: Balance,
        /// Gas budget.
        gas_limit: Gas,
    },

    /// Invoke a message on an existing contract.
    Call {
        /// Contract address.
        dest: AccountId,
        /// Message selector followed by encoded arguments.
        data: Bytes,
        /// Value transferred with the call.
        value: Balance,
        /// Gas budget.
        gas_limit: Gas,
    },
}

impl CallDescriptor {
    /// Short name for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Instantiate { .. } => "instantiate",
            Self::Call { .. } => "call",
        }
    }

    /// Gas budget authorized for the call.
    #[must_use]
    pub fn gas_limit(&self) -> Gas {
        match self {
            Self::Instantiate { gas_limit, .. } | Self::Call { gas_limit, .. } => *gas_limit,
        }
    }

    /// Encoded input data (selector plus arguments).
    #[must_use]
    pub fn data(&self) -> &Bytes {
        match self {
            Self::Instantiate { data, .. } | Self::Call { data, .. } => data,
        }
    }
}

/// Per-submission options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Fixed sequence number. `None` asks the node for the next one.
    pub nonce: Option<Nonce>,
}

impl SubmitOptions {
    /// Options pinning the nonce.
    #[must_use]
    pub fn with_nonce(nonce: Nonce) -> Self {
        Self { nonce: Some(nonce) }
    }
}

/// A read-only contract call. Never signed, never submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractQuery {
    /// Account the call is made from.
    pub origin: AccountId,
    /// Contract address.
    pub dest: AccountId,
    /// Value passed along.
    #[serde(with = "balance_string")]
    pub value: Balance,
    /// Gas budget for the dry run.
    pub gas_limit: Gas,
    /// Selector followed by encoded arguments.
    pub input_data: Bytes,
}

/// `u128` does not survive every JSON implementation; send it as a decimal string.
mod balance_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use shared_types::Balance;

    pub fn serialize<S: Serializer>(value: &Balance, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Balance, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
