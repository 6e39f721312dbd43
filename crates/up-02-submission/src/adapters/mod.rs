//! # Adapters Layer
//!
//! | Adapter | Port | Notes |
//! |---------|------|-------|
//! | `WsNodeConnection` | `NodeConnection` | WebSocket JSON-RPC 2.0 |
//! | `LocalSigner` | `Signer` | ed25519 dev keys from `//Name` URIs |
//! | `JsonMetadataRegistry` | `MetadataRegistry` | Module errors from a JSON file |

pub mod json_registry;
pub mod local_signer;
pub mod ws;

pub use json_registry::{ErrorVariant, JsonMetadataRegistry, ModuleErrors, RegistryError};
pub use local_signer::{seed_from_uri, LocalSigner};
pub use ws::{WsNodeConnection, EXTRINSIC_UPDATE};
