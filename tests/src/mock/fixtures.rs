//! # Test Fixtures
//!
//! Averager artifacts (v1 mean, v2 median, proxy), the module-error
//! registry the mock node's failures decode against, and helpers that lay
//! artifacts out on disk.

use crate::mock::node::{MockNode, Program};
use sha2::{Digest, Sha256};
use shared_types::{Bytes, ModuleErrorIndex};
use std::path::Path;
use std::sync::Arc;
use up_01_artifacts::{ContractArtifact, ContractMetadata, InMemoryArtifacts, METADATA_FILE};
use up_02_submission::JsonMetadataRegistry;

/// `Averager::insert(i32)`.
pub const INSERT_SELECTOR: &str = "0xfb6fd96b";
/// `Averager::average() -> i32`.
pub const AVERAGE_SELECTOR: &str = "0x4fc3a21a";
/// `upgrade(Hash)` on the proxy.
pub const UPGRADE_SELECTOR: &str = "0x1345543d";
/// `new(..)` on every contract.
pub const NEW_SELECTOR: &str = "0x9bae9d5e";

/// Pallet index of `Contracts` in [`REGISTRY_JSON`].
pub const CONTRACTS_PALLET: u8 = 18;

/// `Contracts.OutOfGas`.
pub const OUT_OF_GAS: ModuleErrorIndex = ModuleErrorIndex {
    index: CONTRACTS_PALLET,
    error: 2,
};
/// `Contracts.ContractNotFound`.
pub const CONTRACT_NOT_FOUND: ModuleErrorIndex = ModuleErrorIndex {
    index: CONTRACTS_PALLET,
    error: 6,
};
/// `Contracts.CodeNotFound`.
pub const CODE_NOT_FOUND: ModuleErrorIndex = ModuleErrorIndex {
    index: CONTRACTS_PALLET,
    error: 8,
};
/// `Contracts.ContractTrapped`.
pub const CONTRACT_TRAPPED: ModuleErrorIndex = ModuleErrorIndex {
    index: CONTRACTS_PALLET,
    error: 11,
};

/// Module errors as the node's metadata lists them.
pub const REGISTRY_JSON: &str = r#"[
    { "index": 0, "name": "System", "errors": [
        { "name": "InvalidSpecName", "docs": ["The name of specification does not match between the current runtime and the new runtime."] }
    ] },
    { "index": 18, "name": "Contracts", "errors": [
        { "name": "InvalidScheduleVersion", "docs": ["A new schedule must have a greater version than the current one."] },
        { "name": "InvalidCallFlags", "docs": ["Invalid combination of flags supplied to `seal_call` or `seal_delegate_call`."] },
        { "name": "OutOfGas", "docs": ["The executed contract exhausted its gas limit."] },
        { "name": "OutputBufferTooSmall", "docs": ["The output buffer supplied to a contract API call was too small."] },
        { "name": "TransferFailed", "docs": ["Performing the requested transfer failed."] },
        { "name": "MaxCallDepthReached", "docs": ["Performing a call was denied because the calling depth reached the limit", "of what is specified in the schedule."] },
        { "name": "ContractNotFound", "docs": ["No contract was found at the specified address."] },
        { "name": "CodeTooLarge", "docs": ["The code supplied to `instantiate_with_code` exceeds the limit specified in the", "current schedule."] },
        { "name": "CodeNotFound", "docs": ["No code could be found at the supplied code hash."] },
        { "name": "OutOfBounds", "docs": ["A buffer outside of sandbox memory was passed to a contract API function."] },
        { "name": "DecodingFailed", "docs": ["Input passed to a contract API function failed to decode as expected type."] },
        { "name": "ContractTrapped", "docs": ["Contract trapped during execution."] }
    ] }
]"#;

/// Registry parsed from [`REGISTRY_JSON`].
pub fn registry() -> JsonMetadataRegistry {
    JsonMetadataRegistry::from_json(REGISTRY_JSON).unwrap()
}

fn code(name: &str) -> Vec<u8> {
    let mut blob = b"\0asm\x01\0\0\0".to_vec();
    blob.extend_from_slice(name.as_bytes());
    blob
}

fn metadata_json(name: &str, code: &[u8], constructor_args: &str, extra_messages: &str) -> String {
    let hash = format!("0x{}", hex::encode(Sha256::digest(code)));
    format!(
        r#"{{
            "source": {{ "hash": "{hash}", "language": "ink! 3.0.0", "compiler": "rustc" }},
            "contract": {{ "name": "{name}", "version": "0.1.0" }},
            "spec": {{
                "constructors": [
                    {{ "label": "new", "selector": "{NEW_SELECTOR}", "args": [{constructor_args}] }}
                ],
                "messages": [
                    {{ "label": "Averager::insert", "selector": "{INSERT_SELECTOR}", "mutates": true,
                       "args": [ {{ "label": "value", "type": {{ "displayName": ["i32"] }} }} ] }},
                    {{ "label": "Averager::average", "selector": "{AVERAGE_SELECTOR}", "args": [] }}
                    {extra_messages}
                ]
            }}
        }}"#
    )
}

const HASH_ARG: &str = r#"{ "label": "target", "type": { "displayName": ["Hash"] } }"#;

fn files(name: &str) -> (Vec<u8>, String) {
    let blob = code(name);
    let metadata = match name {
        "v1" => metadata_json(name, &blob, "", ""),
        "v2" => metadata_json(
            name,
            &blob,
            r#"{ "label": "owner", "type": { "displayName": ["AccountId"] } }"#,
            "",
        ),
        _ => metadata_json(
            name,
            &blob,
            HASH_ARG,
            &format!(
                r#", {{ "label": "upgrade", "selector": "{UPGRADE_SELECTOR}", "mutates": true, "args": [{HASH_ARG}] }}"#
            ),
        ),
    };
    (blob, metadata)
}

fn artifact(name: &str) -> ContractArtifact {
    let (blob, metadata) = files(name);
    ContractArtifact::new(
        name,
        Bytes::from(blob),
        ContractMetadata::from_json(&metadata).unwrap(),
    )
}

/// Mean-averaging implementation with a zero-argument constructor.
pub fn v1() -> ContractArtifact {
    artifact("v1")
}

/// Median-averaging implementation whose constructor takes an owner.
pub fn v2() -> ContractArtifact {
    artifact("v2")
}

/// Forwarding proxy constructed with, and upgradable to, a target.
pub fn proxy() -> ContractArtifact {
    artifact("proxy")
}

/// All three artifacts, in memory.
pub fn artifacts() -> Arc<InMemoryArtifacts> {
    Arc::new(
        InMemoryArtifacts::new()
            .with(v1())
            .with(v2())
            .with(proxy()),
    )
}

/// Write all three artifacts in the `<root>/<name>/<name>.wasm` layout.
pub fn write_artifacts(root: &Path) -> std::io::Result<()> {
    for name in ["v1", "v2", "proxy"] {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir)?;
        let (blob, metadata) = files(name);
        std::fs::write(dir.join(format!("{name}.wasm")), blob)?;
        std::fs::write(dir.join(METADATA_FILE), metadata)?;
    }
    Ok(())
}

/// A node that knows the code of all three artifacts.
pub fn mock_node() -> Arc<MockNode> {
    let node = MockNode::new();
    node.register(v1(), Program::Mean);
    node.register(v2(), Program::Median);
    node.register(proxy(), Program::Proxy);
    Arc::new(node)
}
