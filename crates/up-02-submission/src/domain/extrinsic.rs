//! # Signed Extrinsic
//!
//! The signed envelope broadcast to the node. The body is `bincode`-encoded
//! and travels as `0x`-hex over JSON-RPC.
//!
//! The signature covers `(signer, nonce, call)`. The signer's account id is
//! its ed25519 public key, so anyone holding the extrinsic can verify it.

use crate::domain::call::CallDescriptor;
use crate::errors::SignerError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use shared_types::{decode_hex, encode_hex, AccountId, Bytes, Nonce};

/// A call signed by an account at a given nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedExtrinsic {
    /// Signing account (ed25519 public key).
    pub signer: AccountId,
    /// Sequence number the signature commits to.
    pub nonce: Nonce,
    /// The call being authorized.
    pub call: CallDescriptor,
    /// 64-byte ed25519 signature over [`signing_payload`].
    pub signature: Bytes,
}

#[derive(Serialize)]
struct Payload<'a> {
    signer: &'a AccountId,
    nonce: Nonce,
    call: &'a CallDescriptor,
}

/// Bytes the signer signs.
pub fn signing_payload(
    signer: &AccountId,
    nonce: Nonce,
    call: &CallDescriptor,
) -> Result<Vec<u8>, SignerError> {
    bincode::serialize(&Payload {
        signer,
        nonce,
        call,
    })
    .map_err(|e| SignerError::Encoding(e.to_string()))
}

impl SignedExtrinsic {
    /// Encode the envelope.
    pub fn encode(&self) -> Result<Vec<u8>, SignerError> {
        bincode::serialize(self).map_err(|e| SignerError::Encoding(e.to_string()))
    }

    /// Encode the envelope as `0x`-hex, the form sent to the node.
    pub fn to_hex(&self) -> Result<String, SignerError> {
        self.encode().map(|bytes| encode_hex(&bytes))
    }

    /// Decode an envelope produced by [`SignedExtrinsic::to_hex`].
    pub fn from_hex(hex: &str) -> Result<Self, SignerError> {
        let bytes = decode_hex(hex).map_err(|e| SignerError::Encoding(e.to_string()))?;
        bincode::deserialize(&bytes).map_err(|e| SignerError::Encoding(e.to_string()))
    }

    /// Check the signature against the signer's public key.
    pub fn verify(&self) -> Result<(), SignerError> {
        let key = VerifyingKey::from_bytes(self.signer.as_bytes())
            .map_err(|e| SignerError::BadSignature(e.to_string()))?;
        let raw: [u8; 64] = self
            .signature
            .as_slice()
            .try_into()
            .map_err(|_| {
                SignerError::BadSignature(format!("{} byte signature", self.signature.len()))
            })?;
        let payload = signing_payload(&self.signer, self.nonce, &self.call)?;
        key.verify(&payload, &Signature::from_bytes(&raw))
            .map_err(|e| SignerError::BadSignature(e.to_string()))
    }
}
