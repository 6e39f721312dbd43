//! In-process ed25519 signer.
//!
//! Development keys only. `//Name` URIs derive the seed as
//! `sha256("//Name")`; a `0x`-prefixed 32-byte hex string is used as the
//! seed directly.

use crate::domain::{signing_payload, CallDescriptor, SignedExtrinsic};
use crate::errors::{ConnectionError, SignerError, TxError};
use crate::ports::{NodeConnection, Signer, Submission};
use async_trait::async_trait;
use ed25519_dalek::{Signer as _, SigningKey};
use sha2::{Digest, Sha256};
use shared_types::{decode_hex, AccountId, Bytes, Nonce};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Signs with a local keypair and submits through a node connection.
pub struct LocalSigner {
    uri: String,
    key: SigningKey,
    account: AccountId,
    connection: Arc<dyn NodeConnection>,
}

/// Derive the 32-byte seed for a secret URI.
pub fn seed_from_uri(uri: &str) -> Result<[u8; 32], SignerError> {
    if uri.starts_with("//") && uri.len() > 2 {
        return Ok(Sha256::digest(uri.as_bytes()).into());
    }
    if uri.starts_with("0x") {
        let bytes = decode_hex(uri).map_err(|e| SignerError::InvalidUri(e.to_string()))?;
        return <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
            SignerError::InvalidUri(format!("seed is {} bytes, expected 32", bytes.len()))
        });
    }
    Err(SignerError::InvalidUri(format!(
        "`{uri}` is neither //Name nor a 0x seed"
    )))
}

impl LocalSigner {
    /// Build a signer for `uri` that submits through `connection`.
    pub fn from_uri(uri: &str, connection: Arc<dyn NodeConnection>) -> Result<Self, SignerError> {
        let key = SigningKey::from_bytes(&seed_from_uri(uri)?);
        let account = AccountId::new(key.verifying_key().to_bytes());
        debug!(uri, %account, "Derived signer account");
        Ok(Self {
            uri: uri.to_string(),
            key,
            account,
            connection,
        })
    }

    /// Secret URI the key was derived from.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Sign `call` at `nonce` without submitting.
    pub fn sign(
        &self,
        call: &CallDescriptor,
        nonce: Nonce,
    ) -> Result<SignedExtrinsic, SignerError> {
        let payload = signing_payload(&self.account, nonce, call)?;
        let signature = self.key.sign(&payload);
        Ok(SignedExtrinsic {
            signer: self.account,
            nonce,
            call: call.clone(),
            signature: Bytes::from(signature.to_bytes().to_vec()),
        })
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("uri", &self.uri)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for LocalSigner {
    fn account(&self) -> AccountId {
        self.account
    }

    #[instrument(skip(self, call), fields(kind = call.kind()))]
    async fn sign_and_submit(
        &self,
        call: &CallDescriptor,
        nonce: Option<Nonce>,
    ) -> Result<Submission, TxError> {
        let nonce = match nonce {
            Some(nonce) => nonce,
            None => self.connection.account_next_index(&self.account).await?,
        };
        let extrinsic = self.sign(call, nonce)?;
        let subscription = self
            .connection
            .submit_and_watch(&extrinsic)
            .await
            .map_err(|e| match e {
                ConnectionError::Rpc { message, .. } => {
                    TxError::SubmissionRejected { reason: message }
                }
                other => TxError::Connection(other),
            })?;
        debug!(nonce, subscription = subscription.id(), "Submitted extrinsic");
        Ok(Submission {
            extrinsic,
            subscription,
        })
    }
}
