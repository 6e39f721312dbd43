//! # Mock Node
//!
//! In-process contracts node implementing [`NodeConnection`].
//!
//! - Signatures are verified; a bad one is refused at submission.
//! - Nonces are tracked per account. A stale nonce is refused with
//!   `Invalid Transaction: Transaction is outdated`; a future nonce waits
//!   in a queue until the gap is filled.
//! - Accepted transactions report `Ready`, then `InBlock` with the runtime
//!   events, then `Finalized`.
//! - Code registered with [`MockNode::register`] runs as one of three
//!   programs. A proxy keeps its own storage and runs the logic of
//!   whatever its target (a code hash or a contract address) resolves to.
//! - Failures are `Contracts` module errors from the fixture registry.

use crate::mock::fixtures::{CODE_NOT_FOUND, CONTRACT_NOT_FOUND, CONTRACT_TRAPPED, OUT_OF_GAS};
use async_trait::async_trait;
use parity_scale_codec::{DecodeAll, Encode};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use shared_types::{
    AccountId, Bytes, ChainEvent, CodeHash, ErrorDescriptor, Gas, ModuleErrorIndex, Nonce,
    TxPhase, TxUpdate,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use up_01_artifacts::ContractArtifact;
use up_02_submission::{
    CallDescriptor, ConnectionError, ContractQuery, NodeConnection, SignedExtrinsic,
    TxSubscription,
};

/// Calls and queries with less gas than this run out.
pub const MIN_GAS: Gas = 1_000_000_000;

/// Refusal for a nonce below the account's next index.
pub const OUTDATED: &str = "Invalid Transaction: Transaction is outdated";

/// Refusal for a signature that does not verify.
pub const BAD_PROOF: &str = "Invalid Transaction: Transaction has a bad signature";

/// Refusal for a second transaction at an already queued nonce.
pub const PRIORITY_TOO_LOW: &str = "Priority is too low: (0 vs 0)";

type Exec<T> = Result<T, ModuleErrorIndex>;

/// Behaviour of registered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// `average` is the integer mean.
    Mean,
    /// `average` is the upper median.
    Median,
    /// Holds values, delegates logic to its target.
    Proxy,
}

impl Program {
    fn average(self, values: &[i32]) -> i32 {
        if values.is_empty() {
            return 0;
        }
        match self {
            Self::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_unstable();
                sorted[sorted.len() / 2]
            }
            Self::Mean | Self::Proxy => {
                let sum: i64 = values.iter().copied().map(i64::from).sum();
                let len = i64::try_from(values.len()).unwrap_or(i64::MAX);
                i32::try_from(sum / len).unwrap_or_default()
            }
        }
    }
}

/// How accepted transactions report back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delivery {
    /// `Ready`, `InBlock` with events, `Finalized`.
    #[default]
    Normal,
    /// `Ready`, `InBlock`, `Finalized`, never any runtime events.
    WithoutEvents,
    /// `Ready`, then the stream ends. The transaction still executes.
    LoseAfterReady,
    /// `Ready`, then `Dropped`. Nothing executes.
    DropFromPool,
}

enum Message {
    Insert(i32),
    Average,
    Upgrade([u8; 32]),
}

struct Code {
    bytes: Bytes,
    hash: CodeHash,
    program: Program,
    artifact: Arc<ContractArtifact>,
}

struct Instance {
    code: usize,
    target: Option<[u8; 32]>,
    values: Vec<i32>,
}

struct Queued {
    extrinsic: SignedExtrinsic,
    updates: mpsc::UnboundedSender<TxUpdate>,
}

#[derive(Default)]
struct Chain {
    codes: Vec<Code>,
    contracts: HashMap<AccountId, Instance>,
    nonces: HashMap<AccountId, Nonce>,
    future: BTreeMap<(AccountId, Nonce), Queued>,
    executed: Vec<SignedExtrinsic>,
    instantiations: u64,
    subscriptions: u64,
    delivery: Delivery,
}

fn decode_message(artifact: &ContractArtifact, data: &[u8]) -> Exec<Message> {
    if data.len() < 4 {
        return Err(CONTRACT_TRAPPED);
    }
    let (selector, args) = data.split_at(4);
    let spec = artifact
        .metadata()
        .spec
        .messages
        .iter()
        .find(|m| m.selector.0 == selector)
        .ok_or(CONTRACT_TRAPPED)?;

    match spec.label.rsplit("::").next() {
        Some("insert") => i32::decode_all(&mut &*args)
            .map(Message::Insert)
            .map_err(|_| CONTRACT_TRAPPED),
        Some("average") if args.is_empty() => Ok(Message::Average),
        Some("upgrade") => <[u8; 32]>::decode_all(&mut &*args)
            .map(Message::Upgrade)
            .map_err(|_| CONTRACT_TRAPPED),
        _ => Err(CONTRACT_TRAPPED),
    }
}

impl Chain {
    fn program_of(&self, address: &AccountId) -> Option<Program> {
        self.contracts
            .get(address)
            .map(|instance| self.codes[instance.code].program)
    }

    /// Logic that runs when `address` is called.
    fn logic(&self, address: &AccountId) -> Exec<Program> {
        let instance = self.contracts.get(address).ok_or(CONTRACT_NOT_FOUND)?;
        let program = self.codes[instance.code].program;
        if program != Program::Proxy {
            return Ok(program);
        }

        let target = instance.target.ok_or(CONTRACT_TRAPPED)?;
        self.codes
            .iter()
            .find(|code| code.hash.as_bytes() == &target)
            .map(|code| code.program)
            .or_else(|| self.program_of(&AccountId::new(target)))
            .filter(|program| *program != Program::Proxy)
            .ok_or(CONTRACT_TRAPPED)
    }

    fn instantiate(&mut self, deployer: AccountId, code: &Bytes, data: &[u8]) -> Exec<AccountId> {
        let index = self
            .codes
            .iter()
            .position(|c| &c.bytes == code)
            .ok_or(CODE_NOT_FOUND)?;
        let entry = &self.codes[index];
        if data.len() < 4 {
            return Err(CONTRACT_TRAPPED);
        }
        let (selector, args) = data.split_at(4);
        let constructor = entry
            .artifact
            .metadata()
            .spec
            .constructors
            .iter()
            .find(|c| c.selector.0 == selector)
            .ok_or(CONTRACT_TRAPPED)?;
        if args.len() != 32 * constructor.args.len() {
            return Err(CONTRACT_TRAPPED);
        }
        let target = match entry.program {
            Program::Proxy => Some(<[u8; 32]>::try_from(args).map_err(|_| CONTRACT_TRAPPED)?),
            Program::Mean | Program::Median => None,
        };
        let hash = entry.hash;

        self.instantiations += 1;
        let mut hasher = Sha256::new();
        hasher.update(deployer.as_bytes());
        hasher.update(hash.as_bytes());
        hasher.update(self.instantiations.to_le_bytes());
        let address = AccountId::new(hasher.finalize().into());

        self.contracts.insert(
            address,
            Instance {
                code: index,
                target,
                values: Vec::new(),
            },
        );
        Ok(address)
    }

    fn call(&mut self, dest: &AccountId, data: &[u8]) -> Exec<()> {
        let instance = self.contracts.get(dest).ok_or(CONTRACT_NOT_FOUND)?;
        let code = instance.code;
        let message = decode_message(&self.codes[code].artifact, data)?;

        match message {
            Message::Upgrade(target) => {
                if self.codes[code].program != Program::Proxy {
                    return Err(CONTRACT_TRAPPED);
                }
                if let Some(instance) = self.contracts.get_mut(dest) {
                    instance.target = Some(target);
                }
            }
            Message::Insert(value) => {
                self.logic(dest)?;
                if let Some(instance) = self.contracts.get_mut(dest) {
                    instance.values.push(value);
                }
            }
            Message::Average => {
                self.logic(dest)?;
            }
        }
        Ok(())
    }

    fn read(&self, dest: &AccountId, data: &[u8]) -> Result<i32, String> {
        let instance = self
            .contracts
            .get(dest)
            .ok_or_else(|| format!("no contract at {dest}"))?;
        let average = decode_message(&self.codes[instance.code].artifact, data)
            .and_then(|message| match message {
                Message::Average => self.logic(dest),
                Message::Insert(_) | Message::Upgrade(_) => Err(CONTRACT_TRAPPED),
            })
            .map(|program| program.average(&instance.values));
        average.map_err(|_| "ContractTrapped".to_string())
    }

    fn execute(&mut self, extrinsic: &SignedExtrinsic) -> Vec<ChainEvent> {
        *self.nonces.entry(extrinsic.signer).or_default() += 1;
        self.executed.push(extrinsic.clone());

        let result = if extrinsic.call.gas_limit() < MIN_GAS {
            Err(OUT_OF_GAS)
        } else {
            match &extrinsic.call {
                CallDescriptor::Instantiate { code, data, .. } => self
                    .instantiate(extrinsic.signer, code, data.as_slice())
                    .map(|contract| {
                        vec![ChainEvent::Instantiated {
                            deployer: extrinsic.signer,
                            contract,
                        }]
                    }),
                CallDescriptor::Call { dest, data, .. } => {
                    self.call(dest, data.as_slice()).map(|()| Vec::new())
                }
            }
        };

        match result {
            Ok(mut events) => {
                events.push(ChainEvent::ExtrinsicSuccess);
                events
            }
            Err(error) => vec![ChainEvent::ExtrinsicFailed {
                error: ErrorDescriptor::Module(error),
            }],
        }
    }

    fn deliver(&mut self, extrinsic: &SignedExtrinsic, updates: &mpsc::UnboundedSender<TxUpdate>) {
        // Receivers may already be gone; the chain does not care.
        let _ = updates.send(TxUpdate::status(TxPhase::Ready));
        match self.delivery {
            Delivery::Normal => {
                let events = self.execute(extrinsic);
                let _ = updates.send(TxUpdate::with_events(TxPhase::InBlock, events));
                let _ = updates.send(TxUpdate::status(TxPhase::Finalized));
            }
            Delivery::WithoutEvents => {
                self.execute(extrinsic);
                let _ = updates.send(TxUpdate::status(TxPhase::InBlock));
                let _ = updates.send(TxUpdate::status(TxPhase::Finalized));
            }
            Delivery::LoseAfterReady => {
                self.execute(extrinsic);
            }
            Delivery::DropFromPool => {
                let _ = updates.send(TxUpdate::status(TxPhase::Dropped));
            }
        }
    }

    /// Run queued transactions whose nonce is now next.
    fn promote(&mut self, account: AccountId) {
        loop {
            let next = self.nonces.get(&account).copied().unwrap_or(0);
            let Some(queued) = self.future.remove(&(account, next)) else {
                break;
            };
            debug!(%account, nonce = next, "Promoting queued transaction");
            self.deliver(&queued.extrinsic, &queued.updates);
        }
    }
}

fn refused(message: &str) -> ConnectionError {
    ConnectionError::Rpc {
        code: 1010,
        message: message.to_string(),
    }
}

/// In-process contracts node.
#[derive(Default)]
pub struct MockNode {
    chain: Mutex<Chain>,
    released: Arc<AtomicUsize>,
}

impl MockNode {
    /// Node with no code and default delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `artifact`'s code instantiable, running as `program`.
    pub fn register(&self, artifact: ContractArtifact, program: Program) {
        self.chain.lock().codes.push(Code {
            bytes: artifact.code().clone(),
            hash: artifact.code_hash(),
            program,
            artifact: Arc::new(artifact),
        });
    }

    /// Change how later transactions report back.
    pub fn set_delivery(&self, delivery: Delivery) {
        self.chain.lock().delivery = delivery;
    }

    /// Returns true if a contract lives at `address`.
    pub fn is_contract(&self, address: &AccountId) -> bool {
        self.chain.lock().contracts.contains_key(address)
    }

    /// Values stored at `address`.
    pub fn values(&self, address: &AccountId) -> Option<Vec<i32>> {
        self.chain
            .lock()
            .contracts
            .get(address)
            .map(|instance| instance.values.clone())
    }

    /// Nonces of executed transactions, in execution order.
    pub fn executed_nonces(&self) -> Vec<Nonce> {
        self.chain.lock().executed.iter().map(|e| e.nonce).collect()
    }

    /// Transactions waiting for a nonce gap to close.
    pub fn queued(&self) -> usize {
        self.chain.lock().future.len()
    }

    /// Subscriptions released by their holders.
    pub fn released_subscriptions(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn submit(
        &self,
        extrinsic: &SignedExtrinsic,
    ) -> Result<(String, mpsc::UnboundedReceiver<TxUpdate>), ConnectionError> {
        extrinsic.verify().map_err(|_| refused(BAD_PROOF))?;

        let mut chain = self.chain.lock();
        let account = extrinsic.signer;
        let expected = chain.nonces.get(&account).copied().unwrap_or(0);
        if extrinsic.nonce < expected {
            return Err(refused(OUTDATED));
        }
        if chain.future.contains_key(&(account, extrinsic.nonce)) {
            return Err(ConnectionError::Rpc {
                code: 1014,
                message: PRIORITY_TOO_LOW.to_string(),
            });
        }

        chain.subscriptions += 1;
        let id = format!("0x{:016x}", chain.subscriptions);
        let (updates, rx) = mpsc::unbounded_channel();

        if extrinsic.nonce > expected {
            let _ = updates.send(TxUpdate::status(TxPhase::Future));
            chain.future.insert(
                (account, extrinsic.nonce),
                Queued {
                    extrinsic: extrinsic.clone(),
                    updates,
                },
            );
        } else {
            chain.deliver(extrinsic, &updates);
            chain.promote(account);
        }
        Ok((id, rx))
    }
}

#[async_trait]
impl NodeConnection for MockNode {
    async fn submit_and_watch(
        &self,
        extrinsic: &SignedExtrinsic,
    ) -> Result<TxSubscription, ConnectionError> {
        let (id, updates) = self.submit(extrinsic)?;
        let released = Arc::clone(&self.released);
        Ok(TxSubscription::new(id, updates, move |_| {
            released.fetch_add(1, Ordering::SeqCst);
        }))
    }

    async fn account_next_index(&self, account: &AccountId) -> Result<Nonce, ConnectionError> {
        Ok(self.chain.lock().nonces.get(account).copied().unwrap_or(0))
    }

    async fn query(&self, query: &ContractQuery) -> Result<Bytes, ConnectionError> {
        if query.gas_limit < MIN_GAS {
            return Err(ConnectionError::QueryFailed("OutOfGas".into()));
        }
        let value = self
            .chain
            .lock()
            .read(&query.dest, query.input_data.as_slice())
            .map_err(ConnectionError::QueryFailed)?;

        // Message output is wrapped in `Ok`.
        Ok(Bytes::from(Ok::<i32, ()>(value).encode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_averages() {
        assert_eq!(Program::Mean.average(&[3, 7, 8]), 6);
        assert_eq!(Program::Median.average(&[3, 7, 8]), 7);
        assert_eq!(Program::Median.average(&[8, 3]), 8);
        assert_eq!(Program::Mean.average(&[]), 0);
        assert_eq!(Program::Median.average(&[]), 0);
    }
}
