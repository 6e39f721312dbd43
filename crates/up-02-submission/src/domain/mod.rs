//! # Domain Layer
//!
//! Call descriptors, the signed envelope, and the confirmation state
//! machine. No network I/O.

pub mod call;
pub mod engine;
pub mod extrinsic;
pub mod pending;
pub mod subscription;

pub use call::{CallDescriptor, ContractQuery, SubmitOptions};
pub use engine::{
    decode_module_error, evaluate_batch, Confirmation, ConfirmationEngine, InclusionPolicy,
    Outcome, TxState,
};
pub use extrinsic::{signing_payload, SignedExtrinsic};
pub use pending::PendingTransaction;
pub use subscription::TxSubscription;
