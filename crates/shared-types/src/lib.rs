//! # Shared Types Crate
//!
//! Chain primitives and event types used across the Ink-Upgrade components.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Identifiers and node events are defined here
//!   and nowhere else.
//! - **Wire Compatible**: Every type serializes to the JSON shape the node
//!   bridge emits (`0x`-prefixed hex for byte arrays, camelCase tags).
//! - **No Behaviour**: Interpretation of events belongs to the submission
//!   engine, not to these types.

pub mod entities;
pub mod errors;
pub mod events;

pub use entities::*;
pub use errors::*;
pub use events::*;
