#![forbid(unsafe_code)]
#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::multiple_crate_versions
)]

//! Stake registry ledger.
//!
//! Operators escrow collateral behind the Merkle root of a batch of key registrations.
//! Registration checks no signatures. Instead, anyone may:
//!
//! - during the fraud-proof window, prove a committed registration signature does not
//!   cover the operator's withdrawal address and delay ([`Registry::slash_registration`]);
//! - after it, enforce a delegation signed by a committed key through the adjudicator the
//!   delegation names ([`Registry::slash_commitment`]).
//!
//! Either slash deletes the record and splits its collateral between the challenger and the
//! withdrawal address. Otherwise the withdrawal address unregisters, waits out its delay and
//! claims everything back.

pub mod adjudicator;
mod commitment;
pub mod delegation;
pub mod errors;
pub mod events;
mod fraud;
mod guard;
pub mod params;
pub mod registry;
pub mod treasury;
pub mod types;

pub use adjudicator::{Adjudicator, AdjudicatorError, SlashVerdict};
pub use delegation::{decode_delegation, encode_delegation, CodecError, Delegation, SignedDelegation};
pub use errors::{ConfigError, RegistryError};
pub use events::RegistryEvent;
pub use params::RegistryParams;
pub use registry::Registry;
pub use treasury::{InMemoryTreasury, ReceiveHook, TransferError, Treasury};
pub use types::{
    registration_leaves, registration_message, registration_proof, to_base, Address,
    CallContext, Operator, Payout, Registration, Root, REGISTRATION_MESSAGE_LEN,
};
