//! In-memory model of the on-ledger game contract.
//!
//! The contract keeps only packed words in [`storage::ContractStorage`] and
//! runs every entry point through [`mastermind_core::GameEngine`]:
//!
//! ```text
//! LedgerContext ──► GameContract ──► load words ──► GameEngine ──► store words
//!                        │
//!                        └── submit_proof: validate StepChain ──► settle
//! ```
//!
//! The ledger authenticates callers and orders transactions; this crate only
//! sees the authenticated public key and the current slot.

pub mod contract;
pub mod error;
pub mod storage;

pub use contract::{GameContract, LedgerContext, Settlement};
pub use error::ContractError;
pub use storage::ContractStorage;
