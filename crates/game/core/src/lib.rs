//! Deterministic protocol rules for the codemaster/codebreaker game.
//!
//! `mastermind-core` defines the combination and clue encodings, the packed
//! word formats a contract stores, and the authoritative transition function.
//! Everything here is pure: no I/O, no clocks, no logging. The current ledger
//! slot and caller identity are always passed in.
//!
//! All on-ledger state changes flow through [`engine::GameEngine`]; the
//! off-ledger step chain builds on [`step::StepState`] and shares the same
//! turn rules.
pub mod clue;
pub mod combination;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod packing;
pub mod state;
pub mod step;

pub use clue::{Clue, ClueError};
pub use combination::{CodecError, Combination, RecordError};
pub use config::GameConfig;
pub use crypto::{Digest, GameAddress, PublicKey, Salt, identity_digest, solution_commitment};
pub use engine::{ActionContext, EngineError, GameEngine, RewardClaim};
pub use error::{ErrorSeverity, GameError};
pub use packing::{ClueHistory, GuessHistory, PackedHistory, PackingError, TurnWord};
pub use state::{GamePhase, GameState, Outcome, Role};
pub use step::StepState;
