//! Off-ledger step chain for the codemaster/codebreaker game.
//!
//! A game can be played entirely off the ledger as a sequence of steps:
//! - **create**: the codemaster commits to a secret
//! - **guess**: the codebreaker appends a guess
//! - **clue**: the codemaster answers the pending guess
//!
//! Each step checks the actor's signature, applies the pure transition from
//! [`mastermind_core::StepState`], and produces a [`StepProof`] attesting the
//! new public state against its predecessor. A [`StepChain`] collects the
//! proofs; only its latest element is submitted for settlement.
//!
//! # Feature Flags
//!
//! - `hash-chain` (default): SHA-256 linked attestations ([`HashChainProver`])
//! - `stub-signatures` (default): hash-based [`StubSignatureScheme`]
//!
//! Neither default backend offers cryptographic soundness; both exist so the
//! protocol can be exercised end to end without proving infrastructure.

pub mod chain;
pub mod prover;
pub mod signature;
pub mod step;

pub use chain::{ChainError, StepChain, validate_chain};
#[cfg(feature = "hash-chain")]
pub use prover::HashChainProver;
pub use prover::{ProofBackend, ProofData, ProofError, Prover};
#[cfg(feature = "stub-signatures")]
pub use signature::{StubSignatureScheme, StubSigner};
pub use signature::{Signature, SignatureVerifier, signing_message};
pub use step::{StepError, StepKind, StepProgram, StepProof};
