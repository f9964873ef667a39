//! Contract entry point errors.

use mastermind_core::{EngineError, ErrorSeverity, GameError, PackingError, Role};
use zk::{ChainError, ProofError};

/// Rejection of a contract call. Storage is untouched on every error.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("transition rejected: {0}")]
    Engine(#[from] EngineError),

    #[error("stored word is corrupt: {0}")]
    Storage(#[from] PackingError),

    #[error("chain at turn {submitted} does not advance stored turn {stored}")]
    StaleChain { submitted: u8, stored: u8 },

    #[error("step chain rejected: {0}")]
    InvalidProof(#[from] ChainError),

    #[error("proof backend failure: {0}")]
    Proof(#[from] ProofError),

    #[error("claimed winner {claimed} but settled state gives {actual:?}")]
    WinnerMismatch { claimed: Role, actual: Option<Role> },

    #[error("target is not a player of this game")]
    UnknownPlayer,
}

impl GameError for ContractError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::Engine(err) => err.severity(),
            ContractError::Storage(_) | ContractError::Proof(_) => ErrorSeverity::Internal,
            ContractError::StaleChain { .. } => ErrorSeverity::Recoverable,
            ContractError::InvalidProof(_)
            | ContractError::WinnerMismatch { .. }
            | ContractError::UnknownPlayer => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ContractError::Engine(err) => err.error_code(),
            ContractError::Storage(err) => err.error_code(),
            ContractError::StaleChain { .. } => "CONTRACT_STALE_CHAIN",
            ContractError::InvalidProof(_) => "CONTRACT_INVALID_PROOF",
            ContractError::Proof(_) => "CONTRACT_PROOF_BACKEND",
            ContractError::WinnerMismatch { .. } => "CONTRACT_WINNER_MISMATCH",
            ContractError::UnknownPlayer => "CONTRACT_UNKNOWN_PLAYER",
        }
    }
}
