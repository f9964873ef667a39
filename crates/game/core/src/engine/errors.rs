//! Error types for the state machine.

use crate::clue::ClueError;
use crate::combination::{CodecError, RecordError};
use crate::error::{ErrorSeverity, GameError};
use crate::packing::PackingError;
use crate::state::Role;

/// Errors surfaced while applying an action through the game engine.
///
/// Any error means the whole action was rejected; the input state is untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("combination rejected: {0}")]
    Codec(#[from] CodecError),

    #[error("packing failed: {0}")]
    Packing(#[from] PackingError),

    #[error("stored guess unreadable: {0}")]
    Record(#[from] RecordError),

    #[error("clue rejected: {0}")]
    Clue(#[from] ClueError),

    #[error("game has not been initialized")]
    NotInitialized,

    #[error("game is already initialized")]
    AlreadyInitialized,

    #[error("game has not been accepted by a codebreaker")]
    NotAccepted,

    #[error("game was already accepted")]
    AlreadyAccepted,

    #[error("{actor} may not act at turn {turn_count}")]
    TurnSequenceViolation { turn_count: u8, actor: Role },

    #[error("caller is not the {expected}")]
    IdentityMismatch { expected: Role },

    #[error("secret and salt do not match the stored commitment")]
    CommitmentMismatch,

    #[error("game is already finalized")]
    AlreadyFinalized,

    #[error("game has no winner yet")]
    NotYetFinalized,

    #[error("caller is not the referee")]
    NotAuthorized,

    #[error("reward was already distributed")]
    RewardDistributed,

    #[error("reward {actual} does not match the stake {expected}")]
    RewardMismatch { expected: u64, actual: u64 },

    #[error("step at turn {turn_count} rewrites earlier history")]
    HistoryRewritten { turn_count: u8 },

    #[error("chain at turn {submitted} does not advance stored turn {stored}")]
    StaleChain { submitted: u8, stored: u8 },
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        use EngineError::*;
        match self {
            Codec(err) => err.severity(),
            Packing(err) => err.severity(),
            Record(err) => err.severity(),
            Clue(err) => err.severity(),
            NotInitialized | AlreadyInitialized | NotAccepted | AlreadyAccepted => {
                ErrorSeverity::Recoverable
            }
            TurnSequenceViolation { .. } | NotYetFinalized | StaleChain { .. } => {
                ErrorSeverity::Recoverable
            }
            AlreadyFinalized | RewardDistributed => ErrorSeverity::Recoverable,
            IdentityMismatch { .. } | CommitmentMismatch | NotAuthorized => {
                ErrorSeverity::Validation
            }
            RewardMismatch { .. } | HistoryRewritten { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use EngineError::*;
        match self {
            Codec(err) => err.error_code(),
            Packing(err) => err.error_code(),
            Record(err) => err.error_code(),
            Clue(err) => err.error_code(),
            NotInitialized => "ENGINE_NOT_INITIALIZED",
            AlreadyInitialized => "ENGINE_ALREADY_INITIALIZED",
            NotAccepted => "ENGINE_NOT_ACCEPTED",
            AlreadyAccepted => "ENGINE_ALREADY_ACCEPTED",
            TurnSequenceViolation { .. } => "ENGINE_TURN_SEQUENCE",
            IdentityMismatch { .. } => "ENGINE_IDENTITY_MISMATCH",
            CommitmentMismatch => "ENGINE_COMMITMENT_MISMATCH",
            AlreadyFinalized => "ENGINE_ALREADY_FINALIZED",
            NotYetFinalized => "ENGINE_NOT_YET_FINALIZED",
            NotAuthorized => "ENGINE_NOT_AUTHORIZED",
            RewardDistributed => "ENGINE_REWARD_DISTRIBUTED",
            RewardMismatch { .. } => "ENGINE_REWARD_MISMATCH",
            HistoryRewritten { .. } => "ENGINE_HISTORY_REWRITTEN",
            StaleChain { .. } => "ENGINE_STALE_CHAIN",
        }
    }
}
