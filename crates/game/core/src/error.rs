//! Common error infrastructure for mastermind-core.
//!
//! This module provides the shared classification used across all error types
//! in the crate. Domain-specific errors (`CodecError`, `PackingError`,
//! `EngineError`) live next to the code that raises them.
//!
//! # Design Principles
//!
//! - **Atomic**: A returned error means no state was changed
//! - **Severity Classification**: Errors are categorized for caller handling
//! - **Stable Codes**: Every variant maps to a static identifier usable in logs and tests

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The action was well-formed but arrived at the wrong time
///   (wrong turn, game already over). Another action may succeed.
/// - **Validation**: Invalid input that should be rejected without retry.
/// - **Internal**: Unexpected inconsistency in stored words.
/// - **Fatal**: The stored state cannot be interpreted at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry once the game reaches the right state.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - stored state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all mastermind-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clue::ClueError;
    use crate::combination::CodecError;
    use crate::engine::EngineError;
    use crate::state::Role;

    #[test]
    fn engine_codes_and_severities_are_stable() {
        let out_of_turn = EngineError::TurnSequenceViolation {
            turn_count: 2,
            actor: Role::Codebreaker,
        };
        assert_eq!(out_of_turn.error_code(), "ENGINE_TURN_SEQUENCE");
        assert!(out_of_turn.severity().is_recoverable());

        let rewritten = EngineError::HistoryRewritten { turn_count: 4 };
        assert_eq!(rewritten.error_code(), "ENGINE_HISTORY_REWRITTEN");
        assert_eq!(rewritten.severity(), ErrorSeverity::Validation);

        let stale = EngineError::StaleChain {
            submitted: 3,
            stored: 5,
        };
        assert_eq!(stale.error_code(), "ENGINE_STALE_CHAIN");
        assert_eq!(EngineError::CommitmentMismatch.severity().as_str(), "validation");
    }

    #[test]
    fn wrapped_errors_report_their_own_code() {
        let clue = EngineError::from(ClueError::InvalidScore { index: 1, score: 3 });
        assert_eq!(clue.error_code(), "CLUE_INVALID_SCORE");
        assert_eq!(clue.severity(), ErrorSeverity::Validation);

        let codec = EngineError::from(CodecError::DuplicateDigit {
            digit: 1,
            first: 0,
            second: 1,
        });
        assert_eq!(codec.error_code(), "CODEC_DUPLICATE_DIGIT");
        assert!(!codec.severity().is_recoverable());
    }

    #[test]
    fn severity_labels() {
        assert_eq!(ErrorSeverity::Recoverable.as_str(), "recoverable");
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
        assert!(!ErrorSeverity::Internal.is_recoverable());
    }
}
