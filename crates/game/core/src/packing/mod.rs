//! Fixed-width packing of game data into single aggregate words.
//!
//! The contract stores O(1) words per game: two history aggregates and two
//! state words. Everything here is a value-to-value transform; nothing is
//! mutated in place, so a packed word can be kept as an immutable snapshot.
//!
//! - [`history`]: bounded sequences of W-bit elements in one N×W-bit integer
//! - [`word`]: decimal and base-2^32 packing of the scalar state fields

pub mod history;
pub mod word;

pub use history::{ClueHistory, GuessHistory, PackedHistory, pack, read_at, unpack, write_at};
pub use word::{TurnWord, pack_reward_slot, pack_turn, unpack_reward_slot, unpack_turn};

use crate::error::{ErrorSeverity, GameError};

/// Widest aggregate the packers can produce.
pub const MAX_AGGREGATE_BITS: u32 = u128::BITS;

/// Errors raised by the history packer and the state word codec.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackingError {
    /// Aggregate does not fit the declared N×W bit width, or a word fails its
    /// round-trip check.
    #[error("aggregate {aggregate:#x} is not a valid {bits}-bit encoding")]
    InvalidEncoding { aggregate: u128, bits: u32 },

    /// Slot index did not match exactly one of the `capacity` slots.
    #[error("index {index} out of range for {capacity} slots")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// Element needs more than `width` bits.
    #[error("element {value} does not fit in {width} bits")]
    ElementOverflow { value: u128, width: u32 },

    /// More elements than slots.
    #[error("{len} elements exceed capacity {capacity}")]
    TooManyElements { len: usize, capacity: usize },

    /// N×W exceeds the aggregate width, or W is zero.
    #[error("{capacity} slots of {width} bits do not fit an aggregate word")]
    LayoutOverflow { capacity: usize, width: u32 },

    /// A decimal state-word field is outside its range.
    #[error("state field `{field}` value {value} out of range")]
    FieldOutOfRange { field: WordField, value: u64 },
}

/// Fields of the decimal turn word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WordField {
    TurnCount,
    MaxAttempts,
    SolvedFlag,
}

impl GameError for PackingError {
    fn severity(&self) -> ErrorSeverity {
        use PackingError::*;
        match self {
            IndexOutOfRange { .. } | ElementOverflow { .. } | TooManyElements { .. } => {
                ErrorSeverity::Validation
            }
            FieldOutOfRange { .. } => ErrorSeverity::Validation,
            InvalidEncoding { .. } => ErrorSeverity::Internal,
            LayoutOverflow { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use PackingError::*;
        match self {
            InvalidEncoding { .. } => "PACKING_INVALID_ENCODING",
            IndexOutOfRange { .. } => "PACKING_INDEX_OUT_OF_RANGE",
            ElementOverflow { .. } => "PACKING_ELEMENT_OVERFLOW",
            TooManyElements { .. } => "PACKING_TOO_MANY_ELEMENTS",
            LayoutOverflow { .. } => "PACKING_LAYOUT_OVERFLOW",
            FieldOutOfRange { .. } => "PACKING_FIELD_OUT_OF_RANGE",
        }
    }
}
