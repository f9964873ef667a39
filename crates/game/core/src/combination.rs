//! Four-digit combinations: the codemaster's secret and every guess.
//!
//! The public encoding is a decimal number in `[1000, 9999]` with one digit per
//! place value. Inside the packed histories each digit instead occupies a 3-bit
//! field (see [`Combination::to_record`]), which keeps a leading zero digit
//! representable.

use core::fmt;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::packing::{self, PackingError};

/// Decimal place values, most significant digit first.
const PLACE_VALUES: [u32; GameConfig::SLOTS] = [1000, 100, 10, 1];

/// Smallest accepted public encoding.
pub const MIN_ENCODED: u32 = 1000;
/// Largest accepted public encoding.
pub const MAX_ENCODED: u32 = 9999;

/// Errors raised while decoding or validating a combination.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodecError {
    /// Encoded value is outside `[1000, 9999]` or does not recompose.
    #[error("invalid combination encoding {value}")]
    InvalidEncoding { value: u32 },

    /// A digit exceeds [`GameConfig::MAX_DIGIT`].
    #[error("digit {digit} at position {index} exceeds {max}", max = GameConfig::MAX_DIGIT)]
    DigitOutOfRange { index: usize, digit: u8 },

    /// A digit at positions 1..=3 is zero.
    #[error("digit at position {index} must not be zero")]
    ZeroDigit { index: usize },

    /// Two positions carry the same digit.
    #[error("digit {digit} repeats at positions {first} and {second}")]
    DuplicateDigit { digit: u8, first: usize, second: usize },
}

impl GameError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEncoding { .. } => "CODEC_INVALID_ENCODING",
            Self::DigitOutOfRange { .. } => "CODEC_DIGIT_OUT_OF_RANGE",
            Self::ZeroDigit { .. } => "CODEC_ZERO_DIGIT",
            Self::DuplicateDigit { .. } => "CODEC_DUPLICATE_DIGIT",
        }
    }
}

/// Splits a public encoding into its four digits.
///
/// Fails unless `1000 <= value <= 9999`. The digits are not validated; call
/// [`validate`] before using them as a secret or guess.
pub fn decode(value: u32) -> Result<[u8; GameConfig::SLOTS], CodecError> {
    if !(MIN_ENCODED..=MAX_ENCODED).contains(&value) {
        return Err(CodecError::InvalidEncoding { value });
    }

    let digits = PLACE_VALUES.map(|place| ((value / place) % 10) as u8);

    if encode(digits) != value {
        return Err(CodecError::InvalidEncoding { value });
    }
    Ok(digits)
}

/// Positional weighted sum of the digits. Performs no validation.
pub fn encode(digits: [u8; GameConfig::SLOTS]) -> u32 {
    digits
        .iter()
        .zip(PLACE_VALUES)
        .map(|(&digit, place)| u32::from(digit) * place)
        .sum()
}

/// Checks the combination rules: every digit within range, positions 1..=3
/// non-zero, all four digits distinct.
pub fn validate(digits: &[u8; GameConfig::SLOTS]) -> Result<(), CodecError> {
    for (index, &digit) in digits.iter().enumerate() {
        if digit > GameConfig::MAX_DIGIT {
            return Err(CodecError::DigitOutOfRange { index, digit });
        }
    }

    // position 0 is exempt
    if let Some(index) = (1..GameConfig::SLOTS).find(|&i| digits[i] == 0) {
        return Err(CodecError::ZeroDigit { index });
    }

    for first in 0..GameConfig::SLOTS {
        for second in first + 1..GameConfig::SLOTS {
            if digits[first] == digits[second] {
                return Err(CodecError::DuplicateDigit {
                    digit: digits[first],
                    first,
                    second,
                });
            }
        }
    }
    Ok(())
}

/// A validated four-digit combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combination([u8; GameConfig::SLOTS]);

impl Combination {
    /// Builds a combination after running [`validate`].
    pub fn new(digits: [u8; GameConfig::SLOTS]) -> Result<Self, CodecError> {
        validate(&digits)?;
        Ok(Self(digits))
    }

    /// Decodes and validates a public decimal encoding.
    pub fn from_encoded(value: u32) -> Result<Self, CodecError> {
        Self::new(decode(value)?)
    }

    pub fn digits(&self) -> [u8; GameConfig::SLOTS] {
        self.0
    }

    /// Public decimal encoding. Below 1000 when the leading digit is zero.
    pub fn encoded(&self) -> u32 {
        encode(self.0)
    }

    /// Bit-packed history record: four 3-bit digits, most significant first.
    /// The two reserved high bits of the 14-bit record stay zero.
    pub fn to_record(&self) -> u128 {
        self.0.iter().fold(0u128, |record, &digit| {
            (record << GameConfig::DIGIT_BITS) | u128::from(digit)
        })
    }

    /// Reads a history record back into validated digits.
    pub fn from_record(record: u128) -> Result<Self, RecordError> {
        if record >> (GameConfig::SLOTS as u32 * GameConfig::DIGIT_BITS) != 0 {
            return Err(RecordError::ReservedBits { record });
        }
        let fields = packing::unpack(record, GameConfig::SLOTS, GameConfig::DIGIT_BITS)?;
        let mut digits = [0u8; GameConfig::SLOTS];
        for (digit, field) in digits.iter_mut().zip(fields) {
            *digit = field as u8;
        }
        Ok(Self::new(digits)?)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

/// Errors raised while reading a packed guess record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordError {
    #[error("guess record {record:#x} uses reserved bits")]
    ReservedBits { record: u128 },

    #[error(transparent)]
    Packing(#[from] PackingError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl GameError for RecordError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ReservedBits { .. } => "RECORD_RESERVED_BITS",
            Self::Packing(err) => err.error_code(),
            Self::Codec(err) => err.error_code(),
        }
    }
}
