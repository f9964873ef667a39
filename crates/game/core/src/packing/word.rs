//! Scalar state words.
//!
//! Two aggregates hold the game's scalar fields:
//! - turn word: `turn_count * 10000 + max_attempts * 100 + solved_flag`
//! - reward word: `reward * 2^32 + finalize_slot` (96 bits)

use super::{PackingError, WordField};

const TURN_PLACE: u32 = 10_000;
const ATTEMPTS_PLACE: u32 = 100;
const SLOT_BITS: u32 = 32;

/// Decoded turn word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnWord {
    pub turn_count: u8,
    pub max_attempts: u8,
    pub solved: bool,
}

impl TurnWord {
    pub fn pack(&self) -> Result<u32, PackingError> {
        pack_turn(
            self.turn_count.into(),
            self.max_attempts.into(),
            self.solved.into(),
        )
    }

    pub fn unpack(word: u32) -> Result<Self, PackingError> {
        let (turn_count, max_attempts, solved) = unpack_turn(word)?;
        Ok(Self {
            turn_count: turn_count as u8,
            max_attempts: max_attempts as u8,
            solved: solved == 1,
        })
    }
}

/// Packs the turn triple. Each decimal field must stay below 100 and the
/// solved flag must be 0 or 1.
pub fn pack_turn(turn_count: u32, max_attempts: u32, solved_flag: u32) -> Result<u32, PackingError> {
    if turn_count >= 100 {
        return Err(PackingError::FieldOutOfRange {
            field: WordField::TurnCount,
            value: turn_count.into(),
        });
    }
    if max_attempts >= 100 {
        return Err(PackingError::FieldOutOfRange {
            field: WordField::MaxAttempts,
            value: max_attempts.into(),
        });
    }
    if solved_flag > 1 {
        return Err(PackingError::FieldOutOfRange {
            field: WordField::SolvedFlag,
            value: solved_flag.into(),
        });
    }
    Ok(turn_count * TURN_PLACE + max_attempts * ATTEMPTS_PLACE + solved_flag)
}

/// Inverse of [`pack_turn`], checked by re-packing.
pub fn unpack_turn(word: u32) -> Result<(u32, u32, u32), PackingError> {
    let turn_count = word / TURN_PLACE;
    let max_attempts = (word / ATTEMPTS_PLACE) % 100;
    let solved_flag = word % ATTEMPTS_PLACE;

    let invalid = || PackingError::InvalidEncoding {
        aggregate: word.into(),
        bits: u32::BITS,
    };
    let repacked = pack_turn(turn_count, max_attempts, solved_flag).map_err(|_| invalid())?;
    if repacked != word {
        return Err(invalid());
    }
    Ok((turn_count, max_attempts, solved_flag))
}

/// Packs reward and finalize slot into one 96-bit value.
pub fn pack_reward_slot(reward: u64, slot: u32) -> u128 {
    (u128::from(reward) << SLOT_BITS) | u128::from(slot)
}

/// Inverse of [`pack_reward_slot`] by base-2^32 digit extraction.
pub fn unpack_reward_slot(word: u128) -> Result<(u64, u32), PackingError> {
    let invalid = PackingError::InvalidEncoding {
        aggregate: word,
        bits: u64::BITS + SLOT_BITS,
    };
    let slot = (word & u128::from(u32::MAX)) as u32;
    let reward = u64::try_from(word >> SLOT_BITS).map_err(|_| invalid.clone())?;

    if pack_reward_slot(reward, slot) != word {
        return Err(invalid);
    }
    Ok((reward, slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_word_layout() {
        assert_eq!(pack_turn(3, 7, 0), Ok(30_700));
        assert_eq!(pack_turn(15, 7, 1), Ok(150_701));
        assert_eq!(unpack_turn(150_701), Ok((15, 7, 1)));
    }

    #[test]
    fn turn_word_rejects_out_of_range_fields() {
        assert!(matches!(
            pack_turn(100, 7, 0),
            Err(PackingError::FieldOutOfRange { field: WordField::TurnCount, .. })
        ));
        assert!(matches!(
            pack_turn(1, 100, 0),
            Err(PackingError::FieldOutOfRange { field: WordField::MaxAttempts, .. })
        ));
        assert!(matches!(
            pack_turn(1, 7, 2),
            Err(PackingError::FieldOutOfRange { field: WordField::SolvedFlag, .. })
        ));
    }

    #[test]
    fn malformed_turn_words_fail_self_check() {
        // solved flag field of 2
        assert!(unpack_turn(10_702).is_err());
        // turn count of 100
        assert!(unpack_turn(1_000_000).is_err());
    }

    #[test]
    fn turn_word_struct_round_trip() {
        let word = TurnWord {
            turn_count: 4,
            max_attempts: 7,
            solved: true,
        };
        assert_eq!(TurnWord::unpack(word.pack().unwrap()), Ok(word));
        assert!(
            TurnWord {
                turn_count: 120,
                ..word
            }
            .pack()
            .is_err()
        );
    }

    #[test]
    fn reward_slot_round_trip() {
        let word = pack_reward_slot(u64::MAX, u32::MAX);
        assert_eq!(word, (1u128 << 96) - 1);
        assert_eq!(unpack_reward_slot(word), Ok((u64::MAX, u32::MAX)));
        assert_eq!(unpack_reward_slot(pack_reward_slot(100, 70)), Ok((100, 70)));
    }

    #[test]
    fn reward_word_wider_than_96_bits_is_rejected() {
        assert!(unpack_reward_slot(1u128 << 96).is_err());
    }
}
