//! Packed storage words.
//!
//! The contract persists a constant number of words per game regardless of
//! how many turns were played. [`ContractStorage::load`] rebuilds a
//! [`GameState`] and [`ContractStorage::store`] packs one back; every word is
//! self-checked on load.

use mastermind_core::packing::{WordField, pack_reward_slot, unpack_reward_slot};
use mastermind_core::{
    ClueHistory, Digest, GameConfig, GameState, GuessHistory, PackingError, Role, TurnWord,
};

/// Words stored on-ledger for one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContractStorage {
    /// `turn_count * 10000 + max_attempts * 100 + solved`. Zero before initialization.
    pub turn_word: u32,
    /// `reward * 2^32 + finalize_slot`.
    pub reward_word: u128,
    pub guess_history: u128,
    pub clue_history: u128,
    pub last_played_slot: u32,
    pub codemaster_id: Option<Digest>,
    pub codebreaker_id: Option<Digest>,
    pub solution_hash: Option<Digest>,
    pub forfeited: Option<Role>,
    pub reward_distributed: bool,
}

impl ContractStorage {
    pub fn load(&self) -> Result<GameState, PackingError> {
        let max_attempts = self.max_attempts()?;
        if usize::from(max_attempts) != GameConfig::MAX_ATTEMPTS {
            return Err(PackingError::FieldOutOfRange {
                field: WordField::MaxAttempts,
                value: max_attempts.into(),
            });
        }
        let (turn_count, is_solved) = if self.turn_word == 0 {
            (0, false)
        } else {
            let word = TurnWord::unpack(self.turn_word)?;
            (word.turn_count, word.solved)
        };
        let (reward_amount, finalize_slot) = unpack_reward_slot(self.reward_word)?;

        Ok(GameState {
            reward_amount,
            finalize_slot,
            turn_count,
            is_solved,
            last_played_slot: self.last_played_slot,
            codemaster_id: self.codemaster_id,
            codebreaker_id: self.codebreaker_id,
            solution_hash: self.solution_hash,
            guess_history: GuessHistory::from_raw(self.guess_history)?,
            clue_history: ClueHistory::from_raw(self.clue_history)?,
            forfeited: self.forfeited,
            reward_distributed: self.reward_distributed,
        })
    }

    pub fn store(state: &GameState) -> Result<Self, PackingError> {
        let turn_word = if state.turn_count == 0 {
            0
        } else {
            state.turn_word()?
        };

        Ok(Self {
            turn_word,
            reward_word: pack_reward_slot(state.reward_amount, state.finalize_slot),
            guess_history: state.guess_history.raw(),
            clue_history: state.clue_history.raw(),
            last_played_slot: state.last_played_slot,
            codemaster_id: state.codemaster_id,
            codebreaker_id: state.codebreaker_id,
            solution_hash: state.solution_hash,
            forfeited: state.forfeited,
            reward_distributed: state.reward_distributed,
        })
    }

    /// Attempt limit recorded in the turn word.
    pub fn max_attempts(&self) -> Result<u8, PackingError> {
        if self.turn_word == 0 {
            return Ok(GameConfig::MAX_ATTEMPTS as u8);
        }
        Ok(TurnWord::unpack(self.turn_word)?.max_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mastermind_core::Combination;

    #[test]
    fn empty_storage_loads_uninitialized_state() {
        let state = ContractStorage::default().load().unwrap();
        assert_eq!(state, GameState::new());
        assert_eq!(ContractStorage::store(&state).unwrap(), ContractStorage::default());
    }

    #[test]
    fn words_survive_a_store_load_cycle() {
        let record = Combination::new([1, 2, 3, 4]).unwrap().to_record();
        let state = GameState {
            reward_amount: 250,
            finalize_slot: 90,
            turn_count: 4,
            last_played_slot: 33,
            codemaster_id: Some(Digest::new([1; 32])),
            codebreaker_id: Some(Digest::new([2; 32])),
            solution_hash: Some(Digest::new([3; 32])),
            guess_history: GuessHistory::empty().with(0, record).unwrap(),
            ..GameState::new()
        };

        let storage = ContractStorage::store(&state).unwrap();
        assert_eq!(storage.turn_word, 40_700);
        assert_eq!(storage.reward_word, (250u128 << 32) | 90);
        assert_eq!(storage.max_attempts(), Ok(7));
        assert_eq!(storage.load().unwrap(), state);
    }

    #[test]
    fn corrupt_turn_word_is_reported() {
        let storage = ContractStorage {
            turn_word: 10_702,
            ..ContractStorage::default()
        };
        assert!(storage.load().is_err());
    }

    #[test]
    fn foreign_attempt_limit_is_rejected() {
        let storage = ContractStorage {
            turn_word: 30_900,
            ..ContractStorage::default()
        };
        assert_eq!(storage.max_attempts(), Ok(9));
        assert_eq!(
            storage.load(),
            Err(PackingError::FieldOutOfRange {
                field: WordField::MaxAttempts,
                value: 9
            })
        );
    }
}
