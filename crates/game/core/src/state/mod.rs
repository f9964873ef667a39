//! Authoritative game state representation.
//!
//! [`GameState`] mirrors the words a contract stores for one game. Runtime
//! layers clone or query it but produce new states exclusively through
//! [`crate::engine::GameEngine`].

use crate::clue::Clue;
use crate::combination::{Combination, RecordError};
use crate::config::GameConfig;
use crate::crypto::Digest;
use crate::packing::{ClueHistory, GuessHistory, PackingError, TurnWord, pack_reward_slot};

/// The two players.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    /// Holds the secret and answers guesses with clues.
    Codemaster,
    /// Submits guesses.
    Codebreaker,
}

impl Role {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Codemaster => Self::Codebreaker,
            Self::Codebreaker => Self::Codemaster,
        }
    }
}

/// Coarse lifecycle stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
    Uninitialized,
    /// Secret committed, waiting for a codebreaker.
    Initialized,
    /// Accepted and alternating turns.
    InProgress,
    Finalized,
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// A clue reported four hits.
    Solved,
    /// All attempts were used without solving.
    Exhausted,
    /// The finalize slot passed without solving.
    Expired,
    /// The referee ended the game against `loser`.
    Forfeited { loser: Role },
}

impl Outcome {
    pub const fn winner(self) -> Role {
        match self {
            Self::Solved => Role::Codebreaker,
            Self::Exhausted | Self::Expired => Role::Codemaster,
            Self::Forfeited { loser } => loser.opponent(),
        }
    }
}

/// Canonical snapshot of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Stake each player commits. Set at initialization.
    pub reward_amount: u64,

    /// Absolute deadline, fixed when the game is accepted.
    pub finalize_slot: u32,

    /// Accepted actions so far. Odd: codebreaker to act. Even and non-zero:
    /// codemaster to act.
    pub turn_count: u8,

    /// Monotonic; never reset once set.
    pub is_solved: bool,

    /// Ledger slot of the last accepted action.
    pub last_played_slot: u32,

    pub codemaster_id: Option<Digest>,
    pub codebreaker_id: Option<Digest>,

    /// Commitment to (secret, salt, game address).
    pub solution_hash: Option<Digest>,

    pub guess_history: GuessHistory,
    pub clue_history: ClueHistory,

    /// Set when the referee forced a forfeit against this role.
    pub forfeited: Option<Role>,

    pub reward_distributed: bool,
}

impl GameState {
    /// A state nobody has initialized yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_accepted(&self) -> bool {
        self.codebreaker_id.is_some()
    }

    /// Terminal outcome at ledger slot `now`, if any.
    pub fn outcome(&self, now: u32) -> Option<Outcome> {
        if let Some(loser) = self.forfeited {
            return Some(Outcome::Forfeited { loser });
        }
        if self.is_solved {
            return Some(Outcome::Solved);
        }
        if self.turn_count > GameConfig::MAX_TURN {
            return Some(Outcome::Exhausted);
        }
        if self.is_accepted() && now > self.finalize_slot {
            return Some(Outcome::Expired);
        }
        None
    }

    /// Winner at ledger slot `now`; `None` while the game is undecided.
    pub fn winner(&self, now: u32) -> Option<Role> {
        self.outcome(now).map(Outcome::winner)
    }

    pub fn phase(&self, now: u32) -> GamePhase {
        if self.solution_hash.is_none() {
            GamePhase::Uninitialized
        } else if !self.is_accepted() {
            GamePhase::Initialized
        } else if self.outcome(now).is_some() {
            GamePhase::Finalized
        } else {
            GamePhase::InProgress
        }
    }

    /// Role expected to act next, judged by turn parity alone.
    pub fn current_role(&self) -> Option<Role> {
        if crate::engine::rules::codebreaker_may_act(self.turn_count) {
            Some(Role::Codebreaker)
        } else if crate::engine::rules::codemaster_may_act(self.turn_count) {
            Some(Role::Codemaster)
        } else {
            None
        }
    }

    /// Stored identity of `role`.
    pub fn identity(&self, role: Role) -> Option<Digest> {
        match role {
            Role::Codemaster => self.codemaster_id,
            Role::Codebreaker => self.codebreaker_id,
        }
    }

    /// Guesses submitted so far, oldest first.
    pub fn guesses(&self) -> Result<Vec<Combination>, RecordError> {
        let count = usize::from(self.turn_count / 2).min(GameConfig::MAX_ATTEMPTS);
        (0..count)
            .map(|index| Combination::from_record(self.guess_history.get(index)?))
            .collect()
    }

    /// Clues given so far, oldest first.
    pub fn clues(&self) -> Result<Vec<Clue>, RecordError> {
        let count =
            usize::from(self.turn_count.saturating_sub(1) / 2).min(GameConfig::MAX_ATTEMPTS);
        (0..count)
            .map(|index| {
                let record = self.clue_history.get(index)?;
                Clue::decompress(record as u8).map_err(|_| {
                    RecordError::Packing(PackingError::InvalidEncoding {
                        aggregate: record,
                        bits: GameConfig::CLUE_RECORD_BITS,
                    })
                })
            })
            .collect()
    }

    /// Packed `turn_count * 10000 + max_attempts * 100 + solved` word.
    pub fn turn_word(&self) -> Result<u32, PackingError> {
        TurnWord {
            turn_count: self.turn_count,
            max_attempts: GameConfig::MAX_ATTEMPTS as u8,
            solved: self.is_solved,
        }
        .pack()
    }

    /// Packed `reward * 2^32 + finalize_slot` word.
    pub fn reward_word(&self) -> u128 {
        pack_reward_slot(self.reward_amount, self.finalize_slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_uninitialized() {
        let state = GameState::new();
        assert_eq!(state.phase(0), GamePhase::Uninitialized);
        assert_eq!(state.winner(0), None);
        assert_eq!(state.current_role(), None);
    }

    #[test]
    fn outcome_precedence() {
        let mut state = GameState {
            solution_hash: Some(Digest::ZERO),
            codemaster_id: Some(Digest([1; 32])),
            codebreaker_id: Some(Digest([2; 32])),
            turn_count: 15,
            finalize_slot: 70,
            ..GameState::default()
        };
        assert_eq!(state.outcome(10), Some(Outcome::Exhausted));

        state.turn_count = 4;
        assert_eq!(state.outcome(70), None);
        assert_eq!(state.outcome(71), Some(Outcome::Expired));

        state.is_solved = true;
        assert_eq!(state.winner(71), Some(Role::Codebreaker));

        state.forfeited = Some(Role::Codebreaker);
        assert_eq!(state.winner(71), Some(Role::Codemaster));
    }

    #[test]
    fn role_parses_from_snake_case() {
        assert_eq!("codebreaker".parse::<Role>(), Ok(Role::Codebreaker));
        assert_eq!(Role::Codemaster.to_string(), "codemaster");
        assert_eq!(Role::Codemaster.opponent(), Role::Codebreaker);
    }

    #[test]
    fn state_words() {
        let state = GameState {
            turn_count: 3,
            is_solved: true,
            reward_amount: 100,
            finalize_slot: 170,
            ..GameState::default()
        };
        assert_eq!(state.turn_word(), Ok(30_701));
        assert_eq!(state.reward_word(), (100u128 << 32) | 170);
    }
}
