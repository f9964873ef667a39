//! Public state of the off-ledger step chain.
//!
//! Each step consumes the previous step's [`StepState`] and produces the next
//! one. The transitions here are the pure part of a step; signature checks
//! and attestation belong to the proving layer.

use crate::clue::Clue;
use crate::combination::Combination;
use crate::config::GameConfig;
use crate::crypto::{Digest, GameAddress, Salt, solution_commitment};
use crate::engine::{EngineError, rules};
use crate::packing::{ClueHistory, GuessHistory};
use crate::state::Role;

/// Public output of one step and public input context of the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepState {
    pub code_master_id: Digest,
    /// [`Digest::ZERO`] until the first guess binds the codebreaker.
    pub code_breaker_id: Digest,
    pub solution_hash: Digest,
    pub turn_count: u8,
    /// Public decimal encoding of the latest guess, 0 before any guess.
    pub last_compressed_guess: u32,
    /// Compressed latest clue, 0 before any clue.
    pub last_compressed_clue: u8,
    pub packed_guess_history: GuessHistory,
    pub packed_clue_history: ClueHistory,
}

impl StepState {
    /// Root of a chain: commits the secret and binds the codemaster.
    pub fn create(
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
        game: &GameAddress,
        code_master_id: Digest,
    ) -> Result<Self, EngineError> {
        let secret = Combination::new(secret)?;
        Ok(Self {
            code_master_id,
            solution_hash: solution_commitment(&secret, salt, game),
            turn_count: 1,
            ..Self::default()
        })
    }

    /// Appends a guess. The first guess binds the codebreaker identity.
    pub fn guess(
        &self,
        guess: [u8; GameConfig::SLOTS],
        actor: Digest,
    ) -> Result<Self, EngineError> {
        if self.is_solved() {
            return Err(EngineError::AlreadyFinalized);
        }
        rules::ensure_turn(self.turn_count, Role::Codebreaker)?;
        if self.has_codebreaker() && self.code_breaker_id != actor {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codebreaker,
            });
        }
        if actor == self.code_master_id {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codebreaker,
            });
        }
        let guess = Combination::new(guess)?;

        Ok(Self {
            code_breaker_id: actor,
            turn_count: self.turn_count + 1,
            last_compressed_guess: guess.encoded(),
            packed_guess_history: self
                .packed_guess_history
                .with(rules::guess_slot(self.turn_count), guess.to_record())?,
            ..*self
        })
    }

    /// Answers the pending guess after re-deriving the commitment.
    pub fn clue(
        &self,
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
        game: &GameAddress,
        actor: Digest,
    ) -> Result<Self, EngineError> {
        if self.is_solved() {
            return Err(EngineError::AlreadyFinalized);
        }
        rules::ensure_turn(self.turn_count, Role::Codemaster)?;
        if actor != self.code_master_id {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codemaster,
            });
        }
        let secret = Combination::new(secret)?;
        if solution_commitment(&secret, salt, game) != self.solution_hash {
            return Err(EngineError::CommitmentMismatch);
        }

        let guess = rules::pending_guess(&self.packed_guess_history, self.turn_count)?;
        let clue = Clue::evaluate(&guess, &secret).compress();

        Ok(Self {
            turn_count: self.turn_count + 1,
            last_compressed_clue: clue,
            packed_clue_history: self
                .packed_clue_history
                .with(rules::clue_slot(self.turn_count), u128::from(clue))?,
            ..*self
        })
    }

    pub fn has_codebreaker(&self) -> bool {
        !self.code_breaker_id.is_zero()
    }

    /// True once a clue step reported four hits.
    pub fn is_solved(&self) -> bool {
        self.turn_count >= 3
            && self.turn_count % 2 == 1
            && Clue::decompress(self.last_compressed_clue).is_ok_and(|clue| clue.is_solved())
    }

    /// Checks that `self` is a legal successor of `previous`: one turn later,
    /// same game, identities carried forward, histories only appended to.
    ///
    /// Only public data is checked. Whether a clue matches the secret is up
    /// to the step attestation.
    pub fn follows(&self, previous: &StepState) -> Result<(), EngineError> {
        if previous.is_solved() {
            return Err(EngineError::AlreadyFinalized);
        }
        let actor = if previous.turn_count % 2 == 1 {
            Role::Codebreaker
        } else {
            Role::Codemaster
        };
        rules::ensure_turn(previous.turn_count, actor)?;
        if self.turn_count != previous.turn_count + 1 {
            return Err(EngineError::TurnSequenceViolation {
                turn_count: self.turn_count,
                actor,
            });
        }
        if self.code_master_id != previous.code_master_id {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codemaster,
            });
        }
        let breaker_bound = if previous.has_codebreaker() {
            self.code_breaker_id == previous.code_breaker_id
        } else {
            self.has_codebreaker() && self.code_breaker_id != self.code_master_id
        };
        if !breaker_bound {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codebreaker,
            });
        }
        if self.solution_hash != previous.solution_hash {
            return Err(EngineError::CommitmentMismatch);
        }

        let appended_only = match actor {
            Role::Codebreaker => {
                let slot = rules::guess_slot(previous.turn_count);
                let record = self.packed_guess_history.get(slot)?;
                let guess = Combination::from_record(record)?;
                self.last_compressed_guess == guess.encoded()
                    && self.packed_clue_history == previous.packed_clue_history
                    && self.last_compressed_clue == previous.last_compressed_clue
                    && previous.packed_guess_history.with(slot, record)?
                        == self.packed_guess_history
            }
            Role::Codemaster => {
                let slot = rules::clue_slot(previous.turn_count);
                let record = self.packed_clue_history.get(slot)?;
                Clue::decompress(self.last_compressed_clue)?;
                u128::from(self.last_compressed_clue) == record
                    && self.packed_guess_history == previous.packed_guess_history
                    && self.last_compressed_guess == previous.last_compressed_guess
                    && previous.packed_clue_history.with(slot, record)?
                        == self.packed_clue_history
            }
        };
        if !appended_only {
            return Err(EngineError::HistoryRewritten {
                turn_count: self.turn_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{PublicKey, identity_digest};

    const GAME: GameAddress = GameAddress::new([5; 32]);
    const SALT: Salt = Salt::new([6; 32]);

    fn master() -> Digest {
        identity_digest(&PublicKey([10; 32]))
    }

    fn breaker() -> Digest {
        identity_digest(&PublicKey([20; 32]))
    }

    #[test]
    fn create_starts_at_turn_one() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        assert_eq!(root.turn_count, 1);
        assert!(!root.has_codebreaker());
        assert_eq!(root.packed_guess_history.raw(), 0);
        assert!(StepState::create([1, 2, 0, 4], &SALT, &GAME, master()).is_err());
    }

    #[test]
    fn guess_then_clue() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let guessed = root.guess([5, 6, 3, 4], breaker()).unwrap();
        assert_eq!(guessed.turn_count, 2);
        assert_eq!(guessed.code_breaker_id, breaker());
        assert_eq!(guessed.last_compressed_guess, 5634);
        guessed.follows(&root).unwrap();

        let clued = guessed.clue([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        assert_eq!(clued.turn_count, 3);
        assert_eq!(clued.last_compressed_clue, 0b00_00_10_10);
        assert!(!clued.is_solved());
        clued.follows(&guessed).unwrap();
    }

    #[test]
    fn wrong_parity_and_identity_are_rejected() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        assert!(matches!(
            root.clue([1, 2, 3, 4], &SALT, &GAME, master()),
            Err(EngineError::TurnSequenceViolation { .. })
        ));

        let guessed = root.guess([5, 6, 3, 4], breaker()).unwrap();
        assert!(matches!(
            guessed.clue([1, 2, 3, 4], &SALT, &GAME, breaker()),
            Err(EngineError::IdentityMismatch { .. })
        ));
        assert_eq!(
            guessed.clue([1, 2, 4, 3], &SALT, &GAME, master()),
            Err(EngineError::CommitmentMismatch)
        );

        let clued = guessed.clue([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        assert!(matches!(
            clued.guess([1, 2, 3, 4], master()),
            Err(EngineError::IdentityMismatch { .. })
        ));
    }

    #[test]
    fn no_steps_after_solving() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let solved = root
            .guess([1, 2, 3, 4], breaker())
            .and_then(|s| s.clue([1, 2, 3, 4], &SALT, &GAME, master()))
            .unwrap();
        assert!(solved.is_solved());
        assert_eq!(
            solved.guess([1, 2, 3, 5], breaker()),
            Err(EngineError::AlreadyFinalized)
        );
    }

    #[test]
    fn follows_detects_skipped_turns() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let guessed = root.guess([5, 6, 3, 4], breaker()).unwrap();
        let clued = guessed.clue([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        assert!(clued.follows(&root).is_err());
    }

    #[test]
    fn follows_detects_rewritten_history() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let guessed = root.guess([5, 6, 3, 4], breaker()).unwrap();
        let clued = guessed.clue([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let next = clued.guess([1, 2, 4, 3], breaker()).unwrap();

        let mut forged = next;
        forged.packed_guess_history = next
            .packed_guess_history
            .with(0, Combination::new([1, 2, 3, 4]).unwrap().to_record())
            .unwrap();
        assert_eq!(
            forged.follows(&clued),
            Err(EngineError::HistoryRewritten { turn_count: 4 })
        );
        next.follows(&clued).unwrap();
    }

    fn solved_game() -> StepState {
        StepState::create([1, 2, 3, 4], &SALT, &GAME, master())
            .and_then(|s| s.guess([1, 2, 3, 4], breaker()))
            .and_then(|s| s.clue([1, 2, 3, 4], &SALT, &GAME, master()))
            .unwrap()
    }

    #[test]
    fn follows_rejects_steps_after_solving() {
        let solved = solved_game();
        let guess = Combination::new([5, 6, 7, 8]).unwrap();
        let forged = StepState {
            turn_count: solved.turn_count + 1,
            last_compressed_guess: guess.encoded(),
            packed_guess_history: solved
                .packed_guess_history
                .with(rules::guess_slot(solved.turn_count), guess.to_record())
                .unwrap(),
            ..solved
        };
        assert_eq!(forged.follows(&solved), Err(EngineError::AlreadyFinalized));
    }

    #[test]
    fn follows_requires_a_bound_codebreaker() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let guessed = root.guess([5, 6, 3, 4], breaker()).unwrap();

        let unbound = StepState {
            code_breaker_id: Digest::ZERO,
            ..guessed
        };
        assert_eq!(
            unbound.follows(&root),
            Err(EngineError::IdentityMismatch {
                expected: Role::Codebreaker
            })
        );

        let by_master = StepState {
            code_breaker_id: master(),
            ..guessed
        };
        assert!(by_master.follows(&root).is_err());
    }

    #[test]
    fn follows_checks_public_guess_and_clue_against_histories() {
        let root = StepState::create([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let guessed = root.guess([5, 6, 3, 4], breaker()).unwrap();
        let mislabeled = StepState {
            last_compressed_guess: 1234,
            ..guessed
        };
        assert_eq!(
            mislabeled.follows(&root),
            Err(EngineError::HistoryRewritten { turn_count: 2 })
        );

        let clued = guessed.clue([1, 2, 3, 4], &SALT, &GAME, master()).unwrap();
        let mislabeled = StepState {
            last_compressed_clue: 0b10_10_10_10,
            ..clued
        };
        assert_eq!(
            mislabeled.follows(&guessed),
            Err(EngineError::HistoryRewritten { turn_count: 3 })
        );
    }
}
