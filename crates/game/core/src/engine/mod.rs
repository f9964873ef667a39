//! Turn sequencing and the authoritative transition function.
//!
//! The [`GameEngine`] validates one action against the current [`GameState`]
//! and returns the next state. States are threaded by value: the input is
//! never modified, so a rejected action leaves nothing half-applied and
//! callers can keep old states as snapshots.

mod errors;
pub mod rules;

pub use errors::EngineError;

use crate::clue::Clue;
use crate::combination::Combination;
use crate::config::GameConfig;
use crate::crypto::{Digest, GameAddress, Salt, solution_commitment};
use crate::state::{GamePhase, GameState, Role};
use crate::step::StepState;

/// Who is acting and when.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionContext {
    /// Identity digest of the authenticated caller.
    pub caller: Digest,
    /// Current ledger slot.
    pub slot: u32,
}

impl ActionContext {
    pub const fn new(caller: Digest, slot: u32) -> Self {
        Self { caller, slot }
    }
}

/// Result of a successful reward claim. Moving the funds is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardClaim {
    pub recipient: Role,
    pub recipient_id: Digest,
    pub amount: u64,
}

/// Game engine that validates actions and computes successor states.
///
/// Lifecycle: `initialize` → `accept` → alternating `submit_guess` /
/// `submit_clue` (or one bulk `settle` from a step chain) → finalized by a
/// solving clue, exhausted attempts, the deadline, or `forfeit`.
pub struct GameEngine<'a> {
    config: &'a GameConfig,
}

impl<'a> GameEngine<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        self.config
    }

    /// Commits the codemaster's secret and opens the game.
    pub fn initialize(
        &self,
        state: &GameState,
        ctx: &ActionContext,
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
        game: &GameAddress,
        reward: u64,
    ) -> Result<GameState, EngineError> {
        if state.phase(ctx.slot) != GamePhase::Uninitialized {
            return Err(EngineError::AlreadyInitialized);
        }
        let secret = Combination::new(secret)?;

        Ok(GameState {
            reward_amount: reward,
            turn_count: 1,
            last_played_slot: ctx.slot,
            codemaster_id: Some(ctx.caller),
            solution_hash: Some(solution_commitment(&secret, salt, game)),
            ..GameState::new()
        })
    }

    /// Binds the codebreaker and fixes the finalize deadline.
    pub fn accept(
        &self,
        state: &GameState,
        ctx: &ActionContext,
        reward: u64,
    ) -> Result<GameState, EngineError> {
        match state.phase(ctx.slot) {
            GamePhase::Uninitialized => return Err(EngineError::NotInitialized),
            GamePhase::Initialized => {}
            _ => return Err(EngineError::AlreadyAccepted),
        }
        if state.codemaster_id == Some(ctx.caller) {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codebreaker,
            });
        }
        if reward != state.reward_amount {
            return Err(EngineError::RewardMismatch {
                expected: state.reward_amount,
                actual: reward,
            });
        }

        Ok(GameState {
            codebreaker_id: Some(ctx.caller),
            finalize_slot: ctx.slot.saturating_add(self.config.game_duration()),
            last_played_slot: ctx.slot,
            ..state.clone()
        })
    }

    /// Records the codebreaker's next guess.
    pub fn submit_guess(
        &self,
        state: &GameState,
        ctx: &ActionContext,
        guess: [u8; GameConfig::SLOTS],
    ) -> Result<GameState, EngineError> {
        self.ensure_in_progress(state, ctx.slot)?;
        rules::ensure_turn(state.turn_count, Role::Codebreaker)?;
        Self::ensure_caller(state, ctx, Role::Codebreaker)?;
        let guess = Combination::new(guess)?;

        let guess_history = state
            .guess_history
            .with(rules::guess_slot(state.turn_count), guess.to_record())?;

        Ok(GameState {
            guess_history,
            turn_count: state.turn_count + 1,
            last_played_slot: ctx.slot,
            ..state.clone()
        })
    }

    /// Scores the pending guess against the revealed secret.
    ///
    /// The secret and salt must reproduce the stored commitment. A solving
    /// clue ends the game regardless of remaining attempts.
    pub fn submit_clue(
        &self,
        state: &GameState,
        ctx: &ActionContext,
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
        game: &GameAddress,
    ) -> Result<GameState, EngineError> {
        self.ensure_in_progress(state, ctx.slot)?;
        rules::ensure_turn(state.turn_count, Role::Codemaster)?;
        Self::ensure_caller(state, ctx, Role::Codemaster)?;
        let secret = Combination::new(secret)?;

        if state.solution_hash != Some(solution_commitment(&secret, salt, game)) {
            return Err(EngineError::CommitmentMismatch);
        }

        let guess = rules::pending_guess(&state.guess_history, state.turn_count)?;
        let clue = Clue::evaluate(&guess, &secret);
        let clue_history = state.clue_history.with(
            rules::clue_slot(state.turn_count),
            u128::from(clue.compress()),
        )?;

        Ok(GameState {
            clue_history,
            is_solved: clue.is_solved(),
            turn_count: state.turn_count + 1,
            last_played_slot: ctx.slot,
            ..state.clone()
        })
    }

    /// Applies the final output of a step chain in one transition.
    ///
    /// The output must belong to this game (same codemaster, commitment and,
    /// once bound, codebreaker) and must advance the stored turn count.
    /// Attestation checks are the caller's responsibility.
    pub fn settle(
        &self,
        state: &GameState,
        ctx: &ActionContext,
        output: &StepState,
    ) -> Result<GameState, EngineError> {
        self.ensure_in_progress(state, ctx.slot)?;

        if state.codemaster_id != Some(output.code_master_id) {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codemaster,
            });
        }
        if state.solution_hash != Some(output.solution_hash) {
            return Err(EngineError::CommitmentMismatch);
        }
        // every output past the root carries the codebreaker bound by its first guess
        if output.turn_count > 1 && state.codebreaker_id != Some(output.code_breaker_id) {
            return Err(EngineError::IdentityMismatch {
                expected: Role::Codebreaker,
            });
        }
        if output.turn_count <= state.turn_count {
            return Err(EngineError::StaleChain {
                submitted: output.turn_count,
                stored: state.turn_count,
            });
        }

        Ok(GameState {
            turn_count: output.turn_count,
            is_solved: output.is_solved(),
            guess_history: output.packed_guess_history,
            clue_history: output.packed_clue_history,
            last_played_slot: ctx.slot,
            ..state.clone()
        })
    }

    /// Referee-forced end of an in-progress game against `loser`.
    pub fn forfeit(
        &self,
        state: &GameState,
        ctx: &ActionContext,
        loser: Role,
    ) -> Result<GameState, EngineError> {
        if self.config.referee != Some(ctx.caller) {
            return Err(EngineError::NotAuthorized);
        }
        if state.reward_distributed {
            return Err(EngineError::RewardDistributed);
        }
        self.ensure_in_progress(state, ctx.slot)?;

        Ok(GameState {
            forfeited: Some(loser),
            last_played_slot: ctx.slot,
            ..state.clone()
        })
    }

    /// Marks the reward as paid to the winner. Only the winner may claim,
    /// and only once.
    pub fn claim_reward(
        &self,
        state: &GameState,
        ctx: &ActionContext,
    ) -> Result<(GameState, RewardClaim), EngineError> {
        if state.reward_distributed {
            return Err(EngineError::RewardDistributed);
        }
        let winner = state
            .winner(ctx.slot)
            .ok_or(EngineError::NotYetFinalized)?;
        let winner_id = state
            .identity(winner)
            .ok_or(EngineError::NotYetFinalized)?;
        if winner_id != ctx.caller {
            return Err(EngineError::IdentityMismatch { expected: winner });
        }

        let claim = RewardClaim {
            recipient: winner,
            recipient_id: winner_id,
            amount: state.reward_amount,
        };
        let next = GameState {
            reward_distributed: true,
            ..state.clone()
        };
        Ok((next, claim))
    }

    fn ensure_in_progress(&self, state: &GameState, slot: u32) -> Result<(), EngineError> {
        match state.phase(slot) {
            GamePhase::Uninitialized => Err(EngineError::NotInitialized),
            GamePhase::Initialized => Err(EngineError::NotAccepted),
            GamePhase::Finalized => Err(EngineError::AlreadyFinalized),
            GamePhase::InProgress => Ok(()),
        }
    }

    fn ensure_caller(state: &GameState, ctx: &ActionContext, role: Role) -> Result<(), EngineError> {
        if state.identity(role) == Some(ctx.caller) {
            Ok(())
        } else {
            Err(EngineError::IdentityMismatch { expected: role })
        }
    }
}
