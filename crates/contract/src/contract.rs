//! Contract entry points.

use mastermind_core::{
    ActionContext, EngineError, GameAddress, GameConfig, GameEngine, GameError, GamePhase,
    GameState, Outcome, PublicKey, RewardClaim, Role, Salt, identity_digest,
};
use zk::{Prover, StepChain};

use crate::error::ContractError;
use crate::storage::ContractStorage;

/// Authenticated caller and current slot, as supplied by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerContext {
    pub caller: PublicKey,
    pub slot: u32,
}

impl LedgerContext {
    pub const fn new(caller: PublicKey, slot: u32) -> Self {
        Self { caller, slot }
    }

    fn action(&self) -> ActionContext {
        ActionContext::new(identity_digest(&self.caller), self.slot)
    }
}

/// Receipt of an accepted step-chain settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Settlement {
    pub turn_count: u8,
    pub outcome: Option<Outcome>,
    pub winner: Option<Role>,
}

/// One game instance.
///
/// Every call loads the packed words, applies a single engine transition and
/// stores the result. A failed call leaves storage untouched.
pub struct GameContract<P> {
    address: GameAddress,
    config: GameConfig,
    prover: P,
    storage: ContractStorage,
}

impl<P: Prover> GameContract<P> {
    pub fn new(address: GameAddress, config: GameConfig, prover: P) -> Self {
        Self {
            address,
            config,
            prover,
            storage: ContractStorage::default(),
        }
    }

    pub fn address(&self) -> &GameAddress {
        &self.address
    }

    pub fn storage(&self) -> &ContractStorage {
        &self.storage
    }

    pub fn state(&self) -> Result<GameState, ContractError> {
        Ok(self.storage.load()?)
    }

    pub fn phase(&self, now: u32) -> Result<GamePhase, ContractError> {
        Ok(self.state()?.phase(now))
    }

    pub fn winner(&self, now: u32) -> Result<Option<Role>, ContractError> {
        Ok(self.state()?.winner(now))
    }

    /// Commits the secret. The caller becomes the codemaster.
    pub fn initialize(
        &mut self,
        ctx: &LedgerContext,
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
        reward: u64,
    ) -> Result<(), ContractError> {
        let address = self.address;
        self.apply("initialize", ctx, |engine, state, action| {
            engine.initialize(state, action, secret, salt, &address, reward)
        })
    }

    /// Joins as codebreaker with a stake equal to the codemaster's.
    pub fn accept(&mut self, ctx: &LedgerContext, reward: u64) -> Result<(), ContractError> {
        self.apply("accept", ctx, |engine, state, action| {
            engine.accept(state, action, reward)
        })
    }

    pub fn submit_guess(
        &mut self,
        ctx: &LedgerContext,
        guess: [u8; GameConfig::SLOTS],
    ) -> Result<(), ContractError> {
        self.apply("submit_guess", ctx, |engine, state, action| {
            engine.submit_guess(state, action, guess)
        })
    }

    pub fn submit_clue(
        &mut self,
        ctx: &LedgerContext,
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
    ) -> Result<(), ContractError> {
        let address = self.address;
        self.apply("submit_clue", ctx, |engine, state, action| {
            engine.submit_clue(state, action, secret, salt, &address)
        })
    }

    /// Settles the game from an off-ledger step chain.
    ///
    /// The whole chain is validated, its latest output must advance the stored
    /// turn count, and if `claimed_winner` is given the settled state must
    /// determine exactly that winner.
    pub fn submit_proof(
        &mut self,
        ctx: &LedgerContext,
        chain: &StepChain,
        claimed_winner: Option<Role>,
    ) -> Result<Settlement, ContractError> {
        let state = self.storage.load()?;
        let latest = chain.validate(&self.prover).inspect_err(|err| {
            tracing::warn!(error = %err, "settlement rejected: invalid step chain");
        })?;

        if latest.turn_count <= state.turn_count {
            tracing::warn!(
                submitted = latest.turn_count,
                stored = state.turn_count,
                "settlement rejected: stale chain"
            );
            return Err(ContractError::StaleChain {
                submitted: latest.turn_count,
                stored: state.turn_count,
            });
        }

        let engine = GameEngine::new(&self.config);
        let next = engine
            .settle(&state, &ctx.action(), latest)
            .inspect_err(|err| log_rejection("submit_proof", err))?;

        let winner = next.winner(ctx.slot);
        match claimed_winner {
            Some(claimed) if winner != Some(claimed) => {
                tracing::warn!(%claimed, actual = ?winner, "settlement rejected: winner mismatch");
                return Err(ContractError::WinnerMismatch {
                    claimed,
                    actual: winner,
                });
            }
            _ => {}
        }

        self.storage = ContractStorage::store(&next)?;
        let settlement = Settlement {
            turn_count: next.turn_count,
            outcome: next.outcome(ctx.slot),
            winner,
        };
        tracing::info!(
            turn_count = settlement.turn_count,
            outcome = ?settlement.outcome,
            "step chain settled"
        );
        Ok(settlement)
    }

    /// Pays out to the winner once.
    pub fn claim_reward(&mut self, ctx: &LedgerContext) -> Result<RewardClaim, ContractError> {
        let state = self.storage.load()?;
        let engine = GameEngine::new(&self.config);
        let (next, claim) = engine
            .claim_reward(&state, &ctx.action())
            .inspect_err(|err| log_rejection("claim_reward", err))?;

        self.storage = ContractStorage::store(&next)?;
        tracing::info!(
            recipient = %claim.recipient,
            amount = claim.amount,
            "reward claimed"
        );
        Ok(claim)
    }

    /// Referee-only: ends the game against `target`.
    pub fn forfeit(
        &mut self,
        ctx: &LedgerContext,
        target: &PublicKey,
    ) -> Result<(), ContractError> {
        let state = self.storage.load()?;
        let target_id = identity_digest(target);
        let loser = [Role::Codemaster, Role::Codebreaker]
            .into_iter()
            .find(|role| state.identity(*role) == Some(target_id))
            .ok_or(ContractError::UnknownPlayer)?;

        self.apply("forfeit", ctx, |engine, state, action| {
            engine.forfeit(state, action, loser)
        })
    }

    fn apply<F>(&mut self, entry: &'static str, ctx: &LedgerContext, f: F) -> Result<(), ContractError>
    where
        F: FnOnce(&GameEngine<'_>, &GameState, &ActionContext) -> Result<GameState, EngineError>,
    {
        let state = self.storage.load()?;
        let engine = GameEngine::new(&self.config);
        let next = f(&engine, &state, &ctx.action()).inspect_err(|err| log_rejection(entry, err))?;

        self.storage = ContractStorage::store(&next)?;
        tracing::debug!(
            entry,
            turn_count = next.turn_count,
            slot = ctx.slot,
            "call applied"
        );
        Ok(())
    }
}

/// Out-of-turn calls are expected traffic; anything else is worth a warning.
fn log_rejection(entry: &'static str, err: &EngineError) {
    let severity = err.severity();
    if severity.is_recoverable() {
        tracing::debug!(entry, code = err.error_code(), error = %err, "call rejected");
    } else {
        tracing::warn!(
            entry,
            code = err.error_code(),
            severity = severity.as_str(),
            error = %err,
            "call rejected"
        );
    }
}
