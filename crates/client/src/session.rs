//! Scripted off-ledger game settled on the contract model.

use anyhow::{Context, Result, bail};
use mastermind_contract::{ContractStorage, GameContract, LedgerContext, Settlement};
use mastermind_core::{
    Clue, Combination, GameAddress, GameConfig, PublicKey, RewardClaim, Role,
};
use zk::{HashChainProver, StepChain, StepProgram, StubSignatureScheme, StubSigner};

use crate::config::ClientConfig;

const GAME: GameAddress = GameAddress::new([0x6D; 32]);

/// One guess and the clue it received.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Round {
    pub guess: u32,
    pub clue: [u8; GameConfig::SLOTS],
}

/// Everything the session did, for printing.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SessionReport {
    pub rounds: Vec<Round>,
    pub steps: usize,
    pub settlement: Settlement,
    pub claim: Option<RewardClaim>,
    pub storage: ContractStorage,
}

pub struct Session {
    config: ClientConfig,
    program: StepProgram<HashChainProver, StubSignatureScheme>,
    master: StubSigner,
    breaker: StubSigner,
}

impl Session {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            program: StepProgram::new(HashChainProver::new(), StubSignatureScheme),
            master: StubSigner::new(PublicKey::new([0x4D; 32])),
            breaker: StubSigner::new(PublicKey::new([0x42; 32])),
        }
    }

    /// Opens the game on the contract, plays the guesses off-ledger and
    /// settles the resulting chain.
    pub fn run(&self) -> Result<SessionReport> {
        let secret = Combination::from_encoded(self.config.secret)
            .with_context(|| format!("invalid secret {}", self.config.secret))?
            .digits();

        let mut contract =
            GameContract::new(GAME, self.config.game_config(), HashChainProver::new());
        contract
            .initialize(&self.ctx(&self.master, 0), secret, &self.config.salt, self.config.reward)
            .context("initialize failed")?;
        contract
            .accept(&self.ctx(&self.breaker, 0), self.config.reward)
            .context("accept failed")?;
        tracing::info!(address = %GAME, reward = self.config.reward, "game opened");

        let (chain, rounds) = self.play(secret)?;
        let latest = &chain.latest().output;
        let claimed = if latest.is_solved() {
            Some(Role::Codebreaker)
        } else if latest.turn_count > GameConfig::MAX_TURN {
            Some(Role::Codemaster)
        } else {
            None
        };

        let slot = rounds.len() as u32;
        let settlement = contract
            .submit_proof(&self.ctx(&self.breaker, slot), &chain, claimed)
            .context("settlement failed")?;

        let claim = match settlement.winner {
            Some(winner) => {
                let signer = match winner {
                    Role::Codemaster => &self.master,
                    Role::Codebreaker => &self.breaker,
                };
                Some(
                    contract
                        .claim_reward(&self.ctx(signer, slot + 1))
                        .context("reward claim failed")?,
                )
            }
            None => None,
        };

        Ok(SessionReport {
            rounds,
            steps: chain.steps().len(),
            settlement,
            claim,
            storage: contract.storage().clone(),
        })
    }

    fn play(&self, secret: [u8; GameConfig::SLOTS]) -> Result<(StepChain, Vec<Round>)> {
        if self.config.guesses.len() > GameConfig::MAX_ATTEMPTS {
            bail!(
                "{} guesses configured, at most {} allowed",
                self.config.guesses.len(),
                GameConfig::MAX_ATTEMPTS
            );
        }

        let salt = &self.config.salt;
        let root = self.program.create_step(
            secret,
            salt,
            &GAME,
            self.master.public_key(),
            &self.master.sign_for(&GAME),
        )?;
        let mut chain = StepChain::new(root)?;
        let mut rounds = Vec::with_capacity(self.config.guesses.len());

        for &encoded in &self.config.guesses {
            let guess = Combination::from_encoded(encoded)
                .with_context(|| format!("invalid guess {encoded}"))?;

            let guessed = self.program.guess_step(
                chain.latest(),
                guess.digits(),
                &GAME,
                self.breaker.public_key(),
                &self.breaker.sign_for(&GAME),
            )?;
            chain.push(guessed)?;

            let clued = self.program.clue_step(
                chain.latest(),
                secret,
                salt,
                &GAME,
                self.master.public_key(),
                &self.master.sign_for(&GAME),
            )?;
            chain.push(clued)?;

            let clue = Clue::decompress(chain.latest().output.last_compressed_clue)?;
            tracing::info!(guess = %guess, clue = ?clue.scores(), "round played");
            rounds.push(Round {
                guess: encoded,
                clue: clue.scores(),
            });

            if clue.is_solved() {
                break;
            }
        }

        Ok((chain, rounds))
    }

    fn ctx(&self, signer: &StubSigner, slot: u32) -> LedgerContext {
        LedgerContext::new(*signer.public_key(), slot)
    }
}
