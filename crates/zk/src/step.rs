//! Step programs: create, guess, clue.
//!
//! Every step authenticates the actor, derives its identity digest, applies
//! the matching [`StepState`] transition and attests the output.

use mastermind_core::{
    Digest, EngineError, GameAddress, GameConfig, PublicKey, Salt, StepState, identity_digest,
};

use crate::prover::{ProofData, ProofError, Prover};
use crate::signature::{Signature, SignatureVerifier, signing_message};

/// Which step program produced an output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum StepKind {
    Create = 0,
    Guess = 1,
    Clue = 2,
}

impl StepKind {
    /// Kind of step allowed to follow a step whose output is at `turn_count`.
    pub const fn next_for(turn_count: u8) -> Self {
        if turn_count % 2 == 1 {
            StepKind::Guess
        } else {
            StepKind::Clue
        }
    }
}

/// One attested element of a step chain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StepProof {
    pub kind: StepKind,
    pub output: StepState,
    pub proof: ProofData,
}

/// Errors raised by a step program. No proof is produced on error.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("signature does not verify for the acting identity")]
    InvalidSignature,

    #[error("transition rejected: {0}")]
    Transition(#[from] EngineError),

    #[error("attestation failed: {0}")]
    Proof(#[from] ProofError),
}

/// Runs step transitions and attests their outputs.
#[derive(Debug, Clone)]
pub struct StepProgram<P, V> {
    prover: P,
    verifier: V,
}

impl<P: Prover, V: SignatureVerifier> StepProgram<P, V> {
    pub fn new(prover: P, verifier: V) -> Self {
        Self { prover, verifier }
    }

    pub fn prover(&self) -> &P {
        &self.prover
    }

    /// Root step: commits the secret under the codemaster's identity.
    pub fn create_step(
        &self,
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
        game: &GameAddress,
        actor: &PublicKey,
        signature: &Signature,
    ) -> Result<StepProof, StepError> {
        let master_id = self.authenticate(actor, game, signature)?;
        let output = StepState::create(secret, salt, game, master_id)?;
        self.seal(StepKind::Create, None, output)
    }

    /// Appends a guess after `previous`.
    pub fn guess_step(
        &self,
        previous: &StepProof,
        guess: [u8; GameConfig::SLOTS],
        game: &GameAddress,
        actor: &PublicKey,
        signature: &Signature,
    ) -> Result<StepProof, StepError> {
        let breaker_id = self.authenticate(actor, game, signature)?;
        let output = previous.output.guess(guess, breaker_id)?;
        self.seal(StepKind::Guess, Some(previous), output)
    }

    /// Answers the guess pending in `previous`.
    pub fn clue_step(
        &self,
        previous: &StepProof,
        secret: [u8; GameConfig::SLOTS],
        salt: &Salt,
        game: &GameAddress,
        actor: &PublicKey,
        signature: &Signature,
    ) -> Result<StepProof, StepError> {
        let master_id = self.authenticate(actor, game, signature)?;
        let output = previous.output.clue(secret, salt, game, master_id)?;
        self.seal(StepKind::Clue, Some(previous), output)
    }

    fn authenticate(
        &self,
        actor: &PublicKey,
        game: &GameAddress,
        signature: &Signature,
    ) -> Result<Digest, StepError> {
        let message = signing_message(actor, game);
        if !self.verifier.verify(actor, &message, signature) {
            tracing::warn!(actor = ?actor, "step rejected: invalid signature");
            return Err(StepError::InvalidSignature);
        }
        Ok(identity_digest(actor))
    }

    fn seal(
        &self,
        kind: StepKind,
        previous: Option<&StepProof>,
        output: StepState,
    ) -> Result<StepProof, StepError> {
        let proof = self.prover.prove_step(kind, previous, &output)?;
        tracing::debug!(
            kind = %kind,
            turn_count = output.turn_count,
            solved = output.is_solved(),
            "step attested"
        );
        Ok(StepProof {
            kind,
            output,
            proof,
        })
    }
}
