//! Append-only chain of attested steps.

use mastermind_core::{EngineError, StepState};

use crate::prover::{ProofError, Prover};
use crate::step::{StepKind, StepProof};

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("step chain is empty")]
    Empty,

    #[error("chain does not start with a fresh create step")]
    InvalidRoot,

    #[error("step {index} is a {found} step, expected {expected}")]
    UnexpectedKind {
        index: usize,
        expected: StepKind,
        found: StepKind,
    },

    #[error("step {index} does not follow its predecessor: {source}")]
    Discontinuity { index: usize, source: EngineError },

    #[error("attestation of step {index} does not verify")]
    InvalidAttestation { index: usize },

    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// Steps of one game in order, root first. Never empty.
///
/// Deserializing re-checks the root and every link, so a decoded chain holds
/// the same invariants as one built with [`StepChain::push`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawChain")]
pub struct StepChain {
    steps: Vec<StepProof>,
}

#[derive(serde::Deserialize)]
struct RawChain {
    steps: Vec<StepProof>,
}

impl TryFrom<RawChain> for StepChain {
    type Error = ChainError;

    fn try_from(raw: RawChain) -> Result<Self, Self::Error> {
        let mut steps = raw.steps.into_iter();
        let mut chain = Self::new(steps.next().ok_or(ChainError::Empty)?)?;
        for step in steps {
            chain.push(step)?;
        }
        Ok(chain)
    }
}

impl StepChain {
    /// Starts a chain from a create step.
    pub fn new(root: StepProof) -> Result<Self, ChainError> {
        check_root(&root)?;
        Ok(Self { steps: vec![root] })
    }

    /// Appends a step after checking kind and continuity. Attestations are
    /// only checked by [`StepChain::validate`].
    pub fn push(&mut self, step: StepProof) -> Result<(), ChainError> {
        let index = self.steps.len();
        check_link(index, self.latest(), &step)?;
        self.steps.push(step);
        Ok(())
    }

    pub fn latest(&self) -> &StepProof {
        // non-empty: `new` and deserialization both require a root
        &self.steps[self.steps.len() - 1]
    }

    pub fn turn_count(&self) -> u8 {
        self.latest().output.turn_count
    }

    pub fn steps(&self) -> &[StepProof] {
        &self.steps
    }

    /// Full check of the chain. Returns the latest public state.
    pub fn validate<P: Prover + ?Sized>(&self, prover: &P) -> Result<&StepState, ChainError> {
        validate_chain(&self.steps, prover)
    }
}

/// Checks the root, every link and every attestation of `steps`.
pub fn validate_chain<'a, P: Prover + ?Sized>(
    steps: &'a [StepProof],
    prover: &P,
) -> Result<&'a StepState, ChainError> {
    let (root, rest) = steps.split_first().ok_or(ChainError::Empty)?;
    check_root(root)?;
    if !prover.verify_step(None, root)? {
        return Err(ChainError::InvalidAttestation { index: 0 });
    }

    let mut previous = root;
    for (offset, step) in rest.iter().enumerate() {
        let index = offset + 1;
        check_link(index, previous, step)?;
        if !prover.verify_step(Some(previous), step)? {
            tracing::warn!(index, "step chain attestation mismatch");
            return Err(ChainError::InvalidAttestation { index });
        }
        previous = step;
    }

    tracing::debug!(
        steps = steps.len(),
        turn_count = previous.output.turn_count,
        "step chain validated"
    );
    Ok(&previous.output)
}

fn check_root(root: &StepProof) -> Result<(), ChainError> {
    let fresh = StepState {
        code_master_id: root.output.code_master_id,
        solution_hash: root.output.solution_hash,
        turn_count: 1,
        ..StepState::default()
    };
    if root.kind != StepKind::Create || root.output != fresh || root.output.solution_hash.is_zero() {
        return Err(ChainError::InvalidRoot);
    }
    Ok(())
}

fn check_link(index: usize, previous: &StepProof, step: &StepProof) -> Result<(), ChainError> {
    let expected = StepKind::next_for(previous.output.turn_count);
    if step.kind != expected {
        return Err(ChainError::UnexpectedKind {
            index,
            expected,
            found: step.kind,
        });
    }
    step.output
        .follows(&previous.output)
        .map_err(|source| ChainError::Discontinuity { index, source })
}
