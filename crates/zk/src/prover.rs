//! Attestation interface for step outputs.
//!
//! A backend attests that a step output was produced by the step program from
//! its predecessor. Verifying a single attestation checks one link; checking a
//! whole chain is [`crate::validate_chain`]'s job.

use mastermind_core::StepState;

use crate::step::{StepKind, StepProof};

/// Attestation bytes plus the backend that produced them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProofData {
    pub bytes: Vec<u8>,
    pub backend: ProofBackend,
}

/// Identifies which proving backend generated a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProofBackend {
    #[cfg(feature = "hash-chain")]
    HashChain,
}

/// Errors that can occur during attestation or verification.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("proof from backend {found:?} cannot be checked by {expected:?}")]
    BackendMismatch {
        expected: ProofBackend,
        found: ProofBackend,
    },

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Common interface for step attestation backends.
pub trait Prover: Send + Sync {
    fn backend(&self) -> ProofBackend;

    /// Attest that `output` is the result of a `kind` step applied after
    /// `previous`. `previous` is `None` only for the create step.
    fn prove_step(
        &self,
        kind: StepKind,
        previous: Option<&StepProof>,
        output: &StepState,
    ) -> Result<ProofData, ProofError>;

    /// Check the attestation carried by `step` against its predecessor.
    ///
    /// Returns `Ok(false)` for a well-formed proof that does not verify.
    fn verify_step(
        &self,
        previous: Option<&StepProof>,
        step: &StepProof,
    ) -> Result<bool, ProofError>;
}

// ============================================================================
// Hash Chain Prover
// ============================================================================

#[cfg(feature = "hash-chain")]
const HASH_CHAIN_DOMAIN: &[u8] = b"mastermind/step/v1";

/// Links every step output to its predecessor's attestation with SHA-256.
///
/// `attestation = sha256(domain || kind || previous attestation || output)`
///
/// **Warning**: anyone can compute these bytes. The chain detects tampering
/// with recorded steps but proves nothing about the hidden inputs. Development
/// and testing only.
#[cfg(feature = "hash-chain")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HashChainProver;

#[cfg(feature = "hash-chain")]
impl HashChainProver {
    pub fn new() -> Self {
        Self
    }

    fn attest(
        &self,
        kind: StepKind,
        previous: Option<&StepProof>,
        output: &StepState,
    ) -> Result<Vec<u8>, ProofError> {
        use sha2::{Digest as _, Sha256};

        let encoded = bincode::serialize(output)
            .map_err(|err| ProofError::SerializationError(err.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(HASH_CHAIN_DOMAIN);
        hasher.update([kind as u8]);
        match previous {
            Some(step) => {
                hasher.update([1]);
                hasher.update(&step.proof.bytes);
            }
            None => hasher.update([0]),
        }
        hasher.update(&encoded);
        Ok(hasher.finalize().to_vec())
    }
}

#[cfg(feature = "hash-chain")]
impl Prover for HashChainProver {
    fn backend(&self) -> ProofBackend {
        ProofBackend::HashChain
    }

    fn prove_step(
        &self,
        kind: StepKind,
        previous: Option<&StepProof>,
        output: &StepState,
    ) -> Result<ProofData, ProofError> {
        Ok(ProofData {
            bytes: self.attest(kind, previous, output)?,
            backend: ProofBackend::HashChain,
        })
    }

    fn verify_step(
        &self,
        previous: Option<&StepProof>,
        step: &StepProof,
    ) -> Result<bool, ProofError> {
        if step.proof.backend != ProofBackend::HashChain {
            return Err(ProofError::BackendMismatch {
                expected: ProofBackend::HashChain,
                found: step.proof.backend,
            });
        }
        Ok(self.attest(step.kind, previous, &step.output)? == step.proof.bytes)
    }
}
