//! Actor signatures checked by every step.
//!
//! Each step proves the actor controls the identity it acts under: the actor
//! signs [`signing_message`] and the step program verifies it against the
//! public key before hashing that key into an identity digest.

use mastermind_core::{GameAddress, PublicKey};

/// Opaque signature bytes; the layout belongs to the scheme.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Signature(pub Vec<u8>);

/// Verifies actor signatures for the step program.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

/// Message an actor signs to act in `game`: its public key, then the game address.
pub fn signing_message(public_key: &PublicKey, game: &GameAddress) -> Vec<u8> {
    let mut message = Vec::with_capacity(64);
    message.extend_from_slice(public_key.as_bytes());
    message.extend_from_slice(game.as_bytes());
    message
}

// ============================================================================
// Stub Signatures
// ============================================================================

#[cfg(feature = "stub-signatures")]
const STUB_DOMAIN: &[u8] = b"mastermind/stub-signature/v1";

#[cfg(feature = "stub-signatures")]
fn stub_digest(public_key: &PublicKey, message: &[u8]) -> Vec<u8> {
    use sha2::{Digest as _, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(STUB_DOMAIN);
    hasher.update(public_key.as_bytes());
    hasher.update(message);
    hasher.finalize().to_vec()
}

/// Signs with the stub scheme.
///
/// **Warning**: the signature depends only on public data. Do not use outside
/// development and tests.
#[cfg(feature = "stub-signatures")]
#[derive(Debug, Clone, Copy)]
pub struct StubSigner {
    public_key: PublicKey,
}

#[cfg(feature = "stub-signatures")]
impl StubSigner {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(stub_digest(&self.public_key, message))
    }

    /// Signs the standard step message for `game`.
    pub fn sign_for(&self, game: &GameAddress) -> Signature {
        self.sign(&signing_message(&self.public_key, game))
    }
}

/// Verifier half of the stub scheme.
#[cfg(feature = "stub-signatures")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSignatureScheme;

#[cfg(feature = "stub-signatures")]
impl SignatureVerifier for StubSignatureScheme {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        signature.0 == stub_digest(public_key, message)
    }
}
