//! Identity digests and solution commitments.
//!
//! SHA-256 is used as the opaque one-way function. Every preimage starts with
//! a domain tag so identity digests and commitments can never collide.

use core::fmt;

use sha2::{Digest as _, Sha256};

use crate::combination::Combination;

const IDENTITY_DOMAIN: &[u8] = b"mastermind/identity/v1";
const COMMITMENT_DOMAIN: &[u8] = b"mastermind/solution/v1";

macro_rules! byte_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // first 8 bytes are enough to tell values apart in logs
                write!(f, "{}({}..)", stringify!($name), hex::encode(&self.0[..8]))
            }
        }
    };
}

byte_newtype!(
    /// 32-byte output of the one-way digest.
    Digest
);

byte_newtype!(
    /// Public identity of a player (public key bytes).
    PublicKey
);

byte_newtype!(
    /// Secret salt mixed into the solution commitment.
    Salt
);

byte_newtype!(
    /// Address of the game instance; binds a commitment to one game.
    GameAddress
);

impl Digest {
    pub const ZERO: Self = Self([0; 32]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }
}

/// Digest identifying a player for the lifetime of a game.
pub fn identity_digest(public_key: &PublicKey) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(IDENTITY_DOMAIN);
    hasher.update(public_key.as_bytes());
    Digest(hasher.finalize().into())
}

/// Commitment to the secret, salted and bound to the game address.
pub fn solution_commitment(secret: &Combination, salt: &Salt, game: &GameAddress) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_DOMAIN);
    hasher.update(secret.digits());
    hasher.update(salt.as_bytes());
    hasher.update(game.as_bytes());
    Digest(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> Combination {
        Combination::from_encoded(1234).unwrap()
    }

    #[test]
    fn commitment_depends_on_every_input() {
        let salt = Salt([7; 32]);
        let game = GameAddress([1; 32]);
        let base = solution_commitment(&secret(), &salt, &game);

        assert_eq!(base, solution_commitment(&secret(), &salt, &game));
        assert_ne!(
            base,
            solution_commitment(&Combination::from_encoded(1243).unwrap(), &salt, &game)
        );
        assert_ne!(base, solution_commitment(&secret(), &Salt([8; 32]), &game));
        assert_ne!(
            base,
            solution_commitment(&secret(), &salt, &GameAddress([2; 32]))
        );
    }

    #[test]
    fn identity_digest_is_domain_separated() {
        let key = PublicKey([3; 32]);
        let digest = identity_digest(&key);
        assert_ne!(digest.as_bytes(), key.as_bytes());
        assert!(!digest.is_zero());
        assert_eq!(hex::encode(digest.as_bytes()).len(), 64);
        assert_eq!(format!("{digest}"), hex::encode(digest.as_bytes()));
    }

    #[test]
    fn debug_shows_a_short_prefix() {
        let address = GameAddress([0xAB; 32]);
        assert_eq!(format!("{address:?}"), "GameAddress(abababababababab..)");
        assert_eq!(format!("{address}"), "ab".repeat(32));
    }
}
