use crate::crypto::Digest;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Ledger slots granted per attempt; the finalize deadline is
    /// `accept slot + MAX_ATTEMPTS * per_turn_duration`.
    pub per_turn_duration: u32,

    /// Identity digest allowed to force a forfeit. `None` disables forfeits.
    pub referee: Option<Digest>,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Number of guesses the codebreaker may submit.
    pub const MAX_ATTEMPTS: usize = 7;
    /// Largest digit a combination may contain (3-bit field).
    pub const MAX_DIGIT: u8 = 7;
    /// Number of digits in a combination and positions in a clue.
    pub const SLOTS: usize = 4;
    /// Bits per digit when a combination is bit-packed.
    pub const DIGIT_BITS: u32 = 3;
    /// Bits per guess record in the guess history (12 used + 2 reserved).
    pub const GUESS_RECORD_BITS: u32 = 14;
    /// Bits per clue position.
    pub const CLUE_BITS: u32 = 2;
    /// Bits per clue record in the clue history.
    pub const CLUE_RECORD_BITS: u32 = 8;
    /// Upper bound on the turn counter while a game can still progress.
    pub const MAX_TURN: u8 = 2 * Self::MAX_ATTEMPTS as u8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PER_TURN_DURATION: u32 = 10;

    pub fn new() -> Self {
        Self {
            per_turn_duration: Self::DEFAULT_PER_TURN_DURATION,
            referee: None,
        }
    }

    pub fn with_per_turn_duration(per_turn_duration: u32) -> Self {
        Self {
            per_turn_duration,
            referee: None,
        }
    }

    /// Attaches a referee identity (builder pattern).
    #[must_use]
    pub fn with_referee(mut self, referee: Digest) -> Self {
        self.referee = Some(referee);
        self
    }

    /// Total number of slots between acceptance and the finalize deadline.
    pub fn game_duration(&self) -> u32 {
        self.per_turn_duration
            .saturating_mul(Self::MAX_ATTEMPTS as u32)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
