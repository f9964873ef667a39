//! Client configuration structures and loaders.
use std::env;

use mastermind_core::{GameConfig, Salt};

/// Scripted game parameters.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Codemaster secret as a four-digit decimal.
    pub secret: u32,
    pub salt: Salt,
    /// Codebreaker guesses in play order.
    pub guesses: Vec<u32>,
    pub reward: u64,
    pub turn_duration: u32,
    pub output_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            secret: 1234,
            salt: Salt::new([0x5A; 32]),
            guesses: vec![1567, 2134, 1234],
            reward: 100,
            turn_duration: GameConfig::DEFAULT_PER_TURN_DURATION,
            output_json: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MASTERMIND_SECRET` - Codemaster secret (default: 1234)
    /// - `MASTERMIND_SALT` - 32-byte hex salt (default: 0x5a repeated)
    /// - `MASTERMIND_GUESSES` - Comma-separated guesses (default: "1567,2134,1234")
    /// - `MASTERMIND_REWARD` - Stake per player (default: 100)
    /// - `MASTERMIND_TURN_DURATION` - Slots per turn (default: 10)
    /// - `MASTERMIND_OUTPUT_JSON` - Print the report as JSON (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secret) = read_env::<u32>("MASTERMIND_SECRET") {
            config.secret = secret;
        }

        if let Some(salt) = env::var("MASTERMIND_SALT").ok().and_then(|raw| parse_salt(&raw)) {
            config.salt = salt;
        } else if env::var("MASTERMIND_SALT").is_ok() {
            tracing::warn!("MASTERMIND_SALT is not 32 hex bytes, using default salt");
        }

        if let Ok(raw) = env::var("MASTERMIND_GUESSES") {
            match parse_guesses(&raw) {
                Some(guesses) => config.guesses = guesses,
                None => tracing::warn!("MASTERMIND_GUESSES is malformed, using default guesses"),
            }
        }

        if let Some(reward) = read_env::<u64>("MASTERMIND_REWARD") {
            config.reward = reward;
        }

        if let Some(duration) = read_env::<u32>("MASTERMIND_TURN_DURATION") {
            config.turn_duration = duration.max(1);
        }

        if let Some(enable) = read_env::<bool>("MASTERMIND_OUTPUT_JSON") {
            config.output_json = enable;
        } else if env::var("MASTERMIND_OUTPUT_JSON").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.output_json = true;
        }

        config
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::with_per_turn_duration(self.turn_duration)
    }
}

fn parse_guesses(raw: &str) -> Option<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse().ok())
        .collect()
}

fn parse_salt(raw: &str) -> Option<Salt> {
    let bytes: [u8; 32] = hex::decode(raw.trim()).ok()?.try_into().ok()?;
    Some(Salt::new(bytes))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
