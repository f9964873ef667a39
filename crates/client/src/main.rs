//! Mastermind client binary.
//!
//! Plays a scripted game between a codemaster and a codebreaker entirely
//! off-ledger through the step chain, settles the finished chain on the
//! contract model in one call, and claims the reward for the winner.
//!
//! # Examples
//!
//! ```bash
//! # Default script (solved on the third guess)
//! cargo run -p mastermind-client
//!
//! # Custom script with JSON output
//! MASTERMIND_GUESSES=5671,2143,4321 MASTERMIND_OUTPUT_JSON=1 cargo run -p mastermind-client
//! ```

mod config;
mod session;

use anyhow::Result;
use config::ClientConfig;
use session::{Session, SessionReport};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[cfg(not(feature = "stub-backend"))]
compile_error!("A proving backend feature must be enabled (stub-backend)");

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = ClientConfig::from_env();
    tracing::info!(
        guesses = config.guesses.len(),
        reward = config.reward,
        turn_duration = config.turn_duration,
        "Starting scripted game"
    );

    let output_json = config.output_json;
    let report = Session::new(config).run()?;

    if output_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Logs to stderr so stdout carries only the report.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_report(report: &SessionReport) {
    for (index, round) in report.rounds.iter().enumerate() {
        println!("round {}: guess {} clue {:?}", index + 1, round.guess, round.clue);
    }
    println!(
        "settled {} steps at turn {}",
        report.steps, report.settlement.turn_count
    );
    match (&report.settlement.outcome, &report.settlement.winner) {
        (Some(outcome), Some(winner)) => println!("outcome: {outcome:?}, winner: {winner}"),
        _ => println!("outcome: undecided"),
    }
    if let Some(claim) = &report.claim {
        println!("reward {} paid to {}", claim.amount, claim.recipient);
    }
    println!(
        "stored words: turn={} reward={:#x} guesses={:#x} clues={:#x}",
        report.storage.turn_word,
        report.storage.reward_word,
        report.storage.guess_history,
        report.storage.clue_history
    );
}
