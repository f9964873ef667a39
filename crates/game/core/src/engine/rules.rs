//! Turn-sequencing rules shared by the contract path and the step programs.

use super::EngineError;
use crate::combination::Combination;
use crate::config::GameConfig;
use crate::packing::GuessHistory;
use crate::state::Role;

/// Codebreaker acts on odd turns below `2 * MAX_ATTEMPTS`.
pub const fn codebreaker_may_act(turn_count: u8) -> bool {
    turn_count % 2 == 1 && turn_count < GameConfig::MAX_TURN
}

/// Codemaster acts on even, non-zero turns up to `2 * MAX_ATTEMPTS`.
pub const fn codemaster_may_act(turn_count: u8) -> bool {
    turn_count % 2 == 0 && turn_count > 0 && turn_count <= GameConfig::MAX_TURN
}

pub fn ensure_turn(turn_count: u8, actor: Role) -> Result<(), EngineError> {
    let allowed = match actor {
        Role::Codebreaker => codebreaker_may_act(turn_count),
        Role::Codemaster => codemaster_may_act(turn_count),
    };
    if allowed {
        Ok(())
    } else {
        Err(EngineError::TurnSequenceViolation { turn_count, actor })
    }
}

/// History slot written by a guess at `turn_count` (odd).
pub const fn guess_slot(turn_count: u8) -> usize {
    (turn_count / 2) as usize
}

/// History slot answered by a clue at `turn_count` (even).
pub const fn clue_slot(turn_count: u8) -> usize {
    (turn_count / 2) as usize - 1
}

/// Reads the guess a clue at `turn_count` must answer.
pub fn pending_guess(history: &GuessHistory, turn_count: u8) -> Result<Combination, EngineError> {
    let record = history.get(clue_slot(turn_count))?;
    Ok(Combination::from_record(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_table() {
        for turn in 0u8..=20 {
            assert_eq!(codebreaker_may_act(turn), turn % 2 == 1 && turn < 14);
            assert_eq!(
                codemaster_may_act(turn),
                turn % 2 == 0 && turn > 0 && turn <= 14
            );
            assert!(!(codebreaker_may_act(turn) && codemaster_may_act(turn)));
        }
    }

    #[test]
    fn slots_follow_turns() {
        assert_eq!(guess_slot(1), 0);
        assert_eq!(clue_slot(2), 0);
        assert_eq!(guess_slot(13), 6);
        assert_eq!(clue_slot(14), 6);
    }

    #[test]
    fn ensure_turn_reports_actor() {
        assert_eq!(
            ensure_turn(2, Role::Codebreaker),
            Err(EngineError::TurnSequenceViolation {
                turn_count: 2,
                actor: Role::Codebreaker
            })
        );
        assert!(ensure_turn(2, Role::Codemaster).is_ok());
        assert!(ensure_turn(0, Role::Codemaster).is_err());
    }
}
