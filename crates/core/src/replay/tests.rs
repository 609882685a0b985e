use super::*;
use crate::config::SimConfig;
use crate::types::TickInput;

const TEST_TICKS: usize = 900;
const TEST_DT: f32 = 1.0 / 60.0;

/// Deterministic zig-zag walker that swings often and sprints in bursts.
fn scripted_input(step: usize) -> TickInput {
    let leg = (step / 45) % 4;
    let (move_x, move_y) = match leg {
        0 => (1.0, 0.0),
        1 => (0.0, 1.0),
        2 => (1.0, 1.0),
        _ => (-1.0, 0.0),
    };
    TickInput {
        move_x,
        move_y,
        sprint: step % 120 < 30,
        attack: step % 7 == 0,
        use_potion: step % 300 == 299,
    }
}

/// Plays the run live while journaling every input, continuing whenever a level ends.
fn play_and_record(seed: u64, config: SimConfig) -> (Game, InputJournal) {
    let mut game = Game::new(seed, config.clone()).unwrap();
    let mut journal = InputJournal::new(seed, config);
    for step in 0..TEST_TICKS {
        match game.phase() {
            LevelPhase::LevelComplete | LevelPhase::GameOver => {
                game.continue_run().unwrap();
                journal.append_continue();
            }
            _ => {
                let input = scripted_input(step);
                game.tick(TEST_DT, &input);
                journal.append_tick(TEST_DT, input);
            }
        }
    }
    (game, journal)
}

#[test]
fn replay_matches_live_run() {
    let (game, journal) = play_and_record(777, SimConfig::default());

    let result = replay_to_end(&journal).unwrap();

    assert_eq!(result.final_snapshot_hash, game.snapshot_hash());
    assert_eq!(result.final_tick, game.current_tick());
    assert_eq!(result.final_phase, game.phase());
    assert_eq!(result.summary, game.summary());
}

#[test]
fn replay_honours_journaled_config() {
    let hard = SimConfig { difficulty: 2.0, ..SimConfig::default() };
    let (hard_game, hard_journal) = play_and_record(31, hard);

    let hard_result = replay_to_end(&hard_journal).unwrap();

    assert_eq!(hard_journal.config.difficulty, 2.0);
    assert_eq!(hard_result.final_snapshot_hash, hard_game.snapshot_hash());
    assert_eq!(hard_result.summary, hard_game.summary());
}

#[test]
fn replay_includes_restarts() {
    let mut game = Game::new(5, SimConfig::default()).unwrap();
    let mut journal = InputJournal::new(5, SimConfig::default());
    for step in 0..120 {
        let input = scripted_input(step);
        game.tick(TEST_DT, &input);
        journal.append_tick(TEST_DT, input);
    }
    game.restart();
    journal.append_restart();
    for step in 0..60 {
        let input = scripted_input(step);
        game.tick(TEST_DT, &input);
        journal.append_tick(TEST_DT, input);
    }

    let result = replay_to_end(&journal).unwrap();

    assert_eq!(game.attempt(), 1);
    assert_eq!(result.final_snapshot_hash, game.snapshot_hash());
}

#[test]
fn empty_journal_replays_to_fresh_level() {
    let journal = InputJournal::new(12, SimConfig::default());
    let fresh = Game::new(12, SimConfig::default()).unwrap();

    let result = replay_to_end(&journal).unwrap();

    assert_eq!(result.final_tick, 0);
    assert_eq!(result.final_phase, LevelPhase::Playing);
    assert_eq!(result.final_snapshot_hash, fresh.snapshot_hash());
}

#[test]
fn unsupported_version_is_rejected() {
    let mut journal = InputJournal::new(1, SimConfig::default());
    journal.format_version = JOURNAL_FORMAT_VERSION + 1;

    let result = replay_to_end(&journal);

    assert!(matches!(
        result,
        Err(ReplayError::UnsupportedVersion { found, expected })
            if found == JOURNAL_FORMAT_VERSION + 1 && expected == JOURNAL_FORMAT_VERSION
    ));
}

#[test]
fn out_of_order_records_are_rejected() {
    let mut journal = InputJournal::new(1, SimConfig::default());
    journal.append_tick(TEST_DT, TickInput::default());
    journal.append_tick(TEST_DT, TickInput::default());
    journal.inputs[1].seq = 5;

    let result = replay_to_end(&journal);

    assert!(matches!(result, Err(ReplayError::OutOfOrder { seq: 5, expected: 1 })));
}

#[test]
fn continue_during_play_fails_replay() {
    let mut journal = InputJournal::new(1, SimConfig::default());
    journal.append_tick(TEST_DT, TickInput::default());
    journal.append_continue();

    let result = replay_to_end(&journal);

    assert!(matches!(
        result,
        Err(ReplayError::Game(GameError::CannotContinue(LevelPhase::Playing)))
    ));
}

#[test]
fn invalid_journaled_config_fails_replay() {
    let journal = InputJournal::new(1, SimConfig { max_dt: 0.0, ..SimConfig::default() });

    assert!(matches!(replay_to_end(&journal), Err(ReplayError::Game(GameError::Config(_)))));
}
