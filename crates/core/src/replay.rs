use thiserror::Error;

use crate::game::{Game, GameError};
use crate::journal::{InputJournal, InputPayload, JOURNAL_FORMAT_VERSION};
use crate::types::{LevelPhase, RunSummary};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("journal format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("journal record out of order: found seq {seq}, expected {expected}")]
    OutOfOrder { seq: u64, expected: u64 },
}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    pub final_phase: LevelPhase,
    pub final_snapshot_hash: u64,
    pub final_tick: u64,
    pub summary: RunSummary,
}

/// Feeds one journaled input to a live game.
pub fn apply_input(game: &mut Game, payload: &InputPayload) -> Result<(), GameError> {
    match payload {
        InputPayload::Tick { dt, input } => {
            game.tick(*dt, input);
        }
        InputPayload::Continue => {
            game.continue_run()?;
        }
        InputPayload::Restart => game.restart(),
    }
    Ok(())
}

/// Rebuilds a run from its journal and reports where it ended up.
pub fn replay_to_end(journal: &InputJournal) -> Result<ReplayResult, ReplayError> {
    if journal.format_version != JOURNAL_FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion {
            found: journal.format_version,
            expected: JOURNAL_FORMAT_VERSION,
        });
    }

    let mut game = Game::new(journal.seed, journal.config.clone())?;
    for (expected, record) in (0_u64..).zip(&journal.inputs) {
        if record.seq != expected {
            return Err(ReplayError::OutOfOrder { seq: record.seq, expected });
        }
        apply_input(&mut game, &record.payload)?;
    }

    log::debug!(
        "replayed {} inputs for seed {}: phase {:?} at tick {}",
        journal.inputs.len(),
        journal.seed,
        game.phase(),
        game.current_tick()
    );

    Ok(ReplayResult {
        final_phase: game.phase(),
        final_snapshot_hash: game.snapshot_hash(),
        final_tick: game.current_tick(),
        summary: game.summary(),
    })
}

#[cfg(test)]
mod tests;
