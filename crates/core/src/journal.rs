use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::types::TickInput;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

/// Seed, config and every accepted input of a run; enough to rebuild it exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub seed: u64,
    pub config: SimConfig,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub payload: InputPayload,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputPayload {
    Tick { dt: f32, input: TickInput },
    Continue,
    Restart,
}

impl InputPayload {
    /// Replaces values JSON cannot carry with the ones `Game::tick` would read them as:
    /// a non-finite or negative `dt` is 0, a non-finite stick is centered.
    pub fn sanitized(&self) -> Self {
        let Self::Tick { dt, input } = self else {
            return self.clone();
        };
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut input = *input;
        if !input.move_x.is_finite() || !input.move_y.is_finite() {
            input.move_x = 0.0;
            input.move_y = 0.0;
        }
        Self::Tick { dt, input }
    }
}

impl InputJournal {
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: "dev".to_string(),
            seed,
            config,
            inputs: Vec::new(),
        }
    }

    pub fn next_seq(&self) -> u64 {
        self.inputs.len() as u64
    }

    pub fn append(&mut self, payload: InputPayload) {
        let seq = self.next_seq();
        self.inputs.push(InputRecord { seq, payload: payload.sanitized() });
    }

    pub fn append_tick(&mut self, dt: f32, input: TickInput) {
        self.append(InputPayload::Tick { dt, input });
    }

    pub fn append_continue(&mut self) {
        self.append(InputPayload::Continue);
    }

    pub fn append_restart(&mut self) {
        self.append(InputPayload::Restart);
    }

    pub fn tick_count(&self) -> usize {
        self.inputs
            .iter()
            .filter(|record| matches!(record.payload, InputPayload::Tick { .. }))
            .count()
    }
}
