//! Level life cycle and the per-tick simulation driver.
//! `Game` owns every piece of mutable state; renderers and audio read it between ticks.

use std::mem;

use slotmap::SlotMap;
use thiserror::Error;

use crate::ai::Enemy;
use crate::combat::{Player, Trap};
use crate::config::{ConfigError, SimConfig};
use crate::dungeon::{Grid, generate_level};
use crate::rng::{AI_STREAM, SimRng, derive_level_seed, mix_seed_stream};
use crate::types::*;
use crate::visibility::{ExploredMask, TORCH_MAX, sight_radius};

mod hash;
mod level_load;
mod tick;

#[cfg(test)]
mod test_support;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot continue the run while the level is {0:?}")]
    CannotContinue(LevelPhase),
}

/// Run-wide counters. Survive level advances; wiped on restart.
#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub level_index: u32,
    pub keys_held: u32,
    pub total_keys: u32,
    pub torch_fuel: f32,
    pub potions: u32,
    pub shields_collected: u32,
    pub coins: u32,
    pub kills: u32,
    pub levels_cleared: u32,
    pub boss_present: bool,
    /// Seconds spent on the current level.
    pub level_time: f32,
    pub survival_time: f32,
}

impl RunState {
    pub fn fresh() -> Self {
        Self {
            level_index: 0,
            keys_held: 0,
            total_keys: 0,
            torch_fuel: TORCH_MAX,
            potions: 0,
            shields_collected: 0,
            coins: 0,
            kills: 0,
            levels_cleared: 0,
            boss_present: false,
            level_time: 0.0,
            survival_time: 0.0,
        }
    }

    fn begin_level(&mut self, total_keys: u32, boss_present: bool) {
        self.keys_held = 0;
        self.total_keys = total_keys;
        self.boss_present = boss_present;
        self.level_time = 0.0;
    }

    fn advance_level(&mut self, fuel_bonus: f32) {
        self.level_index = self.level_index.saturating_add(1);
        self.torch_fuel = (self.torch_fuel + fuel_bonus).clamp(0.0, TORCH_MAX);
    }

    pub fn exit_unlocked(&self) -> bool {
        self.keys_held >= self.total_keys && !self.boss_present
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    /// Collected pickups stay listed so renderers can draw the empty slot.
    pub collected: bool,
}

/// Everything rebuilt from scratch on each level load.
pub struct Level {
    pub grid: Grid,
    pub explored: ExploredMask,
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub traps: Vec<Trap>,
    pub pickups: Vec<Pickup>,
    pub start: Pos,
    pub exit: Pos,
    /// Seconds since load; drives trap and flicker oscillators.
    pub elapsed: f32,
}

pub struct Game {
    seed: u64,
    attempt: u32,
    config: SimConfig,
    phase: LevelPhase,
    tick: u64,
    run: RunState,
    player: Player,
    level: Level,
    ai_rng: SimRng,
    events: Vec<GameEvent>,
    sight_radius: f32,
}

impl Game {
    pub fn new(seed: u64, config: SimConfig) -> Result<Self, GameError> {
        config.validate()?;
        let generated = generate_level(seed, 0, 0);
        let mut game = Self {
            seed,
            attempt: 0,
            phase: LevelPhase::Loading,
            tick: 0,
            run: RunState::fresh(),
            player: Player::new(generated.start_cell.center(), &config),
            level: Level::empty(),
            ai_rng: SimRng::seed_from_u64(mix_seed_stream(seed, AI_STREAM)),
            events: Vec::new(),
            sight_radius: sight_radius(TORCH_MAX, 0.0),
            config,
        };
        game.install_level(generated);
        Ok(game)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of restarts so far; each one reseeds level generation.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.level.grid
    }

    pub fn explored(&self) -> &ExploredMask {
        &self.level.explored
    }

    pub fn enemies(&self) -> &SlotMap<EnemyId, Enemy> {
        &self.level.enemies
    }

    pub fn traps(&self) -> &[Trap] {
        &self.level.traps
    }

    /// Whether `trap` is currently dealing damage.
    pub fn trap_is_active(&self, trap: &Trap) -> bool {
        trap.is_active(self.level.elapsed)
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.level.pickups
    }

    pub fn sight_radius(&self) -> f32 {
        self.sight_radius
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            level_reached: self.run.level_index,
            levels_cleared: self.run.levels_cleared,
            kills: self.run.kills,
            coins: self.run.coins,
            survival_time: self.run.survival_time,
        }
    }

    fn level_seed(&self) -> u64 {
        derive_level_seed(self.seed, self.attempt, self.run.level_index)
    }
}
