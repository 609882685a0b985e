//! Level installation and the transitions between levels and runs.

use super::*;
use crate::dungeon::GeneratedLevel;
use crate::visibility::mark_explored;

impl Level {
    pub(super) fn empty() -> Self {
        Self {
            grid: Grid::filled(0, 0, CellKind::Wall),
            explored: ExploredMask::new(0, 0),
            enemies: SlotMap::with_key(),
            traps: Vec::new(),
            pickups: Vec::new(),
            start: Pos { y: 0, x: 0 },
            exit: Pos { y: 0, x: 0 },
            elapsed: 0.0,
        }
    }
}

impl Game {
    /// Replaces the current level with `generated`, keeping run-wide stats.
    ///
    /// Normal play reaches this through level loads; tools and tests may hand in
    /// a prebuilt level directly.
    pub fn install_level(&mut self, generated: GeneratedLevel) {
        self.phase = LevelPhase::Loading;
        self.ai_rng = SimRng::seed_from_u64(mix_seed_stream(self.level_seed(), AI_STREAM));

        let mut enemies = SlotMap::with_key();
        for spawn in &generated.enemy_spawns {
            enemies.insert(Enemy::spawn(spawn.archetype, spawn.cell, &mut self.ai_rng));
        }
        let traps = generated
            .trap_spawns
            .iter()
            .map(|spawn| Trap { pos: spawn.cell.center(), phase: spawn.phase })
            .collect();
        let pickups = generated
            .pickup_spawns
            .iter()
            .map(|spawn| Pickup { kind: spawn.kind, pos: spawn.cell.center(), collected: false })
            .collect();

        let total_keys = generated.key_count() as u32;
        self.run.begin_level(total_keys, generated.boss_present);
        self.player.pos = generated.start_cell.center();
        self.player.invincibility = 0.0;
        self.player.attack_cooldown = 0.0;

        let mut explored = ExploredMask::for_grid(&generated.grid);
        mark_explored(&mut explored, generated.start_cell);
        self.level = Level {
            grid: generated.grid,
            explored,
            enemies,
            traps,
            pickups,
            start: generated.start_cell,
            exit: generated.exit_cell,
            elapsed: 0.0,
        };
        self.sight_radius = sight_radius(self.run.torch_fuel, 0.0);

        log::info!(
            "loaded level {} (attempt {}): {} keys, {} enemies, boss={}",
            generated.level_index,
            self.attempt,
            total_keys,
            self.level.enemies.len(),
            generated.boss_present
        );
        self.events.push(GameEvent::LevelLoaded {
            level: self.run.level_index,
            keys_required: total_keys,
            boss_present: generated.boss_present,
        });
        self.phase = LevelPhase::Playing;
    }

    /// Leaves a finished level: the next level after a clear, a fresh run after death.
    pub fn continue_run(&mut self) -> Result<LevelPhase, GameError> {
        match self.phase {
            LevelPhase::LevelComplete => {
                self.run.advance_level(self.config.level_fuel_bonus);
                self.player.heal(self.config.level_heal_bonus);
                log::debug!("advancing to level {}", self.run.level_index);
                self.load_current_level();
                Ok(self.phase)
            }
            LevelPhase::GameOver => {
                self.restart();
                Ok(self.phase)
            }
            phase => Err(GameError::CannotContinue(phase)),
        }
    }

    /// Discards the run and starts over at level 0 with a new layout.
    pub fn restart(&mut self) {
        self.attempt = self.attempt.wrapping_add(1);
        self.run = RunState::fresh();
        self.player = Player::new(self.player.pos, &self.config);
        log::debug!("restarting run, attempt {}", self.attempt);
        self.load_current_level();
    }

    fn load_current_level(&mut self) {
        self.phase = LevelPhase::Loading;
        let generated = generate_level(self.seed, self.attempt, self.run.level_index);
        self.install_level(generated);
    }
}
