//! Level generation orchestration: carve, repair, pick the exit, then place and consume markers.

use crate::rng::SimRng;
use crate::types::{Archetype, CellKind, Pos};

use super::grid::{Grid, farthest_floor_from};
use super::maze::{carve_backtracker, open_loops};
use super::model::GeneratedLevel;
use super::placement::{MarkerLayer, consume_markers, pending_placements, place_pending};
use super::progression::{level_dimensions, placement_quota};

const DEFAULT_PLACEMENT_BUDGET: usize = 500;
const START_CELL: Pos = Pos { y: 1, x: 1 };

pub struct DungeonGenerator {
    placement_budget: usize,
}

impl Default for DungeonGenerator {
    fn default() -> Self {
        Self { placement_budget: DEFAULT_PLACEMENT_BUDGET }
    }
}

impl DungeonGenerator {
    pub fn with_placement_budget(placement_budget: usize) -> Self {
        Self { placement_budget }
    }

    pub fn generate(&self, level_index: u32, rng: &mut SimRng) -> GeneratedLevel {
        let (width, height) = level_dimensions(level_index);
        let mut grid = Grid::filled(width, height, CellKind::Wall);

        carve_backtracker(&mut grid, START_CELL, rng);
        let opened = open_loops(&mut grid, rng, width * height / 8);

        let exit_cell = farthest_floor_from(&grid, START_CELL);
        grid.set(exit_cell, CellKind::Exit);

        let quota = placement_quota(level_index);
        let pending = pending_placements(&quota, level_index, rng);
        let mut layer = MarkerLayer::new(width, height);
        let report =
            place_pending(&mut grid, &mut layer, START_CELL, &pending, rng, self.placement_budget);
        if report.dropped > 0 {
            log::warn!(
                "level {level_index}: placement budget exhausted, dropped {} of {} items",
                report.dropped,
                pending.len()
            );
        }

        let consumed = consume_markers(&mut grid, &layer, rng);
        let boss_present =
            consumed.enemy_spawns.iter().any(|spawn| spawn.archetype == Archetype::Boss);
        log::debug!(
            "level {level_index}: {width}x{height}, {opened} loops opened, {} keys, {} enemies",
            consumed.key_markers,
            consumed.enemy_spawns.len()
        );

        GeneratedLevel {
            level_index,
            grid,
            start_cell: START_CELL,
            exit_cell,
            enemy_spawns: consumed.enemy_spawns,
            trap_spawns: consumed.trap_spawns,
            pickup_spawns: consumed.pickup_spawns,
            boss_present,
            dropped_placements: report.dropped,
        }
    }
}
