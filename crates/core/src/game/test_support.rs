//! Shared fixtures for the `game` test suite: handcrafted levels and a game preloaded with one.

use super::*;
use crate::dungeon::{EnemySpawn, GeneratedLevel, PickupSpawn, TrapSpawn};

pub(super) const START: Pos = Pos { y: 1, x: 1 };

/// Walled rectangle with an open interior; the exit sits in the far corner.
pub(super) fn open_level(width: usize, height: usize) -> GeneratedLevel {
    let mut grid = Grid::filled(width, height, CellKind::Wall);
    for y in 1..(height - 1) {
        for x in 1..(width - 1) {
            grid.set(Pos { y: y as i32, x: x as i32 }, CellKind::Floor);
        }
    }
    GeneratedLevel {
        level_index: 0,
        grid,
        start_cell: START,
        exit_cell: Pos { y: height as i32 - 2, x: width as i32 - 2 },
        enemy_spawns: Vec::new(),
        trap_spawns: Vec::new(),
        pickup_spawns: Vec::new(),
        boss_present: false,
        dropped_placements: 0,
    }
}

pub(super) fn with_pickup(
    mut level: GeneratedLevel,
    kind: PickupKind,
    cell: Pos,
) -> GeneratedLevel {
    level.pickup_spawns.push(PickupSpawn { kind, cell });
    level
}

pub(super) fn with_enemy(
    mut level: GeneratedLevel,
    archetype: Archetype,
    cell: Pos,
) -> GeneratedLevel {
    if archetype == Archetype::Boss {
        level.boss_present = true;
    }
    level.enemy_spawns.push(EnemySpawn { archetype, cell });
    level
}

/// Trap whose oscillator is active for the first second after load.
pub(super) fn with_trap(mut level: GeneratedLevel, cell: Pos) -> GeneratedLevel {
    level.trap_spawns.push(TrapSpawn { cell, phase: 0.0 });
    level
}

pub(super) fn game_on(level: GeneratedLevel) -> Game {
    game_with_config(level, SimConfig::default())
}

pub(super) fn game_with_config(level: GeneratedLevel, config: SimConfig) -> Game {
    let mut game = Game::new(7, config).expect("default config is valid");
    game.install_level(level);
    game.drain_events();
    game
}

pub(super) fn idle() -> TickInput {
    TickInput::default()
}

pub(super) fn walk(move_x: f32, move_y: f32) -> TickInput {
    TickInput { move_x, move_y, ..TickInput::default() }
}

pub(super) fn place_player(game: &mut Game, cell: Pos) {
    game.player.pos = cell.center();
}
