use torchlight_core::dungeon::{EnemySpawn, PickupSpawn, level_dimensions};
use torchlight_core::{
    Archetype, CellKind, Game, GameError, GameEvent, GeneratedLevel, Grid, LevelPhase, PickupKind,
    Pos, SimConfig, TickInput,
};

const DT: f32 = 0.05;
const START: Pos = Pos { y: 1, x: 1 };

/// One-row corridor from the start cell to an exit eight cells east.
fn corridor() -> GeneratedLevel {
    let mut grid = Grid::filled(10, 3, CellKind::Wall);
    for x in 1..9 {
        grid.set(Pos { y: 1, x }, CellKind::Floor);
    }
    GeneratedLevel {
        level_index: 0,
        grid,
        start_cell: START,
        exit_cell: Pos { y: 1, x: 8 },
        enemy_spawns: Vec::new(),
        trap_spawns: Vec::new(),
        pickup_spawns: Vec::new(),
        boss_present: false,
        dropped_placements: 0,
    }
}

fn game_on(level: GeneratedLevel) -> Game {
    let mut game = Game::new(2024, SimConfig::default()).expect("default config is valid");
    game.install_level(level);
    game.drain_events();
    game
}

fn east() -> TickInput {
    TickInput { move_x: 1.0, ..TickInput::default() }
}

fn run_until(game: &mut Game, input: TickInput, max_ticks: usize, phase: LevelPhase) -> bool {
    for _ in 0..max_ticks {
        game.tick(DT, &input);
        if game.phase() == phase {
            return true;
        }
    }
    false
}

#[test]
fn walking_the_corridor_collects_key_and_clears_level() {
    let mut level = corridor();
    level.pickup_spawns.push(PickupSpawn { kind: PickupKind::Key, cell: Pos { y: 1, x: 4 } });
    let mut game = game_on(level);
    assert_eq!(game.run().total_keys, 1);

    assert!(run_until(&mut game, east(), 200, LevelPhase::LevelComplete));

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::KeyCollected { held: 1, required: 1 }));
    assert!(events.contains(&GameEvent::LevelComplete { level: 0 }));
    assert_eq!(game.run().levels_cleared, 1);
}

#[test]
fn continue_after_clear_loads_a_larger_generated_level() {
    let mut game = game_on(corridor());
    assert!(run_until(&mut game, east(), 200, LevelPhase::LevelComplete));
    game.drain_events();

    assert_eq!(game.continue_run().unwrap(), LevelPhase::Playing);

    let (width, height) = level_dimensions(1);
    assert_eq!(game.run().level_index, 1);
    assert_eq!((game.grid().width(), game.grid().height()), (width, height));
    assert_eq!(game.player().pos, game.level().start.center());
    let loaded = game.drain_events();
    assert!(matches!(loaded.as_slice(), [GameEvent::LevelLoaded { level: 1, .. }]));
}

#[test]
fn lurker_kills_idle_player_and_continue_restarts_the_run() {
    let mut level = corridor();
    level.enemy_spawns.push(EnemySpawn { archetype: Archetype::Lurker, cell: Pos { y: 1, x: 2 } });
    let mut game = game_on(level);

    assert!(run_until(&mut game, TickInput::default(), 2000, LevelPhase::GameOver));
    assert!(game.player().is_dead());
    assert!(game.drain_events().contains(&GameEvent::PlayerDied { level: 0 }));

    let frozen_tick = game.current_tick();
    let result = game.tick(DT, &east());
    assert_eq!(result.simulated_dt, 0.0);
    assert_eq!(game.current_tick(), frozen_tick);

    assert_eq!(game.continue_run().unwrap(), LevelPhase::Playing);
    assert_eq!(game.attempt(), 1);
    assert_eq!(game.run().level_index, 0);
    assert_eq!(game.player().hp, game.player().max_hp);
}

#[test]
fn continue_is_rejected_while_playing() {
    let mut game = game_on(corridor());

    let err = game.continue_run().unwrap_err();

    assert!(matches!(err, GameError::CannotContinue(LevelPhase::Playing)));
    assert_eq!(game.phase(), LevelPhase::Playing);
}

#[test]
fn restart_generates_a_different_first_level() {
    let mut game = Game::new(99, SimConfig::default()).unwrap();
    let first_layout = game.grid().clone();

    game.restart();

    assert_eq!(game.attempt(), 1);
    assert_eq!(game.run().level_index, 0);
    assert_ne!(game.grid(), &first_layout);
}

#[test]
fn invalid_toml_config_is_rejected() {
    let err = SimConfig::from_toml_str("difficulty = -1.0").unwrap_err();
    assert!(err.to_string().contains("difficulty"));

    let config = SimConfig::from_toml_str("difficulty = 1.5\nmax_dt = 0.1").unwrap();
    assert_eq!(config.difficulty, 1.5);
    assert_eq!(config.max_dt, 0.1);
}
