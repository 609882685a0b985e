use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use game_core::combat::PLAYER_HALF_EXTENT;
use game_core::visibility::TORCH_MAX;
use game_core::{
    Archetype, Game, InputJournal, InputPayload, JournalWriter, LevelPhase, SimConfig, TickInput,
    replay::apply_input,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,
    /// Overrides the difficulty from the config file
    #[arg(short, long)]
    difficulty: Option<f32>,
    /// TOML file with simulation tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Writes every input the bot sends to a hash-chained JSONL journal
    #[arg(long)]
    journal_out: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            SimConfig::from_toml_str(&text)?
        }
        None => SimConfig::default(),
    };
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    Ok(config)
}

fn random_input(rng: &mut ChaCha8Rng) -> TickInput {
    let axis = |roll: u64| (roll % 3) as f32 - 1.0;
    TickInput {
        move_x: axis(rng.next_u64()),
        move_y: axis(rng.next_u64()),
        // Bias to walking
        sprint: rng.next_u64() % 5 == 0,
        attack: rng.next_u64() % 3 == 0,
        use_potion: rng.next_u64() % 150 == 0,
    }
}

fn check_invariants(game: &Game, explored_before: usize) -> Result<()> {
    let player = game.player();
    ensure!((0.0..=player.max_hp).contains(&player.hp), "Invariant failed: HP {}", player.hp);
    ensure!(
        (0.0..=player.shield_cap).contains(&player.shield),
        "Invariant failed: shield {}",
        player.shield
    );
    ensure!(
        (0.0..=TORCH_MAX).contains(&game.run().torch_fuel),
        "Invariant failed: torch fuel {}",
        game.run().torch_fuel
    );
    ensure!(
        game.grid().box_is_clear(player.pos, PLAYER_HALF_EXTENT),
        "Invariant failed: player inside wall at {:?}",
        player.pos
    );
    ensure!(
        game.explored().explored_count() >= explored_before,
        "Invariant failed: explored mask shrank within a level"
    );
    for (_, enemy) in game.enemies() {
        ensure!(enemy.hp <= enemy.max_hp, "Invariant failed: enemy HP > Max HP");
        ensure!(
            enemy.archetype == Archetype::Phase || !game.grid().is_wall_at(enemy.pos),
            "Invariant failed: {:?} inside wall",
            enemy.archetype
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    println!("Starting Fuzz harness on seed {} for max {} ticks...", args.seed, args.ticks);
    let mut game = Game::new(args.seed, config.clone())?;
    let mut writer = match &args.journal_out {
        Some(path) => Some(
            JournalWriter::create(path, &InputJournal::new(args.seed, config))
                .with_context(|| format!("Failed to create journal: {}", path.display()))?,
        ),
        None => None,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut deaths = 0_u32;
    let mut explored_before = game.explored().explored_count();
    while game.current_tick() < u64::from(args.ticks) {
        let payload = match game.phase() {
            LevelPhase::Playing => {
                let dt = (rng.next_u64() % 50) as f32 / 1000.0;
                InputPayload::Tick { dt, input: random_input(&mut rng) }
            }
            LevelPhase::GameOver => {
                deaths += 1;
                InputPayload::Continue
            }
            LevelPhase::LevelComplete => InputPayload::Continue,
            LevelPhase::Loading => bail!("Invariant failed: stuck in Loading"),
        };
        apply_input(&mut game, &payload)?;
        if let Some(writer) = writer.as_mut() {
            writer.append(&payload)?;
        }
        if payload == InputPayload::Continue {
            explored_before = 0;
        }
        check_invariants(&game, explored_before)?;
        explored_before = game.explored().explored_count();
    }

    let summary = game.summary();
    println!(
        "Fuzzing completed successfully: level {}, {} cleared, {} kills, {} deaths.",
        summary.level_reached, summary.levels_cleared, summary.kills, deaths
    );
    println!("Snapshot Hash: {}", game.snapshot_hash());
    Ok(())
}
