use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{InputJournal, ReplayResult, load_journal_from_file, replay::replay_to_end};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal to replay (hash-chained JSONL by default)
    #[arg(short, long)]
    journal: PathBuf,
    /// Treat the journal as a single JSON document instead of JSONL
    #[arg(long)]
    plain_json: bool,
}

fn read_journal(args: &Args) -> Result<InputJournal> {
    if args.plain_json {
        let journal_data = fs::read_to_string(&args.journal)
            .with_context(|| format!("Failed to read journal file: {}", args.journal.display()))?;
        return serde_json::from_str(&journal_data)
            .with_context(|| "Failed to deserialize journal JSON");
    }
    load_journal_from_file(&args.journal)
        .with_context(|| format!("Failed to load journal: {}", args.journal.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let journal = read_journal(&args)?;
    log::info!("replaying {} inputs for seed {}", journal.inputs.len(), journal.seed);

    let result: ReplayResult =
        replay_to_end(&journal).context("Replay failed during execution")?;

    println!("Replay complete.");
    println!("Final Tick: {}", result.final_tick);
    println!("Phase: {:?}", result.final_phase);
    println!(
        "Level reached: {} (cleared {}), kills {}, coins {}, survived {:.1}s",
        result.summary.level_reached,
        result.summary.levels_cleared,
        result.summary.kills,
        result.summary.coins,
        result.summary.survival_time
    );
    println!("Snapshot Hash: {}", result.final_snapshot_hash);

    Ok(())
}
