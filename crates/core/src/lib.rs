pub mod ai;
pub mod combat;
pub mod config;
pub mod dungeon;
pub mod game;
pub mod journal;
pub mod journal_file;
pub mod replay;
pub mod rng;
pub mod types;
pub mod visibility;

pub use config::{ConfigError, SimConfig};
pub use dungeon::{DungeonGenerator, GeneratedLevel, Grid, generate_level};
pub use game::{Game, GameError, Level, Pickup, RunState};
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use journal_file::{
    JournalLoadError, JournalWriter, load_journal_from_file, save_journal_to_file,
};
pub use replay::*;
pub use types::*;
