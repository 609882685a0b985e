//! Procedural level generation split into coherent submodules.

pub mod grid;
pub mod model;
pub mod progression;

mod generator;
mod maze;
mod placement;

pub use generator::DungeonGenerator;
pub use grid::{Grid, manhattan};
pub use model::{EnemySpawn, GeneratedLevel, PickupSpawn, TrapSpawn};
pub use progression::{PlacementQuota, level_dimensions, placement_quota};

use crate::rng::{SimRng, derive_level_seed};

pub fn generate_level(run_seed: u64, attempt: u32, level_index: u32) -> GeneratedLevel {
    let mut rng = SimRng::seed_from_u64(derive_level_seed(run_seed, attempt, level_index));
    DungeonGenerator::default().generate(level_index, &mut rng)
}
