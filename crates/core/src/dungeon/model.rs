//! Public data models for generated levels and their spawn lists.

use crate::types::{Archetype, CellKind, PickupKind, Pos};

use super::grid::Grid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    pub archetype: Archetype,
    pub cell: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrapSpawn {
    pub cell: Pos,
    pub phase: f32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickupSpawn {
    pub kind: PickupKind,
    pub cell: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLevel {
    pub level_index: u32,
    pub grid: Grid,
    pub start_cell: Pos,
    pub exit_cell: Pos,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub trap_spawns: Vec<TrapSpawn>,
    pub pickup_spawns: Vec<PickupSpawn>,
    pub boss_present: bool,
    /// Placements abandoned because the retry budget ran out.
    pub dropped_placements: usize,
}

impl GeneratedLevel {
    pub fn key_count(&self) -> usize {
        self.pickup_spawns.iter().filter(|spawn| spawn.kind == PickupKind::Key).count()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.level_index.to_le_bytes());
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        for cell in self.grid.cells() {
            bytes.push(match cell {
                CellKind::Floor => 0,
                CellKind::Wall => 1,
                CellKind::Key => 2,
                CellKind::Exit => 3,
            });
        }
        for pos in [self.start_cell, self.exit_cell] {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }

        bytes.extend((self.enemy_spawns.len() as u32).to_le_bytes());
        for spawn in &self.enemy_spawns {
            bytes.push(archetype_code(spawn.archetype));
            bytes.extend(spawn.cell.y.to_le_bytes());
            bytes.extend(spawn.cell.x.to_le_bytes());
        }

        bytes.extend((self.trap_spawns.len() as u32).to_le_bytes());
        for spawn in &self.trap_spawns {
            bytes.extend(spawn.cell.y.to_le_bytes());
            bytes.extend(spawn.cell.x.to_le_bytes());
            bytes.extend(spawn.phase.to_bits().to_le_bytes());
        }

        bytes.extend((self.pickup_spawns.len() as u32).to_le_bytes());
        for spawn in &self.pickup_spawns {
            bytes.push(match spawn.kind {
                PickupKind::Key => 0,
                PickupKind::Torch => 1,
                PickupKind::Potion => 2,
                PickupKind::Shield => 3,
            });
            bytes.extend(spawn.cell.y.to_le_bytes());
            bytes.extend(spawn.cell.x.to_le_bytes());
        }
        bytes.push(u8::from(self.boss_present));

        bytes
    }
}

fn archetype_code(archetype: Archetype) -> u8 {
    match archetype {
        Archetype::Patrol => 0,
        Archetype::Ambush => 1,
        Archetype::Phase => 2,
        Archetype::Lurker => 3,
        Archetype::Screamer => 4,
        Archetype::Boss => 5,
    }
}
