//! Rejection-sampled marker placement and the pass that consumes markers into spawns.

use std::iter;

use crate::rng::SimRng;
use crate::types::{Archetype, CellKind, PickupKind, Pos};

use super::grid::{Grid, manhattan};
use super::model::{EnemySpawn, PickupSpawn, TrapSpawn};
use super::progression::{PlacementQuota, pick_archetype};

/// Hostile markers keep at least this Manhattan distance from the start cell.
const SAFE_SPAWN_DISTANCE: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Pending {
    Key,
    Enemy(Archetype),
    Trap,
    Item(PickupKind),
}

impl Pending {
    fn is_hostile(self) -> bool {
        matches!(self, Pending::Enemy(_) | Pending::Trap)
    }
}

pub(super) struct MarkerLayer {
    width: usize,
    markers: Vec<Option<Pending>>,
}

impl MarkerLayer {
    pub(super) fn new(width: usize, height: usize) -> Self {
        Self { width, markers: vec![None; width * height] }
    }

    fn get(&self, pos: Pos) -> Option<Pending> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width {
            return None;
        }
        self.markers.get(pos.y as usize * self.width + pos.x as usize).copied().flatten()
    }

    fn set(&mut self, pos: Pos, marker: Pending) {
        let idx = pos.y as usize * self.width + pos.x as usize;
        if let Some(slot) = self.markers.get_mut(idx) {
            *slot = Some(marker);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct PlacementReport {
    pub(super) placed: usize,
    pub(super) dropped: usize,
}

#[derive(Debug, Default)]
pub(super) struct ConsumedMarkers {
    pub(super) enemy_spawns: Vec<EnemySpawn>,
    pub(super) trap_spawns: Vec<TrapSpawn>,
    pub(super) pickup_spawns: Vec<PickupSpawn>,
    pub(super) key_markers: usize,
}

/// Placement order doubles as priority: the boss and keys claim cells first.
pub(super) fn pending_placements(
    quota: &PlacementQuota,
    level_index: u32,
    rng: &mut SimRng,
) -> Vec<Pending> {
    let mut pending = Vec::new();
    if quota.boss {
        pending.push(Pending::Enemy(Archetype::Boss));
    }
    pending.extend(iter::repeat_n(Pending::Key, quota.keys));
    for _ in 0..quota.enemies {
        let roll = rng.below(100) as u32;
        pending.push(Pending::Enemy(pick_archetype(level_index, roll)));
    }
    pending.extend(iter::repeat_n(Pending::Trap, quota.traps));
    pending.extend(iter::repeat_n(Pending::Item(PickupKind::Torch), quota.torches));
    pending.extend(iter::repeat_n(Pending::Item(PickupKind::Potion), quota.potions));
    pending.extend(iter::repeat_n(Pending::Item(PickupKind::Shield), quota.shields));
    pending
}

/// Places each pending marker on a random plain-floor cell, sharing one retry budget.
///
/// Items still pending when the budget runs out are dropped rather than failing.
pub(super) fn place_pending(
    grid: &mut Grid,
    layer: &mut MarkerLayer,
    start: Pos,
    pending: &[Pending],
    rng: &mut SimRng,
    budget: usize,
) -> PlacementReport {
    let mut attempts = 0;
    let mut placed = 0;
    if grid.width() < 3 || grid.height() < 3 {
        return PlacementReport { placed, dropped: pending.len() };
    }

    for &marker in pending {
        while attempts < budget {
            attempts += 1;
            let pos = Pos {
                y: (1 + rng.below(grid.height() - 2)) as i32,
                x: (1 + rng.below(grid.width() - 2)) as i32,
            };
            if !cell_accepts(grid, layer, start, pos, marker) {
                continue;
            }
            match marker {
                Pending::Key => grid.set(pos, CellKind::Key),
                other => layer.set(pos, other),
            }
            placed += 1;
            break;
        }
    }

    PlacementReport { placed, dropped: pending.len() - placed }
}

/// Turns every marker into a spawn record and restores its cell to plain floor.
pub(super) fn consume_markers(
    grid: &mut Grid,
    layer: &MarkerLayer,
    rng: &mut SimRng,
) -> ConsumedMarkers {
    let mut consumed = ConsumedMarkers::default();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = Pos { y: y as i32, x: x as i32 };
            match grid.tile_at(cell) {
                CellKind::Key => {
                    consumed.pickup_spawns.push(PickupSpawn { kind: PickupKind::Key, cell });
                    consumed.key_markers += 1;
                    grid.set(cell, CellKind::Floor);
                }
                CellKind::Exit => grid.set(cell, CellKind::Floor),
                CellKind::Floor | CellKind::Wall => {}
            }
            match layer.get(cell) {
                Some(Pending::Enemy(archetype)) => {
                    consumed.enemy_spawns.push(EnemySpawn { archetype, cell });
                }
                Some(Pending::Trap) => {
                    consumed.trap_spawns.push(TrapSpawn { cell, phase: rng.angle() });
                }
                Some(Pending::Item(kind)) => {
                    consumed.pickup_spawns.push(PickupSpawn { kind, cell });
                }
                Some(Pending::Key) | None => {}
            }
        }
    }
    consumed
}

fn cell_accepts(grid: &Grid, layer: &MarkerLayer, start: Pos, pos: Pos, marker: Pending) -> bool {
    grid.tile_at(pos) == CellKind::Floor
        && pos != start
        && layer.get(pos).is_none()
        && (!marker.is_hostile() || manhattan(pos, start) >= SAFE_SPAWN_DISTANCE)
}
