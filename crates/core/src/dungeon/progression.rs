//! Level-index scaling rules: grid size, placement counts, and archetype unlocks.

use crate::types::Archetype;

pub const BASE_WIDTH: usize = 17;
pub const BASE_HEIGHT: usize = 13;
pub const MAX_WIDTH: usize = 29;
pub const MAX_HEIGHT: usize = 23;
pub const BOSS_FIRST_LEVEL: u32 = 4;

const MAX_KEYS: usize = 7;
const MAX_ENEMIES: usize = 14;
const MAX_TRAPS: usize = 10;
const MAX_TORCHES: usize = 5;
const MAX_POTIONS: usize = 3;
const MAX_SHIELDS: usize = 3;
const SPEED_SCALING_LEVEL_CAP: u32 = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementQuota {
    pub keys: usize,
    pub enemies: usize,
    pub traps: usize,
    pub torches: usize,
    pub potions: usize,
    pub shields: usize,
    pub boss: bool,
}

pub fn level_dimensions(level_index: u32) -> (usize, usize) {
    let growth = (level_index as usize).saturating_mul(2);
    (
        BASE_WIDTH.saturating_add(growth).min(MAX_WIDTH),
        BASE_HEIGHT.saturating_add(growth).min(MAX_HEIGHT),
    )
}

pub fn placement_quota(level_index: u32) -> PlacementQuota {
    let level = level_index as usize;
    PlacementQuota {
        keys: level.saturating_add(2).min(MAX_KEYS),
        enemies: level.saturating_mul(2).saturating_add(2).min(MAX_ENEMIES),
        traps: level.saturating_add(1).min(MAX_TRAPS),
        torches: (level / 2).saturating_add(2).min(MAX_TORCHES),
        potions: (level / 3).saturating_add(1).min(MAX_POTIONS),
        shields: (level / 2).min(MAX_SHIELDS),
        boss: level_index >= BOSS_FIRST_LEVEL,
    }
}

/// Base enemy speed in cells per second before archetype and state multipliers.
pub fn enemy_base_speed(level_index: u32) -> f32 {
    1.0 + 0.3 * level_index.min(SPEED_SCALING_LEVEL_CAP) as f32
}

/// Maps a `0..100` roll to an archetype, unlocking tougher kinds as levels grow.
pub(super) fn pick_archetype(level_index: u32, roll: u32) -> Archetype {
    match level_index {
        0 => {
            if roll < 80 {
                Archetype::Patrol
            } else {
                Archetype::Ambush
            }
        }
        1 => {
            if roll < 55 {
                Archetype::Patrol
            } else if roll < 80 {
                Archetype::Ambush
            } else {
                Archetype::Lurker
            }
        }
        2 => {
            if roll < 40 {
                Archetype::Patrol
            } else if roll < 60 {
                Archetype::Ambush
            } else if roll < 80 {
                Archetype::Lurker
            } else {
                Archetype::Phase
            }
        }
        _ => {
            if roll < 30 {
                Archetype::Patrol
            } else if roll < 45 {
                Archetype::Ambush
            } else if roll < 60 {
                Archetype::Lurker
            } else if roll < 80 {
                Archetype::Phase
            } else {
                Archetype::Screamer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn dimensions_match_documented_scenarios() {
        assert_eq!(level_dimensions(0), (17, 13));
        assert_eq!(level_dimensions(5), (27, 23));
        assert_eq!(level_dimensions(40), (MAX_WIDTH, MAX_HEIGHT));
        assert_eq!(level_dimensions(u32::MAX), (MAX_WIDTH, MAX_HEIGHT));
    }

    #[test]
    fn quotas_never_shrink_as_levels_grow() {
        let mut previous = placement_quota(0);
        for level in 1..30 {
            let quota = placement_quota(level);
            assert!(quota.keys >= previous.keys);
            assert!(quota.enemies >= previous.enemies);
            assert!(quota.traps >= previous.traps);
            assert!(quota.torches >= previous.torches);
            assert!(quota.potions >= previous.potions);
            assert!(quota.shields >= previous.shields);
            assert!(quota.boss || !previous.boss);
            previous = quota;
        }
    }

    #[test]
    fn early_levels_only_roll_simple_archetypes() {
        let kinds: BTreeSet<_> = (0..100).map(|roll| pick_archetype(0, roll)).collect();
        assert_eq!(kinds, BTreeSet::from([Archetype::Patrol, Archetype::Ambush]));
    }

    #[test]
    fn later_levels_unlock_every_regular_archetype() {
        let kinds: BTreeSet<_> = (0..100).map(|roll| pick_archetype(6, roll)).collect();
        assert_eq!(kinds.len(), 5);
        assert!(!kinds.contains(&Archetype::Boss));
    }
}
