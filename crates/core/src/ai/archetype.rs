//! Static per-archetype stats and the behavior hooks each archetype plugs in.

use crate::rng::SimRng;
use crate::types::{Archetype, CellKind};

use super::steering::{hold_position, wander};
use super::{AiContext, AiEffect, Enemy};

pub type IdleFn = fn(&mut Enemy, &AiContext<'_>, &mut SimRng, f32);
pub type SpecialFn = fn(&mut Enemy, bool, &AiContext<'_>, &mut SimRng) -> Option<AiEffect>;
pub type PermeableFn = fn(&Enemy, f32) -> bool;

/// Chance per tick that a wounded boss calls in a minion.
const SUMMON_CHANCE_PER_TICK: f32 = 0.005;
/// Radians per second of the phase-shift oscillator.
const PHASE_SHIFT_RATE: f32 = 3.0;

pub struct ArchetypeProfile {
    /// Hits needed to kill.
    pub max_hp: u32,
    pub contact_damage: f32,
    pub speed_factor: f32,
    /// Multiplier applied to the player's sight radius.
    pub detection: f32,
    pub coins: u32,
    pub chase_damping: f32,
    pub idle: IdleFn,
    pub special: SpecialFn,
    pub permeable: PermeableFn,
}

static PATROL: ArchetypeProfile = ArchetypeProfile {
    max_hp: 2,
    contact_damage: 10.0,
    speed_factor: 1.0,
    detection: 1.5,
    coins: 1,
    chase_damping: 1.0,
    idle: wander,
    special: no_special,
    permeable: never_permeable,
};

static AMBUSH: ArchetypeProfile = ArchetypeProfile {
    max_hp: 2,
    contact_damage: 14.0,
    speed_factor: 1.1,
    detection: 0.7,
    coins: 2,
    chase_damping: 1.0,
    idle: wander,
    special: no_special,
    permeable: never_permeable,
};

static PHASE: ArchetypeProfile = ArchetypeProfile {
    max_hp: 3,
    contact_damage: 12.0,
    speed_factor: 0.9,
    detection: 1.5,
    coins: 3,
    chase_damping: 1.0,
    idle: wander,
    special: no_special,
    permeable: phase_window,
};

static LURKER: ArchetypeProfile = ArchetypeProfile {
    max_hp: 3,
    contact_damage: 18.0,
    speed_factor: 1.3,
    detection: 0.5,
    coins: 3,
    chase_damping: 1.0,
    idle: hold_position,
    special: no_special,
    permeable: never_permeable,
};

static SCREAMER: ArchetypeProfile = ArchetypeProfile {
    max_hp: 2,
    contact_damage: 6.0,
    speed_factor: 0.8,
    detection: 1.8,
    coins: 2,
    chase_damping: 1.0,
    idle: wander,
    special: scream_on_aggro,
    permeable: never_permeable,
};

static BOSS: ArchetypeProfile = ArchetypeProfile {
    max_hp: 12,
    contact_damage: 25.0,
    speed_factor: 0.7,
    detection: 2.0,
    coins: 25,
    chase_damping: 0.8,
    idle: wander,
    special: summon_when_wounded,
    permeable: never_permeable,
};

pub fn profile(archetype: Archetype) -> &'static ArchetypeProfile {
    match archetype {
        Archetype::Patrol => &PATROL,
        Archetype::Ambush => &AMBUSH,
        Archetype::Phase => &PHASE,
        Archetype::Lurker => &LURKER,
        Archetype::Screamer => &SCREAMER,
        Archetype::Boss => &BOSS,
    }
}

fn no_special(_: &mut Enemy, _: bool, _: &AiContext<'_>, _: &mut SimRng) -> Option<AiEffect> {
    None
}

fn never_permeable(_: &Enemy, _: f32) -> bool {
    false
}

/// Half the time while chasing, walls stop mattering.
fn phase_window(enemy: &Enemy, elapsed: f32) -> bool {
    enemy.chasing && (elapsed * PHASE_SHIFT_RATE + enemy.phase_offset).sin() > 0.0
}

fn scream_on_aggro(
    enemy: &mut Enemy,
    was_chasing: bool,
    ctx: &AiContext<'_>,
    _: &mut SimRng,
) -> Option<AiEffect> {
    if !enemy.chasing || was_chasing || enemy.scream_cooldown > 0.0 {
        return None;
    }
    enemy.scream_cooldown = ctx.scream_cooldown;
    Some(AiEffect::Scream)
}

fn summon_when_wounded(
    enemy: &mut Enemy,
    _: bool,
    ctx: &AiContext<'_>,
    rng: &mut SimRng,
) -> Option<AiEffect> {
    if enemy.hp * 2 >= enemy.max_hp || !rng.chance(SUMMON_CHANCE_PER_TICK) {
        return None;
    }
    let home = enemy.pos.cell();
    let mut candidates: Vec<_> = home
        .neighbors4()
        .into_iter()
        .filter(|&cell| ctx.grid.tile_at(cell) == CellKind::Floor)
        .collect();
    if candidates.is_empty() && ctx.grid.tile_at(home) == CellKind::Floor {
        candidates.push(home);
    }
    if candidates.is_empty() {
        return None;
    }
    let cell = candidates[rng.below(candidates.len())];
    Some(AiEffect::SpawnMinion { cell })
}
