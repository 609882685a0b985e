//! Enemy decision state and per-tick movement.
//! Each archetype is a row in a static profile table whose hooks drive idle,
//! special, and wall-permeability behavior; the update loop itself is shared.

mod archetype;
mod steering;

use slotmap::SlotMap;

pub use archetype::{ArchetypeProfile, profile};

use crate::dungeon::Grid;
use crate::rng::SimRng;
use crate::types::{Archetype, EnemyId, Pos, Vec2};
use crate::visibility::detection_range;

pub const ENEMY_HALF_EXTENT: f32 = 0.15;
pub const CHASE_MULTIPLIER: f32 = 1.5;
pub const WANDER_MULTIPLIER: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub archetype: Archetype,
    pub pos: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// Heading in radians; tracks the player while chasing.
    pub wander_dir: f32,
    pub chasing: bool,
    pub patrol_timer: f32,
    pub phase_offset: f32,
    pub scream_cooldown: f32,
    pub stun_timer: f32,
    pub hit_flash: f32,
}

impl Enemy {
    pub fn spawn(archetype: Archetype, cell: Pos, rng: &mut SimRng) -> Self {
        let max_hp = profile(archetype).max_hp;
        Self {
            archetype,
            pos: cell.center(),
            hp: max_hp,
            max_hp,
            wander_dir: rng.angle(),
            chasing: false,
            patrol_timer: rng.range_f32(1.0, 3.0),
            phase_offset: rng.angle(),
            scream_cooldown: 0.0,
            stun_timer: 0.0,
            hit_flash: 0.0,
        }
    }

    pub fn profile(&self) -> &'static ArchetypeProfile {
        profile(self.archetype)
    }

    /// True while walls do not block this enemy.
    pub fn is_permeable(&self, elapsed: f32) -> bool {
        (self.profile().permeable)(self, elapsed)
    }
}

/// Read-only world view handed to every enemy update in a tick.
pub struct AiContext<'a> {
    pub grid: &'a Grid,
    pub player_pos: Vec2,
    pub sight_radius: f32,
    pub elapsed: f32,
    pub dt: f32,
    /// Level-scaled speed in cells per second.
    pub base_speed: f32,
    pub difficulty: f32,
    pub scream_cooldown: f32,
}

/// Cross-cutting requests the level controller resolves after the AI pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiEffect {
    Scream,
    SpawnMinion { cell: Pos },
}

pub fn update_enemy(enemy: &mut Enemy, ctx: &AiContext<'_>, rng: &mut SimRng) -> Option<AiEffect> {
    enemy.hit_flash = (enemy.hit_flash - ctx.dt).max(0.0);
    enemy.scream_cooldown = (enemy.scream_cooldown - ctx.dt).max(0.0);
    if enemy.stun_timer > 0.0 {
        enemy.stun_timer = (enemy.stun_timer - ctx.dt).max(0.0);
        return None;
    }

    let stats = enemy.profile();
    let was_chasing = enemy.chasing;
    let range = detection_range(ctx.sight_radius, stats.detection);
    enemy.chasing = enemy.pos.distance(ctx.player_pos) < range;

    if enemy.chasing {
        let speed = ctx.base_speed
            * stats.speed_factor
            * CHASE_MULTIPLIER
            * stats.chase_damping
            * ctx.difficulty;
        let permeable = enemy.is_permeable(ctx.elapsed);
        steering::chase(enemy, ctx, speed, permeable);
    } else {
        let speed = ctx.base_speed * stats.speed_factor * WANDER_MULTIPLIER;
        (stats.idle)(enemy, ctx, rng, speed);
    }

    (stats.special)(enemy, was_chasing, ctx, rng)
}

/// Updates every live enemy in key order and collects the effects they raised.
pub fn update_all(
    enemies: &mut SlotMap<EnemyId, Enemy>,
    ctx: &AiContext<'_>,
    rng: &mut SimRng,
) -> Vec<(EnemyId, AiEffect)> {
    let mut effects = Vec::new();
    for (id, enemy) in enemies.iter_mut() {
        if let Some(effect) = update_enemy(enemy, ctx, rng) {
            effects.push((id, effect));
        }
    }
    effects
}
