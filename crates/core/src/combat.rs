//! Damage bookkeeping for the player plus melee, trap, and contact resolution.
//! Shields absorb before hp, and every landed hit opens an invincibility window
//! that swallows further damage entirely.

use slotmap::SlotMap;

use crate::ai::Enemy;
use crate::config::SimConfig;
use crate::types::{Archetype, EnemyId, Vec2};

pub const PLAYER_HALF_EXTENT: f32 = 0.2;
pub const TRAP_RADIUS: f32 = 0.4;
pub const CONTACT_RADIUS: f32 = 0.45;
pub const PICKUP_RADIUS: f32 = 0.5;
pub const EXIT_RADIUS: f32 = 0.6;
pub const HIT_FLASH_SECS: f32 = 0.15;
pub const HIT_STUN_SECS: f32 = 0.3;
/// Radians per second of the trap oscillator.
pub const TRAP_RATE: f32 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Radians; follows the last non-zero movement direction.
    pub facing: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub shield: f32,
    pub shield_cap: f32,
    pub invincibility: f32,
    /// Cells per second before sprinting.
    pub speed: f32,
    pub attack_cooldown: f32,
}

impl Player {
    pub fn new(pos: Vec2, config: &SimConfig) -> Self {
        Self {
            pos,
            facing: 0.0,
            hp: config.player_max_hp,
            max_hp: config.player_max_hp,
            shield: 0.0,
            shield_cap: config.shield_cap,
            invincibility: 0.0,
            speed: config.player_speed,
            attack_cooldown: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Restores up to `amount` hp and returns how much was actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
        self.hp - before
    }

    pub fn add_shield(&mut self, amount: f32) {
        self.shield = (self.shield + amount.max(0.0)).min(self.shield_cap);
    }

    pub fn tick_timers(&mut self, dt: f32) {
        self.invincibility = (self.invincibility - dt).max(0.0);
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    pub absorbed: f32,
    pub hp_lost: f32,
}

/// Applies `amount` through shield then hp. Returns `None` when the hit is ignored.
pub fn apply_damage(
    player: &mut Player,
    amount: f32,
    invincibility_secs: f32,
) -> Option<DamageOutcome> {
    if player.invincibility > 0.0 || amount.is_nan() || amount <= 0.0 {
        return None;
    }
    let absorbed = amount.min(player.shield);
    player.shield = (player.shield - absorbed).max(0.0);
    let remainder = amount - absorbed;
    let hp_lost = remainder.min(player.hp);
    player.hp = (player.hp - remainder).max(0.0);
    player.invincibility = invincibility_secs;
    Some(DamageOutcome { absorbed, hp_lost })
}

/// Fixed hazard whose state is a pure function of time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trap {
    pub pos: Vec2,
    pub phase: f32,
}

impl Trap {
    pub fn is_active(&self, elapsed: f32) -> bool {
        trap_active(elapsed, self.phase)
    }
}

pub fn trap_active(elapsed: f32, phase: f32) -> bool {
    (elapsed * TRAP_RATE + phase).sin() > 0.0
}

pub fn player_on_active_trap(traps: &[Trap], player_pos: Vec2, elapsed: f32) -> bool {
    traps
        .iter()
        .any(|trap| trap.is_active(elapsed) && trap.pos.distance(player_pos) < TRAP_RADIUS)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlainEnemy {
    pub archetype: Archetype,
    pub coins: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeleeReport {
    pub hits: Vec<Archetype>,
    pub slain: Vec<SlainEnemy>,
}

impl MeleeReport {
    pub fn whiffed(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Lands one hit on every enemy within `radius`; enemies reduced to zero hp are removed.
pub fn resolve_melee(
    enemies: &mut SlotMap<EnemyId, Enemy>,
    player_pos: Vec2,
    radius: f32,
) -> MeleeReport {
    let mut report = MeleeReport::default();
    let mut dead = Vec::new();
    for (id, enemy) in enemies.iter_mut() {
        if enemy.pos.distance(player_pos) > radius {
            continue;
        }
        enemy.hp = enemy.hp.saturating_sub(1);
        enemy.hit_flash = HIT_FLASH_SECS;
        enemy.stun_timer = HIT_STUN_SECS;
        report.hits.push(enemy.archetype);
        if enemy.hp == 0 {
            dead.push(id);
        }
    }
    for id in dead {
        if let Some(enemy) = enemies.remove(id) {
            let coins = enemy.profile().coins;
            report.slain.push(SlainEnemy { archetype: enemy.archetype, coins });
        }
    }
    report
}

/// Archetypes of every unstunned enemy touching the player this tick.
pub fn contacts(enemies: &SlotMap<EnemyId, Enemy>, player_pos: Vec2) -> Vec<Archetype> {
    enemies
        .values()
        .filter(|enemy| enemy.stun_timer <= 0.0 && enemy.pos.distance(player_pos) < CONTACT_RADIUS)
        .map(|enemy| enemy.archetype)
        .collect()
}
