//! One simulation step, always in the same order: timers, potion, movement,
//! torch, sight, enemies, combat, death, pickups, exit.

use super::*;
use crate::ai::{AiContext, AiEffect, profile, update_all};
use crate::combat::{
    EXIT_RADIUS, PICKUP_RADIUS, PLAYER_HALF_EXTENT, apply_damage, contacts, player_on_active_trap,
    resolve_melee,
};
use crate::dungeon::progression::enemy_base_speed;
use crate::visibility::mark_explored;

impl Game {
    /// Advances the level by `dt` seconds (clamped to the configured maximum).
    ///
    /// Outside `Playing` the call is a no-op reporting zero simulated time.
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> TickResult {
        if self.phase != LevelPhase::Playing {
            return TickResult { simulated_dt: 0.0, phase: self.phase };
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, self.config.max_dt) } else { 0.0 };
        self.tick += 1;
        self.level.elapsed += dt;
        self.run.level_time += dt;
        self.run.survival_time += dt;
        self.player.tick_timers(dt);

        if input.use_potion {
            self.drink_potion();
        }
        let moving = self.move_player(dt, input);
        self.drain_torch(dt, moving && input.sprint);
        self.update_sight();
        self.update_enemies(dt);
        self.resolve_combat(input.attack);

        if self.player.is_dead() {
            self.phase = LevelPhase::GameOver;
            self.events.push(GameEvent::PlayerDied { level: self.run.level_index });
            log::info!(
                "player died on level {} after {:.1}s",
                self.run.level_index,
                self.run.survival_time
            );
            return TickResult { simulated_dt: dt, phase: self.phase };
        }

        self.collect_pickups();
        self.check_exit();
        TickResult { simulated_dt: dt, phase: self.phase }
    }

    fn drink_potion(&mut self) {
        if self.run.potions == 0 || self.player.hp >= self.player.max_hp {
            return;
        }
        self.run.potions -= 1;
        let healed = self.player.heal(self.config.potion_heal);
        self.events.push(GameEvent::PotionUsed { healed });
    }

    /// Returns whether the player tried to move this tick.
    fn move_player(&mut self, dt: f32, input: &TickInput) -> bool {
        let mut direction = input.movement();
        if !direction.x.is_finite() || !direction.y.is_finite() {
            direction = Vec2::ZERO;
        }
        if direction.length() > 1.0 {
            direction = direction.normalized();
        }
        if direction == Vec2::ZERO {
            return false;
        }
        self.player.facing = direction.angle();

        let multiplier = if input.sprint { self.config.sprint_multiplier } else { 1.0 };
        let step = direction * (self.player.speed * multiplier * dt);
        self.player.pos = self.level.grid.slide_move(self.player.pos, step, PLAYER_HALF_EXTENT);
        true
    }

    fn drain_torch(&mut self, dt: f32, sprinting: bool) {
        let rate =
            if sprinting { self.config.torch_drain_sprint } else { self.config.torch_drain_walk };
        self.set_torch_fuel(self.run.torch_fuel - rate * dt);
    }

    fn set_torch_fuel(&mut self, fuel: f32) {
        let before = self.run.torch_fuel;
        self.run.torch_fuel = if fuel.is_nan() { 0.0 } else { fuel.clamp(0.0, TORCH_MAX) };
        if before > 0.0 && self.run.torch_fuel <= 0.0 {
            self.events.push(GameEvent::TorchDepleted);
            log::debug!("torch burned out on level {}", self.run.level_index);
        }
    }

    fn update_sight(&mut self) {
        self.sight_radius = sight_radius(self.run.torch_fuel, self.level.elapsed);
        mark_explored(&mut self.level.explored, self.player.pos.cell());
    }

    fn update_enemies(&mut self, dt: f32) {
        let ctx = AiContext {
            grid: &self.level.grid,
            player_pos: self.player.pos,
            sight_radius: self.sight_radius,
            elapsed: self.level.elapsed,
            dt,
            base_speed: enemy_base_speed(self.run.level_index),
            difficulty: self.config.difficulty(),
            scream_cooldown: self.config.scream_cooldown_secs,
        };
        let effects = update_all(&mut self.level.enemies, &ctx, &mut self.ai_rng);

        for (_, effect) in effects {
            match effect {
                AiEffect::Scream => {
                    self.set_torch_fuel(self.run.torch_fuel - self.config.scream_torch_drain);
                    self.events.push(GameEvent::Scream);
                    self.events.push(GameEvent::ScreenShake);
                }
                AiEffect::SpawnMinion { cell } => {
                    let minion = Enemy::spawn(Archetype::Patrol, cell, &mut self.ai_rng);
                    self.level.enemies.insert(minion);
                    self.events.push(GameEvent::MinionSpawned { pos: cell });
                }
            }
        }
    }

    fn resolve_combat(&mut self, attack: bool) {
        if attack && self.player.attack_cooldown <= 0.0 {
            self.player.attack_cooldown = self.config.melee_cooldown_secs;
            self.melee();
        }

        let difficulty = self.config.difficulty();
        if player_on_active_trap(&self.level.traps, self.player.pos, self.level.elapsed) {
            self.hurt(DamageSource::Trap, self.config.trap_damage * difficulty);
        }
        for archetype in contacts(&self.level.enemies, self.player.pos) {
            let damage = profile(archetype).contact_damage;
            self.hurt(DamageSource::Contact(archetype), damage * difficulty);
        }
        if self.run.torch_fuel <= 0.0 {
            self.hurt(DamageSource::Starvation, self.config.starvation_damage * difficulty);
        }
    }

    fn melee(&mut self) {
        let report =
            resolve_melee(&mut self.level.enemies, self.player.pos, self.config.melee_radius);
        if report.whiffed() {
            self.events.push(GameEvent::AttackWhiffed);
            return;
        }
        for archetype in report.hits {
            self.events.push(GameEvent::EnemyHit { archetype });
        }
        for slain in report.slain {
            self.run.kills += 1;
            self.run.coins += slain.coins;
            self.events
                .push(GameEvent::EnemySlain { archetype: slain.archetype, coins: slain.coins });
            if slain.archetype == Archetype::Boss {
                self.run.boss_present =
                    self.level.enemies.values().any(|enemy| enemy.archetype == Archetype::Boss);
                self.events.push(GameEvent::BossDefeated);
                log::info!("boss defeated on level {}", self.run.level_index);
            }
        }
    }

    fn hurt(&mut self, source: DamageSource, amount: f32) {
        let Some(outcome) = apply_damage(&mut self.player, amount, self.config.invincibility_secs)
        else {
            return;
        };
        self.events.push(GameEvent::PlayerHurt {
            source,
            hp_lost: outcome.hp_lost,
            shield_absorbed: outcome.absorbed,
        });
    }

    fn collect_pickups(&mut self) {
        for index in 0..self.level.pickups.len() {
            let pickup = self.level.pickups[index];
            if pickup.collected || pickup.pos.distance(self.player.pos) >= PICKUP_RADIUS {
                continue;
            }
            self.level.pickups[index].collected = true;
            match pickup.kind {
                PickupKind::Key => {
                    self.run.keys_held += 1;
                    self.set_torch_fuel(self.run.torch_fuel + self.config.key_torch_bonus);
                    self.events.push(GameEvent::KeyCollected {
                        held: self.run.keys_held,
                        required: self.run.total_keys,
                    });
                    continue;
                }
                PickupKind::Torch => {
                    self.set_torch_fuel(self.run.torch_fuel + self.config.torch_pickup_fuel);
                }
                PickupKind::Potion => self.run.potions += 1,
                PickupKind::Shield => {
                    self.player.add_shield(self.config.shield_pickup_charge);
                    self.run.shields_collected += 1;
                }
            }
            self.events.push(GameEvent::PickupCollected { kind: pickup.kind });
        }
    }

    fn check_exit(&mut self) {
        let at_exit = self.player.pos.distance(self.level.exit.center()) < EXIT_RADIUS;
        if !at_exit || !self.run.exit_unlocked() {
            return;
        }
        self.phase = LevelPhase::LevelComplete;
        self.run.levels_cleared += 1;
        self.events.push(GameEvent::LevelComplete { level: self.run.level_index });
        log::info!(
            "level {} cleared in {:.1}s",
            self.run.level_index,
            self.run.level_time
        );
    }
}
