//! Stable snapshot hashing for deterministic verification.
//! Floats are hashed by bit pattern so any drift between runs shows up.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u32(self.attempt);
        hasher.write_u64(self.tick);
        hasher.write_u8(self.phase as u8);

        let run = &self.run;
        hasher.write_u32(run.level_index);
        hasher.write_u32(run.keys_held);
        hasher.write_u32(run.total_keys);
        hasher.write_u32(run.torch_fuel.to_bits());
        hasher.write_u32(run.potions);
        hasher.write_u32(run.shields_collected);
        hasher.write_u32(run.coins);
        hasher.write_u32(run.kills);
        hasher.write_u32(run.levels_cleared);
        hasher.write_u8(u8::from(run.boss_present));

        let player = &self.player;
        for value in [
            player.pos.x,
            player.pos.y,
            player.facing,
            player.hp,
            player.shield,
            player.invincibility,
            player.attack_cooldown,
        ] {
            hasher.write_u32(value.to_bits());
        }

        hasher.write_u32(self.level.elapsed.to_bits());
        hasher.write_u64(self.level.explored.explored_count() as u64);
        for enemy in self.level.enemies.values() {
            hasher.write_u8(enemy.archetype as u8);
            hasher.write_u32(enemy.pos.x.to_bits());
            hasher.write_u32(enemy.pos.y.to_bits());
            hasher.write_u32(enemy.hp);
            hasher.write_u8(u8::from(enemy.chasing));
        }
        for pickup in &self.level.pickups {
            hasher.write_u8(u8::from(pickup.collected));
        }
        hasher.finish()
    }
}
