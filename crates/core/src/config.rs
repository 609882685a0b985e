//! Tunable simulation constants and their TOML loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config field `{field}` has invalid value {value}")]
    Invalid { field: &'static str, value: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// External difficulty knob; scales chase speed and every damage source.
    pub difficulty: f32,
    /// Upper bound on a single tick's delta time, in seconds.
    pub max_dt: f32,
    pub player_speed: f32,
    pub sprint_multiplier: f32,
    pub player_max_hp: f32,
    pub shield_cap: f32,
    pub invincibility_secs: f32,
    pub torch_drain_walk: f32,
    pub torch_drain_sprint: f32,
    pub trap_damage: f32,
    pub starvation_damage: f32,
    pub scream_torch_drain: f32,
    pub scream_cooldown_secs: f32,
    pub melee_radius: f32,
    pub melee_cooldown_secs: f32,
    pub potion_heal: f32,
    pub torch_pickup_fuel: f32,
    pub key_torch_bonus: f32,
    pub shield_pickup_charge: f32,
    pub level_heal_bonus: f32,
    pub level_fuel_bonus: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: 1.0,
            max_dt: 0.05,
            player_speed: 3.0,
            sprint_multiplier: 1.8,
            player_max_hp: 100.0,
            shield_cap: 50.0,
            invincibility_secs: 0.8,
            torch_drain_walk: 1.2,
            torch_drain_sprint: 9.0,
            trap_damage: 8.0,
            starvation_damage: 4.0,
            scream_torch_drain: 20.0,
            scream_cooldown_secs: 8.0,
            melee_radius: 1.2,
            melee_cooldown_secs: 0.35,
            potion_heal: 40.0,
            torch_pickup_fuel: 35.0,
            key_torch_bonus: 15.0,
            shield_pickup_charge: 25.0,
            level_heal_bonus: 25.0,
            level_fuel_bonus: 40.0,
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        for (field, value) in [
            ("max_dt", self.max_dt),
            ("player_max_hp", self.player_max_hp),
            ("shield_cap", self.shield_cap),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }

    /// Difficulty clamped to the accepted range; NaN reads as neutral.
    pub fn difficulty(&self) -> f32 {
        if self.difficulty.is_nan() { 1.0 } else { self.difficulty.max(0.0) }
    }

    fn fields(&self) -> [(&'static str, f32); 21] {
        [
            ("difficulty", self.difficulty),
            ("max_dt", self.max_dt),
            ("player_speed", self.player_speed),
            ("sprint_multiplier", self.sprint_multiplier),
            ("player_max_hp", self.player_max_hp),
            ("shield_cap", self.shield_cap),
            ("invincibility_secs", self.invincibility_secs),
            ("torch_drain_walk", self.torch_drain_walk),
            ("torch_drain_sprint", self.torch_drain_sprint),
            ("trap_damage", self.trap_damage),
            ("starvation_damage", self.starvation_damage),
            ("scream_torch_drain", self.scream_torch_drain),
            ("scream_cooldown_secs", self.scream_cooldown_secs),
            ("melee_radius", self.melee_radius),
            ("melee_cooldown_secs", self.melee_cooldown_secs),
            ("potion_heal", self.potion_heal),
            ("torch_pickup_fuel", self.torch_pickup_fuel),
            ("key_torch_bonus", self.key_torch_bonus),
            ("shield_pickup_charge", self.shield_pickup_charge),
            ("level_heal_bonus", self.level_heal_bonus),
            ("level_fuel_bonus", self.level_fuel_bonus),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = SimConfig::from_toml_str("difficulty = 1.5\ntrap_damage = 12.0\n")
            .expect("partial config should parse");
        assert_eq!(config.difficulty, 1.5);
        assert_eq!(config.trap_damage, 12.0);
        assert_eq!(config.max_dt, SimConfig::default().max_dt);
    }

    #[test]
    fn negative_values_are_rejected() {
        let err = SimConfig::from_toml_str("torch_drain_walk = -1.0").unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field: "torch_drain_walk", .. }),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn zero_dt_cap_is_rejected() {
        let config = SimConfig { max_dt: 0.0, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let err = SimConfig::from_toml_str("difficulty = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn difficulty_is_clamped_non_negative() {
        let config = SimConfig { difficulty: -3.0, ..SimConfig::default() };
        assert_eq!(config.difficulty(), 0.0);
    }
}
