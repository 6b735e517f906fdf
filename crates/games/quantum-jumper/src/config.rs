use serde::{Deserialize, Serialize};

use quantum_core::dimension::Dimension;
use quantum_core::host::Millis;
use quantum_core::portal::DEFAULT_PORTAL_COOLDOWN_MS;
use quantum_core::powerup::PowerupEffect;

/// World units per authoring grid cell.
pub const CELL_SIZE: f32 = 32.0;
/// Lives at the start of a run.
pub const STARTING_LIVES: u32 = 3;
/// Value of a coin that does not specify one.
pub const DEFAULT_COIN_VALUE: u32 = 10;
/// Fraction of a coin's value added when it is collected in its own dimension.
pub const COIN_BONUS_RATE: f32 = 0.5;
/// World y below which the player counts as fallen out.
pub const FALL_OUT_Y: f32 = 2048.0;

/// How long each time-bounded powerup lasts, measured from activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDurations {
    pub invincibility_ms: Millis,
    pub fire_power_ms: Millis,
    pub speed_ms: Millis,
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self {
            invincibility_ms: 10_000,
            fire_power_ms: 15_000,
            speed_ms: 8_000,
        }
    }
}

impl EffectDurations {
    /// Duration for a timed effect, `None` for instant or permanent ones.
    pub fn for_effect(&self, effect: PowerupEffect) -> Option<Millis> {
        match effect {
            PowerupEffect::Invincibility => Some(self.invincibility_ms),
            PowerupEffect::FirePower => Some(self.fire_power_ms),
            PowerupEffect::Speed => Some(self.speed_ms),
            _ => None,
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumperConfig {
    pub cell_size: f32,
    pub starting_lives: u32,
    pub initial_dimension: Dimension,
    pub default_coin_value: u32,
    pub coin_bonus_rate: f32,
    pub portal_cooldown_ms: Millis,
    /// Movement multiplier while the speed effect is running.
    pub speed_multiplier: f32,
    /// Player positions with a larger y are treated as falling out even
    /// when the host does not flag it.
    pub fall_out_y: f32,
    pub effects: EffectDurations,
}

impl Default for JumperConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            starting_lives: STARTING_LIVES,
            initial_dimension: Dimension::Light,
            default_coin_value: DEFAULT_COIN_VALUE,
            coin_bonus_rate: COIN_BONUS_RATE,
            portal_cooldown_ms: DEFAULT_PORTAL_COOLDOWN_MS,
            speed_multiplier: 1.5,
            fall_out_y: FALL_OUT_Y,
            effects: EffectDurations::default(),
        }
    }
}

impl JumperConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("QUANTUM_JUMPER_CONFIG")
            .unwrap_or_else(|_| "config/jumper.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = JumperConfig::from_toml(
            r#"
            coin_bonus_rate = 0.25
            initial_dimension = "dark"

            [effects]
            speed_ms = 2000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.coin_bonus_rate, 0.25);
        assert_eq!(cfg.initial_dimension, Dimension::Dark);
        assert_eq!(cfg.effects.speed_ms, 2000);
        assert_eq!(cfg.effects.invincibility_ms, 10_000);
        assert_eq!(cfg.starting_lives, STARTING_LIVES);
        assert_eq!(cfg.portal_cooldown_ms, 1000);
        assert_eq!(cfg.fall_out_y, FALL_OUT_Y);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(JumperConfig::from_toml("starting_lives = \"many\"").is_err());
    }

    #[test]
    fn only_timed_effects_have_durations() {
        let d = EffectDurations::default();
        assert_eq!(d.for_effect(PowerupEffect::Speed), Some(8_000));
        assert_eq!(d.for_effect(PowerupEffect::FirePower), Some(15_000));
        assert_eq!(d.for_effect(PowerupEffect::ExtraLife), None);
        assert_eq!(d.for_effect(PowerupEffect::Grow), None);
    }

    #[test]
    fn config_serializes_to_json() {
        let json = serde_json::to_value(JumperConfig::default()).unwrap();
        assert_eq!(json["initial_dimension"], "light");
        assert_eq!(json["effects"]["fire_power_ms"], 15_000);
    }
}
