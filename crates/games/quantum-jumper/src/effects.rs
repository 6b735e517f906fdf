use serde::{Deserialize, Serialize};

use quantum_core::host::Millis;
use quantum_core::player::PlayerState;
use quantum_core::powerup::PowerupEffect;
use quantum_core::timer::TimerQueue;

use crate::config::JumperConfig;

/// Powerup-driven player modifiers the host reads when moving and
/// rendering the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerModifiers {
    pub grown: bool,
    pub invincible: bool,
    pub fire_power: bool,
    pub speed_multiplier: f32,
}

impl Default for PlayerModifiers {
    fn default() -> Self {
        Self {
            grown: false,
            invincible: false,
            fire_power: false,
            speed_multiplier: 1.0,
        }
    }
}

/// Result of applying an effect or a hit to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    Applied,
    LifeGained { lives: u32 },
    LifeLost { lives: u32 },
    /// A grown player absorbed the hit by shrinking.
    Shrunk,
    /// Invincibility absorbed the hit.
    Blocked,
}

/// Active modifiers plus the scheduled reversals of timed effects.
#[derive(Debug, Clone, Default)]
pub struct EffectState {
    pub modifiers: PlayerModifiers,
    reversals: TimerQueue<PowerupEffect>,
}

impl EffectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a collected powerup at time `now`.
    ///
    /// Timed effects schedule their reversal at `now + duration`. Collecting
    /// the same timed effect again restarts the timer.
    pub fn apply(
        &mut self,
        effect: PowerupEffect,
        player: &mut PlayerState,
        now: Millis,
        config: &JumperConfig,
    ) -> EffectOutcome {
        match effect {
            PowerupEffect::ExtraLife => {
                player.gain_life();
                return EffectOutcome::LifeGained {
                    lives: player.lives,
                };
            },
            PowerupEffect::Damage => return self.take_hit(player),
            PowerupEffect::Grow => self.modifiers.grown = true,
            PowerupEffect::Invincibility => self.modifiers.invincible = true,
            PowerupEffect::FirePower => self.modifiers.fire_power = true,
            PowerupEffect::Speed => self.modifiers.speed_multiplier = config.speed_multiplier,
            PowerupEffect::None => {},
        }
        if let Some(duration) = config.effects.for_effect(effect) {
            self.reversals.schedule(effect, now, duration);
        }
        EffectOutcome::Applied
    }

    /// Resolve a damaging hit: invincibility blocks it, a grown player
    /// shrinks, otherwise a life is lost.
    pub fn take_hit(&mut self, player: &mut PlayerState) -> EffectOutcome {
        if self.modifiers.invincible {
            EffectOutcome::Blocked
        } else if self.modifiers.grown {
            self.modifiers.grown = false;
            EffectOutcome::Shrunk
        } else {
            EffectOutcome::LifeLost {
                lives: player.lose_life(),
            }
        }
    }

    /// Revert every timed effect whose deadline has passed. Returns the
    /// reverted effects, earliest first.
    pub fn expire_due(&mut self, now: Millis) -> Vec<PowerupEffect> {
        let due = self.reversals.pop_due(now);
        for effect in &due {
            match effect {
                PowerupEffect::Invincibility => self.modifiers.invincible = false,
                PowerupEffect::FirePower => self.modifiers.fire_power = false,
                PowerupEffect::Speed => self.modifiers.speed_multiplier = 1.0,
                _ => {},
            }
        }
        due
    }

    pub fn expires_at(&self, effect: PowerupEffect) -> Option<Millis> {
        self.reversals.deadline(effect)
    }

    /// Drop every modifier and pending reversal.
    pub fn reset(&mut self) {
        self.modifiers = PlayerModifiers::default();
        self.reversals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_core::host::Position;

    fn player() -> PlayerState {
        PlayerState::new(Position::default(), 3)
    }

    #[test]
    fn extra_life_adds_exactly_one() {
        let mut fx = EffectState::new();
        let mut p = player();
        let outcome = fx.apply(PowerupEffect::ExtraLife, &mut p, 0, &JumperConfig::default());
        assert_eq!(outcome, EffectOutcome::LifeGained { lives: 4 });
        assert_eq!(p.lives, 4);
    }

    #[test]
    fn invincibility_reverts_after_duration() {
        let config = JumperConfig::default();
        let mut fx = EffectState::new();
        let mut p = player();
        fx.apply(PowerupEffect::Invincibility, &mut p, 1_000, &config);
        assert!(fx.modifiers.invincible);

        assert!(fx.expire_due(1_000 + config.effects.invincibility_ms - 1).is_empty());
        assert!(fx.modifiers.invincible);

        let expired = fx.expire_due(1_000 + config.effects.invincibility_ms);
        assert_eq!(expired, vec![PowerupEffect::Invincibility]);
        assert!(!fx.modifiers.invincible);
    }

    #[test]
    fn recollecting_restarts_timer() {
        let config = JumperConfig::default();
        let mut fx = EffectState::new();
        let mut p = player();
        fx.apply(PowerupEffect::Speed, &mut p, 0, &config);
        fx.apply(PowerupEffect::Speed, &mut p, 5_000, &config);
        assert_eq!(
            fx.expires_at(PowerupEffect::Speed),
            Some(5_000 + config.effects.speed_ms)
        );
        assert!(fx.expire_due(config.effects.speed_ms).is_empty());
        assert_eq!(fx.modifiers.speed_multiplier, config.speed_multiplier);
    }

    #[test]
    fn hits_resolve_in_priority_order() {
        let config = JumperConfig::default();
        let mut fx = EffectState::new();
        let mut p = player();

        fx.apply(PowerupEffect::Grow, &mut p, 0, &config);
        fx.apply(PowerupEffect::Invincibility, &mut p, 0, &config);
        assert_eq!(fx.take_hit(&mut p), EffectOutcome::Blocked);

        fx.expire_due(u64::MAX);
        assert_eq!(fx.take_hit(&mut p), EffectOutcome::Shrunk);
        assert_eq!(fx.take_hit(&mut p), EffectOutcome::LifeLost { lives: 2 });
    }

    #[test]
    fn grow_is_not_timed() {
        let mut fx = EffectState::new();
        let mut p = player();
        fx.apply(PowerupEffect::Grow, &mut p, 0, &JumperConfig::default());
        assert!(fx.expire_due(u64::MAX).is_empty());
        assert!(fx.modifiers.grown);
    }

    #[test]
    fn reset_clears_pending_reversals() {
        let mut fx = EffectState::new();
        let mut p = player();
        fx.apply(PowerupEffect::FirePower, &mut p, 0, &JumperConfig::default());
        fx.reset();
        assert!(!fx.modifiers.fire_power);
        assert!(fx.expire_due(u64::MAX).is_empty());
    }
}
