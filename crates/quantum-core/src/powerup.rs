use serde::{Deserialize, Serialize};

/// Effect granted by a collected powerup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerupEffect {
    Grow,
    ExtraLife,
    Damage,
    FirePower,
    Invincibility,
    Speed,
    #[default]
    None,
}

impl PowerupEffect {
    /// Time-bounded effects are reverted by a scheduled reversal.
    pub const fn is_timed(self) -> bool {
        matches!(self, Self::FirePower | Self::Invincibility | Self::Speed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grow => "grow",
            Self::ExtraLife => "extra-life",
            Self::Damage => "damage",
            Self::FirePower => "fire-power",
            Self::Invincibility => "invincibility",
            Self::Speed => "speed",
            Self::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_effects_are_timed() {
        let timed: Vec<_> = [
            PowerupEffect::Grow,
            PowerupEffect::ExtraLife,
            PowerupEffect::Damage,
            PowerupEffect::FirePower,
            PowerupEffect::Invincibility,
            PowerupEffect::Speed,
            PowerupEffect::None,
        ]
        .into_iter()
        .filter(|e| e.is_timed())
        .collect();
        assert_eq!(
            timed,
            vec![
                PowerupEffect::FirePower,
                PowerupEffect::Invincibility,
                PowerupEffect::Speed
            ]
        );
    }

    #[test]
    fn kebab_case_names() {
        let e: PowerupEffect = serde_json::from_str("\"extra-life\"").unwrap();
        assert_eq!(e, PowerupEffect::ExtraLife);
        assert_eq!(
            serde_json::to_string(&PowerupEffect::FirePower).unwrap(),
            format!("\"{}\"", PowerupEffect::FirePower.as_str())
        );
    }
}
