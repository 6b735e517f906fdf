use quantum_core::dimension::{Dimension, DimensionTag};

/// Points granted for one coin pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinAward {
    pub points: u32,
    pub bonus: u32,
}

impl CoinAward {
    pub fn total(&self) -> u32 {
        self.points.saturating_add(self.bonus)
    }
}

/// Score a coin pickup.
///
/// A coin pinned to the dimension the player is in earns an extra
/// `floor(value * bonus_rate)`. `Both` coins are not dimension-specific and
/// never earn it.
pub fn coin_award(value: u32, tag: DimensionTag, current: Dimension, bonus_rate: f32) -> CoinAward {
    let bonus = if tag.specific() == Some(current) {
        (f64::from(value) * f64::from(bonus_rate.max(0.0))).floor() as u32
    } else {
        0
    };
    CoinAward {
        points: value,
        bonus,
    }
}
