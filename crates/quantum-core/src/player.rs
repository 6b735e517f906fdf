use serde::{Deserialize, Serialize};

use crate::host::Position;

/// Player bookkeeping shared across levels.
///
/// The player carries no dimension tag: it is always active and only world
/// entities are filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub lives: u32,
    pub score: u32,
}

impl PlayerState {
    pub fn new(position: Position, lives: u32) -> Self {
        Self {
            position,
            lives,
            score: 0,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn gain_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// Returns the remaining lives.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }
}
