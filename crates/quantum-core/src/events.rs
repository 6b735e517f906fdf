use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::entity::EntityId;
use crate::portal::PortalTarget;
use crate::powerup::PowerupEffect;

/// Notifications emitted during input handling and update, consumed by the
/// host for UI text, sound cues and scene changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DimensionChanged {
        from: Dimension,
        to: Dimension,
    },
    CoinCollected {
        entity: EntityId,
        points: u32,
        bonus: u32,
    },
    PowerupCollected {
        entity: EntityId,
        effect: PowerupEffect,
    },
    EffectExpired {
        effect: PowerupEffect,
    },
    PortalActivated {
        entity: EntityId,
        target: PortalTarget,
    },
    ScoreUpdate {
        score: u32,
    },
    LivesChanged {
        lives: u32,
    },
    LevelLoaded {
        index: usize,
        name: String,
    },
    /// The host should switch to another scene (menu, credits, ...).
    SceneRequested {
        name: String,
    },
    GameOver,
}
