use serde::{Deserialize, Serialize};

use crate::dimension::DimensionTag;
use crate::host::Position;
use crate::portal::PortalGuard;
use crate::powerup::PowerupEffect;

/// Registry-assigned identifier, unique within one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Registry category, one per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Platform,
    Collectible,
    Powerup,
    Portal,
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Platform { solid: bool, breakable: bool },
    Collectible { value: u32 },
    Powerup { effect: PowerupEffect },
    Portal(PortalGuard),
}

impl EntityKind {
    pub fn category(&self) -> Category {
        match self {
            Self::Platform { .. } => Category::Platform,
            Self::Collectible { .. } => Category::Collectible,
            Self::Powerup { .. } => Category::Powerup,
            Self::Portal(_) => Category::Portal,
        }
    }

    /// Collectibles and powerups are removed on pickup; platforms and
    /// portals live as long as the level.
    pub fn is_consumable(&self) -> bool {
        matches!(self, Self::Collectible { .. } | Self::Powerup { .. })
    }
}

/// A placed world object, tied to its host-side visual by `handle`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<H> {
    pub id: EntityId,
    pub handle: H,
    pub position: Position,
    pub dimension: DimensionTag,
    pub kind: EntityKind,
}

impl<H> Entity<H> {
    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::PortalTarget;

    #[test]
    fn categories_match_kinds() {
        let kinds = [
            (
                EntityKind::Platform {
                    solid: true,
                    breakable: false,
                },
                Category::Platform,
                false,
            ),
            (EntityKind::Collectible { value: 10 }, Category::Collectible, true),
            (
                EntityKind::Powerup {
                    effect: PowerupEffect::Speed,
                },
                Category::Powerup,
                true,
            ),
            (
                EntityKind::Portal(PortalGuard::new(PortalTarget::Restart, true, 1000)),
                Category::Portal,
                false,
            ),
        ];
        for (kind, category, consumable) in kinds {
            assert_eq!(kind.category(), category);
            assert_eq!(kind.is_consumable(), consumable);
        }
    }
}
