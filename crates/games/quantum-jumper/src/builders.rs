//! Fluent factories over the host engine.
//!
//! Each builder collects authoring-time data (grid cell, dimension tag,
//! kind payload) and `spawn` resolves it: world position from the cell,
//! a texture key, a host visual, and a registry entry. New entities get
//! the current dimension applied immediately, so spawning mid-level never
//! leaves a visual out of step with the controller.

use quantum_core::dimension::DimensionTag;
use quantum_core::entity::{EntityId, EntityKind};
use quantum_core::host::{GridCell, HostEngine, Millis, OverlapGroup, Position, VisualSpec};
use quantum_core::player::PlayerState;
use quantum_core::portal::{PortalGuard, PortalTarget};
use quantum_core::powerup::PowerupEffect;

use crate::level::Level;

/// Borrowed build context: the host, the level being populated and the
/// grid resolution.
pub struct Spawner<'a, E: HostEngine> {
    pub host: &'a mut E,
    pub level: &'a mut Level<E::Handle>,
    pub cell_size: f32,
    pub portal_cooldown_ms: Millis,
}

impl<'a, E: HostEngine> Spawner<'a, E> {
    pub fn new(
        host: &'a mut E,
        level: &'a mut Level<E::Handle>,
        cell_size: f32,
        portal_cooldown_ms: Millis,
    ) -> Self {
        Self {
            host,
            level,
            cell_size,
            portal_cooldown_ms,
        }
    }

    fn place(
        &mut self,
        cell: GridCell,
        dimension: DimensionTag,
        kind: EntityKind,
        texture_key: String,
        group: OverlapGroup,
    ) -> EntityId {
        let position = cell.to_world(self.cell_size);
        let handle = self.host.create_visual_entity(&VisualSpec {
            position,
            texture_key,
            group,
            physics: true,
        });
        let active = self.level.controller.is_active(dimension);
        self.host.set_visible(handle, active);
        self.host.set_physics_enabled(handle, active);
        self.level
            .registry
            .insert(handle, position, dimension, kind)
    }
}

fn tinted(base: &str, dimension: DimensionTag) -> String {
    match dimension {
        DimensionTag::Both => base.to_string(),
        tag => format!("{base}-{tag}"),
    }
}

/// Texture key of a portal in the given activation state.
pub fn portal_texture(active: bool, dimension: DimensionTag) -> String {
    let base = if active { "portal" } else { "portal-inactive" };
    tinted(base, dimension)
}

/// A single platform cell.
#[derive(Debug, Clone)]
pub struct PlatformBuilder {
    cell: GridCell,
    dimension: DimensionTag,
    solid: bool,
    breakable: bool,
}

impl PlatformBuilder {
    pub fn new() -> Self {
        Self {
            cell: GridCell::default(),
            dimension: DimensionTag::Both,
            solid: true,
            breakable: false,
        }
    }

    pub fn at(mut self, col: i32, row: i32) -> Self {
        self.cell = GridCell::new(col, row);
        self
    }

    pub fn dimension(mut self, dimension: DimensionTag) -> Self {
        self.dimension = dimension;
        self
    }

    /// Non-solid platforms are one-way: the host lets the player jump
    /// through from below.
    pub fn solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn breakable(mut self, breakable: bool) -> Self {
        self.breakable = breakable;
        self
    }

    pub fn spawn<E: HostEngine>(self, spawner: &mut Spawner<'_, E>) -> EntityId {
        let base = if self.breakable {
            "platform-breakable"
        } else {
            "platform"
        };
        spawner.place(
            self.cell,
            self.dimension,
            EntityKind::Platform {
                solid: self.solid,
                breakable: self.breakable,
            },
            tinted(base, self.dimension),
            OverlapGroup::Platforms,
        )
    }
}

impl Default for PlatformBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CoinBuilder {
    cell: GridCell,
    dimension: DimensionTag,
    value: u32,
}

impl CoinBuilder {
    pub fn new(value: u32) -> Self {
        Self {
            cell: GridCell::default(),
            dimension: DimensionTag::Both,
            value,
        }
    }

    pub fn at(mut self, col: i32, row: i32) -> Self {
        self.cell = GridCell::new(col, row);
        self
    }

    pub fn dimension(mut self, dimension: DimensionTag) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn spawn<E: HostEngine>(self, spawner: &mut Spawner<'_, E>) -> EntityId {
        spawner.place(
            self.cell,
            self.dimension,
            EntityKind::Collectible { value: self.value },
            tinted("coin", self.dimension),
            OverlapGroup::Collectibles,
        )
    }
}

#[derive(Debug, Clone)]
pub struct PowerupBuilder {
    cell: GridCell,
    dimension: DimensionTag,
    effect: PowerupEffect,
}

impl PowerupBuilder {
    pub fn new(effect: PowerupEffect) -> Self {
        Self {
            cell: GridCell::default(),
            dimension: DimensionTag::Both,
            effect,
        }
    }

    pub fn at(mut self, col: i32, row: i32) -> Self {
        self.cell = GridCell::new(col, row);
        self
    }

    pub fn dimension(mut self, dimension: DimensionTag) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn spawn<E: HostEngine>(self, spawner: &mut Spawner<'_, E>) -> EntityId {
        spawner.place(
            self.cell,
            self.dimension,
            EntityKind::Powerup {
                effect: self.effect,
            },
            format!("powerup-{}", self.effect.as_str()),
            OverlapGroup::Powerups,
        )
    }
}

#[derive(Debug, Clone)]
pub struct PortalBuilder {
    cell: GridCell,
    dimension: DimensionTag,
    target: PortalTarget,
    active: bool,
}

impl PortalBuilder {
    pub fn new(target: PortalTarget) -> Self {
        Self {
            cell: GridCell::default(),
            dimension: DimensionTag::Both,
            target,
            active: true,
        }
    }

    pub fn at(mut self, col: i32, row: i32) -> Self {
        self.cell = GridCell::new(col, row);
        self
    }

    pub fn dimension(mut self, dimension: DimensionTag) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn spawn<E: HostEngine>(self, spawner: &mut Spawner<'_, E>) -> EntityId {
        let guard = PortalGuard::new(self.target, self.active, spawner.portal_cooldown_ms);
        spawner.place(
            self.cell,
            self.dimension,
            EntityKind::Portal(guard),
            portal_texture(self.active, self.dimension),
            OverlapGroup::Portals,
        )
    }
}

/// The player sprite. Never tagged: it is always active.
#[derive(Debug, Clone)]
pub struct PlayerBuilder {
    position: Position,
    lives: u32,
}

impl PlayerBuilder {
    pub fn new(lives: u32) -> Self {
        Self {
            position: Position::default(),
            lives,
        }
    }

    pub fn at_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn spawn<E: HostEngine>(self, host: &mut E) -> (E::Handle, PlayerState) {
        let handle = host.create_visual_entity(&VisualSpec {
            position: self.position,
            texture_key: "player".to_string(),
            group: OverlapGroup::Player,
            physics: true,
        });
        (handle, PlayerState::new(self.position, self.lives))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_core::dimension::Dimension;
    use quantum_core::entity::Category;
    use quantum_core::test_helpers::RecordingHost;

    fn level() -> Level<u32> {
        Level::new("test", GridCell::new(0, 0), Dimension::Light)
    }

    #[test]
    fn platform_resolves_cell_and_texture() {
        let mut host = RecordingHost::new();
        let mut level = level();
        let mut spawner = Spawner::new(&mut host, &mut level, 32.0, 1000);
        let id = PlatformBuilder::new()
            .at(5, 5)
            .dimension(DimensionTag::Dark)
            .breakable(true)
            .spawn(&mut spawner);

        let entity = level.registry.get(id).unwrap();
        assert_eq!(entity.position, Position::new(176.0, 176.0));
        assert_eq!(
            entity.kind,
            EntityKind::Platform {
                solid: true,
                breakable: true
            }
        );
        let visual = host.visual(entity.handle).unwrap();
        assert_eq!(visual.spec.texture_key, "platform-breakable-dark");
        // Spawned while the level is in Light.
        assert!(!visual.visible);
        assert!(!visual.physics_enabled);
    }

    #[test]
    fn each_builder_lands_in_its_category() {
        let mut host = RecordingHost::new();
        let mut level = level();
        let mut spawner = Spawner::new(&mut host, &mut level, 32.0, 1000);
        CoinBuilder::new(10).at(1, 1).spawn(&mut spawner);
        PowerupBuilder::new(PowerupEffect::Speed)
            .at(2, 1)
            .spawn(&mut spawner);
        PortalBuilder::new(PortalTarget::AdvanceLevel)
            .at(3, 1)
            .active(false)
            .spawn(&mut spawner);

        assert_eq!(level.registry.count(Category::Collectible), 1);
        assert_eq!(level.registry.count(Category::Powerup), 1);
        assert_eq!(level.registry.count(Category::Portal), 1);
        assert_eq!(host.handles_in(OverlapGroup::Portals).len(), 1);
        let portal = host.handles_in(OverlapGroup::Portals)[0];
        assert_eq!(
            host.visual(portal).unwrap().spec.texture_key,
            "portal-inactive"
        );
    }

    #[test]
    fn player_is_untagged_and_live() {
        let mut host = RecordingHost::new();
        let (handle, state) = PlayerBuilder::new(3)
            .at_position(Position::new(10.0, 20.0))
            .spawn(&mut host);
        assert!(host.is_live(handle));
        assert_eq!(state.lives, 3);
        assert_eq!(state.position, Position::new(10.0, 20.0));
    }
}
