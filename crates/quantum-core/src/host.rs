use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Host clock reading in milliseconds.
pub type Millis = u64;

/// Continuous world coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Authoring-time grid cell. Levels are laid out on a grid and resolved to
/// world coordinates once, at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Center of the cell in world coordinates.
    pub fn to_world(self, cell_size: f32) -> Position {
        Position {
            x: self.col as f32 * cell_size + cell_size / 2.0,
            y: self.row as f32 * cell_size + cell_size / 2.0,
        }
    }
}

/// Collections the host reports overlaps between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlapGroup {
    Player,
    Platforms,
    Collectibles,
    Powerups,
    Portals,
}

/// Everything the host needs to instantiate a drawable object.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSpec {
    pub position: Position,
    pub texture_key: String,
    pub group: OverlapGroup,
    /// Whether the object gets a physics body at all. Bodies start enabled.
    pub physics: bool,
}

/// Capabilities the game consumes from the rendering/physics engine.
///
/// Gravity, broad-phase collision, drawing and audio stay on the host
/// side. The game only creates objects, toggles their visibility and
/// collision response, and reads the clock. Overlaps between registered
/// groups are reported back to the scene once per frame.
pub trait HostEngine {
    type Handle: Copy + Eq + Hash + fmt::Debug;

    fn create_visual_entity(&mut self, spec: &VisualSpec) -> Self::Handle;

    fn destroy_entity(&mut self, handle: Self::Handle);

    fn set_visible(&mut self, handle: Self::Handle, visible: bool);

    fn set_physics_enabled(&mut self, handle: Self::Handle, enabled: bool);

    /// Ask the host to report overlaps between two groups every frame.
    fn register_overlap(&mut self, a: OverlapGroup, b: OverlapGroup);

    /// Move an existing object, used for player respawns.
    fn set_position(&mut self, handle: Self::Handle, position: Position);

    /// Swap the texture of an existing object, e.g. a portal switching on.
    fn set_texture(&mut self, handle: Self::Handle, texture_key: &str);

    fn now(&self) -> Millis;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_cell_resolves_to_center() {
        let p = GridCell::new(5, 5).to_world(32.0);
        assert_eq!(p, Position::new(176.0, 176.0));
    }

    #[test]
    fn negative_cells_resolve() {
        let p = GridCell::new(-1, 0).to_world(10.0);
        assert_eq!(p, Position::new(-5.0, 5.0));
    }
}
