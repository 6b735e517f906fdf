//! Scripted player for headless runs.
//!
//! The walker moves one column right per frame. At each column it looks
//! for the highest platform it can step onto, switching dimension when
//! only the other one offers footing (or offers higher footing). With no
//! footing in either dimension it falls out of the world.

use quantum_core::dimension::{Dimension, is_active};
use quantum_core::entity::{Category, EntityKind};
use quantum_core::events::GameEvent;
use quantum_core::host::{GridCell, HostEngine};
use quantum_jumper::level::Level;
use quantum_jumper::{FrameReport, InputAction, QuantumJumper};

use crate::host::HeadlessHost;

/// Rows the walker can climb in one step.
const STEP_UP: i32 = 4;

pub type Scene = QuantumJumper<HeadlessHost>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    pub cell: GridCell,
    /// Last column holding any entity; reaching past it ends the level.
    pub end_col: i32,
}

fn column(x: f32, cell_size: f32) -> i32 {
    (x / cell_size).floor() as i32
}

/// Topmost platform row in `col`, at or below `min_row`, active in `dimension`.
fn footing(level: &Level<u32>, cell_size: f32, col: i32, min_row: i32, dimension: Dimension) -> Option<i32> {
    level
        .registry
        .iter_category(Category::Platform)
        .filter(|e| is_active(e.dimension, dimension))
        .filter(|e| matches!(e.kind, EntityKind::Platform { solid: true, .. }))
        .filter(|e| column(e.position.x, cell_size) == col)
        .map(|e| column(e.position.y, cell_size))
        .filter(|&row| row >= min_row)
        .min()
}

impl Walker {
    /// Start at the loaded level's spawn.
    pub fn enter(scene: &Scene) -> Option<Self> {
        let level = scene.level()?;
        let cell_size = scene.config().cell_size;
        let end_col = level
            .registry
            .iter()
            .map(|e| column(e.position.x, cell_size))
            .max()
            .unwrap_or(level.spawn.col);
        Some(Self {
            cell: level.spawn,
            end_col,
        })
    }

    /// Plan and perform one step. Dimension switches are issued through
    /// `scene.handle_input` and their events appended to `events`.
    /// Returns `None` once the walker is past the end of the level.
    pub fn step(&mut self, scene: &mut Scene, events: &mut Vec<GameEvent>) -> Option<FrameReport<u32>> {
        let next = self.cell.col + 1;
        if next > self.end_col {
            return None;
        }
        let cell_size = scene.config().cell_size;
        let current = scene.current_dimension()?;
        let other = current.toggled();
        let min_row = self.cell.row + 1 - STEP_UP;

        let (here, there) = {
            let level = scene.level()?;
            (
                footing(level, cell_size, next, min_row, current),
                footing(level, cell_size, next, min_row, other),
            )
        };
        let landing = match (here, there) {
            (h, Some(t)) if h.is_none_or(|h| t < h) => {
                events.extend(scene.handle_input(InputAction::SwitchDimension));
                Some(t)
            },
            (h, _) => h,
        };

        let Some(row) = landing else {
            tracing::debug!(col = next, "No footing, falling");
            self.cell = scene.level()?.spawn;
            return Some(FrameReport {
                fell_out: true,
                ..FrameReport::default()
            });
        };

        self.cell = GridCell::new(next, row - 1);
        let position = self.cell.to_world(cell_size);
        let player = scene.player_handle()?;
        scene.host_mut().set_position(player, position);
        Some(FrameReport {
            overlaps: scene.host().overlaps_with(player),
            player_position: Some(position),
            fell_out: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_jumper::config::JumperConfig;
    use quantum_jumper::level::LevelLayout;

    const GAP: &str = r#"
        name = "Gap"
        spawn = { col = 0, row = 3 }

        [[platforms]]
        col = 0
        row = 5
        width = 2

        [[platforms]]
        col = 2
        row = 5
        dimension = "dark"

        [[platforms]]
        col = 3
        row = 5
        width = 2

        [[coins]]
        col = 3
        row = 4
    "#;

    fn scene() -> Scene {
        let layout = LevelLayout::from_toml(GAP).unwrap();
        let config = JumperConfig::default();
        let mut scene = QuantumJumper::new(HeadlessHost::new(config.cell_size), config, vec![layout]);
        scene.create(0).unwrap();
        scene
    }

    #[test]
    fn switches_to_cross_one_dimension_gap() {
        let mut scene = scene();
        let mut walker = Walker::enter(&scene).unwrap();
        let mut events = Vec::new();

        walker.step(&mut scene, &mut events).unwrap();
        assert!(events.is_empty());
        walker.step(&mut scene, &mut events).unwrap();
        assert_eq!(scene.current_dimension(), Some(Dimension::Dark));
        assert_eq!(walker.cell, GridCell::new(2, 4));

        let report = walker.step(&mut scene, &mut events).unwrap();
        assert_eq!(report.overlaps.len(), 1);
        assert!(!report.fell_out);
    }

    #[test]
    fn shared_platforms_give_footing_in_both_dimensions() {
        let scene = scene();
        let level = scene.level().unwrap();
        for d in [Dimension::Light, Dimension::Dark] {
            assert_eq!(footing(level, 32.0, 1, 0, d), Some(5));
            assert_eq!(footing(level, 32.0, 3, 0, d), Some(5));
        }
        assert_eq!(footing(level, 32.0, 2, 0, Dimension::Light), None);
        assert_eq!(footing(level, 32.0, 2, 0, Dimension::Dark), Some(5));
    }

    #[test]
    fn stops_past_last_column() {
        let mut scene = scene();
        let mut walker = Walker::enter(&scene).unwrap();
        let mut events = Vec::new();
        for _ in 0..4 {
            assert!(walker.step(&mut scene, &mut events).is_some());
        }
        assert!(walker.step(&mut scene, &mut events).is_none());
    }
}
