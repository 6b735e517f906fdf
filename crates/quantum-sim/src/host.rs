use std::collections::HashMap;

use quantum_core::host::{HostEngine, Millis, OverlapGroup, Position, VisualSpec};

#[derive(Debug, Clone)]
struct Body {
    position: Position,
    group: OverlapGroup,
    visible: bool,
    physics_enabled: bool,
}

/// Headless host: axis-aligned cell-sized boxes, a manual clock, and
/// overlap queries between registered groups.
#[derive(Debug)]
pub struct HeadlessHost {
    bodies: HashMap<u32, Body>,
    pairs: Vec<(OverlapGroup, OverlapGroup)>,
    next_handle: u32,
    now: Millis,
    half_extent: f32,
}

impl HeadlessHost {
    pub fn new(cell_size: f32) -> Self {
        Self {
            bodies: HashMap::new(),
            pairs: Vec::new(),
            next_handle: 1,
            now: 0,
            half_extent: cell_size / 2.0,
        }
    }

    pub fn advance(&mut self, ms: Millis) {
        self.now += ms;
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn visible_count(&self) -> usize {
        self.bodies.values().filter(|b| b.visible).count()
    }

    fn pair_registered(&self, a: OverlapGroup, b: OverlapGroup) -> bool {
        self.pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Every enabled body overlapping `subject`, sorted by handle so a frame
    /// delivers in creation order.
    pub fn overlaps_with(&self, subject: u32) -> Vec<u32> {
        let Some(me) = self.bodies.get(&subject) else {
            return Vec::new();
        };
        let reach = self.half_extent * 2.0;
        let mut hits: Vec<u32> = self
            .bodies
            .iter()
            .filter(|&(&h, b)| {
                h != subject
                    && b.physics_enabled
                    && self.pair_registered(me.group, b.group)
                    && (b.position.x - me.position.x).abs() < reach
                    && (b.position.y - me.position.y).abs() < reach
            })
            .map(|(&h, _)| h)
            .collect();
        hits.sort_unstable();
        hits
    }
}

impl HostEngine for HeadlessHost {
    type Handle = u32;

    fn create_visual_entity(&mut self, spec: &VisualSpec) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            Body {
                position: spec.position,
                group: spec.group,
                visible: true,
                physics_enabled: spec.physics,
            },
        );
        handle
    }

    fn destroy_entity(&mut self, handle: u32) {
        self.bodies.remove(&handle);
    }

    fn set_visible(&mut self, handle: u32, visible: bool) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.visible = visible;
        }
    }

    fn set_physics_enabled(&mut self, handle: u32, enabled: bool) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.physics_enabled = enabled;
        }
    }

    fn register_overlap(&mut self, a: OverlapGroup, b: OverlapGroup) {
        if !self.pair_registered(a, b) {
            self.pairs.push((a, b));
        }
    }

    fn set_position(&mut self, handle: u32, position: Position) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.position = position;
        }
    }

    // Nothing is drawn headless.
    fn set_texture(&mut self, _handle: u32, _texture_key: &str) {}

    fn now(&self) -> Millis {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(host: &mut HeadlessHost, x: f32, group: OverlapGroup) -> u32 {
        host.create_visual_entity(&VisualSpec {
            position: Position::new(x, 16.0),
            texture_key: "test".into(),
            group,
            physics: true,
        })
    }

    #[test]
    fn overlaps_need_registered_pair() {
        let mut host = HeadlessHost::new(32.0);
        let player = spawn(&mut host, 16.0, OverlapGroup::Player);
        let coin = spawn(&mut host, 20.0, OverlapGroup::Collectibles);
        assert!(host.overlaps_with(player).is_empty());

        host.register_overlap(OverlapGroup::Player, OverlapGroup::Collectibles);
        assert_eq!(host.overlaps_with(player), vec![coin]);
    }

    #[test]
    fn adjacent_cells_do_not_overlap() {
        let mut host = HeadlessHost::new(32.0);
        host.register_overlap(OverlapGroup::Player, OverlapGroup::Collectibles);
        let player = spawn(&mut host, 16.0, OverlapGroup::Player);
        spawn(&mut host, 48.0, OverlapGroup::Collectibles);
        assert!(host.overlaps_with(player).is_empty());
    }

    #[test]
    fn disabled_and_destroyed_bodies_are_skipped() {
        let mut host = HeadlessHost::new(32.0);
        host.register_overlap(OverlapGroup::Player, OverlapGroup::Portals);
        let player = spawn(&mut host, 16.0, OverlapGroup::Player);
        let a = spawn(&mut host, 16.0, OverlapGroup::Portals);
        let b = spawn(&mut host, 16.0, OverlapGroup::Portals);
        host.set_physics_enabled(a, false);
        host.destroy_entity(b);
        assert!(host.overlaps_with(player).is_empty());
        assert_eq!(host.body_count(), 2);
    }
}
