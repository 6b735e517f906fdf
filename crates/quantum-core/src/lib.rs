pub mod controller;
pub mod dimension;
pub mod entity;
pub mod events;
pub mod host;
pub mod player;
pub mod portal;
pub mod powerup;
pub mod registry;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;

    use crate::host::{HostEngine, Millis, OverlapGroup, Position, VisualSpec};

    /// Host-side state of one visual object as seen by [`RecordingHost`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedVisual {
        pub spec: VisualSpec,
        pub visible: bool,
        pub physics_enabled: bool,
        pub destroyed: bool,
    }

    /// In-memory host engine that records every call, with a manual clock.
    ///
    /// Objects start visible with physics enabled, like a freshly created
    /// sprite, so tests can tell whether the game applied the policy.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        visuals: HashMap<u32, RecordedVisual>,
        next_handle: u32,
        now: Millis,
        pub overlaps: Vec<(OverlapGroup, OverlapGroup)>,
    }

    impl RecordingHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn advance(&mut self, ms: Millis) {
            self.now += ms;
        }

        pub fn set_time(&mut self, now: Millis) {
            self.now = now;
        }

        pub fn visual(&self, handle: u32) -> Option<&RecordedVisual> {
            self.visuals.get(&handle)
        }

        /// Visible, solid and not destroyed.
        pub fn is_live(&self, handle: u32) -> bool {
            self.visuals
                .get(&handle)
                .is_some_and(|v| v.visible && v.physics_enabled && !v.destroyed)
        }

        pub fn is_destroyed(&self, handle: u32) -> bool {
            self.visuals.get(&handle).is_some_and(|v| v.destroyed)
        }

        /// Handles of every non-destroyed object in `group`, ascending.
        pub fn handles_in(&self, group: OverlapGroup) -> Vec<u32> {
            let mut handles: Vec<u32> = self
                .visuals
                .iter()
                .filter(|(_, v)| v.spec.group == group && !v.destroyed)
                .map(|(&h, _)| h)
                .collect();
            handles.sort_unstable();
            handles
        }

        pub fn live_count(&self) -> usize {
            self.visuals.values().filter(|v| !v.destroyed).count()
        }
    }

    impl HostEngine for RecordingHost {
        type Handle = u32;

        fn create_visual_entity(&mut self, spec: &VisualSpec) -> u32 {
            let handle = self.next_handle;
            self.next_handle += 1;
            self.visuals.insert(
                handle,
                RecordedVisual {
                    spec: spec.clone(),
                    visible: true,
                    physics_enabled: spec.physics,
                    destroyed: false,
                },
            );
            handle
        }

        fn destroy_entity(&mut self, handle: u32) {
            if let Some(v) = self.visuals.get_mut(&handle) {
                v.destroyed = true;
                v.visible = false;
                v.physics_enabled = false;
            }
        }

        fn set_visible(&mut self, handle: u32, visible: bool) {
            if let Some(v) = self.visuals.get_mut(&handle) {
                v.visible = visible;
            }
        }

        fn set_physics_enabled(&mut self, handle: u32, enabled: bool) {
            if let Some(v) = self.visuals.get_mut(&handle) {
                v.physics_enabled = enabled;
            }
        }

        fn register_overlap(&mut self, a: OverlapGroup, b: OverlapGroup) {
            self.overlaps.push((a, b));
        }

        fn set_position(&mut self, handle: u32, position: Position) {
            if let Some(v) = self.visuals.get_mut(&handle) {
                v.spec.position = position;
            }
        }

        fn set_texture(&mut self, handle: u32, texture_key: &str) {
            if let Some(v) = self.visuals.get_mut(&handle) {
                v.spec.texture_key = texture_key.to_string();
            }
        }

        fn now(&self) -> Millis {
            self.now
        }
    }
}
