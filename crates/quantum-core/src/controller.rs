use crate::dimension::{Dimension, DimensionTag, is_active};
use crate::events::GameEvent;
use crate::host::HostEngine;
use crate::registry::EntityRegistry;

/// Owner of the current dimension.
///
/// Every change runs a full re-apply pass over the registry before
/// returning, so no frame can render with some entities updated and
/// others not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionController {
    current: Dimension,
}

impl DimensionController {
    pub fn new(initial: Dimension) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Dimension {
        self.current
    }

    /// Whether an entity with `tag` is live right now.
    pub fn is_active(&self, tag: DimensionTag) -> bool {
        is_active(tag, self.current)
    }

    /// Toggle Light <-> Dark and re-apply.
    pub fn switch_dimension<E: HostEngine>(
        &mut self,
        registry: &EntityRegistry<E::Handle>,
        host: &mut E,
    ) -> GameEvent {
        let target = self.current.toggled();
        self.set_dimension(target, registry, host)
    }

    /// Absolute set. The re-apply pass runs even when nothing changed.
    pub fn set_dimension<E: HostEngine>(
        &mut self,
        dimension: Dimension,
        registry: &EntityRegistry<E::Handle>,
        host: &mut E,
    ) -> GameEvent {
        let from = self.current;
        self.current = dimension;
        self.reapply(registry, host);
        tracing::debug!(%from, to = %dimension, entities = registry.len(), "Dimension set");
        GameEvent::DimensionChanged {
            from,
            to: dimension,
        }
    }

    /// Push visibility and collision-enable for every registered entity.
    pub fn reapply<E: HostEngine>(&self, registry: &EntityRegistry<E::Handle>, host: &mut E) {
        for entity in registry.iter() {
            let active = self.is_active(entity.dimension);
            host.set_visible(entity.handle, active);
            host.set_physics_enabled(entity.handle, active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::host::{GridCell, OverlapGroup, VisualSpec};
    use crate::test_helpers::RecordingHost;

    fn platform(
        registry: &mut EntityRegistry<u32>,
        host: &mut RecordingHost,
        tag: DimensionTag,
    ) -> u32 {
        let position = GridCell::new(5, 5).to_world(32.0);
        let handle = host.create_visual_entity(&VisualSpec {
            position,
            texture_key: "platform".into(),
            group: OverlapGroup::Platforms,
            physics: true,
        });
        registry.insert(
            handle,
            position,
            tag,
            EntityKind::Platform {
                solid: true,
                breakable: false,
            },
        );
        handle
    }

    #[test]
    fn switch_swaps_overlapping_platforms_in_one_call() {
        let mut host = RecordingHost::new();
        let mut registry = EntityRegistry::new();
        let light = platform(&mut registry, &mut host, DimensionTag::Light);
        let dark = platform(&mut registry, &mut host, DimensionTag::Dark);

        let mut controller = DimensionController::new(Dimension::Light);
        controller.reapply(&registry, &mut host);
        assert!(host.is_live(light));
        assert!(!host.is_live(dark));

        let event = controller.switch_dimension(&registry, &mut host);
        assert_eq!(
            event,
            GameEvent::DimensionChanged {
                from: Dimension::Light,
                to: Dimension::Dark
            }
        );
        assert!(!host.is_live(light));
        assert!(host.is_live(dark));
    }

    #[test]
    fn set_same_dimension_still_reapplies() {
        let mut host = RecordingHost::new();
        let mut registry = EntityRegistry::new();
        let dark = platform(&mut registry, &mut host, DimensionTag::Dark);
        let mut controller = DimensionController::new(Dimension::Light);

        // Host starts every body enabled; only a re-apply hides it.
        assert!(host.is_live(dark));
        controller.set_dimension(Dimension::Light, &registry, &mut host);
        assert!(!host.is_live(dark));
        assert_eq!(controller.current(), Dimension::Light);
    }

    #[test]
    fn both_tag_survives_every_switch() {
        let mut host = RecordingHost::new();
        let mut registry = EntityRegistry::new();
        let both = platform(&mut registry, &mut host, DimensionTag::Both);
        let mut controller = DimensionController::default();
        for _ in 0..5 {
            controller.switch_dimension(&registry, &mut host);
            assert!(host.is_live(both));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn tag_strategy() -> impl Strategy<Value = DimensionTag> {
            prop_oneof![
                Just(DimensionTag::Light),
                Just(DimensionTag::Dark),
                Just(DimensionTag::Both),
            ]
        }

        #[derive(Debug, Clone)]
        enum Op {
            Switch,
            Set(Dimension),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Switch),
                Just(Op::Set(Dimension::Light)),
                Just(Op::Set(Dimension::Dark)),
            ]
        }

        proptest! {
            #[test]
            fn visibility_and_physics_never_disagree(
                tags in proptest::collection::vec(tag_strategy(), 1..40),
                ops in proptest::collection::vec(op_strategy(), 1..30),
            ) {
                let mut host = RecordingHost::new();
                let mut registry = EntityRegistry::new();
                for tag in &tags {
                    platform(&mut registry, &mut host, *tag);
                }
                let mut controller = DimensionController::new(Dimension::Light);
                controller.reapply(&registry, &mut host);

                for op in ops {
                    match op {
                        Op::Switch => {
                            controller.switch_dimension(&registry, &mut host);
                        },
                        Op::Set(d) => {
                            controller.set_dimension(d, &registry, &mut host);
                        },
                    }
                    for entity in registry.iter() {
                        let visual = host.visual(entity.handle).unwrap();
                        let expected = is_active(entity.dimension, controller.current());
                        prop_assert_eq!(visual.visible, visual.physics_enabled);
                        prop_assert_eq!(visual.visible, expected);
                    }
                }
            }
        }
    }
}
