use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::dimension::DimensionTag;
use crate::entity::{Category, Entity, EntityId, EntityKind};
use crate::host::Position;

/// Every placed entity of one level, addressable by id or by host handle.
///
/// Iteration order is creation order so the re-apply pass and tests are
/// deterministic.
#[derive(Debug, Clone)]
pub struct EntityRegistry<H> {
    entities: BTreeMap<EntityId, Entity<H>>,
    /// O(1) lookup companion for resolving overlap handles.
    by_handle: HashMap<H, EntityId>,
    next_id: u32,
}

impl<H: Copy + Eq + Hash> EntityRegistry<H> {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            by_handle: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn insert(
        &mut self,
        handle: H,
        position: Position,
        dimension: DimensionTag,
        kind: EntityKind,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.by_handle.insert(handle, id);
        self.entities.insert(
            id,
            Entity {
                id,
                handle,
                position,
                dimension,
                kind,
            },
        );
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<H>> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<H>> {
        self.entities.get_mut(&id)
    }

    pub fn id_for_handle(&self, handle: H) -> Option<EntityId> {
        self.by_handle.get(&handle).copied()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Remove an entity. Returns `None` if it was already gone, which is
    /// what makes pickups idempotent.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity<H>> {
        let entity = self.entities.remove(&id)?;
        self.by_handle.remove(&entity.handle);
        Some(entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity<H>> {
        self.entities.values()
    }

    pub fn iter_category(&self, category: Category) -> impl Iterator<Item = &Entity<H>> {
        self.entities
            .values()
            .filter(move |e| e.category() == category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.iter_category(category).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Empty the registry, yielding every entity for host-side teardown.
    pub fn drain(&mut self) -> Vec<Entity<H>> {
        self.by_handle.clear();
        std::mem::take(&mut self.entities).into_values().collect()
    }
}

impl<H: Copy + Eq + Hash> Default for EntityRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
