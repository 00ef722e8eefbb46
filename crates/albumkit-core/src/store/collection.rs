// ── Generic entity collection ──
//
// Insertion-ordered storage keyed by `EntityId`. Ids are unique: adding
// an entity whose id is already present replaces it in place.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::model::{Entity, EntityId};

/// An ordered collection for a single entity type.
///
/// Backed by an `IndexMap` so lookups by id are O(1) while iteration
/// keeps the order entities arrived in (first-match lookups and
/// grouping views depend on it).
#[derive(Debug, Clone)]
pub struct EntityCollection<T> {
    by_id: IndexMap<EntityId, T>,
}

impl<T: Entity> EntityCollection<T> {
    pub fn new() -> Self {
        Self {
            by_id: IndexMap::new(),
        }
    }

    /// Replace the whole collection. Duplicate ids collapse onto the
    /// position of their first occurrence, holding the last value.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.by_id.clear();
        for item in items {
            self.upsert(item);
        }
    }

    /// Insert or replace an entity. Returns `true` if the id was new.
    pub fn upsert(&mut self, item: T) -> bool {
        match self.by_id.entry(item.id().clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(item);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
                true
            }
        }
    }

    /// Remove an entity by id, preserving the order of the rest.
    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        self.by_id.shift_remove(id)
    }

    /// Remove every entity whose id is in `ids`. Returns how many went.
    pub fn remove_many(&mut self, ids: &[EntityId]) -> usize {
        let before = self.by_id.len();
        self.by_id.retain(|id, _| !ids.contains(id));
        before - self.by_id.len()
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut T> {
        self.by_id.get_mut(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.by_id.values()
    }

    /// Owned copy of every entity, in order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.by_id.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<T: Entity> Default for EntityCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}
