//! Component Storage
//!
//! Components are plain data attached to entities. `ComponentStorage<T>`
//! is a sparse array mapping entity indices to component data - simple
//! Option holes instead of archetype tables, which is plenty for a scene
//! of a dozen actors.

use super::entity::Entity;

/// Sparse storage for a single component type.
///
/// Slots are addressed by the entity's index alone; the `World` clears a
/// slot across every storage when the entity despawns, so a reused index
/// never sees a previous occupant's data.
pub struct ComponentStorage<T> {
    slots: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn grow_to(&mut self, index: usize) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
    }

    /// Attach a component to an entity, replacing any existing one.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let slot = entity.index() as usize;
        self.grow_to(slot);
        self.slots[slot] = Some(component);
    }

    /// Detach and return an entity's component, if present.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.slots.get_mut(entity.index() as usize)?.take()
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.index() as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.index() as usize)?.as_mut()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Indices of the entities holding this component, ascending.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, occupant)| occupant.as_ref().map(|_| slot as u32))
    }

    /// Drop whatever occupies a slot. Used by despawn cleanup, which only
    /// has the raw index.
    pub fn clear_slot(&mut self, index: u32) {
        if let Some(occupant) = self.slots.get_mut(index as usize) {
            *occupant = None;
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::EntityAllocator;

    #[test]
    fn test_insert_get_remove() {
        let mut alloc = EntityAllocator::new();
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();

        let e = alloc.allocate();
        storage.insert(e, 42);
        assert!(storage.contains(e));
        assert_eq!(storage.get(e), Some(&42));

        // Insert overwrites
        storage.insert(e, 7);
        assert_eq!(storage.get(e), Some(&7));

        assert_eq!(storage.remove(e), Some(7));
        assert!(!storage.contains(e));
        assert_eq!(storage.get(e), None);
    }

    #[test]
    fn test_indices_skip_holes() {
        let mut alloc = EntityAllocator::new();
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();

        let a = alloc.allocate();
        let b = alloc.allocate();
        let c = alloc.allocate();
        storage.insert(a, "a");
        storage.insert(c, "c");
        let _ = b;

        let indices: Vec<u32> = storage.indices().collect();
        assert_eq!(indices, vec![a.index(), c.index()]);
    }
}
