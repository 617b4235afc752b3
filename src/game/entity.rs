//! Entities with Generational Indices
//!
//! An entity is a lightweight identifier: a slot index into the component
//! arrays plus a generation counter. Freed slots get reused with a bumped
//! generation, so a stale handle to a despawned wanderer never matches
//! whatever actor later lands in its slot.

/// A unique identifier for a game entity. Two entities with the same
/// index but different generations are different entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address the component storages.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Allocates entity slots and tracks their lifetimes.
pub struct EntityAllocator {
    /// Current generation of every slot ever handed out
    generations: Vec<u32>,
    /// Slots available for reuse (LIFO)
    free: Vec<u32>,
    /// First never-used index
    next_index: u32,
    alive: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
            next_index: 0,
            alive: 0,
        }
    }

    /// Allocate a fresh entity. O(1) amortized.
    pub fn allocate(&mut self) -> Entity {
        self.alive += 1;
        match self.free.pop() {
            // Reused slot: its generation was bumped when it was freed
            Some(index) => Entity::new(index, self.generations[index as usize]),
            None => {
                let index = self.next_index;
                self.next_index += 1;
                self.generations.push(0);
                Entity::new(index, 0)
            }
        }
    }

    /// Free an entity's slot for reuse. Returns false if the handle was
    /// already stale.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        // Bumping the generation invalidates every outstanding handle
        self.generations[entity.index as usize] += 1;
        self.free.push(entity.index);
        self.alive -= 1;
        true
    }

    /// Whether the handle still refers to a live slot.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index as usize)
            .is_some_and(|gen| *gen == entity.generation)
    }

    /// Rebuild a live handle for a slot from its index.
    ///
    /// Only meaningful for slots known to hold components: a freed slot
    /// has had its component data cleared, so storage iteration never
    /// yields its index.
    pub fn entity_at(&self, index: u32) -> Entity {
        Entity::new(index, self.generations[index as usize])
    }

    pub fn alive_count(&self) -> u32 {
        self.alive
    }

    /// Invalidate every entity and put all slots back on the free list.
    pub fn clear(&mut self) {
        for gen in &mut self.generations {
            *gen += 1;
        }
        self.free.clear();
        self.free.extend(0..self.next_index);
        self.alive = 0;
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
