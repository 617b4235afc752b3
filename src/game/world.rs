//! Game World
//!
//! The World is the central container for all game state: entity
//! allocation, one typed storage per component, and a deferred despawn
//! queue so structural changes never happen under a live iteration.
//!
//! Components are stored in typed fields rather than a HashMap<TypeId, ...>
//! because the component set is known at compile time.

use super::component::ComponentStorage;
use super::components::{PlayerControlled, Position, Renderable, Velocity, Wander};
use super::entity::{Entity, EntityAllocator};

/// Names the component types, for building view signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Position,
    Velocity,
    Renderable,
    PlayerControlled,
    Wander,
}

impl ComponentKind {
    /// Every component kind, in storage order.
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Position,
        ComponentKind::Velocity,
        ComponentKind::Renderable,
        ComponentKind::PlayerControlled,
        ComponentKind::Wander,
    ];
}

/// The game world containing all entities and their components.
pub struct World {
    /// Entity allocator for creating/destroying entities
    entities: EntityAllocator,

    /// Entities queued for despawn at end of frame
    despawn_queue: Vec<Entity>,

    /// World-space coordinates
    pub positions: ComponentStorage<Position>,

    /// Speed vectors for moving entities
    pub velocities: ComponentStorage<Velocity>,

    /// Textured-quad visuals
    pub renderables: ComponentStorage<Renderable>,

    /// Key bindings for the single player actor
    pub player_controls: ComponentStorage<PlayerControlled>,

    /// Wander targets for AI-steered entities
    pub wanderers: ComponentStorage<Wander>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),
            positions: ComponentStorage::new(),
            velocities: ComponentStorage::new(),
            renderables: ComponentStorage::new(),
            player_controls: ComponentStorage::new(),
            wanderers: ComponentStorage::new(),
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Spawn a new empty entity. Returns the handle for attaching components.
    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Queue an entity for despawn at end of frame.
    /// This is safer than immediate despawn during iteration.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Immediately despawn an entity and all its components.
    /// Prefer `despawn()` during gameplay to avoid iterator issues.
    pub fn despawn_immediate(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return; // Already dead
        }

        let idx = entity.index();
        self.positions.clear_slot(idx);
        self.velocities.clear_slot(idx);
        self.renderables.clear_slot(idx);
        self.player_controls.clear_slot(idx);
        self.wanderers.clear_slot(idx);
    }

    /// Process all queued despawns. Call at end of frame.
    pub fn flush_despawns(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for entity in queue {
            self.despawn_immediate(entity);
        }
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Get the number of alive entities.
    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// Destroy all entities and components. Used at scene teardown.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.despawn_queue.clear();
        self.positions.clear();
        self.velocities.clear();
        self.renderables.clear();
        self.player_controls.clear();
        self.wanderers.clear();
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Check if a live entity holds the given component kind.
    pub fn has(&self, entity: Entity, kind: ComponentKind) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        match kind {
            ComponentKind::Position => self.positions.contains(entity),
            ComponentKind::Velocity => self.velocities.contains(entity),
            ComponentKind::Renderable => self.renderables.contains(entity),
            ComponentKind::PlayerControlled => self.player_controls.contains(entity),
            ComponentKind::Wander => self.wanderers.contains(entity),
        }
    }

    /// Occupied slot indices for one storage, in ascending order.
    fn indices(&self, kind: ComponentKind) -> Box<dyn Iterator<Item = u32> + '_> {
        match kind {
            ComponentKind::Position => Box::new(self.positions.indices()),
            ComponentKind::Velocity => Box::new(self.velocities.indices()),
            ComponentKind::Renderable => Box::new(self.renderables.indices()),
            ComponentKind::PlayerControlled => Box::new(self.player_controls.indices()),
            ComponentKind::Wander => Box::new(self.wanderers.indices()),
        }
    }

    /// Lazy, restartable iteration over entities that hold every component
    /// in `include` and none in `exclude`.
    ///
    /// Seeded from the first include storage and cross-checked against the
    /// rest. Within one pass each matching entity is visited exactly once,
    /// in ascending slot order; order across passes may differ after slot
    /// reuse. An empty include set matches nothing.
    pub fn view<'a>(
        &'a self,
        include: &'a [ComponentKind],
        exclude: &'a [ComponentKind],
    ) -> impl Iterator<Item = Entity> + 'a {
        include.split_first().into_iter().flat_map(move |(first, rest)| {
            self.indices(*first).filter_map(move |idx| {
                let entity = self.entities.entity_at(idx);
                let matches = self.is_alive(entity)
                    && rest.iter().all(|kind| self.has(entity, *kind))
                    && !exclude.iter().any(|kind| self.has(entity, *kind));
                matches.then_some(entity)
            })
        })
    }

    // =========================================================================
    // Player
    // =========================================================================

    /// Attach player controls to an entity.
    ///
    /// Panics if another live entity is already player-controlled: the
    /// input system is written against exactly one player, and a second
    /// one is a bug at the spawn site.
    pub fn attach_player_controls(&mut self, entity: Entity, controls: PlayerControlled) {
        assert!(
            self.player().is_none(),
            "a player-controlled entity already exists"
        );
        self.player_controls.insert(entity, controls);
    }

    /// The unique player-controlled entity, if one has been spawned.
    pub fn player(&self) -> Option<Entity> {
        self.view(&[ComponentKind::PlayerControlled], &[]).next()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureId;

    #[test]
    fn test_spawn_and_despawn() {
        let mut world = World::new();

        let e1 = world.spawn();
        let e2 = world.spawn();
        assert_eq!(world.entity_count(), 2);

        world.despawn_immediate(e1);
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_alive(e1));
        assert!(world.is_alive(e2));
    }

    #[test]
    fn test_deferred_despawn_keeps_entity_until_flush() {
        let mut world = World::new();
        let e = world.spawn();
        world.positions.insert(e, Position::new(1.0, 2.0));

        world.despawn(e);
        assert!(world.is_alive(e));
        assert!(world.positions.contains(e));

        world.flush_despawns();
        assert!(!world.is_alive(e));
        assert!(!world.positions.contains(e));
    }

    #[test]
    fn test_view_include_exclude() {
        let mut world = World::new();

        let moving_drawn = world.spawn();
        world.positions.insert(moving_drawn, Position::default());
        world.velocities.insert(moving_drawn, Velocity::default());
        world
            .renderables
            .insert(moving_drawn, Renderable::new(TextureId::EMPTY, 10.0));

        let moving_hidden = world.spawn();
        world.positions.insert(moving_hidden, Position::default());
        world.velocities.insert(moving_hidden, Velocity::default());

        let static_drawn = world.spawn();
        world.positions.insert(static_drawn, Position::default());
        world
            .renderables
            .insert(static_drawn, Renderable::new(TextureId::EMPTY, 10.0));

        let movers: Vec<Entity> = world
            .view(&[ComponentKind::Position, ComponentKind::Velocity], &[])
            .collect();
        assert_eq!(movers, vec![moving_drawn, moving_hidden]);

        let hidden_movers: Vec<Entity> = world
            .view(
                &[ComponentKind::Position, ComponentKind::Velocity],
                &[ComponentKind::Renderable],
            )
            .collect();
        assert_eq!(hidden_movers, vec![moving_hidden]);

        let empty: Vec<Entity> = world.view(&[], &[]).collect();
        assert!(empty.is_empty());
    }

    /// Exhaustive check over the power set of component kinds: for every
    /// subset an entity is built holding exactly that subset, then
    /// view(Position+Velocity, exclude Renderable) must return precisely
    /// the entities whose subset is a superset of the include set and
    /// disjoint from the exclusion.
    #[test]
    fn test_view_completeness_over_power_set() {
        let mut world = World::new();
        let kinds = ComponentKind::ALL;
        let mut expected = Vec::new();

        for mask in 0u32..(1 << kinds.len()) {
            let entity = world.spawn();
            for (bit, kind) in kinds.iter().enumerate() {
                if mask & (1 << bit) == 0 {
                    continue;
                }
                match kind {
                    ComponentKind::Position => {
                        world.positions.insert(entity, Position::default())
                    }
                    ComponentKind::Velocity => {
                        world.velocities.insert(entity, Velocity::default())
                    }
                    ComponentKind::Renderable => world
                        .renderables
                        .insert(entity, Renderable::new(TextureId::EMPTY, 1.0)),
                    ComponentKind::PlayerControlled => world
                        .player_controls
                        .insert(entity, PlayerControlled::wasd()),
                    ComponentKind::Wander => {
                        world.wanderers.insert(entity, Wander::new(0.0, 0.0))
                    }
                }
            }
            // Position=bit0, Velocity=bit1, Renderable=bit2
            if mask & 0b11 == 0b11 && mask & 0b100 == 0 {
                expected.push(entity);
            }
        }

        let mut got: Vec<Entity> = world
            .view(
                &[ComponentKind::Position, ComponentKind::Velocity],
                &[ComponentKind::Renderable],
            )
            .collect();
        got.sort_by_key(Entity::index);
        expected.sort_by_key(Entity::index);
        assert_eq!(got, expected);
    }

    #[test]
    fn test_single_player_enforced() {
        let mut world = World::new();
        let p = world.spawn();
        world.attach_player_controls(p, PlayerControlled::wasd());
        assert_eq!(world.player(), Some(p));

        let other = world.spawn();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            world.attach_player_controls(other, PlayerControlled::wasd());
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_player_slot_frees_on_despawn() {
        let mut world = World::new();
        let p = world.spawn();
        world.attach_player_controls(p, PlayerControlled::wasd());

        world.despawn_immediate(p);
        assert_eq!(world.player(), None);

        // A new player may be attached once the old one is gone
        let p2 = world.spawn();
        world.attach_player_controls(p2, PlayerControlled::wasd());
        assert_eq!(world.player(), Some(p2));
    }
}
