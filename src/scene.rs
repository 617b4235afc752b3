//! Game Scene
//!
//! Owns the world, the terrain, and the loop state for one run of the
//! arena. Each rendered frame: pace to the frame budget, sample input,
//! absorb elapsed time into the fixed-timestep accumulator, run the due
//! simulation steps, commit the terrain, draw.
//!
//! The spawn helpers and `simulation_step` are free functions with no GPU
//! dependency so the whole simulation can run headless in tests.

use macroquad::prelude::*;
// Absolute paths: the macroquad prelude glob pulls in its own `rand`
// module, which would shadow the external crate here.
use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};

use crate::assets::{TextureBank, TextureId};
use crate::config::{GameConfig, SimConfig};
use crate::fire::FireSim;
use crate::game::systems::{
    apply_player_input, integrate_movement, stamp_extinguish, steer_wanderers, PlayerInput,
};
use crate::game::{Entity, PlayerControlled, Position, Renderable, Velocity, Wander, World};
use crate::render::{self, SurfaceTexture};
use crate::surface::{TerrainGrid, FIRE_RGBA, SURFACE_SIZE};
use crate::timestep::{FixedTimestep, FramePacer, SIM_STEP, TARGET_FPS};

/// Quad size of the player and the wanderers, world units.
const ACTOR_SIZE: f32 = 10.0;

/// Scatter the initial ignition: each cell has a 1/1000 chance to start
/// burning.
pub fn seed_ignition(grid: &mut TerrainGrid, rng: &mut StdRng) {
    let mut writer = grid.begin_write();
    for cell in writer.chunks_exact_mut(4) {
        if rng.gen_range(0..1000) == 0 {
            cell.copy_from_slice(&FIRE_RGBA);
        }
    }
}

/// Spawn the single player-controlled actor at the world origin.
pub fn spawn_player(world: &mut World, texture: TextureId) -> Entity {
    let player = world.spawn();
    world.positions.insert(player, Position::new(0.0, 0.0));
    world.velocities.insert(player, Velocity::default());
    world
        .renderables
        .insert(player, Renderable::new(texture, ACTOR_SIZE));
    world.attach_player_controls(player, PlayerControlled::wasd());
    player
}

/// Spawn wandering enemies on the coarse spawn lattice with randomized
/// wander targets.
pub fn spawn_wanderers(world: &mut World, texture: TextureId, count: u32, rng: &mut StdRng) {
    for _ in 0..count {
        let x = rng.gen_range(0..20) as f32 * 10.0 - 95.0;
        let y = rng.gen_range(0..20) as f32 * 10.0 - 95.0;

        let enemy = world.spawn();
        world.positions.insert(enemy, Position::new(x, y));
        world.velocities.insert(enemy, Velocity::default());
        world
            .renderables
            .insert(enemy, Renderable::new(texture, ACTOR_SIZE));
        world.wanderers.insert(
            enemy,
            Wander::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)),
        );
    }
}

/// One fixed simulation step: steer the wanderers, integrate movement,
/// advance the fire automaton, stamp the ground around moving entities.
pub fn simulation_step(
    world: &mut World,
    grid: &mut TerrainGrid,
    fire: &mut FireSim,
    rng: &mut StdRng,
    dt: f32,
) {
    steer_wanderers(world, rng);
    integrate_movement(world, dt);
    fire.tick(grid, dt);
    stamp_extinguish(world, grid);
}

/// All state for one run of the arena.
pub struct GameScene {
    world: World,
    grid: TerrainGrid,
    fire: FireSim,
    timestep: FixedTimestep,
    pacer: FramePacer,
    surface: SurfaceTexture,
    bank: TextureBank,
    sim: SimConfig,
    rng: StdRng,
    close_requested: bool,
}

impl GameScene {
    /// Build the scene: allocate and seed the terrain, load actor
    /// textures (degrading to the empty handle), spawn the actors.
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut grid = TerrainGrid::new(SURFACE_SIZE, SURFACE_SIZE);
        seed_ignition(&mut grid, &mut rng);

        let mut bank = TextureBank::new();
        let player_texture = bank.load("assets/textures/player.png");
        let enemy_texture = bank.load("assets/textures/enemy.png");

        let mut world = World::new();
        spawn_player(&mut world, player_texture);
        spawn_wanderers(&mut world, enemy_texture, config.sim.enemy_count, &mut rng);

        info!(
            "scene up: {} entities on a {}x{} terrain",
            world.entity_count(),
            grid.width(),
            grid.height()
        );

        let surface = SurfaceTexture::new(&grid);
        let fire_seed = rng.gen();
        Self {
            world,
            grid,
            fire: FireSim::new(config.sim.spread_chance, fire_seed),
            timestep: FixedTimestep::new(SIM_STEP),
            pacer: FramePacer::new(TARGET_FPS),
            surface,
            bank,
            sim: config.sim.clone(),
            rng,
            close_requested: false,
        }
    }

    /// Run one frame of the loop: pace, input, fixed steps, commit, draw.
    pub fn frame(&mut self) {
        let elapsed = self.pacer.wait();

        // Input is sampled once per rendered frame, not per fixed tick
        if let Some(player) = self.world.player() {
            if let Some(controls) = self.world.player_controls.get(player).copied() {
                let input = PlayerInput::sample(&controls);
                apply_player_input(&mut self.world, input, self.sim.player_speed);
            }
        }

        let steps = self.timestep.advance(elapsed);
        let dt = self.timestep.step();
        for _ in 0..steps {
            simulation_step(
                &mut self.world,
                &mut self.grid,
                &mut self.fire,
                &mut self.rng,
                dt,
            );
        }
        self.world.flush_despawns();

        self.surface.commit(&self.grid);
        render::draw_scene(
            &self.world,
            &self.surface,
            &self.bank,
            self.timestep.alpha(),
            dt,
        );

        if is_key_pressed(KeyCode::Escape) {
            self.request_close();
        }
    }

    /// Cooperative close flag, checked once per frame boundary.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Tear down the scene, destroying all entities.
    pub fn discard(&mut self) {
        self.world.clear();
        info!("scene discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{WORLD_MAX, WORLD_MIN};

    /// Ten simulated seconds with the full actor roster: everyone stays
    /// in bounds and the fire automaton has run.
    #[test]
    fn test_end_to_end_ten_seconds() {
        let mut rng = StdRng::seed_from_u64(1234);

        let mut grid = TerrainGrid::new(SURFACE_SIZE, SURFACE_SIZE);
        seed_ignition(&mut grid, &mut rng);

        let mut world = World::new();
        spawn_player(&mut world, TextureId::EMPTY);
        spawn_wanderers(&mut world, TextureId::EMPTY, 10, &mut rng);
        assert_eq!(world.entity_count(), 11);

        let mut fire = FireSim::new(0.3, 99);
        for _ in 0..600 {
            simulation_step(&mut world, &mut grid, &mut fire, &mut rng, SIM_STEP);
        }

        for entity in world.view(&[crate::game::ComponentKind::Position], &[]) {
            let pos = world.positions.get(entity).unwrap();
            assert!(pos.x >= WORLD_MIN && pos.x <= WORLD_MAX, "x = {}", pos.x);
            assert!(pos.y >= WORLD_MIN && pos.y <= WORLD_MAX, "y = {}", pos.y);
        }
        assert!(fire.passes() >= 1);
    }

    #[test]
    fn test_seeding_ignites_roughly_one_per_mille() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = TerrainGrid::new(SURFACE_SIZE, SURFACE_SIZE);
        seed_ignition(&mut grid, &mut rng);

        let burning = (0..SURFACE_SIZE)
            .flat_map(|y| (0..SURFACE_SIZE).map(move |x| (x, y)))
            .filter(|&(x, y)| grid.is_burning(x, y))
            .count();
        // 40_000 cells at p = 1/1000; generous bounds
        assert!(burning > 5 && burning < 120, "burning = {}", burning);
    }

    #[test]
    fn test_wanderers_extinguish_their_footprint() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut grid = TerrainGrid::new(SURFACE_SIZE, SURFACE_SIZE);
        {
            let mut writer = grid.begin_write();
            for y in 0..SURFACE_SIZE {
                for x in 0..SURFACE_SIZE {
                    writer.ignite(x, y);
                }
            }
        }

        let mut world = World::new();
        spawn_player(&mut world, TextureId::EMPTY);

        let mut fire = FireSim::new(0.0, 3);
        simulation_step(&mut world, &mut grid, &mut fire, &mut rng, SIM_STEP);

        // The player sits at the origin; its stamp block must be ground now
        let (cx, cy) = grid.cell_for(0.0, 0.0);
        assert!(!grid.is_burning(cx, cy));
        assert!(!grid.is_burning(cx - 5, cy - 5));
        assert!(!grid.is_burning(cx + 5, cy + 5));
        // Well outside the stamp the fire still burns
        assert!(grid.is_burning(cx + 30, cy + 30));
    }
}
