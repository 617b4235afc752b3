//! Simulation Systems
//!
//! Free functions over the World, run 0..N times per frame at the fixed
//! timestep by the scene loop. Each takes its state explicitly (dt, RNG,
//! terrain) so every system is re-entrant and testable in isolation.

use macroquad::prelude::is_key_down;
use rand::rngs::StdRng;
use rand::Rng;

use super::{ComponentKind, Entity, PlayerControlled, World, WORLD_MAX, WORLD_MIN};
use crate::surface::TerrainGrid;

/// Fixed speed of wander-steered entities, world units per second.
pub const WANDER_SPEED: f32 = 30.0;
/// Maximum per-tick drift of a wander target, per axis.
pub const WANDER_JITTER: f32 = 10.0;
/// Half-width of the extinguish stamp, in terrain cells.
pub const STAMP_RADIUS: i32 = 5;

/// Key states sampled once per render frame (not per fixed tick).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PlayerInput {
    /// Sample the window's current key states for the given bindings.
    pub fn sample(controls: &PlayerControlled) -> Self {
        Self {
            up: is_key_down(controls.up),
            down: is_key_down(controls.down),
            left: is_key_down(controls.left),
            right: is_key_down(controls.right),
        }
    }
}

/// Map sampled key states onto the player's velocity.
///
/// Opposite keys cancel; diagonal input runs at `speed / sqrt(2)` per axis
/// so the magnitude stays `speed`. No-ops when no player exists.
pub fn apply_player_input(world: &mut World, input: PlayerInput, speed: f32) {
    let Some(player) = world.player() else { return };

    let x = i32::from(input.right) - i32::from(input.left);
    let y = i32::from(input.up) - i32::from(input.down);

    let axis_speed = if x != 0 && y != 0 {
        speed / std::f32::consts::SQRT_2
    } else {
        speed
    };

    if let Some(vel) = world.velocities.get_mut(player) {
        vel.x = x as f32 * axis_speed;
        vel.y = y as f32 * axis_speed;
    }
}

/// Integrate velocity into position for every moving entity.
///
/// Positions are clamped into world bounds BEFORE the velocity is applied,
/// matching the established behavior: an entity pinned at a boundary can
/// overshoot by at most |v|*dt for one tick until the next clamp.
pub fn integrate_movement(world: &mut World, dt: f32) {
    let movers: Vec<Entity> = world
        .view(&[ComponentKind::Position, ComponentKind::Velocity], &[])
        .collect();

    for entity in movers {
        let Some(vel) = world.velocities.get(entity).copied() else { continue };
        let Some(pos) = world.positions.get_mut(entity) else { continue };

        pos.x = pos.x.clamp(WORLD_MIN, WORLD_MAX);
        pos.y = pos.y.clamp(WORLD_MIN, WORLD_MAX);
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
    }
}

/// Drift each wander target and steer its owner toward it.
///
/// The target moves by a uniform increment in [-10, 10] per axis each tick;
/// an increment that would push it out of bounds is negated instead.
/// Velocity becomes the unit vector toward the target times `WANDER_SPEED`,
/// or zero when the entity sits exactly on its target.
pub fn steer_wanderers(world: &mut World, rng: &mut StdRng) {
    let wanderers: Vec<Entity> = world
        .view(
            &[
                ComponentKind::Position,
                ComponentKind::Velocity,
                ComponentKind::Wander,
            ],
            &[],
        )
        .collect();

    for entity in wanderers {
        let Some(pos) = world.positions.get(entity).copied() else { continue };

        let (dx, dy) = {
            let Some(wander) = world.wanderers.get_mut(entity) else { continue };

            let mut inc_x = rng.gen_range(-WANDER_JITTER..=WANDER_JITTER);
            if wander.target_x + inc_x > WORLD_MAX || wander.target_x + inc_x < WORLD_MIN {
                inc_x = -inc_x;
            }
            let mut inc_y = rng.gen_range(-WANDER_JITTER..=WANDER_JITTER);
            if wander.target_y + inc_y > WORLD_MAX || wander.target_y + inc_y < WORLD_MIN {
                inc_y = -inc_y;
            }

            wander.target_x += inc_x;
            wander.target_y += inc_y;
            (wander.target_x - pos.x, wander.target_y - pos.y)
        };

        let (vx, vy) = steer_toward(dx, dy);
        if let Some(vel) = world.velocities.get_mut(entity) {
            vel.x = vx;
            vel.y = vy;
        }
    }
}

/// Unit vector toward the offset (dx, dy) scaled to `WANDER_SPEED`.
/// A zero offset steers nowhere instead of dividing by zero.
fn steer_toward(dx: f32, dy: f32) -> (f32, f32) {
    let distance = (dx * dx + dy * dy).sqrt();
    if distance > f32::EPSILON {
        (dx / distance * WANDER_SPEED, dy / distance * WANDER_SPEED)
    } else {
        (0.0, 0.0)
    }
}

/// Stamp the ground back to its extinguished color around every moving
/// entity, an 11x11 cell block clipped to the terrain bounds.
pub fn stamp_extinguish(world: &World, grid: &mut TerrainGrid) {
    let movers: Vec<Entity> = world
        .view(&[ComponentKind::Position, ComponentKind::Velocity], &[])
        .collect();

    let mut writer = grid.begin_write();
    for entity in movers {
        let Some(pos) = world.positions.get(entity) else { continue };
        let (cx, cy) = writer.cell_for(pos.x, pos.y);
        writer.extinguish_block(cx, cy, STAMP_RADIUS);
    }
}
