//! Game Components
//!
//! The fixed component set for the arena: plain data structs, behavior
//! lives in systems. World space is the square [-100, 100] on both axes.

use macroquad::prelude::KeyCode;

use crate::assets::TextureId;

/// World-space coordinate. Mutated only by movement integration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Instantaneous speed vector, world units per second.
///
/// Written by input mapping (player) or wander steering (enemies),
/// consumed by movement integration and render extrapolation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Visual representation: a textured quad of `size` world units,
/// created once at spawn and immutable thereafter.
#[derive(Debug, Clone, Copy)]
pub struct Renderable {
    pub texture: TextureId,
    pub size: f32,
}

impl Renderable {
    pub fn new(texture: TextureId, size: f32) -> Self {
        Self { texture, size }
    }
}

/// Marks the single input-driven actor and maps movement keys.
#[derive(Debug, Clone, Copy)]
pub struct PlayerControlled {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl PlayerControlled {
    /// The standard WASD binding.
    pub fn wasd() -> Self {
        Self {
            up: KeyCode::W,
            down: KeyCode::S,
            left: KeyCode::A,
            right: KeyCode::D,
        }
    }
}

/// A wandering target that drifts randomly within world bounds;
/// steering pushes the owner's velocity toward it each tick.
#[derive(Debug, Clone, Copy)]
pub struct Wander {
    pub target_x: f32,
    pub target_y: f32,
}

impl Wander {
    pub fn new(target_x: f32, target_y: f32) -> Self {
        Self { target_x, target_y }
    }
}
