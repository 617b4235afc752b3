//! Game Foundation Module
//!
//! A lightweight ECS for the arena: generational entities, sparse typed
//! component storages, filtered views, and the fixed-tick systems that
//! drive movement, steering, and terrain stamping.
//!
//! Design philosophy:
//! - Simple over flexible (the component set is fixed and known)
//! - No runtime type registration (compile-time known components)
//! - Structural changes deferred to frame end, never under a live view

pub mod component;
pub mod components;
pub mod entity;
pub mod systems;
pub mod world;

// Re-export main types
pub use components::{PlayerControlled, Position, Renderable, Velocity, Wander};
pub use entity::Entity;
pub use world::{ComponentKind, World};

/// Lower world-space bound on both axes.
pub const WORLD_MIN: f32 = -100.0;
/// Upper world-space bound on both axes.
pub const WORLD_MAX: f32 = 100.0;
/// Full width of the world square.
pub const WORLD_SPAN: f32 = WORLD_MAX - WORLD_MIN;
