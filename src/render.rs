//! Render Pass
//!
//! Draws the committed terrain texture as a fullscreen background, then
//! every renderable entity as a textured quad. Moving entities are drawn
//! at `pos + vel * alpha * step`, extrapolating into the un-simulated
//! step so motion stays smooth between fixed ticks.

use macroquad::prelude::*;

use crate::assets::TextureBank;
use crate::game::{ComponentKind, World, WORLD_MIN, WORLD_SPAN};
use crate::surface::TerrainGrid;

/// The GPU half of the pixel surface: holds the committed texture that
/// the background quad samples.
pub struct SurfaceTexture {
    texture: Texture2D,
}

impl SurfaceTexture {
    /// Upload the grid's staging buffer for the first time.
    pub fn new(grid: &TerrainGrid) -> Self {
        Self {
            texture: upload(grid),
        }
    }

    /// Re-upload the staging buffer. Never runs while a terrain writer is
    /// live - the writer's exclusive borrow of the grid guarantees it.
    pub fn commit(&mut self, grid: &TerrainGrid) {
        self.texture = upload(grid);
    }

    /// The committed texture for sampling during a draw.
    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }
}

fn upload(grid: &TerrainGrid) -> Texture2D {
    let texture = Texture2D::from_rgba8(
        grid.width() as u16,
        grid.height() as u16,
        grid.bytes(),
    );
    texture.set_filter(FilterMode::Nearest);
    texture
}

/// Draw one frame: background, static entities, then moving entities.
pub fn draw_scene(world: &World, surface: &SurfaceTexture, bank: &TextureBank, alpha: f32, step: f32) {
    clear_background(BLACK);

    // Background: the full terrain, flipped so grid row 0 (world y = -100)
    // lands at the bottom of the screen like the entities do.
    draw_texture_ex(
        surface.texture(),
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_width(), screen_height())),
            flip_y: true,
            ..Default::default()
        },
    );

    // Static entities draw at their exact position
    for entity in world.view(
        &[ComponentKind::Position, ComponentKind::Renderable],
        &[ComponentKind::Velocity],
    ) {
        let Some(pos) = world.positions.get(entity) else { continue };
        let Some(renderable) = world.renderables.get(entity) else { continue };
        draw_quad(bank, renderable.texture, pos.x, pos.y, renderable.size);
    }

    // Moving entities extrapolate by the leftover step fraction
    for entity in world.view(
        &[
            ComponentKind::Position,
            ComponentKind::Velocity,
            ComponentKind::Renderable,
        ],
        &[],
    ) {
        let Some(pos) = world.positions.get(entity) else { continue };
        let Some(vel) = world.velocities.get(entity) else { continue };
        let Some(renderable) = world.renderables.get(entity) else { continue };

        let x = pos.x + vel.x * alpha * step;
        let y = pos.y + vel.y * alpha * step;
        draw_quad(bank, renderable.texture, x, y, renderable.size);
    }
}

/// Draw one textured quad centered on a world-space position. An empty or
/// stale texture handle draws nothing.
fn draw_quad(bank: &TextureBank, id: crate::assets::TextureId, x: f32, y: f32, size: f32) {
    let Some(texture) = bank.get(id) else { return };

    let scale_x = screen_width() / WORLD_SPAN;
    let scale_y = screen_height() / WORLD_SPAN;
    let w = size * scale_x;
    let h = size * scale_y;
    // World y grows up, screen y grows down
    let px = (x - WORLD_MIN) * scale_x - w * 0.5;
    let py = screen_height() - (y - WORLD_MIN) * scale_y - h * 0.5;

    draw_texture_ex(
        texture,
        px,
        py,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(w, h)),
            ..Default::default()
        },
    );
}
