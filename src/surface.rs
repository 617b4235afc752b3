//! Terrain Pixel Surface
//!
//! A CPU-writable RGBA8 staging buffer for the terrain automaton. The
//! logical 200x200 grid is allocated once at scene init, mutated every
//! simulation tick, and committed to a GPU texture once per render (see
//! `render::SurfaceTexture`).
//!
//! Map/unmap discipline: `begin_write` hands out a `TerrainWriter` guard
//! holding the only mutable view of the buffer. The borrow checker makes
//! nested maps and commit-while-mapped impossible; unmap is the guard
//! going out of scope.

use std::ops::{Deref, DerefMut};

use crate::game::{WORLD_MIN, WORLD_SPAN};

/// Logical side length of the terrain grid, in cells.
pub const SURFACE_SIZE: u32 = 200;

/// Sentinel color of a burning cell. A cell is on fire iff its RGB
/// equals this value.
pub const FIRE_RGBA: [u8; 4] = [255, 0, 0, 255];
/// Color of extinguished ground.
pub const GROUND_RGBA: [u8; 4] = [90, 255, 90, 255];

/// Byte offset of cell (x, y) in a row-major RGBA8 buffer.
fn idx(width: u32, x: u32, y: u32) -> usize {
    ((y * width + x) * 4) as usize
}

/// Map a world-space coordinate into grid cell coordinates, clamped to
/// the grid bounds.
fn cell_at(width: u32, height: u32, world_x: f32, world_y: f32) -> (u32, u32) {
    let scale_x = (width - 1) as f32 / WORLD_SPAN;
    let scale_y = (height - 1) as f32 / WORLD_SPAN;
    let cx = ((world_x - WORLD_MIN) * scale_x).clamp(0.0, (width - 1) as f32);
    let cy = ((world_y - WORLD_MIN) * scale_y).clamp(0.0, (height - 1) as f32);
    (cx as u32, cy as u32)
}

/// The CPU side of the pixel surface: a width*height*4 RGBA8 buffer.
pub struct TerrainGrid {
    width: u32,
    height: u32,
    staging: Vec<u8>,
}

impl TerrainGrid {
    /// Allocate the staging buffer with every cell extinguished.
    pub fn new(width: u32, height: u32) -> Self {
        let mut staging = vec![0u8; (width * height * 4) as usize];
        for cell in staging.chunks_exact_mut(4) {
            cell.copy_from_slice(&GROUND_RGBA);
        }
        Self {
            width,
            height,
            staging,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read-only view of the staging buffer, e.g. for the GPU commit.
    pub fn bytes(&self) -> &[u8] {
        &self.staging
    }

    /// Whether the cell's RGB matches the fire sentinel.
    pub fn is_burning(&self, x: u32, y: u32) -> bool {
        let i = idx(self.width, x, y);
        self.staging[i..i + 3] == FIRE_RGBA[..3]
    }

    /// Map a world-space coordinate into grid cell coordinates,
    /// clamped to the grid bounds.
    pub fn cell_for(&self, world_x: f32, world_y: f32) -> (u32, u32) {
        cell_at(self.width, self.height, world_x, world_y)
    }

    /// Map the staging buffer for writing. Exactly one writer can exist
    /// at a time, and the grid is unreadable until it is dropped.
    pub fn begin_write(&mut self) -> TerrainWriter<'_> {
        TerrainWriter {
            width: self.width,
            height: self.height,
            bytes: &mut self.staging,
        }
    }
}

/// Mutable mapped view over the terrain staging buffer.
///
/// Derefs to the raw byte slice for bulk writes; the cell helpers keep
/// systems out of the index math.
pub struct TerrainWriter<'a> {
    width: u32,
    height: u32,
    bytes: &'a mut [u8],
}

impl TerrainWriter<'_> {
    /// Set a cell to the fire sentinel.
    pub fn ignite(&mut self, x: u32, y: u32) {
        let i = idx(self.width, x, y);
        self.bytes[i..i + 4].copy_from_slice(&FIRE_RGBA);
    }

    /// Set a cell to the ground color.
    pub fn extinguish(&mut self, x: u32, y: u32) {
        let i = idx(self.width, x, y);
        self.bytes[i..i + 4].copy_from_slice(&GROUND_RGBA);
    }

    /// Same mapping as [`TerrainGrid::cell_for`].
    pub fn cell_for(&self, world_x: f32, world_y: f32) -> (u32, u32) {
        cell_at(self.width, self.height, world_x, world_y)
    }

    /// Reset a (2*radius+1)^2 block centered on (cx, cy) to ground,
    /// clipped to the grid bounds.
    pub fn extinguish_block(&mut self, cx: u32, cy: u32, radius: i32) {
        for j in cy as i32 - radius..=cy as i32 + radius {
            for i in cx as i32 - radius..=cx as i32 + radius {
                if i >= 0 && i < self.width as i32 && j >= 0 && j < self.height as i32 {
                    self.extinguish(i as u32, j as u32);
                }
            }
        }
    }
}

impl Deref for TerrainWriter<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl DerefMut for TerrainWriter<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}
