//! Fire Propagation
//!
//! The terrain automaton: every burning cell tries to ignite its four
//! in-bounds neighbors with an independent probability roll. A pass reads
//! the buffer state from before the pass and writes ignitions into a
//! snapshot, so new fires never cascade further within the same pass.
//!
//! Passes are paced to at most one per second of simulated time. The
//! pacing accumulator and the RNG live in the struct rather than in
//! function-local statics, keeping the system re-entrant and seedable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::surface::{TerrainGrid, FIRE_RGBA};

/// Seconds of simulated time between spread passes.
const SPREAD_INTERVAL: f32 = 1.0;

/// The fire-spread simulation state.
pub struct FireSim {
    spread_chance: f32,
    elapsed: f32,
    passes: u64,
    rng: StdRng,
}

impl FireSim {
    /// Create a simulation with the given per-neighbor ignition
    /// probability and RNG seed.
    pub fn new(spread_chance: f32, seed: u64) -> Self {
        Self {
            spread_chance,
            elapsed: 0.0,
            passes: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Feed one fixed timestep. Runs a spread pass when a full interval
    /// has accumulated; returns whether a pass ran.
    pub fn tick(&mut self, grid: &mut TerrainGrid, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed < SPREAD_INTERVAL {
            return false;
        }
        self.elapsed -= SPREAD_INTERVAL;
        self.spread_once(grid);
        true
    }

    /// Run one spread pass: every burning cell rolls independently for its
    /// right, left, down and up neighbors.
    pub fn spread_once(&mut self, grid: &mut TerrainGrid) {
        let width = grid.width();
        let height = grid.height();
        let mut next = grid.bytes().to_vec();

        for y in 0..height {
            for x in 0..width {
                if !grid.is_burning(x, y) {
                    continue;
                }
                if x + 1 < width && self.roll() {
                    ignite(&mut next, width, x + 1, y);
                }
                if x > 0 && self.roll() {
                    ignite(&mut next, width, x - 1, y);
                }
                if y + 1 < height && self.roll() {
                    ignite(&mut next, width, x, y + 1);
                }
                if y > 0 && self.roll() {
                    ignite(&mut next, width, x, y - 1);
                }
            }
        }

        grid.begin_write().copy_from_slice(&next);
        self.passes += 1;
    }

    fn roll(&mut self) -> bool {
        self.rng.gen::<f32>() < self.spread_chance
    }

    /// Number of completed spread passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

/// Write the fire sentinel into a snapshot buffer.
fn ignite(buffer: &mut [u8], width: u32, x: u32, y: u32) {
    let i = ((y * width + x) * 4) as usize;
    buffer[i..i + 4].copy_from_slice(&FIRE_RGBA);
}
