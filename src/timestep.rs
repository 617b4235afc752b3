//! Fixed-Timestep Scheduling
//!
//! Decouples variable frame arrival from the constant simulation step.
//! `FixedTimestep` owns the accumulator: each frame's wall-clock elapsed
//! time is absorbed, whole steps are consumed, and the leftover fraction
//! becomes the render interpolation alpha. `FramePacer` pads short frames
//! up to the target frame budget.

/// The constant simulation step, seconds.
pub const SIM_STEP: f32 = 1.0 / 60.0;
/// Target rendered frames per second.
pub const TARGET_FPS: u32 = 60;

/// Accumulator-based fixed timestep.
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
}

impl FixedTimestep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            // A stalled frame (debugger, window drag) must not trigger a
            // catch-up spiral; excess debt beyond this many steps is dropped.
            max_steps_per_frame: 8,
        }
    }

    /// Absorb one frame's elapsed wall time and return how many fixed
    /// steps to run. While under the cap, steps * step + leftover
    /// accumulator always equals the injected time.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        if self.accumulator >= self.step {
            // Cap hit: drop the remaining debt, keep the sub-step fraction
            self.accumulator %= self.step;
        }
        steps
    }

    /// Fractional progress into the next un-simulated step, in [0, 1).
    /// Multiply by `step()` for seconds.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// The fixed step size in seconds.
    pub fn step(&self) -> f32 {
        self.step
    }
}

/// Pads frames shorter than the target budget: bulk sleep, then a short
/// spin for precision (the last ~2ms of a sleep are unreliable).
pub struct FramePacer {
    target: f64,
    last: f64,
}

impl FramePacer {
    /// Create a pacer against the given frame rate, starting now.
    pub fn new(target_fps: u32) -> Self {
        Self {
            target: 1.0 / f64::from(target_fps),
            last: macroquad::time::get_time(),
        }
    }

    /// Block until the frame budget since the previous call has elapsed,
    /// then return the actual elapsed seconds.
    pub fn wait(&mut self) -> f32 {
        use macroquad::time::get_time;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let spin_margin = 0.002; // 2ms
            while get_time() - self.last + spin_margin < self.target {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            while get_time() - self.last < self.target {
                std::hint::spin_loop();
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            // Browser frame pacing; just report elapsed time
        }

        let now = get_time();
        let elapsed = (now - self.last) as f32;
        self.last = now;
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_whole_steps_consume_accumulator() {
        let mut ts = FixedTimestep::new(SIM_STEP);
        assert_eq!(ts.advance(SIM_STEP * 3.0), 3);
        assert!(ts.alpha() < 1e-3);
    }

    #[test]
    fn test_partial_step_carries_over() {
        let mut ts = FixedTimestep::new(SIM_STEP);
        assert_eq!(ts.advance(SIM_STEP * 0.6), 0);
        assert!((ts.alpha() - 0.6).abs() < 1e-4);

        // The carried fraction plus the next frame crosses one step
        assert_eq!(ts.advance(SIM_STEP * 0.6), 1);
        assert!((ts.alpha() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_stall_is_capped_not_spiraled() {
        let mut ts = FixedTimestep::new(SIM_STEP);
        // Five seconds of debt in one frame
        let steps = ts.advance(5.0);
        assert_eq!(steps, 8);
        assert!(ts.alpha() < 1.0);

        // Follow-up frames run normally
        assert_eq!(ts.advance(SIM_STEP), 1);
    }

    proptest! {
        /// Conservation: under the step cap, consumed steps plus the
        /// leftover accumulator account for every injected second; the
        /// accumulator never goes negative and alpha stays in [0, 1).
        #[test]
        fn prop_accumulator_conserves_time(
            frames in prop::collection::vec(0.0f32..0.1, 1..200)
        ) {
            let mut ts = FixedTimestep::new(SIM_STEP);
            let mut injected = 0.0f64;
            let mut stepped = 0u64;

            for elapsed in frames {
                injected += f64::from(elapsed);
                let steps = ts.advance(elapsed);
                prop_assert!(steps <= 8);
                stepped += u64::from(steps);
                prop_assert!(ts.alpha() >= 0.0);
                prop_assert!(ts.alpha() < 1.0);
            }

            let accounted =
                stepped as f64 * f64::from(SIM_STEP) + f64::from(ts.alpha() * SIM_STEP);
            prop_assert!((accounted - injected).abs() < 1e-3);
        }
    }
}
