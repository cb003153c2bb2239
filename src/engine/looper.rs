// Frame clock for the explicit update/render cycle. Delta clamping is a
// first-class parameter here rather than something each caller remembers:
// a long stall (tab minimized, debugger pause) must not teleport creatures.

use std::time::Instant;

/// Upper bound on a single simulation step, in seconds.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Clamp a raw frame delta to the stability bound.
pub fn clamp_dt(raw: f32) -> f32 {
    raw.min(MAX_FRAME_DT).max(0.0)
}

/// Owns the wall-clock state of the game loop. One `tick()` per frame.
pub struct FrameClock {
    last: Instant,
    /// Total simulated time, fed to the procedural animation pass.
    elapsed: f32,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            last: Instant::now(),
            elapsed: 0.0,
        }
    }

    /// Advance the clock and return the clamped delta for this frame.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = clamp_dt((now - self.last).as_secs_f32());
        self.last = now;
        self.elapsed += dt;
        dt
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stall_is_clamped_to_the_bound() {
        assert_eq!(clamp_dt(5.0), MAX_FRAME_DT);
        assert_eq!(clamp_dt(0.016), 0.016);
    }

    #[test]
    fn backwards_clock_never_goes_negative() {
        assert_eq!(clamp_dt(-0.5), 0.0);
    }

    #[test]
    fn elapsed_accumulates_clamped_deltas() {
        let mut clock = FrameClock::start();
        // Force a stale `last` so the tick sees a large raw delta.
        clock.last = Instant::now() - std::time::Duration::from_secs(3);
        let dt = clock.tick();
        assert_eq!(dt, MAX_FRAME_DT);
        assert!(clock.elapsed() <= MAX_FRAME_DT + 1e-3);
    }
}
