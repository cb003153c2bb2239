// Grounding: keep each creature's vertical position tracking the terrain.
//
// The smoothed base height lives in `GroundTrack`; the walk bounce is layered
// on top of it so the bounce never leaks into the easing state.

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::terrain::HeightSampler;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Fixed per-tick blend toward the target height. Deliberately not scaled by
/// dt — the source smoothed per frame, and that behavior is kept.
pub const GROUND_BLEND: f32 = 0.18;

/// Safety margin above foot contact so boxes never z-fight the terrain.
pub const GROUND_MARGIN: f32 = 0.5;

/// Walk bounce height at scale 1.0.
pub const BOUNCE_AMPLITUDE: f32 = 1.6;

// ============================================================================
// GROUND TRACK
// ============================================================================

/// Per-creature vertical tracking state.
#[derive(Component)]
pub struct GroundTrack {
    /// Smoothed height the creature eases toward; excludes the walk bounce.
    base_y: f32,
    /// Last finite sample, used when the sampler misbehaves.
    last_good: f32,
    warned: bool,
}

impl GroundTrack {
    /// Start settled at the given base height (typically the spawn sample).
    pub fn settled_at(base_y: f32) -> Self {
        Self {
            base_y,
            last_good: base_y,
            warned: false,
        }
    }

    pub fn base_y(&self) -> f32 {
        self.base_y
    }

    /// One grounding tick: sample under (x, z), ease the base height toward
    /// terrain + scaled foot offset + margin, then write base + bounce into
    /// the position.
    ///
    /// Non-finite samples fall back to the last good height and warn once per
    /// creature instead of propagating NaN through the transform.
    pub fn update(
        &mut self,
        sampler: &impl HeightSampler,
        position: &mut Vec3,
        foot_offset: f32,
        scale: f32,
        walking: bool,
        time: f32,
        gait_frequency: f32,
    ) {
        let sampled = sampler.height_at(position.x, position.z);
        let ground = if sampled.is_finite() {
            self.last_good = sampled;
            sampled
        } else {
            if !self.warned {
                log::warn!(
                    "terrain sampler returned {sampled} at ({:.1}, {:.1}); holding last good height",
                    position.x, position.z
                );
                self.warned = true;
            }
            self.last_good
        };

        let target = ground + foot_offset * scale + GROUND_MARGIN;
        self.base_y += (target - self.base_y) * GROUND_BLEND;

        let bounce = if walking {
            (time * gait_frequency * std::f32::consts::TAU).sin().abs()
                * BOUNCE_AMPLITUDE
                * scale
        } else {
            0.0
        };
        position.y = self.base_y + bounce;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct FlatGround(f32);
    impl HeightSampler for FlatGround {
        fn height_at(&self, _x: f32, _z: f32) -> f32 {
            self.0
        }
    }

    struct BrokenGround;
    impl HeightSampler for BrokenGround {
        fn height_at(&self, _x: f32, _z: f32) -> f32 {
            f32::NAN
        }
    }

    #[test]
    fn settles_onto_terrain_plus_scaled_foot_offset() {
        let ground = FlatGround(30.0);
        let mut track = GroundTrack::settled_at(0.0);
        let mut pos = Vec3::new(10.0, 0.0, 10.0);

        for _ in 0..100 {
            track.update(&ground, &mut pos, 20.0, 1.5, false, 0.0, 1.0);
        }

        // target = 30 + 20 * 1.5 + margin
        assert_relative_eq!(pos.y, 30.0 + 30.0 + GROUND_MARGIN, epsilon = 0.01);
    }

    #[test]
    fn walk_bounce_is_bounded_and_absent_when_idle() {
        let ground = FlatGround(0.0);
        let mut track = GroundTrack::settled_at(10.0 + GROUND_MARGIN);
        let mut pos = Vec3::ZERO;

        // Settle first so only the bounce moves the height.
        for _ in 0..100 {
            track.update(&ground, &mut pos, 10.0, 1.0, false, 0.0, 1.2);
        }
        let rest_y = pos.y;

        let mut max_dev = 0.0f32;
        for step in 0..200 {
            let t = step as f32 * 0.016;
            track.update(&ground, &mut pos, 10.0, 1.0, true, t, 1.2);
            max_dev = max_dev.max(pos.y - track.base_y());
        }
        assert!(max_dev <= BOUNCE_AMPLITUDE + 1e-4);
        assert!(max_dev > BOUNCE_AMPLITUDE * 0.8, "bounce should reach near peak");

        // Back to idle: bounce gone.
        track.update(&ground, &mut pos, 10.0, 1.0, false, 3.3, 1.2);
        assert_relative_eq!(pos.y, track.base_y(), epsilon = 1e-5);
        assert_relative_eq!(track.base_y(), rest_y, epsilon = 0.01);
    }

    #[test]
    fn nan_sample_holds_last_good_height() {
        let mut track = GroundTrack::settled_at(0.0);
        let mut pos = Vec3::ZERO;

        for _ in 0..50 {
            track.update(&FlatGround(25.0), &mut pos, 5.0, 1.0, false, 0.0, 1.0);
        }
        let settled = pos.y;
        assert!(settled.is_finite());

        for _ in 0..50 {
            track.update(&BrokenGround, &mut pos, 5.0, 1.0, false, 0.0, 1.0);
        }
        assert!(pos.y.is_finite(), "NaN must not propagate");
        assert_relative_eq!(pos.y, settled, epsilon = 0.01);
    }
}
