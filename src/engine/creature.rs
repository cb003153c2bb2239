// Creature instance state + wander steering.
//
// State machine: Idle(countdown) → Walking(target) → Idle(countdown') → …
// Exactly one of the two holds at any time — the enum makes the invariant
// structural rather than checked.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use rand::Rng;

use super::archetype::Species;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Wander annulus around the current position, in world units.
pub const TARGET_DIST_MIN: f32 = 400.0;
pub const TARGET_DIST_MAX: f32 = 1400.0;

/// Arrival when squared planar distance drops below this (20 units).
pub const ARRIVE_DIST_SQ: f32 = 400.0;

/// Idle countdown range in seconds after arriving.
pub const IDLE_MIN: f32 = 2.0;
pub const IDLE_MAX: f32 = 7.0;

/// Forward speed in world units/sec before species and instance factors.
pub const BASE_SPEED: f32 = 110.0;

/// Proportional yaw controller gain: fraction of angular error corrected
/// per second. The eased (not target) heading drives movement, so paths
/// curve instead of snapping.
pub const TURN_RATE: f32 = 4.0;

// ============================================================================
// MOVE STATE
// ============================================================================

/// Current locomotion mode. `Walking` owns its target point; the target is
/// regenerated whenever a walk finishes or a collision re-roll fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveState {
    Idle { countdown: f32 },
    Walking { target: Vec2 },
}

impl MoveState {
    pub fn is_walking(&self) -> bool {
        matches!(self, MoveState::Walking { .. })
    }
}

// ============================================================================
// CREATURE
// ============================================================================

#[derive(Component)]
pub struct Creature {
    pub species: Species,
    /// Uniform size factor applied to the whole rig.
    pub scale: f32,
    /// Per-instance speed factor on top of the species base speed.
    pub speed: f32,
    /// Planar collision radius, derived from scale at spawn.
    pub radius: f32,
    /// Heading in radians; forward is (sin yaw, cos yaw) on XZ.
    pub yaw: f32,
    pub state: MoveState,
}

impl Creature {
    pub fn new(species: Species, scale: f32, speed: f32, rng: &mut impl Rng) -> Self {
        Self {
            species,
            scale,
            speed,
            radius: species.archetype().radius_base * scale,
            yaw: rng.gen_range(0.0..std::f32::consts::TAU),
            state: MoveState::Idle {
                countdown: rng.gen_range(IDLE_MIN..IDLE_MAX),
            },
        }
    }

    /// Choose a fresh wander target: uniform bearing, uniform distance in the
    /// wander annulus. No bounds check — targets may land past the coast;
    /// grounding clamps height at the rim so the walk stays well-defined.
    pub fn pick_new_target(&mut self, position: Vec2, rng: &mut impl Rng) {
        let bearing = rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = rng.gen_range(TARGET_DIST_MIN..TARGET_DIST_MAX);
        let target = position + Vec2::new(bearing.sin(), bearing.cos()) * dist;
        self.state = MoveState::Walking { target };
    }

    /// One steering tick. Decrements the idle countdown or eases the yaw
    /// toward the target heading and advances along the *eased* heading.
    pub fn update_steering(&mut self, position: &mut Vec3, dt: f32, rng: &mut impl Rng) {
        match self.state {
            MoveState::Idle { countdown } => {
                let remaining = countdown - dt;
                if remaining <= 0.0 {
                    self.pick_new_target(Vec2::new(position.x, position.z), rng);
                } else {
                    self.state = MoveState::Idle { countdown: remaining };
                }
            }
            MoveState::Walking { target } => {
                let to = target - Vec2::new(position.x, position.z);
                if to.length_squared() < ARRIVE_DIST_SQ {
                    self.state = MoveState::Idle {
                        countdown: rng.gen_range(IDLE_MIN..IDLE_MAX),
                    };
                    return;
                }

                // Engine forward convention: yaw = atan2(dx, dz).
                let heading = to.x.atan2(to.y);
                let error = wrap_angle(heading - self.yaw);
                self.yaw = wrap_angle(self.yaw + error * (TURN_RATE * dt).min(1.0));

                let step = self.speed * self.species.archetype().base_speed * BASE_SPEED * dt;
                position.x += self.yaw.sin() * step;
                position.z += self.yaw.cos() * step;
            }
        }
    }
}

/// Normalize an angle into (−π, π] so the proportional controller always
/// turns the short way around.
pub fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = a % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn raptor(rng: &mut StdRng) -> Creature {
        Creature::new(Species::Raptor, 1.0, 1.0, rng)
    }

    #[test]
    fn wrap_angle_normalizes_into_half_open_pi_range() {
        use std::f32::consts::PI;
        assert_relative_eq!(wrap_angle(0.0), 0.0);
        assert_relative_eq!(wrap_angle(3.0 * PI), PI, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(-3.0 * PI), PI, epsilon = 1e-5);
        assert!(wrap_angle(PI + 0.1) < 0.0, "past π wraps negative");
        assert!(wrap_angle(-PI - 0.1) > 0.0, "past −π wraps positive");
    }

    #[test]
    fn idle_expiry_picks_target_in_annulus() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut c = raptor(&mut rng);
        c.state = MoveState::Idle { countdown: 0.016 };
        let mut pos = Vec3::ZERO;

        c.update_steering(&mut pos, 0.016, &mut rng);

        let MoveState::Walking { target } = c.state else {
            panic!("countdown elapsed, expected Walking");
        };
        let dist = target.length();
        assert!(
            (TARGET_DIST_MIN..=TARGET_DIST_MAX).contains(&dist),
            "target distance {dist} outside wander annulus"
        );
    }

    #[test]
    fn target_heading_matches_atan2_of_delta() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut c = raptor(&mut rng);
        let target = Vec2::new(300.0, 400.0);
        c.state = MoveState::Walking { target };
        c.yaw = 0.0;
        let mut pos = Vec3::ZERO;

        // Many small ticks: the eased yaw converges on the atan2 heading.
        for _ in 0..200 {
            c.update_steering(&mut pos, 0.016, &mut rng);
            if !c.state.is_walking() {
                break;
            }
        }
        let expected = 300.0f32.atan2(400.0);
        assert_relative_eq!(c.yaw, expected, epsilon = 0.05);
    }

    #[test]
    fn walking_reaches_target_then_idles_with_bounded_countdown() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = raptor(&mut rng);
        let target = Vec2::new(500.0, -200.0);
        c.state = MoveState::Walking { target };
        let mut pos = Vec3::ZERO;

        let mut prev_d2 = f32::INFINITY;
        let mut arrived = false;
        for _ in 0..5000 {
            c.update_steering(&mut pos, 0.016, &mut rng);
            match c.state {
                MoveState::Walking { .. } => {
                    let d2 = (target - Vec2::new(pos.x, pos.z)).length_squared();
                    // Eventually-decreasing: allow transient growth while the
                    // yaw is still easing, but require net progress.
                    prev_d2 = prev_d2.min(d2);
                }
                MoveState::Idle { countdown } => {
                    assert!((IDLE_MIN..=IDLE_MAX).contains(&countdown));
                    arrived = true;
                    break;
                }
            }
        }
        assert!(arrived, "never arrived; best d² = {prev_d2}");
        assert!(prev_d2 < ARRIVE_DIST_SQ * 4.0);
    }

    #[test]
    fn idle_countdown_decrements_without_moving() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut c = raptor(&mut rng);
        c.state = MoveState::Idle { countdown: 1.0 };
        let mut pos = Vec3::new(5.0, 0.0, 5.0);

        c.update_steering(&mut pos, 0.25, &mut rng);

        assert_eq!(c.state, MoveState::Idle { countdown: 0.75 });
        assert_eq!(pos, Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn radius_scales_with_instance_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let small = Creature::new(Species::Trike, 0.5, 1.0, &mut rng);
        let big = Creature::new(Species::Trike, 2.0, 1.0, &mut rng);
        assert_relative_eq!(big.radius, small.radius * 4.0);
    }
}
