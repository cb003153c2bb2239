// Procedural animation: a pure function of elapsed time and the walking
// flag, written into the rig's local poses each tick.
//
// The gait phase assignment is load-bearing for visual correctness:
// bipeds swing their two legs in exact antiphase, quadrupeds pair
// diagonally (front-left with back-right, front-right with back-left).

use std::f32::consts::{PI, TAU};

use glam::Quat;

use super::archetype::{Archetype, Gait};
use super::rig::{JointKind, Rig};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Breathing: uniform torso scale oscillation.
const BREATH_SCALE: f32 = 0.02;
const BREATH_RATE: f32 = 0.35;

/// Neck/head sway.
const NECK_SWAY: f32 = 0.06;
const NECK_RATE: f32 = 0.28;
const NECK_PHASE_STEP: f32 = 0.6;

/// Jaw open/close, idle chewing.
const JAW_OPEN: f32 = 0.22;
const JAW_RATE: f32 = 0.5;

/// Tail traveling wave. The phase step per segment makes the wave run
/// root-to-tip along the chain.
const TAIL_WAVE: f32 = 0.14;
const TAIL_RATE: f32 = 0.45;
const TAIL_PHASE_STEP: f32 = 0.8;

/// Leg swing amplitude in radians while walking.
const LEG_SWING: f32 = 0.55;

// ============================================================================
// GAIT PHASES
// ============================================================================

/// Walk-cycle phase offset for one leg, in {0, π}.
pub fn leg_phase(gait: Gait, front: bool, left: bool) -> f32 {
    match gait {
        Gait::Biped => {
            if left { 0.0 } else { PI }
        }
        Gait::Quadruped => {
            // Diagonal pairing: FL+BR share a phase, FR+BL share the other.
            if front == left { 0.0 } else { PI }
        }
    }
}

/// Instantaneous swing angle for a leg driven by the shared cycle variable.
pub fn leg_swing(time: f32, gait_frequency: f32, phase: f32) -> f32 {
    (time * gait_frequency * TAU + phase).sin() * LEG_SWING
}

// ============================================================================
// POSE PASS
// ============================================================================

/// Write this tick's pose into the rig. Reads nothing but `time` and
/// `walking`; safe to call in any order relative to the other systems.
pub fn pose(rig: &mut Rig, archetype: &Archetype, time: f32, walking: bool) {
    for joint in &mut rig.joints {
        match joint.kind {
            JointKind::Torso => {
                joint.pose_rotation = Quat::IDENTITY;
                joint.pose_scale = 1.0 + BREATH_SCALE * (time * BREATH_RATE * TAU).sin();
            }
            JointKind::Neck { index } => {
                let sway = (time * NECK_RATE * TAU + index as f32 * NECK_PHASE_STEP).sin();
                joint.pose_rotation = Quat::from_rotation_x(sway * NECK_SWAY);
            }
            JointKind::Head => {
                let nod = (time * NECK_RATE * TAU + archetype.neck_segments as f32 * NECK_PHASE_STEP)
                    .sin();
                joint.pose_rotation = Quat::from_rotation_x(nod * NECK_SWAY * 1.5);
            }
            JointKind::Jaw => {
                // Opens on the positive half-cycle only.
                let open = (time * JAW_RATE * TAU).sin().max(0.0);
                joint.pose_rotation = Quat::from_rotation_x(open * JAW_OPEN);
            }
            JointKind::Tail { index } => {
                let wave = (time * TAIL_RATE * TAU - index as f32 * TAIL_PHASE_STEP).sin();
                joint.pose_rotation = Quat::from_rotation_y(wave * TAIL_WAVE);
            }
            JointKind::Leg { front, left } => {
                let angle = if walking {
                    leg_swing(time, archetype.gait_frequency, leg_phase(archetype.gait, front, left))
                } else {
                    0.0
                };
                joint.pose_rotation = Quat::from_rotation_x(angle);
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::archetype::Species;
    use approx::assert_relative_eq;

    #[test]
    fn biped_legs_are_exactly_antiphase() {
        for step in 0..100 {
            let t = step as f32 * 0.073;
            let l = leg_swing(t, 1.8, leg_phase(Gait::Biped, false, true));
            let r = leg_swing(t, 1.8, leg_phase(Gait::Biped, false, false));
            assert_relative_eq!(l + r, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn quadruped_diagonal_pairs_share_a_phase() {
        let t = 1.234;
        let freq = 0.9;
        let fl = leg_swing(t, freq, leg_phase(Gait::Quadruped, true, true));
        let fr = leg_swing(t, freq, leg_phase(Gait::Quadruped, true, false));
        let bl = leg_swing(t, freq, leg_phase(Gait::Quadruped, false, true));
        let br = leg_swing(t, freq, leg_phase(Gait::Quadruped, false, false));
        assert_relative_eq!(fl, br, epsilon = 1e-6);
        assert_relative_eq!(fr, bl, epsilon = 1e-6);
        assert_relative_eq!(fl + fr, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn idle_pose_keeps_legs_still() {
        let mut rig = Rig::build(Species::Raptor);
        pose(&mut rig, Species::Raptor.archetype(), 2.5, false);
        for j in &rig.joints {
            if matches!(j.kind, JointKind::Leg { .. }) {
                assert_eq!(j.pose_rotation, Quat::IDENTITY);
            }
        }
    }

    #[test]
    fn breathing_moves_only_the_torso_scale() {
        let mut rig = Rig::build(Species::Sauropod);
        // Pick a time where sin(breath phase) is clearly nonzero.
        pose(&mut rig, Species::Sauropod.archetype(), 0.7, true);
        for j in &rig.joints {
            match j.kind {
                JointKind::Torso => {
                    assert!((j.pose_scale - 1.0).abs() > 1e-4);
                    assert!((j.pose_scale - 1.0).abs() <= BREATH_SCALE + 1e-6);
                }
                _ => assert_eq!(j.pose_scale, 1.0),
            }
        }
    }

    #[test]
    fn tail_wave_travels_along_the_chain() {
        let mut rig = Rig::build(Species::Sauropod);
        pose(&mut rig, Species::Sauropod.archetype(), 0.31, true);
        // Adjacent tail segments carry different rotations (phase offset),
        // which is what produces the traveling wave.
        let angles: Vec<f32> = rig
            .joints
            .iter()
            .filter(|j| matches!(j.kind, JointKind::Tail { .. }))
            .map(|j| j.pose_rotation.to_euler(glam::EulerRot::YXZ).0)
            .collect();
        assert!(angles.len() >= 2);
        for w in angles.windows(2) {
            assert!((w[0] - w[1]).abs() > 1e-5);
        }
    }
}
