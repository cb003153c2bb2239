// Creature rig: an arena of named joints with index-based parent links and
// parent-relative transforms. Built once per creature from its archetype;
// the animation pass rewrites the local pose fields every frame.
//
// Arena invariant: a joint's parent always appears earlier in the arena, so
// one forward pass yields every world frame.

use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

use super::archetype::{Gait, Species};

// ============================================================================
// JOINTS
// ============================================================================

/// Identifies a joint's role in the rig. Chain joints carry their index so
/// the animation pass can phase-offset along the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    Torso,
    Neck { index: usize },
    Head,
    Jaw,
    Tail { index: usize },
    Leg { front: bool, left: bool },
}

/// One joint in the arena. `rest_offset` is the bind translation relative to
/// the parent frame; `pose_rotation`/`pose_scale` are overwritten by the
/// animation pass each frame.
pub struct Joint {
    pub kind: JointKind,
    pub parent: Option<usize>,
    pub rest_offset: Vec3,
    /// Render box half-extents in the joint frame.
    pub half_extent: Vec3,
    /// Offset of the render box center from the joint origin. Legs pivot at
    /// the hip and hang their box below it.
    pub center_offset: Vec3,
    pub pose_rotation: Quat,
    pub pose_scale: f32,
}

// ============================================================================
// RIG
// ============================================================================

#[derive(Component)]
pub struct Rig {
    pub joints: Vec<Joint>,
}

impl Rig {
    /// Construct the rig for one species: torso, neck chain, head, optional
    /// jaw, tail chain, and legs per the archetype's gait.
    pub fn build(species: Species) -> Self {
        let a = species.archetype();
        let mut rig = Rig { joints: Vec::new() };

        let torso = rig.add(JointKind::Torso, None, Vec3::ZERO, a.torso_half, Vec3::ZERO);

        // Neck chain: rises from the front of the torso, thinning toward the
        // head. Segment 0 sits at the torso's front-top edge.
        let mut parent = torso;
        let mut half = a.torso_half * 0.35;
        for i in 0..a.neck_segments {
            let offset = if i == 0 {
                Vec3::new(0.0, a.torso_half.y * 0.6, a.torso_half.z * 0.9)
            } else {
                a.neck_step
            };
            half *= 0.88;
            parent = rig.add(JointKind::Neck { index: i }, Some(parent), offset, half, Vec3::ZERO);
        }

        // Head on the end of the neck.
        let head_half = a.torso_half * 0.30;
        let head = rig.add(
            JointKind::Head,
            Some(parent),
            a.neck_step * 0.9,
            head_half,
            Vec3::ZERO,
        );
        if a.has_jaw {
            rig.add(
                JointKind::Jaw,
                Some(head),
                Vec3::new(0.0, -head_half.y * 0.7, head_half.z * 0.5),
                Vec3::new(head_half.x * 0.8, head_half.y * 0.3, head_half.z * 0.9),
                Vec3::new(0.0, 0.0, head_half.z * 0.4),
            );
        }

        // Tail chain: trails from the rear of the torso, thinning to the tip.
        let mut parent = torso;
        let mut half = a.torso_half * 0.4;
        for i in 0..a.tail_segments {
            let offset = if i == 0 {
                Vec3::new(0.0, a.torso_half.y * 0.2, -a.torso_half.z * 0.95)
            } else {
                a.tail_step
            };
            half *= 0.8;
            parent = rig.add(JointKind::Tail { index: i }, Some(parent), offset, half, Vec3::ZERO);
        }

        // Legs: pivot at the hip, box hanging below. Bipeds get the hind pair
        // only; quadrupeds get all four.
        let leg_half = Vec3::new(
            a.torso_half.x * 0.25,
            a.leg_length * 0.5,
            a.torso_half.x * 0.25,
        );
        let hang = Vec3::new(0.0, -a.leg_length * 0.5, 0.0);
        let slots: &[(bool, bool)] = match a.gait {
            Gait::Biped => &[(false, true), (false, false)],
            Gait::Quadruped => &[(true, true), (true, false), (false, true), (false, false)],
        };
        for &(front, left) in slots {
            let x = if left { -a.torso_half.x * 0.8 } else { a.torso_half.x * 0.8 };
            let z = if front { a.torso_half.z * 0.65 } else { -a.torso_half.z * 0.65 };
            rig.add(
                JointKind::Leg { front, left },
                Some(torso),
                Vec3::new(x, -a.torso_half.y * 0.7, z),
                leg_half,
                hang,
            );
        }

        rig
    }

    fn add(
        &mut self,
        kind: JointKind,
        parent: Option<usize>,
        rest_offset: Vec3,
        half_extent: Vec3,
        center_offset: Vec3,
    ) -> usize {
        if let Some(p) = parent {
            debug_assert!(p < self.joints.len(), "parent must precede child");
        }
        self.joints.push(Joint {
            kind,
            parent,
            rest_offset,
            half_extent,
            center_offset,
            pose_rotation: Quat::IDENTITY,
            pose_scale: 1.0,
        });
        self.joints.len() - 1
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Clear the animated pose back to the bind pose.
    pub fn reset_pose(&mut self) {
        for joint in &mut self.joints {
            joint.pose_rotation = Quat::IDENTITY;
            joint.pose_scale = 1.0;
        }
    }

    /// Compose world frames for every joint in one forward pass.
    /// `root` is the creature's world transform (position + yaw + scale).
    /// Pose scale is deliberately excluded here so breathing does not
    /// propagate into child offsets; it is applied in `render_matrix`.
    pub fn world_frames(&self, root: Mat4) -> Vec<Mat4> {
        let mut frames = Vec::with_capacity(self.joints.len());
        for joint in &self.joints {
            let parent = match joint.parent {
                Some(p) => frames[p],
                None => root,
            };
            let local =
                Mat4::from_translation(joint.rest_offset) * Mat4::from_quat(joint.pose_rotation);
            frames.push(parent * local);
        }
        frames
    }

    /// Model matrix that maps the shared unit box onto this joint's render box.
    pub fn render_matrix(world: &Mat4, joint: &Joint) -> Mat4 {
        *world
            * Mat4::from_translation(joint.center_offset)
            * Mat4::from_scale(joint.half_extent * 2.0 * joint.pose_scale)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parents_precede_children_for_all_species() {
        for s in Species::ALL {
            let rig = Rig::build(s);
            for (i, joint) in rig.joints.iter().enumerate() {
                if let Some(p) = joint.parent {
                    assert!(p < i, "{s:?}: joint {i} has parent {p}");
                }
            }
            assert_eq!(rig.joints[0].kind, JointKind::Torso);
        }
    }

    #[test]
    fn chain_counts_match_archetype() {
        for s in Species::ALL {
            let a = s.archetype();
            let rig = Rig::build(s);
            let necks = rig
                .joints
                .iter()
                .filter(|j| matches!(j.kind, JointKind::Neck { .. }))
                .count();
            let tails = rig
                .joints
                .iter()
                .filter(|j| matches!(j.kind, JointKind::Tail { .. }))
                .count();
            let legs = rig
                .joints
                .iter()
                .filter(|j| matches!(j.kind, JointKind::Leg { .. }))
                .count();
            let jaws = rig
                .joints
                .iter()
                .filter(|j| j.kind == JointKind::Jaw)
                .count();
            assert_eq!(necks, a.neck_segments);
            assert_eq!(tails, a.tail_segments);
            assert_eq!(legs, if a.gait == Gait::Biped { 2 } else { 4 });
            assert_eq!(jaws, usize::from(a.has_jaw));
        }
    }

    #[test]
    fn world_frames_accumulate_parent_translation() {
        let rig = Rig::build(Species::Sauropod);
        let root = Mat4::from_translation(Vec3::new(100.0, 0.0, -50.0));
        let frames = rig.world_frames(root);
        assert_eq!(frames.len(), rig.joint_count());

        // The torso frame is the root frame (zero rest offset).
        let torso_pos = frames[0].transform_point3(Vec3::ZERO);
        assert_relative_eq!(torso_pos.x, 100.0, epsilon = 1e-4);
        assert_relative_eq!(torso_pos.z, -50.0, epsilon = 1e-4);

        // Every neck joint sits strictly higher than its parent in bind pose.
        for (i, joint) in rig.joints.iter().enumerate() {
            if let JointKind::Neck { .. } = joint.kind {
                let p = joint.parent.unwrap();
                let y = frames[i].transform_point3(Vec3::ZERO).y;
                let py = frames[p].transform_point3(Vec3::ZERO).y;
                assert!(y > py);
            }
        }
    }

    #[test]
    fn reset_pose_clears_animation_state() {
        let mut rig = Rig::build(Species::Raptor);
        rig.joints[0].pose_scale = 1.5;
        rig.joints[1].pose_rotation = Quat::from_rotation_x(0.3);
        rig.reset_pose();
        for j in &rig.joints {
            assert_eq!(j.pose_scale, 1.0);
            assert_eq!(j.pose_rotation, Quat::IDENTITY);
        }
    }
}
