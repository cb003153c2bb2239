// Species archetypes: fixed shape/proportion descriptors for each creature
// class. Static data — an unknown species is unrepresentable because every
// lookup is a total match over the enum.

use glam::Vec3;

// ============================================================================
// SPECIES
// ============================================================================

/// The fixed creature roster of the island scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Long-necked quadruped, the slow giant of the island.
    Sauropod,
    /// Small fast biped.
    Raptor,
    /// Plated quadruped with a heavy tail.
    Stegosaur,
    /// Frilled quadruped, mid-sized.
    Trike,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Sauropod,
        Species::Raptor,
        Species::Stegosaur,
        Species::Trike,
    ];

    pub fn archetype(self) -> &'static Archetype {
        match self {
            Species::Sauropod => &SAUROPOD,
            Species::Raptor => &RAPTOR,
            Species::Stegosaur => &STEGOSAUR,
            Species::Trike => &TRIKE,
        }
    }

    /// Flat body color used by the instanced renderer.
    pub fn color(self) -> [f32; 3] {
        match self {
            Species::Sauropod => [0.45, 0.55, 0.35],
            Species::Raptor => [0.65, 0.45, 0.25],
            Species::Stegosaur => [0.40, 0.50, 0.55],
            Species::Trike => [0.55, 0.50, 0.30],
        }
    }
}

// ============================================================================
// GAIT
// ============================================================================

/// Walk-cycle pattern. Encodes which legs share a swing phase:
/// bipeds alternate left/right, quadrupeds pair diagonally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    Biped,
    Quadruped,
}

// ============================================================================
// ARCHETYPE
// ============================================================================

/// Per-species shape descriptor. Read-only after construction; all distances
/// are in world units at scale factor 1.0.
pub struct Archetype {
    pub gait: Gait,
    /// Torso box half-extents (x = width, y = height, z = length).
    pub torso_half: Vec3,
    pub neck_segments: usize,
    /// Local offset from one neck segment to the next.
    pub neck_step: Vec3,
    pub tail_segments: usize,
    /// Local offset from one tail segment to the next.
    pub tail_step: Vec3,
    pub leg_length: f32,
    pub has_jaw: bool,
    /// Base vertical offset of the torso pivot above the ground.
    pub foot_offset: f32,
    /// Walk-cycle frequency in cycles per second.
    pub gait_frequency: f32,
    /// Species speed multiplier applied on top of the per-instance factor.
    pub base_speed: f32,
    /// Collision radius at scale factor 1.0.
    pub radius_base: f32,
}

static SAUROPOD: Archetype = Archetype {
    gait: Gait::Quadruped,
    torso_half: Vec3::new(14.0, 12.0, 26.0),
    neck_segments: 5,
    neck_step: Vec3::new(0.0, 9.0, 7.0),
    tail_segments: 6,
    tail_step: Vec3::new(0.0, 1.5, -9.0),
    leg_length: 22.0,
    has_jaw: false,
    foot_offset: 34.0,
    gait_frequency: 0.6,
    base_speed: 0.7,
    radius_base: 42.0,
};

static RAPTOR: Archetype = Archetype {
    gait: Gait::Biped,
    torso_half: Vec3::new(5.0, 6.0, 11.0),
    neck_segments: 2,
    neck_step: Vec3::new(0.0, 5.0, 4.5),
    tail_segments: 5,
    tail_step: Vec3::new(0.0, 0.5, -6.0),
    leg_length: 13.0,
    has_jaw: true,
    foot_offset: 19.0,
    gait_frequency: 1.8,
    base_speed: 1.6,
    radius_base: 16.0,
};

static STEGOSAUR: Archetype = Archetype {
    gait: Gait::Quadruped,
    torso_half: Vec3::new(11.0, 11.0, 20.0),
    neck_segments: 2,
    neck_step: Vec3::new(0.0, 3.0, 6.0),
    tail_segments: 5,
    tail_step: Vec3::new(0.0, 1.0, -8.0),
    leg_length: 14.0,
    has_jaw: false,
    foot_offset: 25.0,
    gait_frequency: 0.9,
    base_speed: 0.9,
    radius_base: 30.0,
};

static TRIKE: Archetype = Archetype {
    gait: Gait::Quadruped,
    torso_half: Vec3::new(10.0, 9.0, 18.0),
    neck_segments: 1,
    neck_step: Vec3::new(0.0, 2.0, 8.0),
    tail_segments: 4,
    tail_step: Vec3::new(0.0, 0.5, -7.0),
    leg_length: 13.0,
    has_jaw: true,
    foot_offset: 22.0,
    gait_frequency: 1.0,
    base_speed: 1.0,
    radius_base: 28.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_species_has_an_archetype() {
        for s in Species::ALL {
            let a = s.archetype();
            assert!(a.leg_length > 0.0);
            assert!(a.radius_base > 0.0);
            assert!(a.gait_frequency > 0.0);
        }
    }

    #[test]
    fn raptor_is_the_only_biped() {
        for s in Species::ALL {
            let biped = s.archetype().gait == Gait::Biped;
            assert_eq!(biped, s == Species::Raptor);
        }
    }
}
