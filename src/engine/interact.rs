// Interactable side-table: tagged descriptors keyed by entity identity,
// replacing the open-ended per-node property bag the original scene used.
// Picking is a camera ray marched against the heightfield, then a nearest-
// registered-entity lookup around the hit point.

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::terrain::HeightSampler;

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// What clicking a scene node does.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Jump the view to a destination point.
    Teleport { destination: Vec3 },
    /// Open an external link.
    Link { url: String },
}

/// Explicit side-table: node identity → interaction descriptor.
#[derive(Default)]
pub struct InteractionTable {
    entries: HashMap<Entity, Interaction>,
}

impl InteractionTable {
    pub fn insert(&mut self, entity: Entity, interaction: Interaction) {
        self.entries.insert(entity, interaction);
    }

    /// Drop the entry when its entity is despawned.
    pub fn remove(&mut self, entity: Entity) -> Option<Interaction> {
        self.entries.remove(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&Interaction> {
        self.entries.get(&entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest registered entity within `pick_radius` of `point`, given the
    /// current world positions of candidate entities.
    pub fn pick_near(
        &self,
        point: Vec3,
        positions: &[(Entity, Vec3)],
        pick_radius: f32,
    ) -> Option<Entity> {
        let mut best: Option<(f32, Entity)> = None;
        for &(entity, pos) in positions {
            if !self.entries.contains_key(&entity) {
                continue;
            }
            let d2 = (pos - point).length_squared();
            if d2 > pick_radius * pick_radius {
                continue;
            }
            if best.is_none_or(|(bd2, _)| d2 < bd2) {
                best = Some((d2, entity));
            }
        }
        best.map(|(_, e)| e)
    }
}

// ============================================================================
// GROUND RAY
// ============================================================================

/// March a ray against the heightfield and return the surface hit point.
///
/// Fixed-step march with a short bisection refine once the ray first dips
/// below the surface. Good enough for click picking; not a general collider.
pub fn ray_terrain_hit(
    sampler: &impl HeightSampler,
    origin: Vec3,
    dir: Vec3,
    max_dist: f32,
) -> Option<Vec3> {
    const STEP: f32 = 8.0;
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut prev_t = 0.0f32;
    let mut t = 0.0f32;
    while t <= max_dist {
        let p = origin + dir * t;
        if p.y <= sampler.height_at(p.x, p.z) {
            // Bisect between the last above-surface point and this one.
            let (mut lo, mut hi) = (prev_t, t);
            for _ in 0..12 {
                let mid = 0.5 * (lo + hi);
                let q = origin + dir * mid;
                if q.y <= sampler.height_at(q.x, q.z) {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            return Some(origin + dir * hi);
        }
        prev_t = t;
        t += STEP;
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================
