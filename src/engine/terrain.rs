// Island heightfield: procedural generation + height queries + render mesh.
//
// Creatures only ever see the `HeightSampler` trait; the raw grid and the
// mesh builder are host-side concerns.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::mesh::PolyMesh;

// ============================================================================
// CONSTANTS
// ============================================================================

/// World runs from -WORLD_HALF to +WORLD_HALF on both X and Z.
/// Sized so the island comfortably contains a maximum-length wander leg (1400).
pub const WORLD_HALF: f32 = 2000.0;

/// Height samples per side. 129 gives 128 cells of 31.25 world units each.
pub const GRID_RES: usize = 129;

/// Peak height of the island dome before noise layers.
const DOME_HEIGHT: f32 = 180.0;

/// Number of layered sine octaves in the noise pass.
const NOISE_LAYERS: usize = 4;

// ============================================================================
// HEIGHT SAMPLER TRAIT
// ============================================================================

/// Synchronous height query on the XZ plane. The only terrain surface the
/// creature systems depend on.
pub trait HeightSampler {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

// ============================================================================
// TERRAIN
// ============================================================================

/// Square heightfield over [-WORLD_HALF, WORLD_HALF]².
/// Immutable after generation.
pub struct Terrain {
    heights: Vec<f32>,
    res: usize,
    cell: f32,
}

impl Terrain {
    /// Generate the island deterministically from `seed`.
    ///
    /// Profile: a radial dome (so the coastline is a rough circle) with a few
    /// layered sine octaves on top for ridges and hollows.
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        // Per-layer frequency/phase/amplitude, drawn once up front so the
        // sampling loop below stays branch-free.
        let layers: Vec<(f32, f32, f32, f32, f32)> = (0..NOISE_LAYERS)
            .map(|i| {
                let freq = 1.5 * (i as f32 + 1.0) / WORLD_HALF;
                (
                    freq * rng.gen_range(0.7..1.3),
                    freq * rng.gen_range(0.7..1.3),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                    DOME_HEIGHT * 0.12 / (i as f32 + 1.0),
                )
            })
            .collect();

        let res = GRID_RES;
        let cell = 2.0 * WORLD_HALF / (res - 1) as f32;
        let mut heights = Vec::with_capacity(res * res);

        for j in 0..res {
            for i in 0..res {
                let x = i as f32 * cell - WORLD_HALF;
                let z = j as f32 * cell - WORLD_HALF;

                // Radial dome, zero at the rim and beyond.
                let r2 = (x * x + z * z) / (WORLD_HALF * WORLD_HALF);
                let dome = (1.0 - r2).max(0.0) * DOME_HEIGHT;

                let mut h = dome;
                for &(fx, fz, px, pz, amp) in &layers {
                    // Noise fades out toward the coast with the dome.
                    let fade = (1.0 - r2).max(0.0);
                    h += ((x * fx + px).sin() * (z * fz + pz).sin()) * amp * fade;
                }
                heights.push(h);
            }
        }

        Self { heights, res, cell }
    }

    /// Grid sample clamped to the nearest edge vertex. Total for all (i, j).
    fn sample(&self, i: i32, j: i32) -> f32 {
        let i = i.clamp(0, self.res as i32 - 1) as usize;
        let j = j.clamp(0, self.res as i32 - 1) as usize;
        self.heights[j * self.res + i]
    }

    /// Build the renderable terrain sheet. One vertex per height sample,
    /// one CCW quad per cell, ready for `triangulate_smooth`.
    pub fn build_mesh(&self) -> PolyMesh {
        let mut mesh = PolyMesh::new();
        for j in 0..self.res {
            for i in 0..self.res {
                let x = i as f32 * self.cell - WORLD_HALF;
                let z = j as f32 * self.cell - WORLD_HALF;
                mesh.add_vertex(Vec3::new(x, self.heights[j * self.res + i], z));
            }
        }
        let idx = |i: usize, j: usize| j * self.res + i;
        for j in 0..self.res - 1 {
            for i in 0..self.res - 1 {
                // CCW viewed from above (+Y), matching back-face culling.
                mesh.add_face(vec![
                    idx(i, j),
                    idx(i, j + 1),
                    idx(i + 1, j + 1),
                    idx(i + 1, j),
                ]);
            }
        }
        mesh
    }
}

impl HeightSampler for Terrain {
    /// Bilinear interpolation between the four surrounding samples.
    /// Out-of-bounds positions clamp to the nearest edge sample, so the
    /// query is total — no panic, no NaN for finite inputs.
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let gx = (x + WORLD_HALF) / self.cell;
        let gz = (z + WORLD_HALF) / self.cell;
        let i = gx.floor() as i32;
        let j = gz.floor() as i32;
        let fx = (gx - gx.floor()).clamp(0.0, 1.0);
        let fz = (gz - gz.floor()).clamp(0.0, 1.0);

        let h00 = self.sample(i, j);
        let h10 = self.sample(i + 1, j);
        let h01 = self.sample(i, j + 1);
        let h11 = self.sample(i + 1, j + 1);

        let a = h00 + (h10 - h00) * fx;
        let b = h01 + (h11 - h01) * fx;
        a + (b - a) * fz
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
    fn same_seed_same_island() {
        let a = Terrain::generate(7);
        let b = Terrain::generate(7);
        assert_eq!(a.heights, b.heights);
    }

    #[test]
    fn height_is_finite_everywhere() {
        let t = Terrain::generate(1);
        for &(x, z) in &[
            (0.0, 0.0),
            (WORLD_HALF, WORLD_HALF),
            (-WORLD_HALF, WORLD_HALF),
            (3.0 * WORLD_HALF, -5.0 * WORLD_HALF), // far out of bounds
            (1234.5, -987.6),
        ] {
            assert!(t.height_at(x, z).is_finite());
        }
    }

    #[test]
    fn bilinear_matches_grid_vertices() {
        let t = Terrain::generate(3);
        let x = 10.0 * t.cell - WORLD_HALF;
        let z = 20.0 * t.cell - WORLD_HALF;
        assert_relative_eq!(
            t.height_at(x, z),
            t.heights[20 * t.res + 10],
            epsilon = 1e-3
        );
    }

    #[test]
    fn coast_is_near_sea_level_and_center_is_not() {
        let t = Terrain::generate(11);
        let center = t.height_at(0.0, 0.0);
        let rim = t.height_at(WORLD_HALF, 0.0);
        assert!(center > 50.0, "island dome should rise at the center");
        assert!(rim.abs() < 1.0, "rim should sit at sea level");
    }

    #[test]
    fn out_of_bounds_clamps_to_edge() {
        let t = Terrain::generate(5);
        let edge = t.height_at(WORLD_HALF, 100.0);
        let beyond = t.height_at(WORLD_HALF + 500.0, 100.0);
        assert_relative_eq!(edge, beyond, epsilon = 1e-4);
    }

    #[test]
    fn mesh_covers_every_cell() {
        let t = Terrain::generate(2);
        let mesh = t.build_mesh();
        assert_eq!(mesh.vertex_count(), GRID_RES * GRID_RES);
        assert_eq!(mesh.faces.len(), (GRID_RES - 1) * (GRID_RES - 1));
    }
}
