// Pairwise separation: symmetric circular push-apart over all unordered
// pairs. O(n²) with no spatial partitioning — a documented scaling limit,
// fine for the tens of creatures the island carries.

use glam::Vec2;
use rand::Rng;

/// Chance per tick that an overlapping, walking creature abandons its target
/// and re-rolls. Anti-deadlock heuristic, not a deadlock-freedom guarantee.
pub const RETARGET_CHANCE: f64 = 0.02;

/// Planar snapshot of one creature fed into the resolver.
pub struct SeparationBody {
    pub pos: Vec2,
    pub radius: f32,
    pub walking: bool,
}

/// Resolve every overlapping pair by pushing each body half the overlap
/// apart along the line of centers. Coincident centers split along +X.
///
/// Returns the indices of walking bodies whose re-target roll fired while
/// overlapping; the caller picks their new wander targets.
pub fn resolve(bodies: &mut [SeparationBody], rng: &mut impl Rng) -> Vec<usize> {
    let mut retarget = Vec::new();

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let delta = bodies[j].pos - bodies[i].pos;
            let dist = delta.length();
            let r_sum = bodies[i].radius + bodies[j].radius;
            if dist >= r_sum {
                continue;
            }

            let dir = if dist > f32::EPSILON {
                delta / dist
            } else {
                Vec2::X
            };
            let push = (r_sum - dist) * 0.5;
            bodies[i].pos -= dir * push;
            bodies[j].pos += dir * push;

            for &k in &[i, j] {
                if bodies[k].walking && rng.gen_bool(RETARGET_CHANCE) {
                    retarget.push(k);
                }
            }
        }
    }

    retarget.sort_unstable();
    retarget.dedup();
    retarget
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

    fn body(x: f32, z: f32, radius: f32) -> SeparationBody {
        SeparationBody {
            pos: Vec2::new(x, z),
            radius,
            walking: false,
        }
    }

    #[test]
    fn overlap_splits_evenly_between_the_pair() {
        // 10 apart, radii summing to 30 → overlap 20, 10 each way.
        let mut rng = StdRng::seed_from_u64(0);
        let mut bodies = vec![body(0.0, 0.0, 15.0), body(10.0, 0.0, 15.0)];

        resolve(&mut bodies, &mut rng);

        assert_relative_eq!(bodies[0].pos.x, -10.0, epsilon = 1e-4);
        assert_relative_eq!(bodies[1].pos.x, 20.0, epsilon = 1e-4);
        assert_relative_eq!((bodies[1].pos - bodies[0].pos).length(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn non_overlapping_pair_is_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut bodies = vec![body(0.0, 0.0, 5.0), body(20.0, 0.0, 5.0)];
        resolve(&mut bodies, &mut rng);
        assert_eq!(bodies[0].pos, Vec2::ZERO);
        assert_eq!(bodies[1].pos, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn coincident_centers_still_separate() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut bodies = vec![body(5.0, 5.0, 8.0), body(5.0, 5.0, 8.0)];
        resolve(&mut bodies, &mut rng);
        assert_relative_eq!((bodies[1].pos - bodies[0].pos).length(), 16.0, epsilon = 1e-4);
    }

    #[test]
    fn cluster_converges_within_a_few_ticks() {
        // Sequential pairwise application is approximate within one tick;
        // what matters is convergence over several ticks under static targets.
        let mut rng = StdRng::seed_from_u64(12);
        let mut bodies = vec![
            body(0.0, 0.0, 10.0),
            body(4.0, 1.0, 10.0),
            body(-3.0, 5.0, 10.0),
            body(1.0, -6.0, 10.0),
        ];

        for _ in 0..20 {
            resolve(&mut bodies, &mut rng);
        }

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let dist = (bodies[j].pos - bodies[i].pos).length();
                let r_sum = bodies[i].radius + bodies[j].radius;
                assert!(
                    dist >= r_sum - 1e-3,
                    "pair ({i},{j}) still overlapping: {dist} < {r_sum}"
                );
            }
        }
    }

    #[test]
    fn retarget_roll_only_fires_for_walking_overlappers() {
        let mut rng = StdRng::seed_from_u64(99);
        // Heavily overlapping stack; only index 0 walks.
        let mut bodies: Vec<SeparationBody> = (0..6)
            .map(|i| SeparationBody {
                pos: Vec2::new(i as f32 * 0.5, 0.0),
                radius: 10.0,
                walking: i == 0,
            })
            .collect();

        let mut fired = Vec::new();
        for _ in 0..2000 {
            fired.extend(resolve(&mut bodies, &mut rng));
            // Re-stack so they keep overlapping across iterations.
            for (i, b) in bodies.iter_mut().enumerate() {
                b.pos = Vec2::new(i as f32 * 0.5, 0.0);
            }
        }

        assert!(!fired.is_empty(), "2% per tick should fire within 2000 ticks");
        assert!(fired.iter().all(|&k| k == 0), "only the walker may re-target");
    }
}
