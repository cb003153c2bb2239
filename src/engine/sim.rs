// Scene simulation: world construction and the per-tick update chain.
//
// Single-threaded and frame-driven. Every tick runs, in order:
// steering → separation → grounding → animation. Nothing else mutates the
// creature state, so the update chain is the whole concurrency story.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::animation;
use super::archetype::Species;
use super::components::Transform;
use super::creature::Creature;
use super::grounding::GroundTrack;
use super::interact::{Interaction, InteractionTable};
use super::rig::Rig;
use super::separation::{self, SeparationBody};
use super::terrain::{HeightSampler, Terrain, WORLD_HALF};

/// Static scene prop registered in the interaction table (the biome
/// structures of the original scene). Drawn as a single colored box.
#[derive(Component)]
pub struct Landmark {
    pub half_extent: Vec3,
    pub color: [f32; 3],
}

/// The island scene: terrain, creature world, and interactable side-table.
pub struct FaunaSim {
    pub world: World,
    pub terrain: Terrain,
    pub interactions: InteractionTable,
    rng: StdRng,
    time: f32,
}

impl FaunaSim {
    /// Empty island. Deterministic for a given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            terrain: Terrain::generate(seed),
            interactions: InteractionTable::default(),
            rng: StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            time: 0.0,
        }
    }

    /// Spawn one creature at `spawn` or, if `None`, at a random point on the
    /// inner half of the island. Scale and speed are randomized per instance.
    pub fn spawn_creature(&mut self, species: Species, spawn: Option<Vec2>) -> Entity {
        let xz = spawn.unwrap_or_else(|| {
            let bearing = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let dist = self.rng.gen_range(0.0..WORLD_HALF * 0.5);
            Vec2::new(bearing.sin(), bearing.cos()) * dist
        });
        let scale = self.rng.gen_range(0.8..1.3);
        let speed = self.rng.gen_range(0.85..1.2);

        let creature = Creature::new(species, scale, speed, &mut self.rng);
        let ground = self.terrain.height_at(xz.x, xz.y);
        let base_y = ground + species.archetype().foot_offset * scale;
        let position = Vec3::new(xz.x, base_y, xz.y);

        self.world
            .spawn((
                Transform::from_position(position),
                creature,
                GroundTrack::settled_at(base_y),
                Rig::build(species),
            ))
            .id()
    }

    /// Spawn a static landmark and register its interaction.
    pub fn spawn_landmark(
        &mut self,
        position: Vec3,
        half_extent: Vec3,
        color: [f32; 3],
        interaction: Interaction,
    ) -> Entity {
        let entity = self
            .world
            .spawn((
                Transform::from_position(position),
                Landmark { half_extent, color },
            ))
            .id();
        self.interactions.insert(entity, interaction);
        entity
    }

    /// The fixed roster of the island scene.
    pub fn populate_default(&mut self) {
        for _ in 0..2 {
            self.spawn_creature(Species::Sauropod, None);
        }
        for _ in 0..6 {
            self.spawn_creature(Species::Raptor, None);
        }
        for _ in 0..3 {
            self.spawn_creature(Species::Stegosaur, None);
        }
        for _ in 0..4 {
            self.spawn_creature(Species::Trike, None);
        }

        // Landmarks at fixed bearings near the coast.
        let spots: [(f32, Interaction, [f32; 3]); 2] = [
            (
                0.8,
                Interaction::Teleport { destination: Vec3::new(0.0, 120.0, 0.0) },
                [0.8, 0.7, 0.4],
            ),
            (
                3.9,
                Interaction::Link { url: "https://example.com/gallery".to_owned() },
                [0.5, 0.6, 0.8],
            ),
        ];
        for (bearing, interaction, color) in spots {
            let xz = Vec2::new(bearing.sin(), bearing.cos()) * (WORLD_HALF * 0.55);
            let y = self.terrain.height_at(xz.x, xz.y);
            self.spawn_landmark(
                Vec3::new(xz.x, y + 25.0, xz.y),
                Vec3::new(18.0, 25.0, 18.0),
                color,
                interaction,
            );
        }
    }

    /// Remove a creature or landmark and its interaction entry. The render
    /// buffers are shared across instances, so nothing GPU-side leaks.
    pub fn despawn(&mut self, entity: Entity) {
        self.interactions.remove(entity);
        self.world.despawn(entity);
    }

    /// One simulation tick. `dt` must already be clamped by the frame clock.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.run_steering(dt);
        self.run_separation();
        self.run_grounding();
        self.run_animation();
    }

    pub fn elapsed(&self) -> f32 {
        self.time
    }

    fn run_steering(&mut self, dt: f32) {
        let mut query = self.world.query::<(&mut Transform, &mut Creature)>();
        for (mut transform, mut creature) in query.iter_mut(&mut self.world) {
            creature.update_steering(&mut transform.position, dt, &mut self.rng);
        }
    }

    fn run_separation(&mut self) {
        // Snapshot into the flat resolver representation, resolve, write back.
        let mut entities = Vec::new();
        let mut bodies = Vec::new();
        {
            let mut query = self.world.query::<(Entity, &Transform, &Creature)>();
            for (entity, transform, creature) in query.iter(&self.world) {
                entities.push(entity);
                bodies.push(SeparationBody {
                    pos: Vec2::new(transform.position.x, transform.position.z),
                    radius: creature.radius,
                    walking: creature.state.is_walking(),
                });
            }
        }

        let retarget = separation::resolve(&mut bodies, &mut self.rng);

        for (entity, body) in entities.iter().zip(&bodies) {
            if let Some(mut transform) = self.world.get_mut::<Transform>(*entity) {
                transform.position.x = body.pos.x;
                transform.position.z = body.pos.y;
            }
        }
        for idx in retarget {
            let entity = entities[idx];
            let pos = bodies[idx].pos;
            if let Some(mut creature) = self.world.get_mut::<Creature>(entity) {
                creature.pick_new_target(pos, &mut self.rng);
            }
        }
    }

    fn run_grounding(&mut self) {
        let terrain = &self.terrain;
        let time = self.time;
        let mut query = self
            .world
            .query::<(&mut Transform, &Creature, &mut GroundTrack)>();
        for (mut transform, creature, mut track) in query.iter_mut(&mut self.world) {
            let a = creature.species.archetype();
            track.update(
                terrain,
                &mut transform.position,
                a.foot_offset,
                creature.scale,
                creature.state.is_walking(),
                time,
                a.gait_frequency,
            );
        }
    }

    fn run_animation(&mut self) {
        let time = self.time;
        let mut query = self.world.query::<(&Creature, &mut Rig)>();
        for (creature, mut rig) in query.iter_mut(&mut self.world) {
            animation::pose(
                &mut rig,
                creature.species.archetype(),
                time,
                creature.state.is_walking(),
            );
        }
    }

    /// (total, walking, idle) creature counts for the debug overlay.
    pub fn creature_stats(&mut self) -> (usize, usize, usize) {
        let mut query = self.world.query::<&Creature>();
        let mut total = 0;
        let mut walking = 0;
        for creature in query.iter(&self.world) {
            total += 1;
            if creature.state.is_walking() {
                walking += 1;
            }
        }
        (total, walking, total - walking)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::creature::MoveState;
    use crate::engine::grounding::{BOUNCE_AMPLITUDE, GROUND_MARGIN};

    #[test]
    fn populate_spawns_the_full_roster() {
        let mut sim = FaunaSim::new(1);
        sim.populate_default();
        let (total, walking, idle) = sim.creature_stats();
        assert_eq!(total, 15);
        assert_eq!(walking + idle, total);
        assert_eq!(sim.interactions.len(), 2);
    }

    #[test]
    fn grounding_invariant_holds_after_settling() {
        let mut sim = FaunaSim::new(8);
        sim.populate_default();
        for _ in 0..600 {
            sim.update(0.016);
        }

        let terrain = &sim.terrain;
        let mut query = sim.world.query::<(&Transform, &Creature)>();
        for (transform, creature) in query.iter(&sim.world) {
            let p = transform.position;
            let expected = terrain.height_at(p.x, p.z)
                + creature.species.archetype().foot_offset * creature.scale
                + GROUND_MARGIN;
            let bounce_bound = BOUNCE_AMPLITUDE * creature.scale;
            // A walking creature moved this very tick, so allow one tick of
            // easing lag on top of the bounce amplitude.
            let tolerance = bounce_bound + 8.0;
            assert!(
                (p.y - expected).abs() <= tolerance,
                "{:?}: y={} expected≈{} (tol {})",
                creature.species, p.y, expected, tolerance
            );
        }
    }

    #[test]
    fn long_run_keeps_every_state_and_position_finite() {
        let mut sim = FaunaSim::new(21);
        sim.populate_default();
        for _ in 0..2000 {
            sim.update(0.05);
        }
        let mut query = sim.world.query::<(&Transform, &Creature)>();
        for (transform, creature) in query.iter(&sim.world) {
            assert!(transform.position.is_finite());
            assert!(creature.yaw.is_finite());
            match creature.state {
                MoveState::Idle { countdown } => assert!(countdown.is_finite()),
                MoveState::Walking { target } => assert!(target.is_finite()),
            }
        }
    }

    #[test]
    fn despawn_removes_entity_and_interaction_entry() {
        let mut sim = FaunaSim::new(2);
        let landmark = sim.spawn_landmark(
            Vec3::ZERO,
            Vec3::ONE,
            [1.0, 1.0, 1.0],
            Interaction::Link { url: "https://example.com".into() },
        );
        assert_eq!(sim.interactions.len(), 1);
        sim.despawn(landmark);
        assert!(sim.interactions.is_empty());
        assert!(sim.world.get_entity(landmark).is_err());
    }

    #[test]
    fn same_seed_replays_identically() {
        let run = |seed| {
            let mut sim = FaunaSim::new(seed);
            sim.populate_default();
            for _ in 0..200 {
                sim.update(0.016);
            }
            let mut query = sim.world.query::<&Transform>();
            query
                .iter(&sim.world)
                .map(|t| t.position.to_array())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }
}
