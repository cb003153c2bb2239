// Core ECS components shared across the creature systems.
// Species-specific state lives next to its system (Creature in creature.rs,
// GroundTrack in grounding.rs).

use bevy_ecs::prelude::*;
use glam::Vec3;

/// World position of an entity. Yaw lives on `Creature` — only creatures
/// have a heading, and the renderer composes both into the root transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}
