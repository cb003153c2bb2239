// Engine module: the island simulation (terrain, creatures, steering,
// grounding, animation) plus the host-side camera/input/overlay/mesh layers.

pub mod animation;
pub mod archetype;
pub mod camera;
pub mod components;
pub mod creature;
pub mod debug_overlay;
pub mod grounding;
pub mod input;
pub mod interact;
pub mod looper;
pub mod mesh;
pub mod rig;
pub mod separation;
pub mod sim;
pub mod subdivide;
pub mod terrain;

// Re-export commonly used items
pub use components::*;
