// Orbit camera for the island viewer.
//
// Model:
//   - a target point on the XZ plane the camera looks at
//   - fixed pitch, user-rotated yaw (Q/E), zoom along the look vector
//   - WASD pans the target relative to the camera facing
//   - screen_ray() unprojects a cursor position for ground picking

use glam::{Mat4, Vec2, Vec3, Vec4};
use winit::keyboard::KeyCode;

use super::input::InputState;
use super::terrain::WORLD_HALF;

pub struct OrbitCamera {
    /// Point on the ground plane (X/Z) the camera orbits. Clamped to the
    /// island bounds in update().
    target: Vec2,

    /// Distance from target along the look direction, clamped to
    /// [min_distance, max_distance] in update().
    distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Elevation angle in radians (0 = horizontal, π/2 = straight down).
    pub pitch: f32,
    /// Horizontal rotation in radians (0 = looking along -Z).
    pub yaw: f32,

    pub fov: f32,
    pub near: f32,
    pub far: f32,

    /// WASD pan speed in world units per second.
    pub move_speed: f32,
    /// Q/E orbit speed in radians per second.
    pub orbit_speed: f32,
    /// Zoom change (distance units) per scroll line.
    pub zoom_speed: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            target: Vec2::ZERO,
            distance: 900.0,
            min_distance: 150.0,
            max_distance: 2600.0,
            pitch: 38.0_f32.to_radians(),
            yaw: 0.0,
            fov: 45.0_f32.to_radians(),
            near: 1.0,
            far: 12000.0,
            move_speed: 600.0,
            orbit_speed: 1.4,
            zoom_speed: 80.0,
        }
    }

    /// Update from input. Call once per frame before rendering.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        // Camera-relative pan on XZ. yaw=0 faces -Z, so forward is (0, -1).
        let forward = Vec2::new(-self.yaw.sin(), -self.yaw.cos());
        let right = Vec2::new(self.yaw.cos(), -self.yaw.sin());

        let mut move_dir = Vec2::ZERO;
        if input.is_key_held(KeyCode::KeyW) {
            move_dir += forward;
        }
        if input.is_key_held(KeyCode::KeyS) {
            move_dir -= forward;
        }
        if input.is_key_held(KeyCode::KeyD) {
            move_dir += right;
        }
        if input.is_key_held(KeyCode::KeyA) {
            move_dir -= right;
        }
        if move_dir != Vec2::ZERO {
            self.target += move_dir.normalize() * self.move_speed * dt;
        }

        if input.is_key_held(KeyCode::KeyQ) {
            self.yaw += self.orbit_speed * dt;
        }
        if input.is_key_held(KeyCode::KeyE) {
            self.yaw -= self.orbit_speed * dt;
        }

        // Scroll up zooms in.
        self.distance -= input.scroll_delta * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        let bound = Vec2::splat(WORLD_HALF);
        self.target = self.target.clamp(-bound, bound);
    }

    /// World-space eye position.
    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(self.target.x, 0.0, self.target.y) + self.eye_offset()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            self.camera_position(),
            Vec3::new(self.target.x, 0.0, self.target.y),
            Vec3::Y,
        )
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Jump the view to a world point (teleport interactions).
    pub fn jump_to(&mut self, point: Vec3) {
        self.target = Vec2::new(point.x, point.z);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Unproject a cursor position to a world-space ray (origin, direction).
    pub fn screen_ray(&self, screen: (f32, f32), window: (u32, u32)) -> (Vec3, Vec3) {
        let w = window.0.max(1) as f32;
        let h = window.1.max(1) as f32;
        let ndc = Vec2::new(2.0 * screen.0 / w - 1.0, 1.0 - 2.0 * screen.1 / h);

        let inv = self.view_projection(w / h).inverse();
        let near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        (near, (far - near).normalize_or_zero())
    }

    // Offset from target to eye based on pitch, yaw, and distance.
    fn eye_offset(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos() * self.distance,
            self.pitch.sin() * self.distance,
            self.yaw.cos() * self.pitch.cos() * self.distance,
        )
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
    fn eye_sits_above_and_behind_the_target() {
        let cam = OrbitCamera::new();
        let eye = cam.camera_position();
        assert!(eye.y > 0.0);
        assert!(eye.z > 0.0, "yaw 0 looks along -Z, so the eye is at +Z");
    }

    #[test]
    fn center_screen_ray_points_at_the_target() {
        let cam = OrbitCamera::new();
        let (origin, dir) = cam.screen_ray((640.0, 360.0), (1280, 720));
        let target = Vec3::new(cam.target().x, 0.0, cam.target().y);
        let to_target = (target - origin).normalize();
        assert_relative_eq!(dir.dot(to_target), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn jump_to_moves_the_orbit_target() {
        let mut cam = OrbitCamera::new();
        cam.jump_to(Vec3::new(321.0, 50.0, -123.0));
        assert_eq!(cam.target(), Vec2::new(321.0, -123.0));
    }
}
