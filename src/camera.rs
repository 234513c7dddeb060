use glam::{Mat4, Vec3};

/// A perspective camera for the viewer.
///
/// Holds position and orientation plus the projection parameters, and caches
/// the previous frame's view-projection matrix so the geometry pass can write
/// per-pixel velocity.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    prev_view_proj: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: 40f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 250.0,
            prev_view_proj: Mat4::IDENTITY,
        }
    }
}

impl Camera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            ..Default::default()
        }
    }

    /// Point the camera at a world-space target.
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.forward = (target - position).normalize_or(Vec3::NEG_Z);
    }

    /// Update the aspect ratio. Setting the same value is a no-op.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// The view-projection matrix captured by the last [`commit`](Self::commit).
    pub fn prev_view_proj(&self) -> Mat4 {
        self.prev_view_proj
    }

    /// Latch the current view-projection as "previous" for the next frame's
    /// velocity reprojection. Called once per tick after controls update.
    pub fn commit(&mut self) {
        self.prev_view_proj = self.view_proj();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn set_aspect_is_idempotent() {
        let mut camera = Camera::default();
        camera.set_aspect(2.0);
        let first = camera.view_proj();
        camera.set_aspect(2.0);
        let second = camera.view_proj();
        assert_eq!(first, second);
    }

    #[test]
    fn set_aspect_ignores_degenerate_values() {
        let mut camera = Camera::default();
        camera.set_aspect(1.5);
        camera.set_aspect(0.0);
        assert_relative_eq!(camera.aspect, 1.5);
    }

    #[test]
    fn commit_latches_previous_view_proj() {
        let mut camera = Camera::default();
        camera.commit();
        let latched = camera.prev_view_proj();
        assert_eq!(latched, camera.view_proj());

        camera.look_at(Vec3::new(0.0, 1.0, 10.0), Vec3::ZERO);
        assert_eq!(camera.prev_view_proj(), latched);
        assert_ne!(camera.view_proj(), latched);
    }
}
