use glam::Vec3;

use crate::camera::Camera;
use crate::input::Input;

/// Minimum elapsed time used when deriving the damping factor. Very small or
/// zero frame deltas would otherwise collapse the smoothing entirely.
const MIN_DAMPING_DT: f32 = 1.0 / 1000.0;

/// Derive the per-tick damping factor from elapsed time.
///
/// Matches the reference viewer: 0.075 at a 120 Hz baseline, scaled linearly
/// with the actual frame delta and clamped so it stays a valid lerp weight.
pub fn damping_factor(dt: f32) -> f32 {
    (0.075 * 120.0 * dt.max(MIN_DAMPING_DT)).min(1.0)
}

/// A damped orbit-camera controller.
///
/// Mouse drag feeds angular velocity, the scroll wheel feeds zoom velocity,
/// and each tick a time-derived damping factor moves the camera toward those
/// goals while decaying them, giving the characteristic eased glide.
///
/// # Example
/// ```ignore
/// let mut orbit = OrbitControls::new()
///     .target(Vec3::new(0.0, 8.75, 0.0))
///     .distance(25.0)
///     .min_distance(5.0);
///
/// // Per tick:
/// orbit.update(&input, dt);
/// orbit.apply_to(&mut camera);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitControls {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Current distance from the target.
    pub distance: f32,
    /// Horizontal angle in radians.
    pub azimuth: f32,
    /// Vertical angle in radians, non-negative: the camera never drops below
    /// the target's horizontal plane (max polar angle of half pi).
    pub elevation: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Drag sensitivity in radians per pixel.
    pub sensitivity: f32,
    /// Scroll zoom sensitivity in world units per line.
    pub zoom_sensitivity: f32,
    // Pending velocities consumed by damping.
    azimuth_velocity: f32,
    elevation_velocity: f32,
    zoom_velocity: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 25.0,
            azimuth: 0.0,
            elevation: 0.0,
            min_distance: 5.0,
            max_distance: 200.0,
            sensitivity: 0.005,
            zoom_sensitivity: 1.0,
            azimuth_velocity: 0.0,
            elevation_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self
    }

    pub fn min_distance(mut self, min: f32) -> Self {
        self.min_distance = min;
        self.distance = self.distance.max(min);
        self
    }

    /// Feed input and advance the damped state by `dt` seconds.
    pub fn update(&mut self, input: &Input, dt: f32) {
        if input.dragging() {
            let delta = input.mouse_delta();
            self.azimuth_velocity -= delta.x * self.sensitivity;
            self.elevation_velocity += delta.y * self.sensitivity;
        }
        self.zoom_velocity -= input.scroll_delta() * self.zoom_sensitivity;

        self.advance(dt);
    }

    /// Advance the damped state without sampling input. Exposed separately so
    /// tests can drive deterministic ticks.
    pub fn advance(&mut self, dt: f32) {
        let damping = damping_factor(dt);

        self.azimuth += self.azimuth_velocity * damping;
        self.elevation += self.elevation_velocity * damping;
        self.distance += self.zoom_velocity * damping;

        let retain = 1.0 - damping;
        self.azimuth_velocity *= retain;
        self.elevation_velocity *= retain;
        self.zoom_velocity *= retain;

        // Keep the camera above the horizon and inside the zoom limits.
        self.elevation = self
            .elevation
            .clamp(0.0, std::f32::consts::FRAC_PI_2 - 0.01);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// World-space camera position for the current orbit state.
    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );
        self.target + offset
    }

    /// Write the current pose into the camera.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.look_at(self.position(), self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn damping_floor_at_zero_dt() {
        assert_relative_eq!(damping_factor(0.0), 0.075 * 120.0 * MIN_DAMPING_DT);
        assert_relative_eq!(damping_factor(0.0), damping_factor(0.0005));
    }

    #[test]
    fn damping_grows_with_dt_and_saturates() {
        assert!(damping_factor(1.0 / 60.0) > damping_factor(1.0 / 120.0));
        assert_relative_eq!(damping_factor(10.0), 1.0);
    }

    #[test]
    fn elevation_never_drops_below_horizon() {
        let mut orbit = OrbitControls::new().target(Vec3::new(0.0, 8.75, 0.0));
        orbit.elevation_velocity = -10.0;
        for _ in 0..100 {
            orbit.advance(1.0 / 60.0);
        }
        assert!(orbit.elevation >= 0.0);
        assert!(orbit.position().y >= orbit.target.y - 1e-4);
    }

    #[test]
    fn zoom_respects_min_distance() {
        let mut orbit = OrbitControls::new().distance(25.0).min_distance(5.0);
        orbit.zoom_velocity = -500.0;
        for _ in 0..100 {
            orbit.advance(1.0 / 60.0);
        }
        assert_relative_eq!(orbit.distance, 5.0);
    }

    #[test]
    fn velocity_decays_toward_rest() {
        let mut orbit = OrbitControls::new();
        orbit.azimuth_velocity = 1.0;
        let before = orbit.azimuth;
        for _ in 0..600 {
            orbit.advance(1.0 / 60.0);
        }
        assert!(orbit.azimuth > before);
        assert!(orbit.azimuth_velocity.abs() < 1e-3);
    }
}
