//! Camera controls for the renderer

use glam::{Mat4, Vec3};
use zarya_core::config::CameraConfig;

/// Closest the camera may orbit to its target
const MIN_DISTANCE: f32 = 1.0;

/// Look-at camera that can orbit and zoom around its target
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    home: CameraConfig,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

impl Camera {
    /// Camera placed as described by the scene configuration
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            target: config.target,
            up: config.up,
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            home: *config,
        }
    }

    /// Get the view matrix (world to camera transform)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Perspective projection with depth in [0, 1]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Orbit around the target point
    ///
    /// - `delta_x`: Horizontal rotation (positive = rotate right)
    /// - `delta_y`: Vertical rotation (positive = rotate up)
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let radius = self.distance();
        let offset = self.position - self.target;
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-0.999, 0.999).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Move towards (positive) or away from the target, keeping the far
    /// plane in front of it.
    pub fn zoom(&mut self, delta: f32) {
        let dir = (self.position - self.target).normalize();
        let max_distance = (self.far * 0.5).max(MIN_DISTANCE);
        let distance = (self.distance() - delta).clamp(MIN_DISTANCE, max_distance);
        self.position = self.target + dir * distance;
    }

    /// Return to the configured placement, keeping the current aspect ratio
    pub fn reset(&mut self) {
        *self = Self::from_config(&self.home, self.aspect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_matches_scene() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::splat(150.0));
        assert_relative_eq!(camera.fov, 60.0_f32.to_radians());
        assert_eq!(camera.view_matrix(), CameraConfig::default().view_matrix());
    }

    #[test]
    fn test_camera_orbit() {
        let mut camera = Camera::default();
        let initial_distance = camera.distance();

        camera.orbit(0.1, 0.0);

        assert_relative_eq!(camera.distance(), initial_distance, epsilon = 0.01);
        assert_ne!(camera.position, Vec3::splat(150.0));
    }

    #[test]
    fn test_camera_zoom() {
        let mut camera = Camera::default();
        let initial_distance = camera.distance();

        camera.zoom(50.0);
        assert!(camera.distance() < initial_distance);

        camera.zoom(1.0e6);
        assert_relative_eq!(camera.distance(), MIN_DISTANCE, epsilon = 1e-3);
    }

    #[test]
    fn test_reset_keeps_aspect() {
        let mut camera = Camera::from_config(&CameraConfig::default(), 2.0);
        camera.orbit(1.0, 0.5);
        camera.zoom(20.0);
        camera.reset();
        assert_eq!(camera.position, Vec3::splat(150.0));
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::default();
        let clip = camera.view_projection_matrix() * camera.target.extend(1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }
}
