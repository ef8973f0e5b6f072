use glam::Vec3;

use crate::api::config::OrreryConfig;
use crate::renderer::camera::PerspectiveCamera;

/// Orbit-style camera controls: drag rotates the camera around a target,
/// the wheel moves it closer or farther.
///
/// Azimuth, elevation and distance are derived from the camera each call,
/// so the controls stay correct after something else moves the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Point the camera orbits around and looks at.
    pub target: Vec3,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Distance multiplier per wheel notch toward the target (< 1 zooms in).
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    /// ~89 degrees; keeps the view direction off the up axis.
    const MAX_ELEVATION: f32 = 1.55;

    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            sensitivity: 0.008,
            zoom_step: 0.95,
            min_distance: 10.0,
            max_distance: 900.0,
        }
    }

    pub fn from_config(config: &OrreryConfig) -> Self {
        Self {
            target: config.camera_target,
            sensitivity: config.orbit_sensitivity,
            zoom_step: config.zoom_step,
            min_distance: config.min_camera_distance,
            max_distance: config.max_camera_distance.max(config.min_camera_distance),
        }
    }

    /// Rotate the camera around the target by a pointer delta in pixels.
    pub fn orbit(&self, camera: &mut PerspectiveCamera, dx: f32, dy: f32) {
        let (azimuth, elevation, distance) = self.spherical(camera);
        let azimuth = azimuth - dx * self.sensitivity;
        let elevation =
            (elevation + dy * self.sensitivity).clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
        self.place(camera, azimuth, elevation, distance);
    }

    /// Move the camera along its line to the target. Positive notches zoom in.
    pub fn zoom(&self, camera: &mut PerspectiveCamera, notches: f32) {
        let (azimuth, elevation, distance) = self.spherical(camera);
        let distance =
            (distance * self.zoom_step.powf(notches)).clamp(self.min_distance, self.max_distance);
        self.place(camera, azimuth, elevation, distance);
    }

    /// Change the orbit target and aim the camera at it without moving the eye.
    pub fn set_target(&mut self, camera: &mut PerspectiveCamera, target: Vec3) {
        self.target = target;
        camera.look_at(target);
    }

    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        camera.position.distance(self.target)
    }

    fn spherical(&self, camera: &PerspectiveCamera) -> (f32, f32, f32) {
        let offset = camera.position - self.target;
        let distance = offset.length();
        if distance < 1e-6 {
            return (0.0, 0.0, self.min_distance);
        }
        let azimuth = offset.x.atan2(offset.z);
        let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
        (azimuth, elevation, distance)
    }

    fn place(&self, camera: &mut PerspectiveCamera, azimuth: f32, elevation: f32, distance: f32) {
        let offset = Vec3::new(
            elevation.cos() * azimuth.sin(),
            elevation.sin(),
            elevation.cos() * azimuth.cos(),
        ) * distance;
        camera.position = self.target + offset;
        camera.look_at(self.target);
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
