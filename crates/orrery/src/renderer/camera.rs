use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::api::config::OrreryConfig;

/// Half-line used for picking. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first surface hit on a sphere.
    /// A ray starting inside the sphere hits the far side.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let s = disc.sqrt();
        let near = -b - s;
        let far = -b + s;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// World-space eye position, w = 1.
    pub position: [f32; 4],
}

/// Perspective camera looking from `position` toward `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in screen pixels.
    pub viewport: Vec2,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, viewport: Vec2, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: fov_y_deg.to_radians(),
            aspect: 1.0,
            near,
            far,
            viewport: Vec2::ONE,
        };
        camera.resize(viewport.x, viewport.y);
        camera
    }

    pub fn from_config(config: &OrreryConfig) -> Self {
        let mut camera = Self::new(
            config.camera_fov_deg,
            Vec2::new(config.viewport_width, config.viewport_height),
            config.camera_near,
            config.camera_far,
        );
        camera.position = config.camera_position;
        camera.look_at(config.camera_target);
        camera
    }

    /// Update the viewport (e.g. on window resize). Degenerate sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        self.viewport = Vec2::new(width, height);
        self.aspect = width / height;
    }

    /// Aim the camera at a world point. Ignored if the point is the eye itself.
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() < 1e-12 {
            return;
        }
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        // Looking straight along `up` makes look_at degenerate; fall back to +Z.
        let up = if self.forward().cross(self.up).length_squared() < 1e-10 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Screen pixels (origin top-left, y down) to normalized device coordinates.
    pub fn screen_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x / self.viewport.x) * 2.0 - 1.0,
            -(y / self.viewport.y) * 2.0 + 1.0,
        )
    }

    /// Ray from the eye through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }

    pub fn screen_ray(&self, x: f32, y: f32) -> Ray {
        self.ray_from_ndc(self.screen_to_ndc(x, y))
    }

    /// Project a world point to screen pixels. `None` if behind the eye.
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_config(&OrreryConfig::default())
    }
}
