use glam::Vec3;

/// How the host should light a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Unlit: the texture is shown at full brightness (star, rings, path guides).
    Basic,
    /// Lit by the sun point light and the ambient fill.
    #[default]
    Standard,
}

/// Mesh shape primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Flat annulus in the local XY plane, facing +Z before the node's tilt.
    Ring { inner_radius: f32, outer_radius: f32, segments: u32 },
    /// Closed polyline; the last point connects back to the first.
    LineLoop { points: Vec<Vec3> },
}

impl Shape {
    /// Discriminant written to the render buffer.
    pub fn kind_code(&self) -> f32 {
        match self {
            Shape::Sphere { .. } => 0.0,
            Shape::Ring { .. } => 1.0,
            Shape::LineLoop { .. } => 2.0,
        }
    }
}

/// Renderable geometry attached to a scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshComponent {
    pub shape: Shape,
    pub shading: Shading,
    /// Texture slot in the [`TextureManifest`](crate::assets::manifest::TextureManifest), if textured.
    pub texture: Option<u32>,
    pub double_sided: bool,
}

impl MeshComponent {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            shading: Shading::default(),
            texture: None,
            double_sided: false,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::new(Shape::Sphere { radius })
    }

    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Self {
        Self::new(Shape::Ring { inner_radius, outer_radius, segments })
            .with_shading(Shading::Basic)
            .double_sided()
    }

    pub fn line_loop(points: Vec<Vec3>) -> Self {
        Self::new(Shape::LineLoop { points }).with_shading(Shading::Basic)
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    pub fn with_texture(mut self, slot: u32) -> Self {
        self.texture = Some(slot);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    /// Bounding radius used for ray tests. `None` for shapes that are never hit-tested.
    pub fn sphere_radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Sphere { radius } => Some(radius),
            _ => None,
        }
    }
}
