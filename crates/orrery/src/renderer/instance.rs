use bytemuck::{Pod, Zeroable};

/// Per-mesh render data written to SharedArrayBuffer for the host renderer.
/// Must match the host protocol: 24 floats = 96 bytes stride.
///
/// Parameter meaning depends on `kind`:
///
/// | kind | shape     | param_a      | param_b      | param_c  |
/// |------|-----------|--------------|--------------|----------|
/// | 0    | sphere    | radius       | -            | -        |
/// | 1    | ring      | inner radius | outer radius | segments |
/// | 2    | line loop | first vertex | vertex count | -        |
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Column-major world matrix.
    pub model: [[f32; 4]; 4],
    pub kind: f32,
    /// Texture slot, or -1 for untextured.
    pub texture: f32,
    pub param_a: f32,
    pub param_b: f32,
    pub param_c: f32,
    /// 0 = unlit, 1 = lit by scene lights.
    pub shading: f32,
    /// 1 = render both faces.
    pub double_sided: f32,
    /// Body index for hover/highlight effects, or -1.
    pub body: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 24;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

impl Default for RenderInstance {
    fn default() -> Self {
        Self {
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            kind: 0.0,
            texture: -1.0,
            param_a: 0.0,
            param_b: 0.0,
            param_c: 0.0,
            shading: 0.0,
            double_sided: 0.0,
            body: -1.0,
        }
    }
}

/// Render buffer holding this frame's mesh instances and line loop vertices.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    /// Flat `[x, y, z, x, y, z, ...]` vertices for line loops, in node-local space.
    pub line_vertices: Vec<f32>,
    /// Instances beyond this are dropped.
    max_instances: usize,
    /// Line loops that would push the vertex count past this are dropped.
    max_line_vertices: usize,
}

impl RenderBuffer {
    pub fn new(max_instances: usize, max_line_vertices: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            line_vertices: Vec::with_capacity(max_line_vertices * 3),
            max_instances,
            max_line_vertices,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.line_vertices.clear();
    }

    /// Append an instance. Returns false when the buffer is full.
    pub fn push(&mut self, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.max_instances {
            return false;
        }
        self.instances.push(instance);
        true
    }

    /// Append line loop vertices. Returns `(first_vertex, vertex_count)`, or
    /// `None` without appending anything if the loop does not fit.
    pub fn push_line(&mut self, points: &[glam::Vec3]) -> Option<(u32, u32)> {
        let first = self.line_vertex_count();
        if first as usize + points.len() > self.max_line_vertices {
            return None;
        }
        for p in points {
            self.line_vertices.extend_from_slice(&[p.x, p.y, p.z]);
        }
        Some((first, points.len() as u32))
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        (self.line_vertices.len() / 3) as u32
    }

    pub fn capacity(&self) -> usize {
        self.max_instances
    }

    pub fn line_vertex_capacity(&self) -> usize {
        self.max_line_vertices
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(self.instances.as_slice())
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.line_vertices.as_ptr()
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new(64, 2048)
    }
}
