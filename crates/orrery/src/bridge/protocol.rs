//! SharedArrayBuffer layout.
//! Must stay in sync with the host's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Camera: 20 floats]
//! [Instances: max_instances × 24 floats]
//! [Line vertices: max_line_vertices × 3 floats]
//! [Lights: max_lights × 8 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame.
//! The host reads them from the header to compute offsets dynamically.

use crate::api::config::OrreryConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_LINE_VERTICES: usize = 4;
pub const HEADER_LINE_VERTEX_COUNT: usize = 5;
pub const HEADER_MAX_LIGHTS: usize = 6;
pub const HEADER_LIGHT_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
pub const HEADER_AMBIENT_INTENSITY: usize = 10;
pub const HEADER_VIEWPORT_WIDTH: usize = 11;
pub const HEADER_VIEWPORT_HEIGHT: usize = 12;
pub const HEADER_PROTOCOL_VERSION: usize = 13;
/// 1 when the info panel is showing.
pub const HEADER_INFO_VISIBLE: usize = 14;
/// Body index shown in the info panel, or -1.
pub const HEADER_INFO_BODY: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats for the camera block: view-projection matrix + eye position.
pub const CAMERA_FLOATS: usize = 20;

/// Floats per render instance (fixed by the wire format).
pub const INSTANCE_FLOATS: usize = 24;

/// Floats per line vertex: x, y, z.
pub const LINE_VERTEX_FLOATS: usize = 3;

/// Floats per point light: x, y, z, r, g, b, intensity, range.
pub const LIGHT_FLOATS: usize = 8;

/// Floats per event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_line_vertices: usize,
    pub max_lights: usize,
    pub max_events: usize,

    /// Offset (in floats) where the camera block begins.
    pub camera_offset: usize,
    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where line vertex data begins.
    pub line_data_offset: usize,
    /// Offset (in floats) where light data begins.
    pub light_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_instances: usize,
        max_line_vertices: usize,
        max_lights: usize,
        max_events: usize,
    ) -> Self {
        let camera_offset = HEADER_FLOATS;
        let instance_data_offset = camera_offset + CAMERA_FLOATS;
        let line_data_offset = instance_data_offset + max_instances * INSTANCE_FLOATS;
        let light_data_offset = line_data_offset + max_line_vertices * LINE_VERTEX_FLOATS;
        let event_data_offset = light_data_offset + max_lights * LIGHT_FLOATS;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;

        Self {
            max_instances,
            max_line_vertices,
            max_lights,
            max_events,
            camera_offset,
            instance_data_offset,
            line_data_offset,
            light_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from an OrreryConfig.
    pub fn from_config(config: &OrreryConfig) -> Self {
        Self::new(
            config.max_instances,
            config.max_line_vertices,
            config.max_lights,
            config.max_events,
        )
    }

    /// Copy up to `capacity` records of `stride` floats from `src` into the
    /// section at `offset`. Returns the number of records written.
    pub fn write_section(out: &mut [f32], offset: usize, stride: usize, capacity: usize, src: &[f32]) -> usize {
        let count = (src.len() / stride.max(1)).min(capacity);
        let len = count * stride;
        match out.get_mut(offset..offset + len) {
            Some(dst) => {
                dst.copy_from_slice(&src[..len]);
                count
            }
            None => 0,
        }
    }
}
