use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extensions::easing::Easing;

/// Configuration for the orrery, provided by the host.
///
/// Every field has a default; JSON overrides may name any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Vertical field of view in degrees.
    pub camera_fov_deg: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    /// Camera position at startup.
    pub camera_position: Vec3,
    /// Point the camera looks at, and orbits around, at startup.
    pub camera_target: Vec3,
    /// Initial viewport size in CSS pixels (replaced by the first resize).
    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Wall-clock length of a click-to-focus camera flight.
    pub focus_duration_ms: f64,
    /// Where the camera ends up relative to the focused body.
    pub focus_offset: Vec3,
    /// Progress curve for the camera flight.
    pub focus_easing: Easing,
    /// Delay between a successful pick and the info panel appearing.
    pub info_reveal_delay_ms: f64,

    /// Samples per path guide loop (at least 3).
    pub path_samples: u32,
    /// Angular segments per ring mesh.
    pub ring_segments: u32,

    /// Upper speed bound when the `ms` startup parameter is absent or unusable.
    pub default_max_speed: f32,
    /// Speed multiplier at startup.
    pub default_speed: f32,
    /// Initial lighting mode. `true` means no ambient fill.
    pub real_view: bool,
    /// Initial path guide visibility.
    pub show_path: bool,

    /// Ambient fill intensity when real view is off.
    pub ambient_fill_intensity: f32,
    pub sun_light_color: [f32; 3],
    pub sun_light_intensity: f32,
    /// Distance at which the sun light falls off to zero.
    pub sun_light_range: f32,

    /// Pointer travel in pixels before a press becomes a camera drag.
    pub drag_threshold: f32,
    /// Radians of orbit per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Multiplicative camera distance change per wheel notch.
    pub zoom_step: f32,
    pub min_camera_distance: f32,
    pub max_camera_distance: f32,

    /// Maximum render instances per frame.
    pub max_instances: usize,
    /// Maximum path guide vertices per frame.
    pub max_line_vertices: usize,
    pub max_lights: usize,
    /// Maximum outgoing events per frame.
    pub max_events: usize,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            camera_fov_deg: 75.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            camera_position: Vec3::new(-50.0, 90.0, 150.0),
            camera_target: Vec3::ZERO,
            viewport_width: 1280.0,
            viewport_height: 720.0,

            focus_duration_ms: 1000.0,
            focus_offset: Vec3::new(0.0, 20.0, 50.0),
            focus_easing: Easing::Linear,
            info_reveal_delay_ms: 500.0,

            path_samples: 100,
            ring_segments: 32,

            default_max_speed: 20.0,
            default_speed: 1.0,
            real_view: true,
            show_path: true,

            ambient_fill_intensity: 0.5,
            sun_light_color: [1.0, 1.0, 1.0],
            sun_light_intensity: 4.0,
            sun_light_range: 300.0,

            drag_threshold: 5.0,
            orbit_sensitivity: 0.008,
            zoom_step: 0.95,
            min_camera_distance: 10.0,
            max_camera_distance: 900.0,

            max_instances: 64,
            max_line_vertices: 2048,
            max_lights: 4,
            max_events: 32,
        }
    }
}

impl OrreryConfig {
    /// Parse a configuration from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parameters read once from the page URL at launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupParams {
    /// Raw `ms` (max speed) value, if present.
    pub max_speed: Option<String>,
}

impl StartupParams {
    /// Parse a query string such as `?ms=5&debug=1`. A leading `?` is optional.
    /// The first occurrence of a key wins.
    ///
    /// Values are taken verbatim: `%XX` escapes and `+` are not decoded, so
    /// `?ms=%35` yields `"%35"`, which the speed bound rejects. The browser
    /// bridge decodes through `URLSearchParams` and builds [`StartupParams`]
    /// directly; use this for already-plain query strings.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let max_speed = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(key, _)| *key == "ms")
            .map(|(_, value)| value.to_string());
        Self { max_speed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SpeedBounds;

    #[test]
    fn defaults_match_the_reference_scene() {
        let config = OrreryConfig::default();
        assert_eq!(config.camera_position, Vec3::new(-50.0, 90.0, 150.0));
        assert_eq!(config.focus_offset, Vec3::new(0.0, 20.0, 50.0));
        assert_eq!(config.focus_duration_ms, 1000.0);
        assert_eq!(config.info_reveal_delay_ms, 500.0);
        assert_eq!(config.path_samples, 100);
        assert_eq!(config.default_max_speed, 20.0);
        assert!(config.real_view);
        assert!(config.show_path);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = OrreryConfig::from_json(r#"{ "focus_duration_ms": 250, "camera_target": [1, 2, 3] }"#)
            .unwrap();
        assert_eq!(config.focus_duration_ms, 250.0);
        assert_eq!(config.camera_target, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.path_samples, 100);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(OrreryConfig::from_json("{ nope").is_err());
    }

    #[test]
    fn query_params() {
        assert_eq!(StartupParams::from_query("?ms=5").max_speed.as_deref(), Some("5"));
        assert_eq!(StartupParams::from_query("a=1&ms=abc&ms=9").max_speed.as_deref(), Some("abc"));
        assert_eq!(StartupParams::from_query("?ms").max_speed.as_deref(), Some(""));
        assert_eq!(StartupParams::from_query("").max_speed, None);
        assert_eq!(StartupParams::from_query("?msx=3").max_speed, None);
    }

    #[test]
    fn query_values_are_not_percent_decoded() {
        let raw = StartupParams::from_query("?ms=%35");
        assert_eq!(raw.max_speed.as_deref(), Some("%35"));
        assert_eq!(SpeedBounds::resolve(raw.max_speed.as_deref(), 20.0).max(), 20.0);

        // A host that decodes first passes the plain value through.
        let decoded = StartupParams { max_speed: Some("5".to_string()) };
        assert_eq!(SpeedBounds::resolve(decoded.max_speed.as_deref(), 20.0).max(), 5.0);
    }
}
