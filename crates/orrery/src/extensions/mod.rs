// extensions/mod.rs
//
// Optional helpers decoupled from the scene graph.

pub mod easing;

pub use easing::{Easing, lerp_vec3, ease_vec3};
