pub mod camera;
pub mod controls;
pub mod instance;

// Re-export key types for convenient access
pub use camera::{CameraUniform, PerspectiveCamera, Ray};
pub use controls::OrbitControls;
pub use instance::{RenderBuffer, RenderInstance};
