pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod interaction;
pub mod bodies;
pub mod options;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::config::{OrreryConfig, StartupParams};
pub use api::orrery::Orrery;
pub use api::types::{event_kind, NodeId, OrreryEvent};
pub use assets::manifest::{TextureDescriptor, TextureManifest};
pub use bodies::{BodyDescriptor, BodyId, BodyKind, BodyRegistry, RingSpec, BODY_COUNT};
pub use bridge::protocol::ProtocolLayout;
pub use components::mesh::{MeshComponent, Shading, Shape};
pub use components::node::{LocalTransform, SceneNode};
pub use core::scene::SceneGraph;
pub use core::time::{Clock, Deadline, ManualClock, Millis};
pub use error::{OrreryError, Result};
pub use input::queue::{InputEvent, InputQueue};
pub use interaction::{ClickAction, ClickRouter, ClickTarget, FocusController, FocusSession, FocusState, InfoPanel};
pub use options::{DisplayOptions, OptionChange, SpeedBounds};
pub use renderer::{OrbitControls, PerspectiveCamera, Ray, RenderBuffer, RenderInstance};
pub use systems::animation::advance_frame;
pub use systems::builder::{build_system, SystemLayout};
pub use systems::lighting::{LightState, PointLight};
pub use systems::picking::{pick, PickHit};
pub use systems::render::build_render_buffer;

// Extensions: decoupled optional helpers
pub use extensions::{Easing, lerp_vec3, ease_vec3};
