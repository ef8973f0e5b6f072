pub mod click;
pub mod focus;
pub mod panel;

pub use click::{ClickAction, ClickRouter, ClickTarget, PointerMotion};
pub use focus::{FocusController, FocusSession, FocusState, FocusStep};
pub use panel::InfoPanel;
