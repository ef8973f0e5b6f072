//! Pointer routing: one place decides what a press, drag or click means.

use glam::Vec2;

/// Where a click landed, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The 3D render surface.
    Surface,
    /// The info panel itself.
    InfoPanel,
    /// Anywhere else on the page (option widgets, margins, ...).
    Outside,
}

impl ClickTarget {
    /// Decode the host's numeric code: 0 surface, 1 panel, anything else outside.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => ClickTarget::Surface,
            1 => ClickTarget::InfoPanel,
            _ => ClickTarget::Outside,
        }
    }
}

/// What the owner should do with a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAction {
    /// Cast a picking ray through this screen point. Never hides the panel.
    Pick { x: f32, y: f32 },
    /// Click on the panel: nothing happens.
    Ignore,
    /// Click outside both surface and panel: hide the panel.
    DismissPanel,
    /// Surface click ending a camera drag; not a pick.
    DragRelease,
}

/// Result of a pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMotion {
    /// Not pressed, or still within the drag threshold.
    None,
    /// The press just became a drag. Carries the delta since the last move.
    DragStarted(Vec2),
    Dragging(Vec2),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickRouter {
    drag_threshold: f32,
    /// Where the current press began.
    press_start: Option<Vec2>,
    last_pointer: Vec2,
    dragging: bool,
    /// The last press turned into a drag and its click has not arrived yet.
    suppress_click: bool,
}

impl ClickRouter {
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            drag_threshold: drag_threshold.max(0.0),
            press_start: None,
            last_pointer: Vec2::ZERO,
            dragging: false,
            suppress_click: false,
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.press_start = Some(pos);
        self.last_pointer = pos;
        self.dragging = false;
        self.suppress_click = false;
    }

    pub fn pointer_move(&mut self, pos: Vec2) -> PointerMotion {
        let delta = pos - self.last_pointer;
        self.last_pointer = pos;

        let Some(start) = self.press_start else {
            return PointerMotion::None;
        };

        if self.dragging {
            PointerMotion::Dragging(delta)
        } else if (pos - start).length() > self.drag_threshold {
            self.dragging = true;
            self.suppress_click = true;
            PointerMotion::DragStarted(delta)
        } else {
            PointerMotion::None
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2) {
        if let Some(start) = self.press_start {
            if (pos - start).length() > self.drag_threshold {
                self.suppress_click = true;
            }
        }
        self.press_start = None;
        self.dragging = false;
        self.last_pointer = pos;
    }

    /// Decide what a click means. Precedence: surface, then panel, then outside.
    pub fn route(&mut self, x: f32, y: f32, target: ClickTarget) -> ClickAction {
        match target {
            ClickTarget::Surface => {
                if std::mem::take(&mut self.suppress_click) {
                    ClickAction::DragRelease
                } else {
                    ClickAction::Pick { x, y }
                }
            }
            ClickTarget::InfoPanel => ClickAction::Ignore,
            ClickTarget::Outside => ClickAction::DismissPanel,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl Default for ClickRouter {
    fn default() -> Self {
        Self::new(5.0)
    }
}
