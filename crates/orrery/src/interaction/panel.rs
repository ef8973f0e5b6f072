use crate::bodies::BodyId;
use crate::core::time::{Deadline, Millis};

/// Info panel state: which body it describes, whether it is showing, and a
/// pending delayed reveal.
///
/// The reveal delay runs independently of any camera flight.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    visible: bool,
    body: Option<BodyId>,
    pending: Option<(BodyId, Deadline)>,
    reveal_delay: Millis,
}

impl InfoPanel {
    pub fn new(reveal_delay: Millis) -> Self {
        Self { visible: false, body: None, pending: None, reveal_delay }
    }

    /// Arrange for the panel to show `body` after the reveal delay.
    /// A later call replaces an earlier pending reveal.
    pub fn schedule(&mut self, body: BodyId, now: Millis) {
        self.pending = Some((body, Deadline::after(now, self.reveal_delay)));
    }

    /// Perform a due reveal. Returns the body shown.
    pub fn tick(&mut self, now: Millis) -> Option<BodyId> {
        let (body, deadline) = self.pending?;
        if !deadline.is_due(now) {
            return None;
        }
        self.pending = None;
        self.body = Some(body);
        self.visible = true;
        Some(body)
    }

    /// Hide the panel. Returns whether it was showing.
    ///
    /// A pending reveal keeps running: the reveal timer is independent of
    /// dismissal, so a body picked just before an outside click still shows.
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Body last shown, kept after hiding so the host can fade it out.
    pub fn body(&self) -> Option<BodyId> {
        self.body
    }

    pub fn pending(&self) -> Option<BodyId> {
        self.pending.map(|(body, _)| body)
    }
}

impl Default for InfoPanel {
    fn default() -> Self {
        Self::new(500.0)
    }
}
