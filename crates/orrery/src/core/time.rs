use std::cell::Cell;
use std::rc::Rc;

/// Milliseconds on the host's monotonic clock (e.g. `performance.now()`).
pub type Millis = f64;

/// Source of "now" for timed interactions.
/// The browser bridge reads `performance.now()`; tests drive a [`ManualClock`].
pub trait Clock {
    fn now(&self) -> Millis;
}

/// A deadline on a [`Clock`], used for one-shot delays such as the info panel reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    due: Millis,
}

impl Deadline {
    pub fn after(now: Millis, delay: Millis) -> Self {
        Self { due: now + delay.max(0.0) }
    }

    /// Whether the deadline has passed at `now` (inclusive).
    pub fn is_due(&self, now: Millis) -> bool {
        now >= self.due
    }
}

/// Clock whose time only moves when told to.
///
/// Cloning shares the underlying time, so a test can keep one handle
/// while the orrery owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}
