use bytemuck::{Pod, Zeroable};

/// Handle to a node in the scene graph. Index into the graph's node storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Event kinds written into [`OrreryEvent::kind`]. Must match the host's `protocol.ts`.
pub mod event_kind {
    /// a = body index, b/c unused.
    pub const FOCUS_STARTED: f32 = 1.0;
    /// a = body index.
    pub const FOCUS_FINISHED: f32 = 2.0;
    /// a = body index.
    pub const INFO_SHOWN: f32 = 3.0;
    pub const INFO_HIDDEN: f32 = 4.0;
    /// a = option index (0 real view, 1 show path, 2 speed), b = new value.
    pub const OPTION_CHANGED: f32 = 5.0;
}

/// An event communicated from Rust to the host UI.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrreryEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl OrreryEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}
