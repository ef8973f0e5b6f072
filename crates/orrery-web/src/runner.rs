use orrery::{
    ClickTarget, Clock, InputEvent, Millis, Orrery, OrreryConfig, ProtocolLayout, StartupParams,
};

/// Wall clock backed by `performance.now()`, falling back to `Date.now()`
/// where no `Performance` object is available (e.g. some workers).
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

impl PerformanceClock {
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|w| w.performance());
        if performance.is_none() {
            log::warn!("performance.now() unavailable; using Date.now()");
        }
        Self { performance }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> Millis {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

/// Owns the orrery and the flat frame buffer the host reads each tick.
///
/// wasm-bindgen cannot export this directly with all its accessors, so the
/// crate root keeps one in a `thread_local!` and exports free functions.
pub struct OrreryRunner {
    orrery: Orrery,
    /// Serialized frame, laid out by [`ProtocolLayout`].
    frame: Vec<f32>,
}

impl OrreryRunner {
    pub fn new(config: OrreryConfig, params: &StartupParams) -> orrery::Result<Self> {
        let orrery = Orrery::start(config, params, Box::new(PerformanceClock::new()))?;
        let frame = vec![0.0; orrery.protocol().buffer_total_floats];
        Ok(Self { orrery, frame })
    }

    /// Run one frame and serialize it.
    pub fn tick(&mut self) {
        self.orrery.tick();
        if !self.orrery.write_frame(&mut self.frame) {
            log::warn!("frame buffer smaller than protocol layout; frame not written");
        }
    }

    /// Apply input immediately so a click in the same frame sees the drag.
    pub fn apply_input(&mut self, event: InputEvent) {
        self.orrery.handle_input(event);
    }

    /// Route a click immediately. Returns the picked body index, or -1.
    pub fn click(&mut self, x: f32, y: f32, target: ClickTarget) -> i32 {
        self.orrery
            .on_click(x, y, target)
            .map_or(-1, |session| session.body.index() as i32)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.orrery.on_resize(width, height);
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn orrery_mut(&mut self) -> &mut Orrery {
        &mut self.orrery
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.orrery.render_buffer().instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.orrery.render_buffer().instance_count()
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.orrery.render_buffer().line_vertices_ptr()
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.orrery.render_buffer().line_vertex_count()
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.orrery.lights().buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.orrery.lights().count() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.orrery.events().as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.orrery.events().len() as u32
    }

    // ---- Capacity accessors ----

    fn layout(&self) -> &ProtocolLayout {
        self.orrery.protocol()
    }

    pub fn max_instances(&self) -> u32 {
        self.layout().max_instances as u32
    }

    pub fn max_line_vertices(&self) -> u32 {
        self.layout().max_line_vertices as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout().max_lights as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout().max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout().buffer_total_floats as u32
    }
}
