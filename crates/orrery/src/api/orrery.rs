use glam::Vec2;

use crate::api::config::{OrreryConfig, StartupParams};
use crate::api::types::{event_kind, OrreryEvent};
use crate::assets::manifest::TextureManifest;
use crate::bodies::{BodyDescriptor, BodyId, BodyRegistry};
use crate::bridge::protocol::{self, ProtocolLayout};
use crate::core::scene::SceneGraph;
use crate::core::time::Clock;
use crate::error::Result;
use crate::input::queue::{InputEvent, InputQueue};
use crate::interaction::click::{ClickAction, ClickRouter, ClickTarget, PointerMotion};
use crate::interaction::focus::{FocusController, FocusSession, FocusStep};
use crate::interaction::panel::InfoPanel;
use crate::options::{DisplayOptions, OptionChange, SpeedBounds};
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::controls::OrbitControls;
use crate::renderer::instance::RenderBuffer;
use crate::systems::animation::advance_frame;
use crate::systems::builder::{build_system, SystemLayout};
use crate::systems::lighting::{LightState, PointLight};
use crate::systems::picking::pick;
use crate::systems::render::build_render_buffer;

/// Pixels of wheel travel per zoom notch (one mouse wheel click in most browsers).
const WHEEL_PIXELS_PER_NOTCH: f32 = 100.0;

/// The running orrery: scene, camera, interaction state and per-frame output.
///
/// The host calls [`tick`](Self::tick) once per display refresh and forwards
/// pointer, click and resize input. Everything runs on one thread.
pub struct Orrery {
    config: OrreryConfig,
    registry: BodyRegistry,
    textures: TextureManifest,
    graph: SceneGraph,
    layout: SystemLayout,
    options: DisplayOptions,
    lights: LightState,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    focus: FocusController,
    panel: InfoPanel,
    router: ClickRouter,
    input: InputQueue,
    render_buffer: RenderBuffer,
    protocol: ProtocolLayout,
    /// Events raised since the last tick.
    pending_events: Vec<OrreryEvent>,
    /// Events published by the last tick.
    events: Vec<OrreryEvent>,
    clock: Box<dyn Clock>,
    frame: u64,
}

impl Orrery {
    /// Build the scene with the default texture manifest under `./image`.
    pub fn start(config: OrreryConfig, params: &StartupParams, clock: Box<dyn Clock>) -> Result<Self> {
        let registry = BodyRegistry::solar_system();
        let textures = TextureManifest::for_registry(&registry, "./image");
        Self::start_with_textures(config, params, textures, clock)
    }

    pub fn start_with_textures(
        config: OrreryConfig,
        params: &StartupParams,
        textures: TextureManifest,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let registry = BodyRegistry::solar_system();
        if let Err(e) = textures.validate(&registry) {
            log::warn!("texture manifest: {}", e);
        }

        let bounds = SpeedBounds::resolve(params.max_speed.as_deref(), config.default_max_speed);
        let options =
            DisplayOptions::new(bounds, config.real_view, config.show_path, config.default_speed);

        let mut graph = SceneGraph::with_capacity(32);
        let layout = build_system(&mut graph, &registry, &options, &config, &textures)?;

        let mut lights = LightState::new();
        lights.add(PointLight::new(
            glam::Vec3::ZERO,
            config.sun_light_color,
            config.sun_light_intensity,
            config.sun_light_range,
        ));
        lights.set_ambient_intensity(options.ambient_intensity(config.ambient_fill_intensity));

        let mut render_buffer = RenderBuffer::new(config.max_instances, config.max_line_vertices);
        build_render_buffer(&graph, &mut render_buffer);

        Ok(Self {
            camera: PerspectiveCamera::from_config(&config),
            controls: OrbitControls::from_config(&config),
            focus: FocusController::from_config(&config),
            panel: InfoPanel::new(config.info_reveal_delay_ms),
            router: ClickRouter::new(config.drag_threshold),
            input: InputQueue::new(),
            protocol: ProtocolLayout::from_config(&config),
            pending_events: Vec::with_capacity(config.max_events),
            events: Vec::with_capacity(config.max_events),
            config,
            registry,
            textures,
            graph,
            layout,
            options,
            lights,
            render_buffer,
            clock,
            frame: 0,
        })
    }

    /// Tear down the scene and build it again from the registry.
    /// Any camera flight is dropped and the panel is hidden.
    pub fn rebuild(&mut self) -> Result<()> {
        self.focus.cancel();
        if self.panel.hide() {
            self.emit(OrreryEvent::new(event_kind::INFO_HIDDEN, 0.0));
        }
        self.graph.clear();
        self.layout =
            build_system(&mut self.graph, &self.registry, &self.options, &self.config, &self.textures)?;
        build_render_buffer(&self.graph, &mut self.render_buffer);
        Ok(())
    }

    /// Run one frame: queued input, animation, camera flight, panel reveal,
    /// render export. Never fails.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        for event in self.input.drain() {
            self.handle_input(event);
        }

        advance_frame(&mut self.graph, &self.layout, &self.registry, &self.options);

        match self.focus.tick(&mut self.camera, now) {
            FocusStep::Finished { body, target } => {
                self.controls.set_target(&mut self.camera, target);
                self.emit(OrreryEvent::new(event_kind::FOCUS_FINISHED, body.index() as f32));
            }
            FocusStep::Moving { .. } | FocusStep::Idle => {}
        }

        if let Some(body) = self.panel.tick(now) {
            self.emit(OrreryEvent::new(event_kind::INFO_SHOWN, body.index() as f32));
        }

        build_render_buffer(&self.graph, &mut self.render_buffer);

        self.events.clear();
        self.events.append(&mut self.pending_events);
        self.frame += 1;
    }

    /// Queue input for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply one input event now. Returns the flight a click started, if any.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<FocusSession> {
        match event {
            InputEvent::PointerDown { x, y } => self.router.pointer_down(Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            InputEvent::PointerUp { x, y } => self.router.pointer_up(Vec2::new(x, y)),
            InputEvent::Click { x, y, target } => return self.on_click(x, y, target),
            InputEvent::Wheel { delta_y } => self.on_wheel(delta_y),
            InputEvent::Resize { width, height } => self.on_resize(width, height),
        }
        None
    }

    fn on_pointer_move(&mut self, x: f32, y: f32) {
        match self.router.pointer_move(Vec2::new(x, y)) {
            PointerMotion::DragStarted(delta) => {
                if let Some(session) = self.focus.cancel() {
                    log::debug!("focus on {:?} cancelled by camera drag", session.body);
                }
                self.controls.orbit(&mut self.camera, delta.x, delta.y);
            }
            PointerMotion::Dragging(delta) => self.controls.orbit(&mut self.camera, delta.x, delta.y),
            PointerMotion::None => {}
        }
    }

    /// Zoom the camera. Positive `delta_y` (scrolling down) moves away.
    pub fn on_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        if let Some(session) = self.focus.cancel() {
            log::debug!("focus on {:?} cancelled by zoom", session.body);
        }
        self.controls.zoom(&mut self.camera, -delta_y / WHEEL_PIXELS_PER_NOTCH);
    }

    /// Handle a click. Surface clicks pick and may start a camera flight;
    /// clicks outside the surface and the panel hide the panel.
    pub fn on_click(&mut self, x: f32, y: f32, target: ClickTarget) -> Option<FocusSession> {
        match self.router.route(x, y, target) {
            ClickAction::Pick { x, y } => self.pick_at(x, y),
            ClickAction::DismissPanel => {
                if self.panel.hide() {
                    self.emit(OrreryEvent::new(event_kind::INFO_HIDDEN, 0.0));
                }
                None
            }
            ClickAction::Ignore | ClickAction::DragRelease => None,
        }
    }

    fn pick_at(&mut self, x: f32, y: f32) -> Option<FocusSession> {
        let ray = self.camera.screen_ray(x, y);
        let Some(hit) = pick(&self.graph, &ray) else {
            log::debug!("no body under ({}, {})", x, y);
            return None;
        };

        let now = self.clock.now();
        self.focus.begin(hit.body, hit.center, &self.camera, now);
        self.panel.schedule(hit.body, now);
        self.emit(OrreryEvent::new(event_kind::FOCUS_STARTED, hit.body.index() as f32));
        self.focus.session().copied()
    }

    /// Viewport changed size (CSS pixels).
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        log::debug!("viewport resized to {}x{}", width, height);
    }

    // -- Display options --

    /// Switch lighting mode. The ambient light changes immediately.
    pub fn set_real_view(&mut self, on: bool) {
        if let Some(change) = self.options.set_real_view(on) {
            self.lights
                .set_ambient_intensity(self.options.ambient_intensity(self.config.ambient_fill_intensity));
            self.emit_change(change);
        }
    }

    /// Show or hide every path guide.
    pub fn set_show_path(&mut self, on: bool) {
        if let Some(change) = self.options.set_show_path(on) {
            self.layout.set_paths_visible(&mut self.graph, on);
            self.emit_change(change);
        }
    }

    /// Set the speed multiplier; clamped into `[0, max_speed]`. Read by the next frame.
    pub fn set_speed(&mut self, speed: f32) {
        if let Some(change) = self.options.set_speed(speed) {
            self.emit_change(change);
        }
    }

    fn emit_change(&mut self, change: OptionChange) {
        self.emit(change.to_event());
    }

    fn emit(&mut self, event: OrreryEvent) {
        if self.pending_events.len() >= self.config.max_events {
            log::warn!("event buffer full; dropping event kind {}", event.kind);
            return;
        }
        self.pending_events.push(event);
    }

    // -- Accessors --

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn textures(&self) -> &TextureManifest {
        &self.textures
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn layout(&self) -> &SystemLayout {
        &self.layout
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn max_speed(&self) -> f32 {
        self.options.bounds().max()
    }

    pub fn lights(&self) -> &LightState {
        &self.lights
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    pub fn info_panel(&self) -> &InfoPanel {
        &self.panel
    }

    /// Body the info panel describes, if it has ever been shown.
    pub fn info_body(&self) -> Option<&BodyDescriptor> {
        self.panel.body().map(|id| self.registry.get(id))
    }

    pub fn body(&self, id: BodyId) -> &BodyDescriptor {
        self.registry.get(id)
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    /// Events published by the last tick.
    pub fn events(&self) -> &[OrreryEvent] {
        &self.events
    }

    pub fn protocol(&self) -> &ProtocolLayout {
        &self.protocol
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Serialize the last frame into `out` using [`ProtocolLayout`].
    /// Returns false if `out` is too small.
    pub fn write_frame(&self, out: &mut [f32]) -> bool {
        let layout = &self.protocol;
        if out.len() < layout.buffer_total_floats {
            return false;
        }

        let uniform = self.camera.uniform();
        let camera: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniform));
        ProtocolLayout::write_section(out, layout.camera_offset, protocol::CAMERA_FLOATS, 1, camera);

        let instances = ProtocolLayout::write_section(
            out,
            layout.instance_data_offset,
            protocol::INSTANCE_FLOATS,
            layout.max_instances,
            self.render_buffer.as_floats(),
        );
        let line_vertices = ProtocolLayout::write_section(
            out,
            layout.line_data_offset,
            protocol::LINE_VERTEX_FLOATS,
            layout.max_line_vertices,
            &self.render_buffer.line_vertices,
        );
        let lights = ProtocolLayout::write_section(
            out,
            layout.light_data_offset,
            protocol::LIGHT_FLOATS,
            layout.max_lights,
            bytemuck::cast_slice(self.lights.as_slice()),
        );
        let events = ProtocolLayout::write_section(
            out,
            layout.event_data_offset,
            protocol::EVENT_FLOATS,
            layout.max_events,
            bytemuck::cast_slice(self.events.as_slice()),
        );

        let header = &mut out[..protocol::HEADER_FLOATS];
        header[protocol::HEADER_LOCK] = 0.0;
        header[protocol::HEADER_FRAME_COUNTER] = self.frame as f32;
        header[protocol::HEADER_MAX_INSTANCES] = layout.max_instances as f32;
        header[protocol::HEADER_INSTANCE_COUNT] = instances as f32;
        header[protocol::HEADER_MAX_LINE_VERTICES] = layout.max_line_vertices as f32;
        header[protocol::HEADER_LINE_VERTEX_COUNT] = line_vertices as f32;
        header[protocol::HEADER_MAX_LIGHTS] = layout.max_lights as f32;
        header[protocol::HEADER_LIGHT_COUNT] = lights as f32;
        header[protocol::HEADER_MAX_EVENTS] = layout.max_events as f32;
        header[protocol::HEADER_EVENT_COUNT] = events as f32;
        header[protocol::HEADER_AMBIENT_INTENSITY] = self.lights.ambient_intensity();
        header[protocol::HEADER_VIEWPORT_WIDTH] = self.camera.viewport.x;
        header[protocol::HEADER_VIEWPORT_HEIGHT] = self.camera.viewport.y;
        header[protocol::HEADER_PROTOCOL_VERSION] = protocol::PROTOCOL_VERSION;
        header[protocol::HEADER_INFO_VISIBLE] = if self.panel.is_visible() { 1.0 } else { 0.0 };
        header[protocol::HEADER_INFO_BODY] = self.panel.body().map_or(-1.0, |b| b.index() as f32);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mesh::MeshComponent;
    use crate::core::time::ManualClock;
    use glam::Vec3;

    fn start(query: &str) -> (Orrery, ManualClock) {
        let clock = ManualClock::new(0.0);
        let orrery = Orrery::start(
            OrreryConfig::default(),
            &StartupParams::from_query(query),
            Box::new(clock.clone()),
        )
        .unwrap();
        (orrery, clock)
    }

    /// Orrery with the planets frozen so screen positions stay put.
    fn frozen() -> (Orrery, ManualClock) {
        let (mut orrery, clock) = start("");
        orrery.set_speed(0.0);
        (orrery, clock)
    }

    fn screen_of(orrery: &Orrery, body: BodyId) -> Vec2 {
        let node = orrery.layout().body_mesh(body).unwrap();
        let world = orrery.graph().world_position(node).unwrap();
        orrery.camera().world_to_screen(world).unwrap()
    }

    fn click_body(orrery: &mut Orrery, body: BodyId) -> Option<FocusSession> {
        let p = screen_of(orrery, body);
        orrery.on_click(p.x, p.y, ClickTarget::Surface)
    }

    #[test]
    fn starts_with_reference_options() {
        let (orrery, _) = start("");
        assert!(orrery.options().real_view());
        assert!(orrery.options().show_path());
        assert_eq!(orrery.options().speed(), 1.0);
        assert_eq!(orrery.max_speed(), 20.0);
        assert_eq!(orrery.lights().ambient_intensity(), 0.0);
        assert_eq!(orrery.lights().count(), 1);
        assert!(!orrery.info_panel().is_visible());
    }

    #[test]
    fn ms_parameter_bounds_the_speed() {
        let (mut orrery, _) = start("?ms=5");
        assert_eq!(orrery.max_speed(), 5.0);
        orrery.set_speed(12.0);
        assert_eq!(orrery.options().speed(), 5.0);

        assert_eq!(start("?ms=abc").0.max_speed(), 20.0);
    }

    #[test]
    fn picking_a_body_flies_the_camera_to_it() {
        let (mut orrery, clock) = frozen();
        let session = click_body(&mut orrery, BodyId::Earth).unwrap();
        assert_eq!(session.body, BodyId::Earth);
        assert!((session.target - Vec3::new(62.0, 0.0, 0.0)).length() < 1e-3);

        clock.advance(1000.0);
        orrery.tick();
        let expected = session.target + Vec3::new(0.0, 20.0, 50.0);
        assert!((orrery.camera().position - expected).length() < 1e-3);
        assert_eq!(orrery.controls().target, session.target);
        assert!(orrery.events().iter().any(|e| e.kind == event_kind::FOCUS_FINISHED));
    }

    #[test]
    fn second_click_supersedes_the_first_flight() {
        let (mut orrery, clock) = frozen();
        click_body(&mut orrery, BodyId::Earth).unwrap();
        clock.advance(200.0);
        orrery.tick();

        let mars = click_body(&mut orrery, BodyId::Mars).unwrap();
        assert_eq!(mars.body, BodyId::Mars);

        let mut finished = Vec::new();
        for _ in 0..20 {
            clock.advance(100.0);
            orrery.tick();
            finished.extend(
                orrery
                    .events()
                    .iter()
                    .filter(|e| e.kind == event_kind::FOCUS_FINISHED)
                    .map(|e| e.a),
            );
        }
        assert_eq!(finished, vec![BodyId::Mars.index() as f32]);
        let expected = Vec3::new(78.0, 20.0, 50.0);
        assert!((orrery.camera().position - expected).length() < 1e-3);
    }

    #[test]
    fn info_panel_appears_after_the_reveal_delay() {
        let (mut orrery, clock) = frozen();
        click_body(&mut orrery, BodyId::Saturn).unwrap();
        clock.advance(499.0);
        orrery.tick();
        assert!(!orrery.info_panel().is_visible());

        clock.advance(1.0);
        orrery.tick();
        assert!(orrery.info_panel().is_visible());
        let body = orrery.info_body().unwrap();
        assert_eq!(body.name, "Saturn");
        assert_eq!(body.description, "Famous for its stunning ring system.");
    }

    #[test]
    fn empty_click_changes_nothing() {
        let (mut orrery, clock) = frozen();
        assert!(orrery.on_click(0.0, 0.0, ClickTarget::Surface).is_none());
        assert!(!orrery.info_panel().is_visible());

        click_body(&mut orrery, BodyId::Earth).unwrap();
        clock.advance(1000.0);
        orrery.tick();
        assert!(orrery.info_panel().is_visible());

        assert!(orrery.on_click(0.0, 0.0, ClickTarget::Surface).is_none());
        assert!(orrery.info_panel().is_visible());
        assert!(!orrery.focus().is_active());
    }

    #[test]
    fn outside_click_hides_panel_and_panel_click_does_not() {
        let (mut orrery, clock) = frozen();
        click_body(&mut orrery, BodyId::Venus).unwrap();
        clock.advance(600.0);
        orrery.tick();
        assert!(orrery.info_panel().is_visible());

        orrery.on_click(5.0, 5.0, ClickTarget::InfoPanel);
        assert!(orrery.info_panel().is_visible());

        orrery.on_click(5.0, 5.0, ClickTarget::Outside);
        assert!(!orrery.info_panel().is_visible());
        orrery.tick();
        assert!(orrery.events().iter().any(|e| e.kind == event_kind::INFO_HIDDEN));
    }

    #[test]
    fn outside_click_before_reveal_does_not_stop_it() {
        let (mut orrery, clock) = frozen();
        click_body(&mut orrery, BodyId::Earth).unwrap();
        clock.advance(100.0);
        orrery.on_click(5.0, 5.0, ClickTarget::Outside);
        orrery.tick();
        assert!(!orrery.info_panel().is_visible());

        clock.advance(399.0);
        orrery.tick();
        assert!(!orrery.info_panel().is_visible());

        clock.advance(1.0);
        orrery.tick();
        assert!(orrery.info_panel().is_visible());
        assert_eq!(orrery.info_body().unwrap().name, "Earth");
    }

    #[test]
    fn drag_cancels_flight_and_does_not_pick() {
        let (mut orrery, clock) = frozen();
        click_body(&mut orrery, BodyId::Earth).unwrap();
        clock.advance(100.0);
        orrery.tick();

        orrery.push_input(InputEvent::PointerDown { x: 300.0, y: 300.0 });
        orrery.push_input(InputEvent::PointerMove { x: 360.0, y: 310.0 });
        orrery.push_input(InputEvent::PointerUp { x: 360.0, y: 310.0 });
        orrery.tick();
        assert!(!orrery.focus().is_active());

        let p = screen_of(&orrery, BodyId::Jupiter);
        assert!(orrery.on_click(p.x, p.y, ClickTarget::Surface).is_none());
        assert!(orrery.on_click(p.x, p.y, ClickTarget::Surface).is_some());
    }

    #[test]
    fn real_view_toggles_ambient_immediately() {
        let (mut orrery, _) = start("");
        orrery.set_real_view(false);
        assert_eq!(orrery.lights().ambient_intensity(), 0.5);
        orrery.set_real_view(true);
        assert_eq!(orrery.lights().ambient_intensity(), 0.0);
    }

    #[test]
    fn path_toggle_round_trips_without_touching_shapes() {
        let (mut orrery, _) = start("");
        let shapes: Vec<Option<MeshComponent>> =
            orrery.layout().paths().map(|p| orrery.graph().get(p).unwrap().mesh.clone()).collect();

        orrery.set_show_path(false);
        assert!(orrery.layout().paths().all(|p| !orrery.graph().get(p).unwrap().visible));
        orrery.set_show_path(true);
        for (path, shape) in orrery.layout().paths().zip(shapes) {
            let node = orrery.graph().get(path).unwrap();
            assert!(node.visible);
            assert_eq!(node.mesh, shape);
        }
    }

    #[test]
    fn wheel_zooms_and_resize_updates_aspect() {
        let (mut orrery, _) = start("");
        let before = orrery.controls().distance(orrery.camera());
        orrery.handle_input(InputEvent::Wheel { delta_y: -100.0 });
        assert!(orrery.controls().distance(orrery.camera()) < before);

        orrery.handle_input(InputEvent::Resize { width: 800.0, height: 400.0 });
        assert_eq!(orrery.camera().aspect, 2.0);
    }

    #[test]
    fn events_are_published_for_one_frame() {
        let (mut orrery, _) = frozen();
        orrery.tick();
        assert!(orrery.events().iter().any(|e| e.kind == event_kind::OPTION_CHANGED));
        click_body(&mut orrery, BodyId::Mars).unwrap();
        orrery.tick();
        let started: Vec<_> =
            orrery.events().iter().filter(|e| e.kind == event_kind::FOCUS_STARTED).collect();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].a, BodyId::Mars.index() as f32);
        orrery.tick();
        assert!(orrery.events().is_empty());
    }

    #[test]
    fn write_frame_fills_header_and_sections() {
        let (mut orrery, _) = start("");
        orrery.tick();
        let mut out = vec![0.0; orrery.protocol().buffer_total_floats];
        assert!(orrery.write_frame(&mut out));

        assert_eq!(out[protocol::HEADER_PROTOCOL_VERSION], protocol::PROTOCOL_VERSION);
        assert_eq!(out[protocol::HEADER_INSTANCE_COUNT], 22.0);
        assert_eq!(out[protocol::HEADER_LINE_VERTEX_COUNT], 900.0);
        assert_eq!(out[protocol::HEADER_LIGHT_COUNT], 1.0);
        assert_eq!(out[protocol::HEADER_INFO_BODY], -1.0);

        let light = orrery.protocol().light_data_offset;
        assert_eq!(out[light + 6], 4.0);
        assert_eq!(out[light + 7], 300.0);

        let mut short = vec![0.0; 8];
        assert!(!orrery.write_frame(&mut short));
    }

    #[test]
    fn exported_line_loops_only_reference_written_vertices() {
        let config = OrreryConfig { path_samples: 300, ..OrreryConfig::default() };
        let mut orrery =
            Orrery::start(config, &StartupParams::default(), Box::new(ManualClock::new(0.0))).unwrap();
        orrery.tick();
        let mut out = vec![0.0; orrery.protocol().buffer_total_floats];
        assert!(orrery.write_frame(&mut out));

        let written = out[protocol::HEADER_LINE_VERTEX_COUNT];
        assert!(written <= orrery.protocol().max_line_vertices as f32);
        let instances = out[protocol::HEADER_INSTANCE_COUNT] as usize;
        let base = orrery.protocol().instance_data_offset;
        let mut loops = 0;
        for i in 0..instances {
            let record = &out[base + i * protocol::INSTANCE_FLOATS..][..protocol::INSTANCE_FLOATS];
            // After the 16-float matrix: kind, texture, first vertex, vertex count.
            if record[16] == 2.0 {
                loops += 1;
                assert!(record[18] + record[19] <= written);
            }
        }
        assert!(loops > 0);
    }

    #[test]
    fn rebuild_replaces_the_scene() {
        let (mut orrery, _) = start("");
        let nodes = orrery.graph().len();
        for _ in 0..10 {
            orrery.tick();
        }
        orrery.rebuild().unwrap();
        assert_eq!(orrery.graph().len(), nodes);
        let earth = orrery.layout().planet(BodyId::Earth).unwrap();
        assert_eq!(orrery.graph().get(earth.orbit).unwrap().local.angle, 0.0);
    }
}
