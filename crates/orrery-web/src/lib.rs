//! Browser bridge for the orrery.
//!
//! The host page calls [`start`] once, then [`tick`] from its
//! `requestAnimationFrame` loop. After each tick it reads the frame buffer
//! (see `orrery::bridge::protocol`) straight out of wasm memory and renders it.
//! DOM events are forwarded through the `on_*` and `pointer_*` exports.

use std::cell::RefCell;

use orrery::{ClickTarget, InputEvent, OrreryConfig, StartupParams};
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::{OrreryRunner, PerformanceClock};

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = RefCell::new(None);
}

/// Run `f` against the live runner. `None` until [`start`] has succeeded.
fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("orrery not started; call start() first");
                None
            }
        }
    })
}

/// Startup parameters from the page URL, percent-decoded by the browser's
/// `URLSearchParams`. Empty outside a browser window.
fn startup_params() -> StartupParams {
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    match web_sys::UrlSearchParams::new_with_str(&search) {
        Ok(params) => StartupParams { max_speed: params.get("ms") },
        Err(_) => {
            log::warn!("could not parse page query {:?}; reading it undecoded", search);
            StartupParams::from_query(&search)
        }
    }
}

/// Build the scene. `config_json` overrides the default configuration.
/// Returns false if the scene could not be built.
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json.as_deref().map(OrreryConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            log::warn!("invalid orrery config, using defaults: {}", e);
            OrreryConfig::default()
        }
        None => OrreryConfig::default(),
    };
    let params = startup_params();

    match OrreryRunner::new(config, &params) {
        Ok(runner) => {
            let max_speed = runner.orrery().max_speed();
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("orrery: initialized (max speed {})", max_speed);
            true
        }
        Err(e) => {
            log::error!("orrery: failed to start: {}", e);
            false
        }
    }
}

#[wasm_bindgen]
pub fn tick() {
    with_runner(|r| r.tick());
}

#[wasm_bindgen]
pub fn on_resize(width: f32, height: f32) {
    with_runner(|r| r.resize(width, height));
}

// -- Input --

#[wasm_bindgen]
pub fn pointer_down(x: f32, y: f32) {
    with_runner(|r| r.apply_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn pointer_up(x: f32, y: f32) {
    with_runner(|r| r.apply_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn pointer_move(x: f32, y: f32) {
    with_runner(|r| r.apply_input(InputEvent::PointerMove { x, y }));
}

/// `target`: 0 = render surface, 1 = info panel, anything else = elsewhere.
/// Returns the index of the body the camera is now flying to, or -1.
#[wasm_bindgen]
pub fn on_click(x: f32, y: f32, target: u32) -> i32 {
    with_runner(|r| r.click(x, y, ClickTarget::from_code(target))).unwrap_or(-1)
}

#[wasm_bindgen]
pub fn on_wheel(delta_y: f32) {
    with_runner(|r| r.apply_input(InputEvent::Wheel { delta_y }));
}

// -- Display options --

#[wasm_bindgen]
pub fn set_real_view(on: bool) {
    with_runner(|r| r.orrery_mut().set_real_view(on));
}

#[wasm_bindgen]
pub fn set_show_path(on: bool) {
    with_runner(|r| r.orrery_mut().set_show_path(on));
}

#[wasm_bindgen]
pub fn set_speed(speed: f32) {
    with_runner(|r| r.orrery_mut().set_speed(speed));
}

#[wasm_bindgen]
pub fn get_speed() -> f32 {
    with_runner(|r| r.orrery().options().speed()).unwrap_or(0.0)
}

/// Upper bound of the speed slider.
#[wasm_bindgen]
pub fn get_max_speed() -> f32 {
    with_runner(|r| r.orrery().max_speed()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_real_view() -> bool {
    with_runner(|r| r.orrery().options().real_view()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_show_path() -> bool {
    with_runner(|r| r.orrery().options().show_path()).unwrap_or(false)
}

// -- Info panel --

#[wasm_bindgen]
pub fn info_visible() -> bool {
    with_runner(|r| r.orrery().info_panel().is_visible()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn info_name() -> String {
    with_runner(|r| r.orrery().info_body().map(|b| b.name.to_string()))
        .flatten()
        .unwrap_or_default()
}

#[wasm_bindgen]
pub fn info_description() -> String {
    with_runner(|r| r.orrery().info_body().map(|b| b.description.to_string()))
        .flatten()
        .unwrap_or_default()
}

// -- Textures --

#[wasm_bindgen]
pub fn get_texture_count() -> u32 {
    with_runner(|r| r.orrery().textures().len() as u32).unwrap_or(0)
}

/// Path of the texture in `slot`, or an empty string.
#[wasm_bindgen]
pub fn get_texture_path(slot: u32) -> String {
    with_runner(|r| r.orrery().textures().path(slot).map(str::to_string))
        .flatten()
        .unwrap_or_default()
}

// -- Frame buffer --

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_line_vertices_ptr() -> *const f32 {
    with_runner(|r| r.line_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_line_vertex_count() -> u32 {
    with_runner(|r| r.line_vertex_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_lights_ptr() -> *const f32 {
    with_runner(|r| r.lights_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_light_count() -> u32 {
    with_runner(|r| r.light_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_ambient_intensity() -> f32 {
    with_runner(|r| r.orrery().lights().ambient_intensity()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len()).unwrap_or(0)
}

// -- Capacities --

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(|r| r.max_instances()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_line_vertices() -> u32 {
    with_runner(|r| r.max_line_vertices()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_lights() -> u32 {
    with_runner(|r| r.max_lights()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}
