//! Click-to-focus camera flights.
//!
//! A flight is an explicit state machine ticked from the frame loop with the
//! current clock reading. Starting a new flight replaces the old one outright,
//! so an abandoned flight can never write the camera again.

use glam::Vec3;

use crate::api::config::OrreryConfig;
use crate::bodies::BodyId;
use crate::core::time::Millis;
use crate::extensions::easing::{ease_vec3, Easing};
use crate::renderer::camera::PerspectiveCamera;

/// Shortest flight allowed. Durations are always positive.
pub const MIN_FOCUS_DURATION_MS: Millis = 1.0;

/// One camera flight toward a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusSession {
    pub body: BodyId,
    /// World position of the body when the flight began. The camera aims here.
    pub target: Vec3,
    /// Camera position sampled when the flight began.
    pub from: Vec3,
    /// Final camera position: `target + offset`.
    pub to: Vec3,
    pub started_at: Millis,
    pub duration: Millis,
}

impl FocusSession {
    /// Fraction of the flight completed at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Millis) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FocusState {
    #[default]
    Idle,
    Interpolating(FocusSession),
}

/// Outcome of one [`FocusController::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusStep {
    /// No flight in progress; the camera was not touched.
    Idle,
    /// The camera moved; the flight continues.
    Moving { progress: f32 },
    /// The camera reached its destination this tick.
    Finished { body: BodyId, target: Vec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FocusController {
    state: FocusState,
    duration: Millis,
    offset: Vec3,
    easing: Easing,
}

impl FocusController {
    pub fn new(duration: Millis, offset: Vec3, easing: Easing) -> Self {
        Self { state: FocusState::Idle, duration: duration.max(MIN_FOCUS_DURATION_MS), offset, easing }
    }

    pub fn from_config(config: &OrreryConfig) -> Self {
        Self::new(config.focus_duration_ms, config.focus_offset, config.focus_easing)
    }

    /// Start a flight toward `target`, sampling the camera's current position.
    /// Returns the body of a flight this one supersedes.
    pub fn begin(
        &mut self,
        body: BodyId,
        target: Vec3,
        camera: &PerspectiveCamera,
        now: Millis,
    ) -> Option<BodyId> {
        let superseded = self.cancel().map(|s| s.body);
        if let Some(previous) = superseded {
            log::debug!("focus on {:?} superseded by {:?}", previous, body);
        }
        self.state = FocusState::Interpolating(FocusSession {
            body,
            target,
            from: camera.position,
            to: target + self.offset,
            started_at: now,
            duration: self.duration,
        });
        log::debug!("focus on {:?} started", body);
        superseded
    }

    /// Move the camera along the active flight, if any.
    pub fn tick(&mut self, camera: &mut PerspectiveCamera, now: Millis) -> FocusStep {
        let FocusState::Interpolating(session) = self.state else {
            return FocusStep::Idle;
        };

        let progress = session.progress(now);
        camera.position = ease_vec3(session.from, session.to, progress, self.easing);
        camera.look_at(session.target);

        if progress >= 1.0 {
            self.state = FocusState::Idle;
            log::debug!("focus on {:?} finished", session.body);
            FocusStep::Finished { body: session.body, target: session.target }
        } else {
            FocusStep::Moving { progress }
        }
    }

    /// Abandon the active flight. The camera stays where it is.
    pub fn cancel(&mut self) -> Option<FocusSession> {
        match std::mem::take(&mut self.state) {
            FocusState::Interpolating(session) => Some(session),
            FocusState::Idle => None,
        }
    }

    pub fn session(&self) -> Option<&FocusSession> {
        match &self.state {
            FocusState::Interpolating(session) => Some(session),
            FocusState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, FocusState::Interpolating(_))
    }
}

impl Default for FocusController {
    fn default() -> Self {
        Self::from_config(&OrreryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::default()
    }

    const EARTH: Vec3 = Vec3::new(62.0, 0.0, 0.0);
    const MARS: Vec3 = Vec3::new(0.0, 0.0, -78.0);

    #[test]
    fn flight_ends_at_offset_above_target() {
        let mut focus = FocusController::default();
        let mut cam = camera();
        focus.begin(BodyId::Earth, EARTH, &cam, 0.0);

        assert!(matches!(focus.tick(&mut cam, 500.0), FocusStep::Moving { .. }));
        assert_eq!(cam.target, EARTH);

        let step = focus.tick(&mut cam, 1000.0);
        assert_eq!(step, FocusStep::Finished { body: BodyId::Earth, target: EARTH });
        assert!((cam.position - Vec3::new(62.0, 20.0, 50.0)).length() < 1e-4);
        assert!(!focus.is_active());
        assert_eq!(focus.tick(&mut cam, 1100.0), FocusStep::Idle);
    }

    #[test]
    fn midpoint_is_halfway_for_linear_easing() {
        let mut focus = FocusController::default();
        let mut cam = camera();
        let start = cam.position;
        focus.begin(BodyId::Earth, EARTH, &cam, 100.0);
        focus.tick(&mut cam, 600.0);
        let expected = start.lerp(EARTH + Vec3::new(0.0, 20.0, 50.0), 0.5);
        assert!((cam.position - expected).length() < 1e-3);
    }

    #[test]
    fn superseding_click_restarts_from_current_position() {
        let mut focus = FocusController::default();
        let mut cam = camera();
        focus.begin(BodyId::Earth, EARTH, &cam, 0.0);
        focus.tick(&mut cam, 300.0);
        let midway = cam.position;

        let superseded = focus.begin(BodyId::Mars, MARS, &cam, 300.0);
        assert_eq!(superseded, Some(BodyId::Earth));
        assert_eq!(focus.session().unwrap().from, midway);

        // Earth's deadline passes without Earth ever being reached.
        focus.tick(&mut cam, 1000.0);
        assert_eq!(cam.target, MARS);
        let step = focus.tick(&mut cam, 1300.0);
        assert_eq!(step, FocusStep::Finished { body: BodyId::Mars, target: MARS });
        assert!((cam.position - (MARS + Vec3::new(0.0, 20.0, 50.0))).length() < 1e-4);
    }

    #[test]
    fn cancel_leaves_camera_in_place() {
        let mut focus = FocusController::default();
        let mut cam = camera();
        focus.begin(BodyId::Earth, EARTH, &cam, 0.0);
        focus.tick(&mut cam, 250.0);
        let here = cam.position;
        assert!(focus.cancel().is_some());
        assert_eq!(focus.tick(&mut cam, 2000.0), FocusStep::Idle);
        assert_eq!(cam.position, here);
        assert!(focus.cancel().is_none());
    }

    #[test]
    fn non_positive_durations_are_raised_to_the_minimum() {
        for duration in [0.0, -250.0] {
            let mut focus = FocusController::new(duration, Vec3::new(0.0, 20.0, 50.0), Easing::Linear);
            let mut cam = camera();
            focus.begin(BodyId::Mars, MARS, &cam, 10.0);
            assert_eq!(focus.session().unwrap().duration, MIN_FOCUS_DURATION_MS);
            assert!(matches!(focus.tick(&mut cam, 10.0), FocusStep::Moving { .. }));
            assert!(matches!(focus.tick(&mut cam, 11.0), FocusStep::Finished { .. }));
        }
    }

    #[test]
    fn zero_duration_from_json_config_stays_positive() {
        let config = OrreryConfig::from_json(r#"{ "focus_duration_ms": 0 }"#).unwrap();
        let mut focus = FocusController::from_config(&config);
        focus.begin(BodyId::Earth, EARTH, &camera(), 0.0);
        assert!(focus.session().unwrap().duration > 0.0);
    }

    #[test]
    fn clock_going_backwards_does_not_overshoot() {
        let session = FocusSession {
            body: BodyId::Earth,
            target: EARTH,
            from: Vec3::ZERO,
            to: Vec3::ONE,
            started_at: 100.0,
            duration: 1000.0,
        };
        assert_eq!(session.progress(50.0), 0.0);
        assert_eq!(session.progress(5000.0), 1.0);
    }
}
