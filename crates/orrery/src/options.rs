//! Live-tunable display options: lighting mode, path visibility, speed.
//!
//! A single [`DisplayOptions`] value is owned by the orrery and passed by
//! reference to the builder and the animation driver. Setters report what
//! changed so the owner can apply side effects in the same call.

use crate::api::types::{event_kind, OrreryEvent};

/// Inclusive `[0, max]` range for the speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBounds {
    max: f32,
}

impl SpeedBounds {
    pub fn new(max: f32) -> Self {
        Self { max: max.max(0.0) }
    }

    /// Resolve the upper bound from the raw `ms` startup parameter.
    ///
    /// Absent, empty, non-numeric, non-finite, zero or negative values fall
    /// back to `default_max`. Surrounding whitespace is ignored.
    pub fn resolve(raw: Option<&str>, default_max: f32) -> Self {
        let parsed = raw
            .map(str::trim)
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|v| v.is_finite() && *v > 0.0);

        match (raw, parsed) {
            (_, Some(max)) => {
                log::info!("speed bound: {} (from ms parameter)", max);
                Self::new(max)
            }
            (Some(bad), None) => {
                log::warn!("ignoring ms={:?}; using default speed bound {}", bad, default_max);
                Self::new(default_max)
            }
            (None, None) => {
                log::info!("speed bound: {} (default)", default_max);
                Self::new(default_max)
            }
        }
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn clamp(&self, speed: f32) -> f32 {
        speed.clamp(0.0, self.max)
    }
}

/// A change applied to [`DisplayOptions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionChange {
    RealView(bool),
    ShowPath(bool),
    /// Carries the clamped value actually stored.
    Speed(f32),
}

impl OptionChange {
    pub fn to_event(self) -> OrreryEvent {
        let (index, value) = match self {
            OptionChange::RealView(v) => (0.0, if v { 1.0 } else { 0.0 }),
            OptionChange::ShowPath(v) => (1.0, if v { 1.0 } else { 0.0 }),
            OptionChange::Speed(v) => (2.0, v),
        };
        OrreryEvent { kind: event_kind::OPTION_CHANGED, a: index, b: value, c: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    real_view: bool,
    show_path: bool,
    speed: f32,
    bounds: SpeedBounds,
}

impl DisplayOptions {
    pub fn new(bounds: SpeedBounds, real_view: bool, show_path: bool, speed: f32) -> Self {
        let speed = if speed.is_finite() { bounds.clamp(speed) } else { 0.0 };
        Self { real_view, show_path, speed, bounds }
    }

    pub fn real_view(&self) -> bool {
        self.real_view
    }

    pub fn show_path(&self) -> bool {
        self.show_path
    }

    /// Current speed multiplier, always within [`bounds`](Self::bounds).
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn bounds(&self) -> SpeedBounds {
        self.bounds
    }

    /// Ambient fill intensity for the current lighting mode.
    /// "Real view" means no fill at all.
    pub fn ambient_intensity(&self, fill: f32) -> f32 {
        if self.real_view {
            0.0
        } else {
            fill
        }
    }

    pub fn set_real_view(&mut self, on: bool) -> Option<OptionChange> {
        if self.real_view == on {
            return None;
        }
        self.real_view = on;
        Some(OptionChange::RealView(on))
    }

    pub fn set_show_path(&mut self, on: bool) -> Option<OptionChange> {
        if self.show_path == on {
            return None;
        }
        self.show_path = on;
        Some(OptionChange::ShowPath(on))
    }

    /// Set the speed multiplier, clamped into bounds. Non-finite input is rejected.
    pub fn set_speed(&mut self, speed: f32) -> Option<OptionChange> {
        if !speed.is_finite() {
            log::warn!("rejecting non-finite speed {}", speed);
            return None;
        }
        let clamped = self.bounds.clamp(speed);
        if clamped == self.speed {
            return None;
        }
        self.speed = clamped;
        Some(OptionChange::Speed(clamped))
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::new(SpeedBounds::new(20.0), true, true, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ms_parameter_sets_the_bound() {
        assert_eq!(SpeedBounds::resolve(Some("5"), 20.0).max(), 5.0);
        assert_eq!(SpeedBounds::resolve(Some(" 2.5 "), 20.0).max(), 2.5);
    }

    #[test]
    fn unusable_ms_falls_back_to_default() {
        for raw in [None, Some("abc"), Some(""), Some("0"), Some("-3"), Some("NaN"), Some("inf")] {
            assert_eq!(SpeedBounds::resolve(raw, 20.0).max(), 20.0, "raw = {:?}", raw);
        }
    }

    #[test]
    fn speed_is_clamped_to_bounds() {
        let mut options = DisplayOptions::new(SpeedBounds::new(5.0), true, true, 1.0);
        assert_eq!(options.set_speed(12.0), Some(OptionChange::Speed(5.0)));
        assert_eq!(options.speed(), 5.0);
        assert_eq!(options.set_speed(-1.0), Some(OptionChange::Speed(0.0)));
        assert_eq!(options.speed(), 0.0);
    }

    #[test]
    fn initial_speed_is_clamped() {
        let options = DisplayOptions::new(SpeedBounds::new(0.5), true, true, 1.0);
        assert_eq!(options.speed(), 0.5);
    }

    #[test]
    fn non_finite_speed_is_ignored() {
        let mut options = DisplayOptions::default();
        assert_eq!(options.set_speed(f32::NAN), None);
        assert_eq!(options.speed(), 1.0);
    }

    #[test]
    fn unchanged_values_report_nothing() {
        let mut options = DisplayOptions::default();
        assert_eq!(options.set_real_view(true), None);
        assert_eq!(options.set_show_path(true), None);
        assert_eq!(options.set_speed(1.0), None);
        assert_eq!(options.set_show_path(false), Some(OptionChange::ShowPath(false)));
    }

    #[test]
    fn real_view_means_no_ambient_fill() {
        let mut options = DisplayOptions::default();
        assert_eq!(options.ambient_intensity(0.5), 0.0);
        options.set_real_view(false);
        assert_eq!(options.ambient_intensity(0.5), 0.5);
    }

    #[test]
    fn change_events_encode_option_and_value() {
        let e = OptionChange::Speed(3.0).to_event();
        assert_eq!(e.kind, event_kind::OPTION_CHANGED);
        assert_eq!((e.a, e.b), (2.0, 3.0));
        let e = OptionChange::ShowPath(false).to_event();
        assert_eq!((e.a, e.b), (1.0, 0.0));
    }
}
