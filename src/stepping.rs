//! Manual dimming steps along the brightness curve.
//!
//! A brighten/dim interaction does not set an absolute level; it slides the
//! evaluation point along the configured brightness curve by one step. The
//! full brightness range splits into `max_steps` equal percent-space steps,
//! and the logistic is inverted to find the hour offset that moves the curve
//! output by exactly one step in the requested direction. The caller applies
//! the offset by storing the shifted midpoint in the area's state, which the
//! evaluator then honors as a stepping override.

use chrono::{Datelike, Duration, NaiveDateTime};

use crate::color;
use crate::common::constants::FRACTION_FLOOR;
use crate::common::utils::wrap24;
use crate::config::RhythmConfig;
use crate::curve;
use crate::schedule::{fractional_hour, weekday_index};
use crate::solar::{SunTimes, solar_time};
use crate::state::AreaState;

/// Direction of a manual step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Brighten,
    Dim,
}

impl StepAction {
    /// Parse an action name. Unknown names never fail; they fall back to
    /// `Brighten` with a warning so a stray service call still produces a
    /// structurally valid result.
    pub fn parse(name: &str) -> Self {
        match name {
            "brighten" | "up" => StepAction::Brighten,
            "dim" | "down" => StepAction::Dim,
            other => {
                log_warning!("Unknown dimming action '{other}', defaulting to brighten");
                StepAction::Brighten
            }
        }
    }

    fn direction(self) -> f64 {
        match self {
            StepAction::Brighten => 1.0,
            StepAction::Dim => -1.0,
        }
    }
}

/// Result of one dimming step: the lighting values at the stepped position
/// plus the time offset that produces them.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub kelvin: u32,
    /// Brightness percent, 1–100.
    pub brightness: u8,
    pub rgb: (u8, u8, u8),
    pub xy: (f64, f64),
    /// Hour offset along the curve, in minutes. Positive moves later.
    pub time_offset_minutes: f64,
    /// `now` plus the offset.
    pub target_time: NaiveDateTime,
    /// The curve hour the step lands on. [`crate::Engine::step`] translates
    /// it into the midpoint overrides stored in [`AreaState`].
    pub target_hour: f64,
}

/// Compute one dimming step from the current position on the brightness
/// curve.
///
/// Never fails: degenerate bounds or an extreme position yield a zero or
/// clamped offset with valid lighting values.
pub fn dimming_step(
    now: NaiveDateTime,
    action: StepAction,
    config: &RhythmConfig,
    state: &AreaState,
    sun: &SunTimes,
    max_steps: u32,
) -> StepResult {
    let weekday = weekday_index(now.date().weekday());
    let clock_hour = fractional_hour(&now);
    let hour = state
        .frozen_at
        .unwrap_or_else(|| solar_time(clock_hour, sun));

    let (params, min, max) = curve::brightness_segment(config, state, hour, weekday);
    let current = curve::brightness_at_hour(hour, config, state, weekday);

    let offset_hours = if min >= max || max_steps == 0 {
        // Degenerate range or stepless configuration: nothing to move
        0.0
    } else {
        let step = (max - min) / max_steps as f64;
        let target = (current + action.direction() * step).clamp(min, max);
        let fraction =
            ((target - min) / (max - min)).clamp(FRACTION_FLOOR, 1.0 - FRACTION_FLOOR);
        // Invert the logistic: the hour where the curve reads `fraction`
        let target_hour = params.midpoint - (1.0 / fraction - 1.0).ln() / params.slope;
        // Signed shortest move on the 24-hour circle
        wrap24(target_hour - hour + 12.0) - 12.0
    };

    let target_hour = wrap24(hour + offset_hours);
    let time_offset_minutes = offset_hours * 60.0;
    log_debug!("{action:?} step: {time_offset_minutes:+.1} min along the curve from hour {hour:.2}");
    let target_time = now + Duration::seconds((time_offset_minutes * 60.0).round() as i64);

    // Recompute at the stepped hour; drop the freeze so the preview reflects
    // where the step lands rather than the pinned hour
    let eval_state = AreaState {
        frozen_at: None,
        ..state.clone()
    };
    let brightness = curve::brightness_at_hour(target_hour, config, &eval_state, weekday);
    let kelvin = curve::color_temp_at_hour(target_hour, config, &eval_state, true, sun, weekday);
    let rgb = color::kelvin_to_rgb(kelvin);
    let xy = color::kelvin_to_xy(kelvin);

    StepResult {
        kelvin: kelvin.round() as u32,
        brightness: (brightness.round() as u8).clamp(1, 100),
        rgb,
        xy,
        time_offset_minutes,
        target_time,
        target_hour,
    }
}
