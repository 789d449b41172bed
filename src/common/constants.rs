//! Engine constants and default values for rhythmr.
//!
//! This module is the single source of truth for configuration defaults,
//! validation limits, and numeric guard values used throughout the engine.
//! Every optional configuration field resolves its default here; call sites
//! never invent their own fallbacks.

// ═══ Color Temperature Defaults ═══
// Bounds for the color-temperature curve output (Kelvin)

pub const DEFAULT_MIN_COLOR_TEMP: f64 = 500.0; // Deep candlelight floor
pub const DEFAULT_MAX_COLOR_TEMP: f64 = 6500.0; // Natural daylight ceiling

// ═══ Brightness Defaults ═══
// Bounds for the brightness curve output (percent)

pub const DEFAULT_MIN_BRIGHTNESS: f64 = 1.0;
pub const DEFAULT_MAX_BRIGHTNESS: f64 = 100.0;

// ═══ Phase Boundary Defaults ═══
// Hours of day delimiting the ascend (night→day) and descend (day→night) phases

pub const DEFAULT_ASCEND_START: f64 = 3.0; // Pre-dawn; hours before this belong to "last night"
pub const DEFAULT_DESCEND_START: f64 = 15.0;

// ═══ Timing Defaults ═══

pub const DEFAULT_WAKE_TIME: f64 = 7.0;
pub const DEFAULT_BED_TIME: f64 = 22.0;

// ═══ Curve Shape Defaults ═══
// Midpoint offsets are hours relative to the resolved wake (ascend) or bed
// (descend) time; steepness is the logistic slope magnitude per hour.

pub const DEFAULT_MID_OFFSET: f64 = 0.0;
pub const DEFAULT_STEEPNESS: f64 = 1.0;

// ═══ Brightness Target Defaults ═══
// Desired brightness percentage at the wake/bed anchor hour. 50 leaves the
// curve midpoint where the shape parameters put it.

pub const DEFAULT_WAKE_BRIGHTNESS: f64 = 50.0;
pub const DEFAULT_BED_BRIGHTNESS: f64 = 50.0;

// ═══ Solar Rule Defaults ═══

pub const DEFAULT_WARM_NIGHT_TARGET: f64 = 2300.0; // Kelvin ceiling during warm night
pub const DEFAULT_WARM_NIGHT_START_MIN: f64 = -30.0; // minutes relative to sunset
pub const DEFAULT_WARM_NIGHT_END_MIN: f64 = 480.0; // minutes relative to sunset
pub const DEFAULT_WARM_NIGHT_FADE_MIN: f64 = 30.0; // fade ramp at window edges
pub const DEFAULT_DAYLIGHT_CCT: f64 = 0.0; // 0 disables the daylight blend
pub const DEFAULT_COLOR_SENSITIVITY: f64 = 1.0; // daylight blend multiplier

// ═══ Perceptual Brightness Defaults ═══
// The UI exposes gamma as an integer control value; 38 maps to an exponent
// of roughly 0.62 which reads as perceptually linear on most LED dimmers.

pub const DEFAULT_GAMMA_UI: f64 = 38.0;

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable and safe ranges

pub const MINIMUM_COLOR_TEMP: f64 = 500.0; // Very warm candlelight-like
pub const MAXIMUM_COLOR_TEMP: f64 = 20000.0; // Very cool blue light

pub const MINIMUM_BRIGHTNESS: f64 = 0.0;
pub const MAXIMUM_BRIGHTNESS: f64 = 100.0;

pub const MINIMUM_STEEPNESS: f64 = 0.0; // 0 degrades to a near-flat curve, never errors
pub const MAXIMUM_STEEPNESS: f64 = 50.0;

pub const MINIMUM_GAMMA_UI: f64 = 1.0;
pub const MAXIMUM_GAMMA_UI: f64 = 100.0;

// ═══ Numeric Guards ═══
// Internal epsilons preventing division by zero and logistic blow-ups

/// Slope floor substituted when configured steepness is zero or negative.
/// The resulting curve is effectively flat at the midpoint's 0.5 crossing.
pub const STEEPNESS_FLOOR: f64 = 1e-6;

/// Normalized targets are clamped into [FRACTION_FLOOR, 1 - FRACTION_FLOOR]
/// before logistic inversion so ln(1/p - 1) stays finite.
pub const FRACTION_FLOOR: f64 = 0.001;

/// Weight at or above this is treated as the fully-faded region of the warm
/// night window, where the clamp is hard rather than blended.
pub const WARM_NIGHT_FULL_WEIGHT: f64 = 0.999;

// ═══ Stepping Defaults ═══

pub const DEFAULT_MAX_STEPS: u32 = 10;
