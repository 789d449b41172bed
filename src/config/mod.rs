//! Configuration system for rhythmr with centralized defaults and validation.
//!
//! This module provides configuration management for the curve engine,
//! handling TOML-based configuration, validation, and default resolution.
//!
//! ## Configuration Structure
//!
//! The configuration is a flat record of numeric/boolean fields. Every field
//! is optional in the serialized form; defaults are resolved through accessor
//! methods backed by the single defaults table in [`crate::common::constants`],
//! so no call site carries its own fallback:
//!
//! ```toml
//! #[Bounds]
//! min_color_temp = 500.0   # Kelvin floor for the color curve (500-20000)
//! max_color_temp = 6500.0  # Kelvin ceiling for the color curve
//! min_brightness = 1.0     # Percent floor for the brightness curve
//! max_brightness = 100.0   # Percent ceiling for the brightness curve
//!
//! #[Phases and timing]
//! ascend_start = 3.0       # Hour the night→day phase begins
//! descend_start = 15.0     # Hour the day→night phase begins
//! wake_time = 7.0          # Primary wake hour
//! bed_time = 22.0          # Primary bed hour
//! wake_alt_time = 9.0      # Alternate wake hour (applies on wake_alt_days)
//! wake_alt_days = [5, 6]   # Weekdays (0 = Monday) using the alternate wake
//! bed_alt_time = 23.5
//! bed_alt_days = [4, 5]
//!
//! #[Curve shape]
//! mid_bri_up = 0.0         # Brightness midpoint offset from wake (hours)
//! steep_bri_up = 1.0       # Brightness steepness for the ascend phase
//! mid_cct_up = 0.0
//! steep_cct_up = 1.0
//! mid_bri_dn = 0.0         # Offsets for the descend phase are from bed time
//! steep_bri_dn = 1.0
//! mid_cct_dn = 0.0
//! steep_cct_dn = 1.0
//! mirror_up = true         # Color curve reuses the brightness pair (ascend)
//! mirror_dn = true
//! wake_brightness = 50.0   # Desired brightness at the wake hour (percent)
//! bed_brightness = 50.0    # Desired brightness at the bed hour (percent)
//!
//! #[Solar rules]
//! warm_night_enabled = true
//! warm_night_target = 2300.0  # Kelvin ceiling while the rule is active
//! warm_night_mode = "window"  # "all" clamps the whole descend phase
//! warm_night_start = -30.0    # Window start, minutes relative to sunset
//! warm_night_end = 480.0      # Window end, minutes relative to sunset
//! warm_night_fade = 30.0      # Fade ramp at the window edges (minutes)
//! daylight_cct = 5500.0       # Ceiling for the outdoor-light blend (0 = off)
//! color_sensitivity = 1.0     # Blend multiplier on the outdoor intensity
//!
//! #[Output]
//! gamma_ui = 38.0          # Perceptual gamma control (38 ≈ exponent 0.62)
//!
//! #[Location]
//! latitude = 37.7749
//! longitude = -122.4194
//! timezone = "America/Los_Angeles"
//! ```

pub mod validation;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::common::constants::*;
use crate::schedule::ScheduleOverride;

// Re-export public API
pub use validation::validate_config;

/// Warm-night clamping mode.
///
/// Determines how much of the day the warm-night Kelvin ceiling covers.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WarmNightMode {
    /// Clamp for the entire descend phase.
    All,
    /// Clamp only inside a configurable window around sunset, with a fade
    /// ramp at both edges.
    #[default]
    Window,
}

/// Configuration for one zone's circadian rhythm.
///
/// All fields are optional in the serialized form and resolve their defaults
/// through the accessor methods below. Invalid combinations that can be
/// rejected up front are caught by [`validate_config`]; degenerate numeric
/// cases (inverted bounds, zero steepness) are not errors and degrade to
/// documented fallbacks inside the curve evaluator.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RhythmConfig {
    /// Kelvin floor for the color-temperature curve.
    pub min_color_temp: Option<f64>,
    /// Kelvin ceiling for the color-temperature curve.
    pub max_color_temp: Option<f64>,
    /// Percent floor for the brightness curve.
    pub min_brightness: Option<f64>,
    /// Percent ceiling for the brightness curve.
    pub max_brightness: Option<f64>,

    /// Hour of day the ascend (night→day) phase begins.
    pub ascend_start: Option<f64>,
    /// Hour of day the descend (day→night) phase begins.
    pub descend_start: Option<f64>,

    /// Primary wake hour.
    pub wake_time: Option<f64>,
    /// Primary bed hour.
    pub bed_time: Option<f64>,
    /// Alternate wake hour, used on the weekdays in `wake_alt_days`.
    pub wake_alt_time: Option<f64>,
    /// Weekdays (0 = Monday … 6 = Sunday) on which `wake_alt_time` applies.
    pub wake_alt_days: Option<Vec<u8>>,
    /// Alternate bed hour, used on the weekdays in `bed_alt_days`.
    pub bed_alt_time: Option<f64>,
    /// Weekdays on which `bed_alt_time` applies.
    pub bed_alt_days: Option<Vec<u8>>,

    /// Brightness midpoint offset from wake time, ascend phase (hours).
    pub mid_bri_up: Option<f64>,
    /// Brightness steepness, ascend phase.
    pub steep_bri_up: Option<f64>,
    /// Color midpoint offset from wake time, ascend phase (hours).
    pub mid_cct_up: Option<f64>,
    /// Color steepness, ascend phase.
    pub steep_cct_up: Option<f64>,
    /// Brightness midpoint offset from bed time, descend phase (hours).
    pub mid_bri_dn: Option<f64>,
    /// Brightness steepness, descend phase.
    pub steep_bri_dn: Option<f64>,
    /// Color midpoint offset from bed time, descend phase (hours).
    pub mid_cct_dn: Option<f64>,
    /// Color steepness, descend phase.
    pub steep_cct_dn: Option<f64>,
    /// When true, the ascend color curve reuses the brightness pair.
    pub mirror_up: Option<bool>,
    /// When true, the descend color curve reuses the brightness pair.
    pub mirror_dn: Option<bool>,

    /// Desired brightness percentage at the wake hour. 50 leaves the curve
    /// midpoint where the shape parameters put it.
    pub wake_brightness: Option<f64>,
    /// Desired brightness percentage at the bed hour.
    pub bed_brightness: Option<f64>,

    /// Whether the warm-night Kelvin ceiling is active.
    pub warm_night_enabled: Option<bool>,
    /// Kelvin ceiling applied while the warm-night rule is active.
    pub warm_night_target: Option<f64>,
    /// Warm-night coverage mode.
    pub warm_night_mode: Option<WarmNightMode>,
    /// Window start in minutes relative to sunset (may be negative).
    pub warm_night_start: Option<f64>,
    /// Window end in minutes relative to sunset.
    pub warm_night_end: Option<f64>,
    /// Fade ramp length at both window edges, in minutes.
    pub warm_night_fade: Option<f64>,

    /// Kelvin ceiling for the daylight-intensity color blend. 0 disables.
    pub daylight_cct: Option<f64>,
    /// Multiplier applied to the normalized outdoor intensity in the blend.
    pub color_sensitivity: Option<f64>,

    /// Perceptual gamma control value (UI scale; 38 maps to exponent ≈0.62).
    pub gamma_ui: Option<f64>,

    /// Geographic latitude in degrees (-90 to +90).
    pub latitude: Option<f64>,
    /// Geographic longitude in degrees (-180 to +180).
    pub longitude: Option<f64>,
    /// IANA timezone name for the location (e.g. "America/Los_Angeles").
    pub timezone: Option<String>,

    /// Temporary wake/bed override, cleared automatically at the matching
    /// phase boundary on or after its expiry date.
    pub schedule_override: Option<ScheduleOverride>,
}

impl RhythmConfig {
    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: RhythmConfig =
            toml::from_str(raw).context("Failed to parse rhythm configuration")?;
        validate_config(&config)?;
        Ok(config)
    }

    // Resolved accessors. These are the only place defaults are applied;
    // everything downstream works with resolved values.

    pub fn min_color_temp(&self) -> f64 {
        self.min_color_temp.unwrap_or(DEFAULT_MIN_COLOR_TEMP)
    }

    pub fn max_color_temp(&self) -> f64 {
        self.max_color_temp.unwrap_or(DEFAULT_MAX_COLOR_TEMP)
    }

    pub fn min_brightness(&self) -> f64 {
        self.min_brightness.unwrap_or(DEFAULT_MIN_BRIGHTNESS)
    }

    pub fn max_brightness(&self) -> f64 {
        self.max_brightness.unwrap_or(DEFAULT_MAX_BRIGHTNESS)
    }

    pub fn ascend_start(&self) -> f64 {
        self.ascend_start.unwrap_or(DEFAULT_ASCEND_START)
    }

    pub fn descend_start(&self) -> f64 {
        self.descend_start.unwrap_or(DEFAULT_DESCEND_START)
    }

    pub fn wake_time(&self) -> f64 {
        self.wake_time.unwrap_or(DEFAULT_WAKE_TIME)
    }

    pub fn bed_time(&self) -> f64 {
        self.bed_time.unwrap_or(DEFAULT_BED_TIME)
    }

    pub fn wake_brightness(&self) -> f64 {
        self.wake_brightness.unwrap_or(DEFAULT_WAKE_BRIGHTNESS)
    }

    pub fn bed_brightness(&self) -> f64 {
        self.bed_brightness.unwrap_or(DEFAULT_BED_BRIGHTNESS)
    }

    pub fn mirror_up(&self) -> bool {
        self.mirror_up.unwrap_or(false)
    }

    pub fn mirror_dn(&self) -> bool {
        self.mirror_dn.unwrap_or(false)
    }

    pub fn warm_night_enabled(&self) -> bool {
        self.warm_night_enabled.unwrap_or(false)
    }

    pub fn warm_night_target(&self) -> f64 {
        self.warm_night_target.unwrap_or(DEFAULT_WARM_NIGHT_TARGET)
    }

    pub fn warm_night_mode(&self) -> WarmNightMode {
        self.warm_night_mode.unwrap_or_default()
    }

    pub fn warm_night_start(&self) -> f64 {
        self.warm_night_start.unwrap_or(DEFAULT_WARM_NIGHT_START_MIN)
    }

    pub fn warm_night_end(&self) -> f64 {
        self.warm_night_end.unwrap_or(DEFAULT_WARM_NIGHT_END_MIN)
    }

    pub fn warm_night_fade(&self) -> f64 {
        self.warm_night_fade.unwrap_or(DEFAULT_WARM_NIGHT_FADE_MIN)
    }

    pub fn daylight_cct(&self) -> f64 {
        self.daylight_cct.unwrap_or(DEFAULT_DAYLIGHT_CCT)
    }

    pub fn color_sensitivity(&self) -> f64 {
        self.color_sensitivity.unwrap_or(DEFAULT_COLOR_SENSITIVITY)
    }

    pub fn gamma_ui(&self) -> f64 {
        self.gamma_ui.unwrap_or(DEFAULT_GAMMA_UI)
    }

    /// Whether `weekday` (0 = Monday) is an alternate-wake day.
    pub fn is_wake_alt_day(&self, weekday: u8) -> bool {
        self.wake_alt_days
            .as_ref()
            .is_some_and(|days| days.contains(&weekday))
    }

    /// Whether `weekday` (0 = Monday) is an alternate-bed day.
    pub fn is_bed_alt_day(&self, weekday: u8) -> bool {
        self.bed_alt_days
            .as_ref()
            .is_some_and(|days| days.contains(&weekday))
    }
}
