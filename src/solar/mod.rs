//! Solar time normalization and sun position.
//!
//! Curves in this engine run on a 0–24 "solar time" coordinate anchored to
//! solar noon/midnight rather than clock time, so they stay aligned with
//! actual daylight across seasons. This module converts wall-clock hours into
//! that coordinate and derives the normalized sun position used in the
//! lighting record.
//!
//! The engine never computes astronomical ephemeris during evaluation; it
//! consumes a [`SunTimes`] record supplied by the caller. The [`ephemeris`]
//! submodule provides a default provider for callers without their own
//! almanac.

pub mod ephemeris;

use std::f64::consts::TAU;

use crate::common::utils::wrap24;

/// Per-calculation solar context.
///
/// Hour values are in the location's local clock, 0–24. `solar_noon` and
/// `solar_mid` are optional anchors; when absent the solar-time normalizer
/// falls back as documented on [`solar_time`].
///
/// `outdoor_normalized` is the 0–1 "sun factor" from an outdoor-light
/// tracker. `None` means "no sensor", which is deliberately distinct from
/// `Some(0.0)` ("sensor reads dark"); both currently disable the daylight
/// blend, but the distinction is carried through so a consumer can
/// substitute an angle-based estimate for the sensorless case.
#[derive(Debug, Clone, PartialEq)]
pub struct SunTimes {
    /// Sunrise hour.
    pub sunrise: f64,
    /// Sunset hour.
    pub sunset: f64,
    /// Solar noon hour, if known.
    pub solar_noon: Option<f64>,
    /// Solar midnight hour, if known.
    pub solar_mid: Option<f64>,
    /// Normalized outdoor light intensity in [0, 1], if a sensor reported one.
    pub outdoor_normalized: Option<f64>,
}

impl Default for SunTimes {
    fn default() -> Self {
        Self {
            sunrise: 6.0,
            sunset: 18.0,
            solar_noon: None,
            solar_mid: None,
            outdoor_normalized: None,
        }
    }
}

impl SunTimes {
    pub fn new(sunrise: f64, sunset: f64) -> Self {
        Self {
            sunrise: wrap24(sunrise),
            sunset: wrap24(sunset),
            ..Default::default()
        }
    }
}

/// Convert a wall-clock hour into the 0–24 solar-time coordinate.
///
/// - With both solar noon and solar midnight anchors known, solar time is the
///   linear hours elapsed since solar midnight, wrapped modulo 24.
/// - With only solar noon known, `(hours_since_noon + 12) mod 24`.
/// - With neither, the wall-clock hour passes through unchanged.
///
/// Never fails; the result is always in [0, 24).
pub fn solar_time(clock_hour: f64, sun: &SunTimes) -> f64 {
    match (sun.solar_mid, sun.solar_noon) {
        (Some(mid), _) => wrap24(clock_hour - mid),
        (None, Some(noon)) => wrap24(clock_hour - noon + 12.0),
        (None, None) => wrap24(clock_hour),
    }
}

/// Normalized sun position for a solar-time hour.
///
/// +1.0 at solar noon, −1.0 at solar midnight, 0.0 at ±6 h from noon
/// (a plain cosine, not true solar elevation).
pub fn sun_position(solar_hour: f64) -> f64 {
    ((solar_hour - 12.0) / 24.0 * TAU).cos()
}
