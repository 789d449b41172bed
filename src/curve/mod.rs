//! Logistic curve evaluation for brightness and color temperature.
//!
//! The day is split into two phases — ascend (night→day) and descend
//! (day→night) — each with its own logistic segment per quantity. A segment
//! is described by a midpoint (the hour the curve crosses its half-value
//! point) and a steepness (slope magnitude per hour). Midpoint offsets in
//! the configuration are relative to the resolved wake time for ascend and
//! the resolved bed time for descend, so the curves follow the schedule
//! without retuning.
//!
//! On top of the raw shape two adjustments apply, in precedence order:
//!
//! 1. A stepping override from [`AreaState`] replaces the effective midpoint
//!    entirely (manual brighten/dim interactions).
//! 2. Otherwise the wake/bed brightness target shifts the midpoint so the
//!    curve passes through the configured percentage exactly at the anchor
//!    hour. A 50 % target is the neutral case and leaves the midpoint where
//!    the shape parameters put it.
//!
//! All numeric edge cases degrade instead of erroring: inverted bounds
//! collapse to a constant at the configured minimum, equal bounds to that
//! bound, and non-positive steepness to a near-flat curve crossing 0.5 at
//! the midpoint.

pub mod rules;

use crate::common::constants::{FRACTION_FLOOR, STEEPNESS_FLOOR};
use crate::common::utils::{in_wrapped_range, wrap24};
use crate::config::RhythmConfig;
use crate::schedule;
use crate::solar::SunTimes;
use crate::state::AreaState;

/// The two daily phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Night→day brightening, `[ascend_start, descend_start)`.
    Ascend,
    /// Day→night dimming, the rest of the day.
    Descend,
}

/// Which curve a segment drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Brightness,
    ColorTemp,
}

/// One resolved logistic segment: midpoint hour plus signed slope
/// (positive for ascend, negative for descend).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CurveParams {
    pub midpoint: f64,
    pub slope: f64,
}

/// Determine the active phase for an hour.
///
/// Ascend covers `[ascend_start, descend_start)` with midnight wrap; a
/// degenerate configuration where the boundaries coincide is all descend.
pub fn phase_at(hour: f64, config: &RhythmConfig) -> Phase {
    if in_wrapped_range(hour, config.ascend_start(), config.descend_start()) {
        Phase::Ascend
    } else {
        Phase::Descend
    }
}

/// Signed shortest distance from `midpoint` to `hour` on the 24-hour circle,
/// in [-12, 12). Keeps the logistic well-behaved across midnight.
fn circular_delta(hour: f64, midpoint: f64) -> f64 {
    wrap24(hour - midpoint + 12.0) - 12.0
}

/// Evaluate the logistic at `hour`, returning a normalized 0–1 position.
fn logistic(hour: f64, params: &CurveParams) -> f64 {
    let delta = circular_delta(hour, params.midpoint);
    1.0 / (1.0 + (-params.slope * delta).exp())
}

/// Midpoint shift achieving `target_pct` exactly at the anchor hour.
///
/// Solving `1/(1+exp(-k*(anchor - (anchor + s)))) = p` for the shift `s`
/// gives `s = ln(1/p - 1) / k`. At p = 0.5 the shift is zero; above 50 %
/// the midpoint moves earlier for ascend (positive k) so the curve is
/// already higher at the anchor, and the direction mirrors for descend's
/// negative slope.
fn target_midpoint_shift(target_pct: f64, slope: f64) -> f64 {
    let p = (target_pct / 100.0).clamp(FRACTION_FLOOR, 1.0 - FRACTION_FLOOR);
    (1.0 / p - 1.0).ln() / slope
}

/// Raw configured (midpoint offset, steepness) pair for a phase/quantity,
/// with the mirror flags collapsing the color pair onto the brightness pair.
fn shape_pair(config: &RhythmConfig, phase: Phase, quantity: Quantity) -> (f64, f64) {
    use crate::common::constants::{DEFAULT_MID_OFFSET, DEFAULT_STEEPNESS};

    let mirrored = match phase {
        Phase::Ascend => config.mirror_up(),
        Phase::Descend => config.mirror_dn(),
    };
    let quantity = if mirrored && quantity == Quantity::ColorTemp {
        Quantity::Brightness
    } else {
        quantity
    };

    let (mid, steep) = match (phase, quantity) {
        (Phase::Ascend, Quantity::Brightness) => (config.mid_bri_up, config.steep_bri_up),
        (Phase::Ascend, Quantity::ColorTemp) => (config.mid_cct_up, config.steep_cct_up),
        (Phase::Descend, Quantity::Brightness) => (config.mid_bri_dn, config.steep_bri_dn),
        (Phase::Descend, Quantity::ColorTemp) => (config.mid_cct_dn, config.steep_cct_dn),
    };
    (
        mid.unwrap_or(DEFAULT_MID_OFFSET),
        steep.unwrap_or(DEFAULT_STEEPNESS),
    )
}

/// Resolve the effective logistic segment for a quantity at `hour`.
///
/// `stepping_mid` is the manual midpoint override from [`AreaState`] for this
/// quantity; when present it wins outright and the brightness-target shift is
/// bypassed.
fn resolve_params(
    config: &RhythmConfig,
    phase: Phase,
    quantity: Quantity,
    stepping_mid: Option<f64>,
    wake: f64,
    bed: f64,
) -> CurveParams {
    let (mid_offset, steep) = shape_pair(config, phase, quantity);
    // Non-positive steepness degrades to a near-flat curve, never an error
    let magnitude = steep.max(STEEPNESS_FLOOR);
    let slope = match phase {
        Phase::Ascend => magnitude,
        Phase::Descend => -magnitude,
    };

    if let Some(mid) = stepping_mid {
        return CurveParams {
            midpoint: wrap24(mid),
            slope,
        };
    }

    let anchor = match phase {
        Phase::Ascend => wake,
        Phase::Descend => bed,
    };
    let base_mid = wrap24(anchor + mid_offset);

    // The brightness target shifts the brightness segment; a mirrored color
    // segment inherits the shifted pair wholesale.
    let mirrored = match phase {
        Phase::Ascend => config.mirror_up(),
        Phase::Descend => config.mirror_dn(),
    };
    let shifted = quantity == Quantity::Brightness || mirrored;
    let midpoint = if shifted {
        let target = match phase {
            Phase::Ascend => config.wake_brightness(),
            Phase::Descend => config.bed_brightness(),
        };
        wrap24(base_mid + target_midpoint_shift(target, slope))
    } else {
        base_mid
    };

    CurveParams { midpoint, slope }
}

/// Denormalize a 0–1 position into `[min, max]` with degenerate-bounds
/// fallback: inverted or equal bounds yield a constant at `min`.
fn denormalize(norm: f64, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    min + norm * (max - min)
}

/// Resolved brightness segment plus bounds, shared with the dimming step
/// calculator which inverts it.
pub(crate) fn brightness_segment(
    config: &RhythmConfig,
    state: &AreaState,
    hour: f64,
    weekday: u8,
) -> (CurveParams, f64, f64) {
    let (wake, bed) = schedule::effective_timing(config, hour, weekday);
    let phase = phase_at(hour, config);
    let params = resolve_params(
        config,
        phase,
        Quantity::Brightness,
        state.brightness_mid,
        wake,
        bed,
    );
    (params, config.min_brightness(), config.max_brightness())
}

/// Resolved color-temperature segment plus bounds, shared with the engine's
/// step recording which shifts both midpoints in lockstep.
pub(crate) fn color_segment(
    config: &RhythmConfig,
    state: &AreaState,
    hour: f64,
    weekday: u8,
) -> (CurveParams, f64, f64) {
    let (wake, bed) = schedule::effective_timing(config, hour, weekday);
    let phase = phase_at(hour, config);
    let params = resolve_params(
        config,
        phase,
        Quantity::ColorTemp,
        state.color_mid,
        wake,
        bed,
    );
    (params, config.min_color_temp(), config.max_color_temp())
}

/// Brightness percentage at an hour of the (solar) day.
///
/// `weekday` is 0 = Monday, matching the alternate-day configuration. A
/// frozen state pins the evaluation hour regardless of the one passed in.
pub fn brightness_at_hour(hour: f64, config: &RhythmConfig, state: &AreaState, weekday: u8) -> f64 {
    let hour = state.frozen_at.unwrap_or(hour);
    let (params, min, max) = brightness_segment(config, state, hour, weekday);
    denormalize(logistic(hour, &params), min, max)
}

/// Color temperature in Kelvin at an hour of the (solar) day.
///
/// With `apply_solar_rules` set, the warm-night clamp and daylight blend
/// post-process the raw curve value using `sun`.
pub fn color_temp_at_hour(
    hour: f64,
    config: &RhythmConfig,
    state: &AreaState,
    apply_solar_rules: bool,
    sun: &SunTimes,
    weekday: u8,
) -> f64 {
    let hour = state.frozen_at.unwrap_or(hour);
    let (params, min, max) = color_segment(config, state, hour, weekday);
    let base = denormalize(logistic(hour, &params), min, max);

    if apply_solar_rules {
        rules::apply_solar_rules(base, hour, config, sun)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> RhythmConfig {
        RhythmConfig {
            wake_time: Some(7.0),
            bed_time: Some(22.0),
            steep_bri_up: Some(1.0),
            steep_bri_dn: Some(1.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_phase_detection_with_wrap() {
        let config = base_config();
        // Defaults: ascend 3.0, descend 15.0
        assert_eq!(phase_at(3.0, &config), Phase::Ascend);
        assert_eq!(phase_at(10.0, &config), Phase::Ascend);
        assert_eq!(phase_at(15.0, &config), Phase::Descend);
        assert_eq!(phase_at(23.0, &config), Phase::Descend);
        assert_eq!(phase_at(1.0, &config), Phase::Descend);
    }

    #[test]
    fn test_brightness_rises_through_wake() {
        let config = base_config();
        let state = AreaState::default();
        let before = brightness_at_hour(5.0, &config, &state, 0);
        let at_wake = brightness_at_hour(7.0, &config, &state, 0);
        let after = brightness_at_hour(9.0, &config, &state, 0);
        assert!(before < at_wake && at_wake < after);
        // 50% target puts the midpoint at wake, so the curve reads mid-range
        let expected_mid = (config.min_brightness() + config.max_brightness()) / 2.0;
        assert!((at_wake - expected_mid).abs() < 0.5);
    }

    #[test]
    fn test_brightness_falls_through_bed() {
        let config = base_config();
        let state = AreaState::default();
        let before = brightness_at_hour(20.0, &config, &state, 0);
        let after = brightness_at_hour(23.5, &config, &state, 0);
        assert!(before > after);
    }

    #[test]
    fn test_wake_target_hits_exactly_at_wake() {
        for target in [20.0, 30.0, 50.0, 70.0, 85.0] {
            let config = RhythmConfig {
                wake_brightness: Some(target),
                min_brightness: Some(0.0),
                max_brightness: Some(100.0),
                ..base_config()
            };
            let state = AreaState::default();
            let got = brightness_at_hour(7.0, &config, &state, 0);
            assert!(
                (got - target).abs() < 1e-6,
                "target {target} produced {got}"
            );
        }
    }

    #[test]
    fn test_target_shift_directions() {
        let slope = 1.0;
        assert!(target_midpoint_shift(50.0, slope).abs() < 1e-12);
        // Above 50% shifts earlier on ascend
        assert!(target_midpoint_shift(70.0, slope) < 0.0);
        // Below 50% shifts later on ascend
        assert!(target_midpoint_shift(30.0, slope) > 0.0);
        // Descend mirrors: 30% at bed shifts earlier
        assert!(target_midpoint_shift(30.0, -slope) < 0.0);
    }

    #[test]
    fn test_stepping_override_bypasses_target_shift() {
        let config = RhythmConfig {
            wake_brightness: Some(80.0),
            ..base_config()
        };
        // Default 50%-target curve: midpoint sits exactly at wake
        let neutral = RhythmConfig {
            wake_brightness: Some(50.0),
            ..base_config()
        };
        let stepped = AreaState {
            brightness_mid: Some(7.0),
            ..Default::default()
        };
        for hour in [5.0, 7.0, 9.0, 11.0] {
            let with_override = brightness_at_hour(hour, &config, &stepped, 0);
            let reference = brightness_at_hour(hour, &neutral, &AreaState::default(), 0);
            assert!(
                (with_override - reference).abs() < 1e-9,
                "hour {hour}: {with_override} vs {reference}"
            );
        }
    }

    #[test]
    fn test_frozen_state_pins_the_hour() {
        let config = base_config();
        let frozen = AreaState {
            frozen_at: Some(12.0),
            ..Default::default()
        };
        let live = AreaState::default();
        let pinned = brightness_at_hour(12.0, &config, &live, 0);
        for hour in [0.0, 6.0, 18.0, 23.0] {
            assert_eq!(brightness_at_hour(hour, &config, &frozen, 0), pinned);
        }
    }

    #[test]
    fn test_equal_bounds_degenerate_to_constant() {
        let config = RhythmConfig {
            min_brightness: Some(42.0),
            max_brightness: Some(42.0),
            ..base_config()
        };
        let state = AreaState::default();
        for hour in [0.0, 7.0, 12.0, 22.0] {
            assert_eq!(brightness_at_hour(hour, &config, &state, 0), 42.0);
        }
    }

    #[test]
    fn test_inverted_bounds_fall_back_to_min_field() {
        let config = RhythmConfig {
            min_brightness: Some(80.0),
            max_brightness: Some(20.0),
            ..base_config()
        };
        let state = AreaState::default();
        assert_eq!(brightness_at_hour(12.0, &config, &state, 0), 80.0);
    }

    #[test]
    fn test_zero_steepness_is_near_flat() {
        let config = RhythmConfig {
            steep_bri_up: Some(0.0),
            min_brightness: Some(0.0),
            max_brightness: Some(100.0),
            ..base_config()
        };
        let state = AreaState::default();
        let a = brightness_at_hour(4.0, &config, &state, 0);
        let b = brightness_at_hour(14.0, &config, &state, 0);
        assert!((a - 50.0).abs() < 0.1);
        assert!((a - b).abs() < 0.1);
    }

    #[test]
    fn test_mirrored_color_matches_brightness_shape() {
        let config = RhythmConfig {
            mirror_up: Some(true),
            mirror_dn: Some(true),
            min_color_temp: Some(0.0),
            max_color_temp: Some(100.0),
            min_brightness: Some(0.0),
            max_brightness: Some(100.0),
            ..base_config()
        };
        let state = AreaState::default();
        let sun = SunTimes::new(6.0, 18.0);
        for hour in [5.0, 7.0, 12.0, 21.0, 23.0] {
            let bri = brightness_at_hour(hour, &config, &state, 0);
            let cct = color_temp_at_hour(hour, &config, &state, false, &sun, 0);
            assert!((bri - cct).abs() < 1e-9, "hour {hour}: {bri} vs {cct}");
        }
    }

    #[test]
    fn test_color_curve_stays_in_bounds() {
        let config = base_config();
        let state = AreaState::default();
        let sun = SunTimes::new(6.0, 18.0);
        for i in 0..96 {
            let hour = i as f64 * 0.25;
            let cct = color_temp_at_hour(hour, &config, &state, false, &sun, 0);
            assert!(
                (config.min_color_temp()..=config.max_color_temp()).contains(&cct),
                "hour {hour}: {cct}"
            );
        }
    }
}
