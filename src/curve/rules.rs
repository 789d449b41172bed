//! Solar rule post-processing for the color-temperature curve.
//!
//! Two independent rules adjust the raw curve output:
//!
//! - **Warm night** clamps color temperature to a warm Kelvin ceiling, either
//!   for the whole descend phase ("all") or inside a configurable window
//!   around sunset ("window") with a linear fade at both edges. It is a
//!   comfort rule and is never modulated by outdoor light intensity.
//! - **Daylight blend** pushes color temperature upward toward (never past)
//!   a daylight ceiling, in proportion to the measured outdoor intensity.
//!
//! The blend runs first and the clamp second, so a bright evening sky can
//! never defeat the warm-night ceiling.

use crate::common::constants::WARM_NIGHT_FULL_WEIGHT;
use crate::common::utils::{forward_hours, interpolate_f64, wrap24};
use crate::config::{RhythmConfig, WarmNightMode};
use crate::solar::SunTimes;
use crate::state::AreaState;

use super::{Phase, phase_at};

/// Introspection record for the solar rules at one instant.
///
/// Produced by [`solar_rule_breakdown`] for UI/diagnostic consumers that want
/// to show why the delivered color differs from the raw curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBreakdown {
    pub warm_night_enabled: bool,
    /// Fade weight of the warm-night rule at this hour, 0 when outside the
    /// window (or disabled), 1 when fully faded in.
    pub warm_night_weight: f64,
    pub warm_night_target: f64,
    /// Whether the daylight blend contributed at this instant.
    pub daylight_blend: bool,
    /// Kelvin added by the daylight blend.
    pub daylight_shift: f64,
    pub daylight_cct: f64,
    pub outdoor_normalized: Option<f64>,
    /// Curve output before any rule.
    pub base_cct: f64,
    /// Final color temperature after both rules.
    pub result_cct: f64,
}

/// Warm-night fade weight at `hour`: 0 outside the window, ramping linearly
/// to 1 over `warm_night_fade` minutes inside each edge.
fn warm_night_weight(hour: f64, config: &RhythmConfig, sun: &SunTimes) -> f64 {
    // The window anchors on sunset but the curve hour is in solar time, so
    // bring the anchor into the same coordinate
    let sunset = crate::solar::solar_time(sun.sunset, sun);
    let start = wrap24(sunset + config.warm_night_start() / 60.0);
    let end = wrap24(sunset + config.warm_night_end() / 60.0);

    let span = forward_hours(start, end);
    if span <= 0.0 {
        return 0.0;
    }
    let pos = forward_hours(start, hour);
    if pos > span {
        return 0.0;
    }

    let fade = (config.warm_night_fade() / 60.0).max(0.0);
    if fade == 0.0 {
        return 1.0;
    }

    let from_start = (pos / fade).clamp(0.0, 1.0);
    let from_end = ((span - pos) / fade).clamp(0.0, 1.0);
    from_start.min(from_end)
}

/// Apply the warm-night rule to a color temperature.
///
/// A full weight is a hard clamp; a partial fade weight blends linearly
/// between the incoming value and the clamped value.
fn apply_warm_night(cct: f64, hour: f64, config: &RhythmConfig, sun: &SunTimes) -> (f64, f64) {
    if !config.warm_night_enabled() {
        return (cct, 0.0);
    }
    let target = config.warm_night_target();

    match config.warm_night_mode() {
        WarmNightMode::All => {
            if phase_at(hour, config) == Phase::Descend {
                (cct.min(target), 1.0)
            } else {
                (cct, 0.0)
            }
        }
        WarmNightMode::Window => {
            let weight = warm_night_weight(hour, config, sun);
            if weight >= WARM_NIGHT_FULL_WEIGHT {
                (cct.min(target), weight)
            } else if weight > 0.0 && cct > target {
                (interpolate_f64(cct, target, weight), weight)
            } else {
                (cct, weight)
            }
        }
    }
}

/// Kelvin shift from the daylight blend for a base value.
///
/// Returns 0 when the blend is disabled (`daylight_cct <= 0`), when no
/// outdoor intensity is available, or when the base is already at or above
/// the daylight ceiling. The shift is monotonically increasing in the
/// outdoor intensity and never pushes past the ceiling.
fn daylight_shift(base_cct: f64, config: &RhythmConfig, sun: &SunTimes) -> f64 {
    let ceiling = config.daylight_cct();
    if ceiling <= 0.0 {
        return 0.0;
    }
    let Some(outdoor) = sun.outdoor_normalized else {
        return 0.0;
    };
    if outdoor <= 0.0 || base_cct >= ceiling {
        return 0.0;
    }

    let factor = (outdoor.clamp(0.0, 1.0) * config.color_sensitivity()).clamp(0.0, 1.0);
    (ceiling - base_cct) * factor
}

/// Apply both solar rules to a raw curve value.
pub fn apply_solar_rules(base_cct: f64, hour: f64, config: &RhythmConfig, sun: &SunTimes) -> f64 {
    let blended = base_cct + daylight_shift(base_cct, config, sun);
    let (clamped, _) = apply_warm_night(blended, hour, config, sun);
    clamped
}

/// Full introspection of the solar rules at one instant.
///
/// Honors a frozen [`AreaState`] the same way the curve evaluator does.
pub fn solar_rule_breakdown(
    base_cct: f64,
    hour: f64,
    config: &RhythmConfig,
    state: &AreaState,
    sun: &SunTimes,
) -> RuleBreakdown {
    let hour = state.frozen_at.unwrap_or(hour);
    let shift = daylight_shift(base_cct, config, sun);
    let blended = base_cct + shift;
    let (result, weight) = apply_warm_night(blended, hour, config, sun);

    RuleBreakdown {
        warm_night_enabled: config.warm_night_enabled(),
        warm_night_weight: weight,
        warm_night_target: config.warm_night_target(),
        daylight_blend: shift > 0.0,
        daylight_shift: shift,
        daylight_cct: config.daylight_cct(),
        outdoor_normalized: sun.outdoor_normalized,
        base_cct,
        result_cct: result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warm_all_config() -> RhythmConfig {
        RhythmConfig {
            warm_night_enabled: Some(true),
            warm_night_mode: Some(WarmNightMode::All),
            warm_night_target: Some(2300.0),
            ..Default::default()
        }
    }

    fn window_config(start_min: f64, end_min: f64, fade_min: f64) -> RhythmConfig {
        RhythmConfig {
            warm_night_enabled: Some(true),
            warm_night_mode: Some(WarmNightMode::Window),
            warm_night_target: Some(2300.0),
            warm_night_start: Some(start_min),
            warm_night_end: Some(end_min),
            warm_night_fade: Some(fade_min),
            ..Default::default()
        }
    }

    #[test]
    fn test_warm_night_disabled_is_identity() {
        let config = RhythmConfig::default();
        let sun = SunTimes::new(6.0, 18.0);
        assert_eq!(apply_solar_rules(5000.0, 20.0, &config, &sun), 5000.0);
    }

    #[test]
    fn test_warm_night_all_clamps_descend_only() {
        let config = warm_all_config();
        let sun = SunTimes::new(6.0, 18.0);
        // Descend (default descend_start = 15.0)
        assert_eq!(apply_solar_rules(5000.0, 20.0, &config, &sun), 2300.0);
        // Already below the ceiling: untouched
        assert_eq!(apply_solar_rules(2000.0, 20.0, &config, &sun), 2000.0);
        // Ascend: untouched
        assert_eq!(apply_solar_rules(5000.0, 10.0, &config, &sun), 5000.0);
    }

    #[test]
    fn test_warm_night_all_ignores_outdoor_intensity() {
        let config = warm_all_config();
        let sun = SunTimes {
            outdoor_normalized: Some(1.0),
            ..SunTimes::new(6.0, 18.0)
        };
        assert_eq!(apply_solar_rules(5000.0, 20.0, &config, &sun), 2300.0);
    }

    #[test]
    fn test_window_weight_shape() {
        // Window 18:00–22:00 with a 60-minute fade
        let config = window_config(0.0, 240.0, 60.0);
        let sun = SunTimes::new(6.0, 18.0);

        assert_eq!(warm_night_weight(17.5, &config, &sun), 0.0);
        assert_eq!(warm_night_weight(18.0, &config, &sun), 0.0);
        assert!((warm_night_weight(18.5, &config, &sun) - 0.5).abs() < 1e-9);
        assert_eq!(warm_night_weight(19.0, &config, &sun), 1.0);
        assert_eq!(warm_night_weight(20.0, &config, &sun), 1.0);
        assert!((warm_night_weight(21.5, &config, &sun) - 0.5).abs() < 1e-9);
        assert_eq!(warm_night_weight(22.0, &config, &sun), 0.0);
        assert_eq!(warm_night_weight(23.0, &config, &sun), 0.0);
    }

    #[test]
    fn test_window_blends_in_fade_and_clamps_when_full() {
        let config = window_config(0.0, 240.0, 60.0);
        let sun = SunTimes::new(6.0, 18.0);

        // Mid-fade: halfway between base and target
        let mid_fade = apply_solar_rules(4300.0, 18.5, &config, &sun);
        assert!((mid_fade - 3300.0).abs() < 1e-6);
        // Fully faded: hard clamp
        assert_eq!(apply_solar_rules(4300.0, 20.0, &config, &sun), 2300.0);
        assert_eq!(apply_solar_rules(2000.0, 20.0, &config, &sun), 2000.0);
        // Outside: untouched
        assert_eq!(apply_solar_rules(4300.0, 12.0, &config, &sun), 4300.0);
    }

    #[test]
    fn test_window_crossing_midnight() {
        // Window from 30 min before sunset to 8 h after (wraps past midnight
        // when sunset is 20:00), no fade
        let config = window_config(-30.0, 480.0, 0.0);
        let sun = SunTimes::new(6.0, 20.0);
        assert_eq!(apply_solar_rules(4000.0, 1.0, &config, &sun), 2300.0);
        assert_eq!(apply_solar_rules(4000.0, 5.0, &config, &sun), 4000.0);
    }

    #[test]
    fn test_daylight_blend_monotonic_in_outdoor() {
        let config = RhythmConfig {
            daylight_cct: Some(5500.0),
            ..Default::default()
        };
        let mut last = 0.0;
        for outdoor in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let sun = SunTimes {
                outdoor_normalized: Some(outdoor),
                ..SunTimes::new(6.0, 18.0)
            };
            let cct = apply_solar_rules(3000.0, 10.0, &config, &sun);
            assert!(cct >= last, "outdoor {outdoor}: {cct} < {last}");
            assert!(cct <= 5500.0);
            last = cct;
        }
        // Full intensity with unit sensitivity reaches the ceiling
        assert_eq!(last, 5500.0);
    }

    #[test]
    fn test_daylight_blend_disabled_cases() {
        let sun_bright = SunTimes {
            outdoor_normalized: Some(1.0),
            ..SunTimes::new(6.0, 18.0)
        };
        let sun_none = SunTimes::new(6.0, 18.0);

        // daylight_cct = 0 disables regardless of outdoor
        let off = RhythmConfig {
            daylight_cct: Some(0.0),
            ..Default::default()
        };
        assert_eq!(apply_solar_rules(3000.0, 10.0, &off, &sun_bright), 3000.0);

        // No sensor reading disables
        let on = RhythmConfig {
            daylight_cct: Some(5500.0),
            ..Default::default()
        };
        assert_eq!(apply_solar_rules(3000.0, 10.0, &on, &sun_none), 3000.0);

        // Base at/above the ceiling: no push
        assert_eq!(apply_solar_rules(6000.0, 10.0, &on, &sun_bright), 6000.0);
    }

    #[test]
    fn test_blend_cannot_defeat_warm_night() {
        let config = RhythmConfig {
            daylight_cct: Some(5500.0),
            ..warm_all_config()
        };
        let sun = SunTimes {
            outdoor_normalized: Some(1.0),
            ..SunTimes::new(6.0, 18.0)
        };
        // Evening with full outdoor intensity still respects the ceiling
        assert!(apply_solar_rules(3000.0, 20.0, &config, &sun) <= 2300.0);
    }

    #[test]
    fn test_breakdown_reports_both_rules() {
        let config = RhythmConfig {
            daylight_cct: Some(5500.0),
            color_sensitivity: Some(0.5),
            ..warm_all_config()
        };
        let sun = SunTimes {
            outdoor_normalized: Some(0.8),
            ..SunTimes::new(6.0, 18.0)
        };
        let state = AreaState::default();

        let breakdown = solar_rule_breakdown(3000.0, 10.0, &config, &state, &sun);
        assert!(breakdown.warm_night_enabled);
        assert_eq!(breakdown.warm_night_weight, 0.0); // ascend, all-mode inactive
        assert!(breakdown.daylight_blend);
        // factor = 0.8 * 0.5 = 0.4 of the 2500 K headroom
        assert!((breakdown.daylight_shift - 1000.0).abs() < 1e-9);
        assert_eq!(breakdown.result_cct, 4000.0);
        assert_eq!(breakdown.outdoor_normalized, Some(0.8));
    }
}
