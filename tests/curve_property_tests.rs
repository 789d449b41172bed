use proptest::prelude::*;
use rhythmr::color;
use rhythmr::config::{RhythmConfig, WarmNightMode};
use rhythmr::curve;
use rhythmr::curve::rules;
use rhythmr::solar::SunTimes;
use rhythmr::state::AreaState;

/// Generate hours of the day
fn hour_strategy() -> impl Strategy<Value = f64> {
    0.0..24.0
}

/// Generate plausible curve steepness values
fn steepness_strategy() -> impl Strategy<Value = f64> {
    0.1..10.0f64
}

/// Generate wake/bed target percentages, including the extremes users type in
fn target_strategy() -> impl Strategy<Value = f64> {
    0.0..=100.0f64
}

fn test_config(steep: f64, wake_target: f64, bed_target: f64) -> RhythmConfig {
    RhythmConfig {
        steep_bri_up: Some(steep),
        steep_bri_dn: Some(steep),
        wake_brightness: Some(wake_target),
        bed_brightness: Some(bed_target),
        ..Default::default()
    }
}

/// Property tests for the logistic curve evaluator
mod curve_bounds_tests {
    use super::*;

    proptest! {
        /// Brightness never escapes the configured bounds, whatever the
        /// hour, steepness, or midpoint targets
        #[test]
        fn test_brightness_within_bounds(
            hour in hour_strategy(),
            steep in steepness_strategy(),
            wake_target in target_strategy(),
            bed_target in target_strategy()
        ) {
            let config = test_config(steep, wake_target, bed_target);
            let state = AreaState::default();
            let value = curve::brightness_at_hour(hour, &config, &state, 0);

            prop_assert!(value >= config.min_brightness() - 1e-9);
            prop_assert!(value <= config.max_brightness() + 1e-9);
        }

        /// Color temperature (without solar rules) never escapes the
        /// configured Kelvin bounds
        #[test]
        fn test_color_temp_within_bounds(
            hour in hour_strategy(),
            steep in steepness_strategy()
        ) {
            let config = RhythmConfig {
                steep_cct_up: Some(steep),
                steep_cct_dn: Some(steep),
                ..Default::default()
            };
            let state = AreaState::default();
            let sun = SunTimes::new(6.0, 18.0);
            let value = curve::color_temp_at_hour(hour, &config, &state, false, &sun, 0);

            prop_assert!(value >= config.min_color_temp() - 1e-9);
            prop_assert!(value <= config.max_color_temp() + 1e-9);
        }

        /// Evaluating an hour and that hour plus 24 gives identical results
        #[test]
        fn test_wraparound_invariance(
            hour in hour_strategy(),
            steep in steepness_strategy()
        ) {
            let config = test_config(steep, 50.0, 50.0);
            let state = AreaState::default();

            let a = curve::brightness_at_hour(hour, &config, &state, 0);
            let b = curve::brightness_at_hour(hour + 24.0, &config, &state, 0);
            prop_assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }

        /// A frozen state pins the output: every query hour reads the same
        #[test]
        fn test_frozen_state_pins_output(
            frozen in hour_strategy(),
            query in hour_strategy()
        ) {
            let config = RhythmConfig::default();
            let mut state = AreaState::default();
            state.freeze_at(frozen);

            let pinned = curve::brightness_at_hour(frozen, &config, &AreaState::default(), 0);
            let value = curve::brightness_at_hour(query, &config, &state, 0);
            prop_assert!((value - pinned).abs() < 1e-9);
        }
    }
}

/// Property tests for the solar rule post-processor
mod solar_rules_tests {
    use super::*;

    proptest! {
        /// With the warm-night window fully active, the output never exceeds
        /// the warm-night target
        #[test]
        fn test_warm_night_caps_output(
            base_cct in 500.0..6500.0f64,
            outdoor in proptest::option::of(0.0..=1.0f64)
        ) {
            let config = RhythmConfig {
                warm_night_enabled: Some(true),
                warm_night_mode: Some(WarmNightMode::Window),
                warm_night_target: Some(2300.0),
                warm_night_start: Some(0.0),
                warm_night_end: Some(240.0),
                warm_night_fade: Some(0.0),
                daylight_cct: Some(6000.0),
                ..Default::default()
            };
            let mut sun = SunTimes::new(6.0, 18.0);
            sun.outdoor_normalized = outdoor;

            // One hour after sunset, inside the zero-fade window
            let value = rules::apply_solar_rules(base_cct, 19.0, &config, &sun);
            prop_assert!(value <= 2300.0 + 1e-9, "{value}");
        }

        /// Daylight blending moves the output toward the daylight CCT,
        /// never past it
        #[test]
        fn test_daylight_blend_bounded(
            base_cct in 500.0..6000.0f64,
            outdoor in 0.0..=1.0f64,
            sensitivity in 0.0..=2.0f64
        ) {
            let config = RhythmConfig {
                daylight_cct: Some(6000.0),
                color_sensitivity: Some(sensitivity),
                ..Default::default()
            };
            let mut sun = SunTimes::new(6.0, 18.0);
            sun.outdoor_normalized = Some(outdoor);

            // Noon, far from any warm-night window
            let value = rules::apply_solar_rules(base_cct, 12.0, &config, &sun);
            prop_assert!(value >= base_cct - 1e-9, "{value} < {base_cct}");
            prop_assert!(value <= 6000.0 + 1e-9, "{value}");
        }
    }
}

/// Property tests for color conversions
mod color_conversion_tests {
    use super::*;

    proptest! {
        /// Chromaticity coordinates stay inside [0, 1] across the usable
        /// Kelvin range
        #[test]
        fn test_kelvin_to_xy_in_gamut(kelvin in 500.0..20000.0f64) {
            let (x, y) = color::kelvin_to_xy(kelvin);
            prop_assert!((0.0..=1.0).contains(&x), "x = {x}");
            prop_assert!((0.0..=1.0).contains(&y), "y = {y}");
        }

        /// Mireds land in the range implied by the default Kelvin bounds
        #[test]
        fn test_mired_range(kelvin in 100.0..50000.0f64) {
            let mired = color::kelvin_to_mired(kelvin, None);
            // 6500 K -> 154, 500 K -> 2000
            prop_assert!((154..=2000).contains(&mired), "{mired}");
        }

        /// Perceptual brightness is monotone in the linear input
        #[test]
        fn test_perceptual_brightness_monotone(
            a in 0.0..=100.0f64,
            b in 0.0..=100.0f64
        ) {
            let pa = color::perceptual_brightness(a, 38.0);
            let pb = color::perceptual_brightness(b, 38.0);
            if a < b {
                prop_assert!(pa <= pb);
            }
            prop_assert!((0.0..=1.0).contains(&pa));
        }

        /// RGB-derived chromaticity stays finite and in gamut
        #[test]
        fn test_rgb_to_xy_in_gamut(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let (x, y) = color::rgb_to_xy((r, g, b));
            prop_assert!(x.is_finite() && y.is_finite());
            prop_assert!((0.0..=1.0).contains(&x));
            prop_assert!((0.0..=1.0).contains(&y));
        }
    }
}
