//! Configuration validation functionality.
//!
//! Rejects configurations that are out of physical range or internally
//! inconsistent in ways that cannot degrade safely. Degenerate numeric cases
//! the curve evaluator handles on its own (inverted bounds, zero steepness)
//! are logged as warnings instead of rejected, matching the engine's
//! never-raise contract for numeric edge cases.

use anyhow::Result;

use super::RhythmConfig;
use crate::common::constants::*;

/// Comprehensive configuration validation to prevent impossible setups.
pub fn validate_config(config: &RhythmConfig) -> Result<()> {
    // Validate geographic coordinates
    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    // Validate color temperature bounds against hard physical limits
    for (name, value) in [
        ("min_color_temp", config.min_color_temp),
        ("max_color_temp", config.max_color_temp),
        ("warm_night_target", config.warm_night_target),
    ] {
        if let Some(kelvin) = value
            && !(MINIMUM_COLOR_TEMP..=MAXIMUM_COLOR_TEMP).contains(&kelvin)
        {
            anyhow::bail!(
                "{} ({} K) must be between {} and {} Kelvin",
                name,
                kelvin,
                MINIMUM_COLOR_TEMP,
                MAXIMUM_COLOR_TEMP
            );
        }
    }

    // daylight_cct is special: 0 is the documented "disabled" value
    if let Some(cct) = config.daylight_cct
        && cct != 0.0
        && !(MINIMUM_COLOR_TEMP..=MAXIMUM_COLOR_TEMP).contains(&cct)
    {
        anyhow::bail!(
            "daylight_cct ({} K) must be 0 (disabled) or between {} and {} Kelvin",
            cct,
            MINIMUM_COLOR_TEMP,
            MAXIMUM_COLOR_TEMP
        );
    }

    // Validate brightness bounds
    for (name, value) in [
        ("min_brightness", config.min_brightness),
        ("max_brightness", config.max_brightness),
        ("wake_brightness", config.wake_brightness),
        ("bed_brightness", config.bed_brightness),
    ] {
        if let Some(pct) = value
            && !(MINIMUM_BRIGHTNESS..=MAXIMUM_BRIGHTNESS).contains(&pct)
        {
            anyhow::bail!(
                "{} ({}%) must be between {}% and {}%",
                name,
                pct,
                MINIMUM_BRIGHTNESS,
                MAXIMUM_BRIGHTNESS
            );
        }
    }

    // Validate hour-of-day fields
    for (name, value) in [
        ("ascend_start", config.ascend_start),
        ("descend_start", config.descend_start),
        ("wake_time", config.wake_time),
        ("bed_time", config.bed_time),
        ("wake_alt_time", config.wake_alt_time),
        ("bed_alt_time", config.bed_alt_time),
    ] {
        if let Some(hour) = value
            && !(0.0..24.0).contains(&hour)
        {
            anyhow::bail!("{} ({}) must be an hour of day in [0, 24)", name, hour);
        }
    }

    // Validate steepness upper limits; zero/negative degrades, never errors
    for (name, value) in [
        ("steep_bri_up", config.steep_bri_up),
        ("steep_cct_up", config.steep_cct_up),
        ("steep_bri_dn", config.steep_bri_dn),
        ("steep_cct_dn", config.steep_cct_dn),
    ] {
        if let Some(steep) = value {
            if steep > MAXIMUM_STEEPNESS {
                anyhow::bail!(
                    "{} ({}) must not exceed {}",
                    name,
                    steep,
                    MAXIMUM_STEEPNESS
                );
            }
            if steep <= MINIMUM_STEEPNESS {
                log_pipe!();
                log_warning!(
                    "{name} ({steep}) is not positive; curve will degrade to a near-flat line"
                );
            }
        }
    }

    // Validate gamma control value
    if let Some(gamma) = config.gamma_ui
        && !(MINIMUM_GAMMA_UI..=MAXIMUM_GAMMA_UI).contains(&gamma)
    {
        anyhow::bail!(
            "gamma_ui ({}) must be between {} and {}",
            gamma,
            MINIMUM_GAMMA_UI,
            MAXIMUM_GAMMA_UI
        );
    }

    // Validate alternate-day lists
    for (name, days) in [
        ("wake_alt_days", &config.wake_alt_days),
        ("bed_alt_days", &config.bed_alt_days),
    ] {
        if let Some(days) = days
            && let Some(bad) = days.iter().find(|d| **d > 6)
        {
            anyhow::bail!(
                "{} contains {}; weekdays must be 0 (Monday) through 6 (Sunday)",
                name,
                bad
            );
        }
    }

    // Inverted bounds degrade to a constant inside the evaluator, but they
    // are almost certainly a configuration mistake worth flagging.
    if config.min_color_temp() > config.max_color_temp() {
        log_pipe!();
        log_warning!(
            "min_color_temp ({}) exceeds max_color_temp ({}); color curve will be constant",
            config.min_color_temp(),
            config.max_color_temp()
        );
    }
    if config.min_brightness() > config.max_brightness() {
        log_pipe!();
        log_warning!(
            "min_brightness ({}) exceeds max_brightness ({}); brightness curve will be constant",
            config.min_brightness(),
            config.max_brightness()
        );
    }

    // Custom overrides need their times when mode is custom
    if let Some(ov) = &config.schedule_override {
        ov.validate()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Log;

    fn quiet<T>(f: impl FnOnce() -> T) -> T {
        Log::set_enabled(false);
        let out = f();
        Log::set_enabled(true);
        out
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RhythmConfig::default()).is_ok());
    }

    #[test]
    fn test_out_of_range_hour_rejected() {
        let config = RhythmConfig {
            wake_time: Some(24.0),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_out_of_range_weekday_rejected() {
        let config = RhythmConfig {
            wake_alt_days: Some(vec![1, 7]),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_inverted_bounds_are_not_an_error() {
        let config = RhythmConfig {
            min_brightness: Some(80.0),
            max_brightness: Some(20.0),
            ..Default::default()
        };
        assert!(quiet(|| validate_config(&config)).is_ok());
    }

    #[test]
    fn test_zero_steepness_is_not_an_error() {
        let config = RhythmConfig {
            steep_bri_up: Some(0.0),
            ..Default::default()
        };
        assert!(quiet(|| validate_config(&config)).is_ok());
    }

    #[test]
    fn test_daylight_cct_zero_allowed() {
        let config = RhythmConfig {
            daylight_cct: Some(0.0),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_daylight_cct_below_floor_rejected() {
        let config = RhythmConfig {
            daylight_cct: Some(100.0),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
