//! Top-level lighting engine.
//!
//! Wires the pipeline: wall clock → solar time → schedule resolution →
//! curve evaluation → solar rules → color conversion, producing the flat
//! lighting record a light-command translator consumes. Owns the zone
//! registry on behalf of the host's main controller.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::color;
use crate::common::constants::DEFAULT_MAX_STEPS;
use crate::common::utils::wrap24;
use crate::config::RhythmConfig;
use crate::curve;
use crate::schedule::{fractional_hour, weekday_index};
use crate::solar::{self, SunTimes, ephemeris};
use crate::state::ZoneRegistry;
use crate::stepping::{self, StepAction, StepResult};

/// Resolved geographic location for a zone.
///
/// Latitude, longitude, and timezone are required correctness inputs with no
/// safe default; a configuration missing any of them fails fast instead of
/// silently computing nonsense.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
}

impl Location {
    /// Extract the location from a zone configuration, failing fast on
    /// missing or unparseable fields.
    pub fn from_config(config: &RhythmConfig) -> Result<Self> {
        let latitude = config
            .latitude
            .context("latitude is required for lighting calculations and has no default")?;
        let longitude = config
            .longitude
            .context("longitude is required for lighting calculations and has no default")?;
        let tz_name = config
            .timezone
            .as_deref()
            .context("timezone is required for lighting calculations and has no default")?;
        let timezone: Tz = tz_name
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{tz_name}': {e}"))?;

        Ok(Self {
            latitude,
            longitude,
            timezone,
        })
    }
}

/// Flat lighting record for one zone at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingValues {
    pub kelvin: u32,
    /// Brightness percent, 1–100.
    pub brightness: u8,
    pub rgb: (u8, u8, u8),
    pub xy: (f64, f64),
    /// Normalized sun position, +1 at solar noon and −1 at solar midnight.
    pub sun_position: f64,
    /// The 0–24 solar-time coordinate the curves were evaluated at.
    pub solar_time: f64,
}

/// The circadian lighting engine.
///
/// One instance per host process; all zone state flows through its registry.
/// The computation methods are read-only over zone state, so hosts that
/// need concurrency can serialize writers per zone and share reads freely.
pub struct Engine {
    registry: ZoneRegistry,
}

impl Engine {
    pub fn new(registry: ZoneRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ZoneRegistry {
        &mut self.registry
    }

    /// Lighting values for a zone at a UTC instant.
    ///
    /// Resolves the zone's location (failing fast when unset), computes the
    /// day's sun times through the default ephemeris provider, and evaluates
    /// the full pipeline in the zone's local clock. The zone is created on
    /// first reference.
    pub fn lighting_at(&mut self, zone_name: &str, now: DateTime<Utc>) -> Result<LightingValues> {
        let zone = self.registry.ensure_zone(zone_name);
        let location = Location::from_config(&zone.config)
            .with_context(|| format!("Zone '{zone_name}' cannot compute lighting"))?;

        let local = now.with_timezone(&location.timezone).naive_local();
        let sun = ephemeris::sun_times_for(
            local.date(),
            location.latitude,
            location.longitude,
            location.timezone,
        )?;

        self.lighting_with_sun(zone_name, local, &sun)
    }

    /// Lighting values for a zone given caller-supplied sun times.
    ///
    /// This is the deterministic core entry point: hosts with their own
    /// almanac or an outdoor-light tracker populate [`SunTimes`] themselves
    /// (including `outdoor_normalized`) and pass local time directly.
    pub fn lighting_with_sun(
        &mut self,
        zone_name: &str,
        local_now: NaiveDateTime,
        sun: &SunTimes,
    ) -> Result<LightingValues> {
        let zone = self.registry.ensure_zone(zone_name);
        let weekday = weekday_index(local_now.date().weekday());
        let solar_hour = solar::solar_time(fractional_hour(&local_now), sun);

        let brightness =
            curve::brightness_at_hour(solar_hour, &zone.config, &zone.state, weekday);
        let kelvin =
            curve::color_temp_at_hour(solar_hour, &zone.config, &zone.state, true, sun, weekday);
        let rgb = color::kelvin_to_rgb(kelvin);
        let xy = color::kelvin_to_xy(kelvin);
        // The displayed hour is the frozen one when a freeze is active
        let shown_hour = zone.state.frozen_at.unwrap_or(solar_hour);

        Ok(LightingValues {
            kelvin: kelvin.round() as u32,
            brightness: (brightness.round() as u8).clamp(1, 100),
            rgb,
            xy,
            sun_position: solar::sun_position(shown_hour),
            solar_time: shown_hour,
        })
    }

    /// Perform one manual dimming step for a zone and record it as a
    /// midpoint override in the zone's state.
    pub fn step(
        &mut self,
        zone_name: &str,
        now: DateTime<Utc>,
        action: StepAction,
        max_steps: Option<u32>,
    ) -> Result<StepResult> {
        let zone = self.registry.ensure_zone(zone_name);
        let location = Location::from_config(&zone.config)
            .with_context(|| format!("Zone '{zone_name}' cannot compute dimming step"))?;

        let local = now.with_timezone(&location.timezone).naive_local();
        let sun = ephemeris::sun_times_for(
            local.date(),
            location.latitude,
            location.longitude,
            location.timezone,
        )?;

        let max_steps = max_steps.unwrap_or(DEFAULT_MAX_STEPS);
        let result =
            stepping::dimming_step(local, action, &zone.config, &zone.state, &sun, max_steps);

        // Shift both curves so the stepped values hold at the current hour:
        // moving a midpoint against the step's travel is equivalent to
        // evaluating at the hour the step landed on. Brightness and color
        // shift in lockstep, otherwise the preview and the next computed
        // lighting would disagree on color.
        let weekday = weekday_index(local.date().weekday());
        let hour = zone
            .state
            .frozen_at
            .unwrap_or_else(|| solar::solar_time(fractional_hour(&local), &sun));
        let travel = wrap24(result.target_hour - hour + 12.0) - 12.0;
        let (bri, _, _) = curve::brightness_segment(&zone.config, &zone.state, hour, weekday);
        let (cct, _, _) = curve::color_segment(&zone.config, &zone.state, hour, weekday);
        zone.state.brightness_mid = Some(wrap24(bri.midpoint - travel));
        zone.state.color_mid = Some(wrap24(cct.midpoint - travel));

        Ok(result)
    }
}
