//! Default solar ephemeris provider.
//!
//! Computes a [`SunTimes`] record for a date and location using astronomical
//! sunrise/sunset calculations, converted into the location's timezone.
//! Solar noon is taken as the midpoint of the daylight arc and solar midnight
//! as its opposite, which is accurate to within a couple of minutes and more
//! than sufficient for curve alignment.
//!
//! Callers with their own almanac (or a smart-home platform that already
//! publishes sun events) can skip this module and construct [`SunTimes`]
//! directly.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use chrono_tz::Tz;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::SunTimes;
use crate::common::utils::{forward_hours, wrap24};

/// Fractional hour-of-day of a timezone-aware timestamp.
fn fractional_hour<T: TimeZone>(dt: &DateTime<T>) -> f64 {
    dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0
}

/// Compute [`SunTimes`] for `date` at the given coordinates, expressed in
/// `tz`'s local clock.
///
/// Fails only on invalid coordinates; polar day/night still yields the
/// crossing times the underlying algorithm reports, which keeps the curve
/// engine defined year-round at extreme latitudes.
pub fn sun_times_for(date: NaiveDate, latitude: f64, longitude: f64, tz: Tz) -> Result<SunTimes> {
    let coord = Coordinates::new(latitude, longitude).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid coordinates: lat={:.4}, lon={:.4}",
            latitude,
            longitude
        )
    })?;

    let solar_day = SolarDay::new(coord, date);
    let sunrise_utc = solar_day.event_time(SolarEvent::Sunrise);
    let sunset_utc = solar_day.event_time(SolarEvent::Sunset);

    let sunrise = fractional_hour(&sunrise_utc.with_timezone(&tz));
    let sunset = fractional_hour(&sunset_utc.with_timezone(&tz));

    // Midpoint of the forward daylight arc; handles sunset-past-midnight
    let solar_noon = wrap24(sunrise + forward_hours(sunrise, sunset) / 2.0);
    let solar_mid = wrap24(solar_noon + 12.0);

    Ok(SunTimes {
        sunrise,
        sunset,
        solar_noon: Some(solar_noon),
        solar_mid: Some(solar_mid),
        outdoor_normalized: None,
    })
}
