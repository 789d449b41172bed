//! Schedule resolution: alternate-day timing and temporary overrides.
//!
//! Each zone has primary wake/bed times plus optional alternate times bound
//! to weekday sets (e.g. later wake on weekends). A temporary
//! [`ScheduleOverride`] can force the primary schedule, promote the
//! alternate schedule, or substitute custom times, and expires automatically
//! at the first matching phase boundary (wake or bed) on or after its date.
//!
//! Weekdays are 0 = Monday through 6 = Sunday throughout, matching the
//! configuration format.
//!
//! Override application is a pure function returning a new configuration
//! (`ScheduleOverride::apply`); the registry-level operations assign the
//! result back explicitly, so nothing patches a shared structure in place
//! behind the caller's back.

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::RhythmConfig;
use crate::curve::Phase;
use crate::state::ZoneRegistry;

/// Three-letter weekday names indexed 0 = Monday.
const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Index of a chrono weekday with 0 = Monday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

/// Three-letter name for a 0 = Monday weekday index.
pub fn weekday_name(weekday: u8) -> &'static str {
    DAY_NAMES[(weekday % 7) as usize]
}

/// Fractional hour-of-day of a naive timestamp.
pub fn fractional_hour(dt: &NaiveDateTime) -> f64 {
    dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0
}

/// What an override does while active.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverrideMode {
    /// Suppress the alternate schedule; primary times apply every day.
    Main,
    /// Promote the alternate times into the primary slots; they apply every
    /// day until expiry.
    Alt,
    /// Substitute explicit custom wake/bed times.
    Custom,
}

/// Which phase boundary clears an override.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverrideEvent {
    Wake,
    Bed,
}

impl OverrideEvent {
    /// The phase whose start marks this boundary.
    pub fn phase(self) -> Phase {
        match self {
            OverrideEvent::Wake => Phase::Ascend,
            OverrideEvent::Bed => Phase::Descend,
        }
    }
}

/// Temporary wake/bed schedule override for one zone.
///
/// Set by user action; cleared automatically when the phase transition
/// matching `until_event` occurs on or after `until_date`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScheduleOverride {
    pub mode: OverrideMode,
    /// Wake hour, used only when `mode` is `custom`.
    pub custom_wake: Option<f64>,
    /// Bed hour, used only when `mode` is `custom`.
    pub custom_bed: Option<f64>,
    /// Calendar date on or after which the matching boundary clears this
    /// override.
    pub until_date: NaiveDate,
    pub until_event: OverrideEvent,
}

impl ScheduleOverride {
    pub fn validate(&self) -> Result<()> {
        if self.mode == OverrideMode::Custom {
            if self.custom_wake.is_none() || self.custom_bed.is_none() {
                anyhow::bail!("custom schedule override requires both custom_wake and custom_bed");
            }
            for (name, hour) in [
                ("custom_wake", self.custom_wake),
                ("custom_bed", self.custom_bed),
            ] {
                if let Some(hour) = hour
                    && !(0.0..24.0).contains(&hour)
                {
                    anyhow::bail!("{} ({}) must be an hour of day in [0, 24)", name, hour);
                }
            }
        }
        Ok(())
    }

    /// Apply this override to a configuration, returning the effective one.
    ///
    /// Pure: the input is untouched, and the returned configuration still
    /// carries the override so expiry bookkeeping keeps working.
    pub fn apply(&self, config: &RhythmConfig) -> RhythmConfig {
        let mut effective = config.clone();
        match self.mode {
            OverrideMode::Main => {
                // Alt schedule suppressed; primary times always used
                effective.wake_alt_time = None;
                effective.bed_alt_time = None;
            }
            OverrideMode::Alt => {
                // Promote alt times into the primary slots, then clear alt
                // fields so they apply regardless of day
                if let Some(alt) = effective.wake_alt_time.take() {
                    effective.wake_time = Some(alt);
                }
                if let Some(alt) = effective.bed_alt_time.take() {
                    effective.bed_time = Some(alt);
                }
            }
            OverrideMode::Custom => {
                if let Some(wake) = self.custom_wake {
                    effective.wake_time = Some(wake);
                }
                if let Some(bed) = self.custom_bed {
                    effective.bed_time = Some(bed);
                }
                effective.wake_alt_time = None;
                effective.bed_alt_time = None;
            }
        }
        effective
    }

    /// Whether this override has already been cleared by a matching phase
    /// boundary, judged at `today`/`now_hour`.
    ///
    /// The boundary hour is resolved from the base configuration; an
    /// override never moves its own expiry boundary.
    fn is_expired(&self, config: &RhythmConfig, today: NaiveDate, now_hour: f64) -> bool {
        if today < self.until_date {
            return false;
        }
        if today > self.until_date {
            // A matching boundary has occurred on some day since until_date
            return true;
        }
        let weekday = weekday_index(today.weekday());
        let (wake, bed) = effective_timing(config, now_hour, weekday);
        let boundary = match self.until_event {
            OverrideEvent::Wake => wake,
            OverrideEvent::Bed => bed,
        };
        now_hour >= boundary
    }
}

/// Resolve the effective wake and bed hours for a moment in time.
///
/// Alternate times apply only on their configured weekdays. Before
/// `ascend_start` the night still belongs to yesterday from a scheduling
/// perspective, so the bed lookup uses yesterday's weekday.
pub fn effective_timing(config: &RhythmConfig, hour: f64, weekday: u8) -> (f64, f64) {
    let wake = match config.wake_alt_time {
        Some(alt) if config.is_wake_alt_day(weekday % 7) => alt,
        _ => config.wake_time(),
    };

    let bed_weekday = if hour < config.ascend_start() {
        (weekday + 6) % 7
    } else {
        weekday % 7
    };
    let bed = match config.bed_alt_time {
        Some(alt) if config.is_bed_alt_day(bed_weekday) => alt,
        _ => config.bed_time(),
    };

    (wake, bed)
}

/// The next upcoming wake and bed events for a zone.
///
/// Day offsets are relative to the query date (0 = today, 1 = tomorrow).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextActiveTimes {
    pub wake_day: u8,
    pub wake_day_name: &'static str,
    pub wake_time: f64,
    pub bed_day: u8,
    pub bed_day_name: &'static str,
    pub bed_time: f64,
}

// Registry-level schedule operations. The registry itself lives in
// `crate::state`; these impls keep all override semantics in one module.
impl ZoneRegistry {
    /// Apply a zone's stored override to its configuration.
    ///
    /// No-op when the zone is unknown or carries no override. The stored
    /// configuration is replaced by the pure resolution result.
    pub fn apply_schedule_override(&mut self, zone_name: &str) {
        let Some(zone) = self.zone_mut(zone_name) else {
            return;
        };
        let Some(ov) = zone.config.schedule_override.clone() else {
            return;
        };
        log_block_start!("Applying schedule override for zone '{zone_name}'");
        log_indented!("mode: {:?}, until {} ({:?})", ov.mode, ov.until_date, ov.until_event);
        zone.config = ov.apply(&zone.config);
    }

    /// Clear overrides whose expiry boundary matches the phase transition
    /// that just occurred.
    ///
    /// `phase` is the phase being entered: entering ascend is the wake
    /// boundary, entering descend the bed boundary. Only overrides whose
    /// `until_date` is on or before `today` are cleared. The store is saved
    /// at most once, and only when something was cleared. Returns the number
    /// of cleared overrides.
    pub fn clear_expired_overrides(&mut self, phase: Phase, today: NaiveDate) -> Result<usize> {
        let mut cleared = 0;
        for (name, zone) in self.zones_mut().iter_mut() {
            let Some(ov) = &zone.config.schedule_override else {
                continue;
            };
            if ov.until_event.phase() == phase && ov.until_date <= today {
                log_decorated!("Schedule override expired for zone '{name}'");
                zone.config.schedule_override = None;
                cleared += 1;
            }
        }
        if cleared > 0 {
            self.persist()?;
        }
        Ok(cleared)
    }

    /// Next upcoming wake and bed events for a zone, or `None` for an
    /// unknown zone.
    ///
    /// Applies the zone's override for each future event only while it is
    /// still unexpired relative to that event, and resolves alt-day rules
    /// with the weekday of the occurrence itself.
    pub fn next_active_times(&self, zone_name: &str, now: NaiveDateTime) -> Option<NextActiveTimes> {
        let zone = self.zone(zone_name)?;
        let config = &zone.config;
        let today = now.date();
        let now_hour = fractional_hour(&now);

        let effective = match &config.schedule_override {
            Some(ov) if !ov.is_expired(config, today, now_hour) => ov.apply(config),
            _ => config.clone(),
        };

        let next_event = |pick_wake: bool| -> (u8, &'static str, f64) {
            for offset in 0u8..=1 {
                let date = today + chrono::Duration::days(offset as i64);
                let weekday = weekday_index(date.weekday());
                // Evaluate at a daytime hour so the bed lookup uses the
                // occurrence's own weekday, not the post-midnight rule
                let (wake, bed) = effective_timing(&effective, 12.0, weekday);
                let event_hour = if pick_wake { wake } else { bed };
                if offset == 0 && event_hour <= now_hour {
                    continue;
                }
                return (offset, weekday_name(weekday), event_hour);
            }
            // Today's event has passed, so tomorrow's is unconditional;
            // unreachable, but keep the structure total
            let weekday = weekday_index((today + chrono::Duration::days(1)).weekday());
            let (wake, bed) = effective_timing(&effective, 12.0, weekday);
            (1, weekday_name(weekday), if pick_wake { wake } else { bed })
        };

        let (wake_day, wake_day_name, wake_time) = next_event(true);
        let (bed_day, bed_day_name, bed_time) = next_event(false);

        Some(NextActiveTimes {
            wake_day,
            wake_day_name,
            wake_time,
            bed_day,
            bed_day_name,
            bed_time,
        })
    }
}
