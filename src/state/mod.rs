//! Per-area runtime state and the explicit zone registry context.
//!
//! Everything mutable the engine needs lives here, owned by the caller and
//! passed by reference into each computation. There is no module-level
//! singleton: a host process creates one [`ZoneRegistry`], hands it to the
//! engine, and serializes concurrent writers per zone itself.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::RhythmConfig;

/// Mutable runtime state for one controlled area.
///
/// Stepping interactions and freeze commands land here; the curve evaluator
/// only reads it. Reset to defaults at phase transitions or on explicit
/// reset commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaState {
    /// Manual midpoint override for the brightness curve (hour). When set,
    /// it replaces the effective midpoint entirely, bypassing the
    /// brightness-target shift.
    pub brightness_mid: Option<f64>,
    /// Manual midpoint override for the color curve (hour).
    pub color_mid: Option<f64>,
    /// When set, all "now" calculations use this fixed hour instead of the
    /// wall clock, freezing the displayed output while periodic
    /// recomputation keeps running.
    pub frozen_at: Option<f64>,
}

impl AreaState {
    /// Freeze output at the given hour.
    pub fn freeze_at(&mut self, hour: f64) {
        self.frozen_at = Some(hour);
    }

    /// Resume live output.
    pub fn unfreeze(&mut self) {
        self.frozen_at = None;
    }

    /// Clear all overrides back to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether any manual adjustment is active.
    pub fn is_adjusted(&self) -> bool {
        self.brightness_mid.is_some() || self.color_mid.is_some() || self.frozen_at.is_some()
    }
}

/// One controlled zone: its rhythm configuration plus runtime state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub config: RhythmConfig,
    pub state: AreaState,
}

/// Persistence collaborator for zone configuration.
///
/// The engine never defines a storage format; it hands the full zone map to
/// the store when overrides are cleared or configuration mutates, and the
/// host decides where it goes. [`MemoryStore`] ships for tests and for hosts
/// that persist elsewhere.
pub trait ConfigStore {
    fn save(&mut self, zones: &BTreeMap<String, Zone>) -> Result<()>;
    fn load(&mut self) -> Result<Option<BTreeMap<String, Zone>>>;
}

/// In-memory [`ConfigStore`] keeping the last snapshot as JSON.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<String>,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `save` has been invoked. Lets tests assert the
    /// save-at-most-once-per-call contract of override expiry.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ConfigStore for MemoryStore {
    fn save(&mut self, zones: &BTreeMap<String, Zone>) -> Result<()> {
        self.snapshot = Some(serde_json::to_string(zones)?);
        self.save_count += 1;
        Ok(())
    }

    fn load(&mut self) -> Result<Option<BTreeMap<String, Zone>>> {
        match &self.snapshot {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }
}

/// Registry of all controlled zones.
///
/// This is the explicit context object a host's main controller owns. Zones
/// are created on first reference and removed only by their owner. The
/// schedule resolver's registry-level operations (`apply_schedule_override`,
/// `clear_expired_overrides`, `next_active_times`) are implemented in
/// [`crate::schedule`].
pub struct ZoneRegistry {
    zones: BTreeMap<String, Zone>,
    store: Option<Box<dyn ConfigStore>>,
}

impl std::fmt::Debug for ZoneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneRegistry")
            .field("zones", &self.zones)
            .field("store", &self.store.is_some())
            .finish()
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self {
            zones: BTreeMap::new(),
            store: None,
        }
    }

    /// Attach a persistence collaborator.
    pub fn with_store(store: Box<dyn ConfigStore>) -> Self {
        Self {
            zones: BTreeMap::new(),
            store: Some(store),
        }
    }

    /// Populate the registry from the attached store, if it has a snapshot.
    pub fn load_from_store(&mut self) -> Result<()> {
        if let Some(store) = self.store.as_mut()
            && let Some(zones) = store.load()?
        {
            log_info!("Restored {} zone(s) from the configuration store", zones.len());
            self.zones = zones;
        }
        Ok(())
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    pub fn zone_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.zones.get_mut(name)
    }

    /// Get the zone, creating it with a default configuration on first
    /// reference.
    pub fn ensure_zone(&mut self, name: &str) -> &mut Zone {
        self.zones.entry(name.to_string()).or_default()
    }

    pub fn insert_zone(&mut self, name: &str, config: RhythmConfig) {
        self.zones.insert(
            name.to_string(),
            Zone {
                config,
                state: AreaState::default(),
            },
        );
    }

    /// Remove a zone entirely. Only its owner calls this.
    pub fn remove_zone(&mut self, name: &str) -> Option<Zone> {
        self.zones.remove(name)
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    pub(crate) fn zones_mut(&mut self) -> &mut BTreeMap<String, Zone> {
        &mut self.zones
    }

    /// Reset every zone's runtime adjustments, as done at phase transitions.
    pub fn reset_area_states(&mut self) {
        for zone in self.zones.values_mut() {
            zone.state.reset();
        }
    }

    /// Persist the current zone map through the attached store, if any.
    pub(crate) fn persist(&mut self) -> Result<()> {
        if let Some(store) = self.store.as_mut() {
            store.save(&self.zones)?;
        }
        Ok(())
    }
}
