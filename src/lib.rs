//! # Rhythmr Library
//!
//! Circadian rhythm lighting curve engine for smart-home controllers.
//!
//! This library is a pure, deterministic computation core: given a point in
//! time, a configuration, and per-area runtime state, it produces the lighting
//! values (color temperature, brightness, RGB/XY) a light-command translator
//! needs, and resolves which wake/bed times and curve parameters apply at that
//! moment. It performs no networking, no device control, and no file I/O —
//! persistence and the smart-home platform are external collaborators.
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Entry Point**: `Engine` wires the pipeline and owns the zone registry
//! - **Solar**: `solar` module for solar-time normalization, sun position, and
//!   a default ephemeris provider backed by astronomical calculations
//! - **Curve**: `curve` module with the logistic brightness/color-temperature
//!   evaluator and the solar rule post-processor (warm night, daylight blend)
//! - **Color**: `color` module for Kelvin ↔ RGB ↔ XY conversions and
//!   perceptual brightness mapping
//! - **Stepping**: `stepping` module for manual brighten/dim step offsets
//! - **Schedule**: `schedule` module resolving alt-day timing and temporary
//!   wake/bed overrides with phase-boundary expiry
//! - **Configuration**: `config` module for TOML-based settings with
//!   centralized defaults and validation
//! - **State**: `state` module with per-area runtime state and the explicit
//!   zone registry context (no ambient globals)

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod color;
pub mod common;
pub mod config;
pub mod curve;
pub mod schedule;
pub mod solar;
pub mod state;
pub mod stepping;

mod engine;

// Re-export the primary entry points
pub use engine::{Engine, LightingValues, Location};
pub use state::{AreaState, ZoneRegistry};
