//! # Config Crate
//!
//! Centralized configuration constants for the stereographic lampshade
//! pipeline. All magic numbers and tunable parameters are defined here so the
//! geometry core never scatters literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_RADIUS, DEFAULT_THICKNESS, VERTEX_MERGE_EPSILON};
//!
//! // Thickness must stay strictly below the sphere radius
//! assert!(DEFAULT_THICKNESS < DEFAULT_RADIUS);
//!
//! // Merge tolerance is a distance in pattern units
//! let a = [0.0_f64, 0.0, 0.0];
//! let b = [0.00001_f64, 0.0, 0.0];
//! assert!((a[0] - b[0]).abs() < VERTEX_MERGE_EPSILON);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Host Compatible**: Defaults match the values the lampshade add-on ships with
//! - **Validated Runtime Config**: Tunables that can be overridden go through
//!   [`constants::HygieneConfig::new`]

pub mod constants;
