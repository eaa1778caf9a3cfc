//! Centralized configuration values shared across the lampshade pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Examples
/// ```
/// use config::constants::EPSILON;
/// assert!(EPSILON < 1.0e-6);
/// ```
pub const EPSILON: f64 = 1.0e-10;

/// Distance below which two vertices are considered coincident and merged.
///
/// Matches the default merge distance of the host's "remove doubles" operator,
/// which is what closes up curve-tessellation seams after import.
///
/// # Examples
/// ```
/// use config::constants::{EPSILON, VERTEX_MERGE_EPSILON};
/// assert!(VERTEX_MERGE_EPSILON > EPSILON);
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1.0e-4;

// =============================================================================
// PROJECTION DEFAULTS
// =============================================================================

/// Default distance from the projection apex to the sphere center.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_DISTANCE_TO_CENTER;
/// assert!(DEFAULT_DISTANCE_TO_CENTER > 0.0);
/// ```
pub const DEFAULT_DISTANCE_TO_CENTER: f64 = 5.0;

/// Default sphere radius of the lampshade.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RADIUS;
/// assert_eq!(DEFAULT_RADIUS, 5.0);
/// ```
pub const DEFAULT_RADIUS: f64 = 5.0;

/// Default wall thickness of the printed shell.
///
/// # Examples
/// ```
/// use config::constants::{DEFAULT_RADIUS, DEFAULT_THICKNESS};
/// assert!(DEFAULT_THICKNESS < DEFAULT_RADIUS);
/// ```
pub const DEFAULT_THICKNESS: f64 = 0.05;

/// Uniform x/y scale applied to a freshly imported pattern.
///
/// Imported vector drawings arrive very small; z is never scaled because the
/// pattern is flat.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_IMPORT_SCALE;
/// assert_eq!(DEFAULT_IMPORT_SCALE, 100.0);
/// ```
pub const DEFAULT_IMPORT_SCALE: f64 = 100.0;

// =============================================================================
// HYGIENE CONSTANTS
// =============================================================================

/// Aspect ratio (longest edge squared over twice the area) above which a face
/// counts as a sliver.
///
/// An equilateral triangle scores about 1.15 and a square 0.5.
///
/// # Examples
/// ```
/// use config::constants::SLIVER_ASPECT_LIMIT;
/// assert!(SLIVER_ASPECT_LIMIT > 2.0 / 3.0_f64.sqrt());
/// ```
pub const SLIVER_ASPECT_LIMIT: f64 = 8.0;

/// Maximum number of sweeps the diagonal-flip regularizer performs.
///
/// # Examples
/// ```
/// use config::constants::MAX_REGULARIZE_PASSES;
/// assert!(MAX_REGULARIZE_PASSES >= 1);
/// ```
pub const MAX_REGULARIZE_PASSES: u32 = 16;

// =============================================================================
// PARALLELISM
// =============================================================================

/// Minimum number of vertices a rayon task projects in one go.
///
/// # Examples
/// ```
/// use config::constants::PROJECTION_MIN_CHUNK;
/// assert!(PROJECTION_MIN_CHUNK >= 1);
/// ```
pub const PROJECTION_MIN_CHUNK: usize = 1024;

/// Tunables for the mesh hygiene passes.
///
/// # Examples
/// ```
/// use config::constants::HygieneConfig;
/// let config = HygieneConfig::default();
/// assert!(config.merge_tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HygieneConfig {
    /// Distance under which vertices are merged.
    pub merge_tolerance: f64,
    /// Aspect ratio above which a face is treated as a sliver.
    pub sliver_aspect: f64,
    /// Upper bound on regularization sweeps.
    pub max_passes: u32,
}

impl HygieneConfig {
    /// Builds a configuration enforcing strict validation of every tunable.
    ///
    /// # Examples
    /// ```
    /// use config::constants::HygieneConfig;
    /// let cfg = HygieneConfig::new(1.0e-3, 4.0, 8).expect("valid config");
    /// assert_eq!(cfg.max_passes, 8);
    /// ```
    pub fn new(merge_tolerance: f64, sliver_aspect: f64, max_passes: u32) -> Result<Self, ConfigError> {
        if merge_tolerance <= 0.0 || !merge_tolerance.is_finite() {
            return Err(ConfigError::InvalidTolerance(merge_tolerance));
        }
        if sliver_aspect < 1.0 || !sliver_aspect.is_finite() {
            return Err(ConfigError::InvalidAspect(sliver_aspect));
        }
        if max_passes == 0 {
            return Err(ConfigError::InvalidPasses(max_passes));
        }
        Ok(Self {
            merge_tolerance,
            sliver_aspect,
            max_passes,
        })
    }
}

impl Default for HygieneConfig {
    fn default() -> Self {
        Self {
            merge_tolerance: VERTEX_MERGE_EPSILON,
            sliver_aspect: SLIVER_ASPECT_LIMIT,
            max_passes: MAX_REGULARIZE_PASSES,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the merge tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the sliver aspect limit is below 1 or not finite.
    InvalidAspect(f64),
    /// Raised when no regularization pass is allowed.
    InvalidPasses(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "merge_tolerance must be positive: {value}")
            }
            ConfigError::InvalidAspect(value) => {
                write!(f, "sliver_aspect must be >= 1: {value}")
            }
            ConfigError::InvalidPasses(value) => {
                write!(f, "max_passes must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
