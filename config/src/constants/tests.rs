//! Tests for the centralized configuration constants.

use super::*;

#[test]
fn test_vertex_merge_epsilon_larger_than_epsilon() {
    assert!(
        VERTEX_MERGE_EPSILON >= EPSILON,
        "VERTEX_MERGE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_default_projection_is_valid() {
    assert!(DEFAULT_DISTANCE_TO_CENTER > 0.0);
    assert!(DEFAULT_RADIUS > 0.0);
    assert!(DEFAULT_THICKNESS > 0.0);
    assert!(DEFAULT_THICKNESS < DEFAULT_RADIUS);
}

#[test]
fn test_sliver_limit_accepts_equilateral_triangle() {
    // longest² / (2 * area) for a unit equilateral triangle
    let aspect = 1.0 / (2.0 * (3.0_f64.sqrt() / 4.0));
    assert!(aspect < SLIVER_ASPECT_LIMIT);
}

/// Ensures default hygiene tunables are sane.
///
/// # Examples
/// ```
/// use config::constants::HygieneConfig;
/// let cfg = HygieneConfig::default();
/// assert!(cfg.max_passes > 0);
/// ```
#[test]
fn default_hygiene_config_is_valid() {
    let cfg = HygieneConfig::default();
    assert_eq!(cfg.merge_tolerance, VERTEX_MERGE_EPSILON);
    assert_eq!(cfg.sliver_aspect, SLIVER_ASPECT_LIMIT);
    assert_eq!(cfg.max_passes, MAX_REGULARIZE_PASSES);
}

/// Validates the builder rejects invalid values.
#[test]
fn new_validates_inputs() {
    assert_eq!(
        HygieneConfig::new(0.0, 4.0, 8).unwrap_err(),
        ConfigError::InvalidTolerance(0.0)
    );
    assert_eq!(
        HygieneConfig::new(1.0e-4, 0.5, 8).unwrap_err(),
        ConfigError::InvalidAspect(0.5)
    );
    assert_eq!(
        HygieneConfig::new(1.0e-4, 4.0, 0).unwrap_err(),
        ConfigError::InvalidPasses(0)
    );
    assert!(HygieneConfig::new(f64::NAN, 4.0, 8).is_err());
}

#[test]
fn config_error_messages_name_the_field() {
    let err = ConfigError::InvalidAspect(0.5);
    assert!(err.to_string().contains("sliver_aspect"));
}
