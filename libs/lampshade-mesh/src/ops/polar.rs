//! # Polar Mapping
//!
//! Cartesian to polar conversion for planar pattern coordinates.

use glam::DVec2;

/// A planar point in polar form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    /// Distance from the origin
    pub radius: f64,
    /// Angle from +x in radians, in (-PI, PI]
    pub phi: f64,
}

/// Converts a planar `(x, y)` coordinate to polar form.
///
/// At the origin the angle carries no direction; callers that project must
/// not depend on it there. NaN inputs propagate.
///
/// # Example
///
/// ```rust
/// use lampshade_mesh::ops::polar::to_polar;
/// use glam::DVec2;
///
/// let polar = to_polar(DVec2::new(0.0, 2.0));
/// assert_eq!(polar.radius, 2.0);
/// assert!((polar.phi - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[inline]
pub fn to_polar(point: DVec2) -> Polar {
    Polar {
        radius: point.length(),
        phi: point.y.atan2(point.x),
    }
}
