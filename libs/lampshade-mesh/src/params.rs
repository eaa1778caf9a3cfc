//! # Lampshade Parameters
//!
//! The projection triple supplied once per lampshade, plus the build options
//! that tune the surrounding pipeline.

use crate::error::MeshError;
use config::constants::{
    HygieneConfig, DEFAULT_DISTANCE_TO_CENTER, DEFAULT_IMPORT_SCALE, DEFAULT_RADIUS,
    DEFAULT_THICKNESS,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Immutable projection parameters of one lampshade.
///
/// # Example
///
/// ```rust
/// use lampshade_mesh::LampshadeParams;
///
/// let params = LampshadeParams::new(5.0, 5.0, 0.08).unwrap();
/// assert_eq!(params.radius(), 5.0);
/// assert!(LampshadeParams::new(5.0, 5.0, 5.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams", into = "RawParams")]
pub struct LampshadeParams {
    distance_to_center: f64,
    radius: f64,
    thickness: f64,
}

/// Unvalidated wire form, so deserialization goes through [`LampshadeParams::new`].
#[derive(Serialize, Deserialize)]
struct RawParams {
    distance_to_center: f64,
    radius: f64,
    thickness: f64,
}

impl LampshadeParams {
    /// Validates and builds a parameter set.
    ///
    /// Requires `distance_to_center > 0`, `radius > 0` and
    /// `0 < thickness < radius`, all finite.
    pub fn new(distance_to_center: f64, radius: f64, thickness: f64) -> Result<Self, MeshError> {
        validate_distance(distance_to_center)?;
        validate_radius(radius)?;
        validate_thickness(thickness, radius)?;
        Ok(Self {
            distance_to_center,
            radius,
            thickness,
        })
    }

    /// Distance from the projection apex to the sphere center.
    #[inline]
    pub fn distance_to_center(&self) -> f64 {
        self.distance_to_center
    }

    /// Sphere radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Shell wall thickness.
    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Center of the projection sphere, on the z axis.
    #[inline]
    pub fn sphere_center(&self) -> DVec3 {
        DVec3::new(0.0, 0.0, self.distance_to_center)
    }

    /// Offset applied by the final recentering step.
    #[inline]
    pub fn recenter_offset(&self) -> DVec3 {
        DVec3::new(0.0, 0.0, self.radius - self.distance_to_center)
    }
}

impl Default for LampshadeParams {
    fn default() -> Self {
        Self {
            distance_to_center: DEFAULT_DISTANCE_TO_CENTER,
            radius: DEFAULT_RADIUS,
            thickness: DEFAULT_THICKNESS,
        }
    }
}

impl TryFrom<RawParams> for LampshadeParams {
    type Error = MeshError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        Self::new(raw.distance_to_center, raw.radius, raw.thickness)
    }
}

impl From<LampshadeParams> for RawParams {
    fn from(params: LampshadeParams) -> Self {
        Self {
            distance_to_center: params.distance_to_center,
            radius: params.radius,
            thickness: params.thickness,
        }
    }
}

pub(crate) fn validate_distance(distance_to_center: f64) -> Result<(), MeshError> {
    if distance_to_center.is_finite() && distance_to_center > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_parameter(
            "distance_to_center",
            distance_to_center,
            "must be positive and finite",
        ))
    }
}

pub(crate) fn validate_radius(radius: f64) -> Result<(), MeshError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_parameter("radius", radius, "must be positive and finite"))
    }
}

pub(crate) fn validate_thickness(thickness: f64, radius: f64) -> Result<(), MeshError> {
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(MeshError::invalid_parameter(
            "thickness",
            thickness,
            "must be positive and finite",
        ));
    }
    if thickness >= radius {
        return Err(MeshError::invalid_parameter(
            "thickness",
            thickness,
            format!("must be less than radius {radius}"),
        ));
    }
    Ok(())
}

/// How the Shell Builder derives the inner surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShellStrategy {
    /// Extrude along +z by the thickness, then scale by `1 - thickness / radius`
    /// about the sphere center.
    #[default]
    ExtrudeScale,
    /// Scale by `1 - thickness / radius` about the sphere center only, giving
    /// concentric caps exactly one thickness apart.
    Radial,
}

/// Pipeline tunables that are not part of the lampshade geometry itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Uniform x/y scale applied during normalization.
    pub import_scale: f64,
    /// Hygiene pass tunables.
    pub hygiene: HygieneConfig,
    /// Inner surface construction.
    pub shell_strategy: ShellStrategy,
    /// Accept patterns whose boundary has more than one loop (cut-outs).
    pub allow_holes: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            import_scale: DEFAULT_IMPORT_SCALE,
            hygiene: HygieneConfig::default(),
            shell_strategy: ShellStrategy::default(),
            allow_holes: false,
        }
    }
}

impl BuildOptions {
    pub(crate) fn validate(&self) -> Result<(), MeshError> {
        if self.import_scale.is_finite() && self.import_scale > 0.0 {
            Ok(())
        } else {
            Err(MeshError::invalid_parameter(
                "import_scale",
                self.import_scale,
                "must be positive and finite",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_params_are_valid() {
        let params = LampshadeParams::default();
        let rebuilt = LampshadeParams::new(
            params.distance_to_center(),
            params.radius(),
            params.thickness(),
        )
        .unwrap();
        assert_eq!(params, rebuilt);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        for (d, r, t) in [(0.0, 5.0, 0.1), (5.0, -1.0, 0.1), (5.0, 5.0, 0.0), (5.0, 5.0, -0.1)] {
            let err = LampshadeParams::new(d, r, t).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_rejects_thickness_at_or_above_radius() {
        assert!(LampshadeParams::new(5.0, 5.0, 5.0).is_err());
        assert!(LampshadeParams::new(5.0, 5.0, 6.0).is_err());
        assert!(LampshadeParams::new(5.0, 5.0, 4.99).is_ok());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(LampshadeParams::new(f64::NAN, 5.0, 0.1).is_err());
        assert!(LampshadeParams::new(5.0, f64::INFINITY, 0.1).is_err());
    }

    #[test]
    fn test_sphere_center_and_recenter_offset() {
        let params = LampshadeParams::new(7.0, 5.0, 0.1).unwrap();
        assert_eq!(params.sphere_center(), DVec3::new(0.0, 0.0, 7.0));
        assert_eq!(params.recenter_offset(), DVec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_deserialize_validates() {
        let params: LampshadeParams =
            serde_json::from_str(r#"{"distance_to_center":5.0,"radius":5.0,"thickness":0.08}"#).unwrap();
        assert_eq!(params.thickness(), 0.08);

        let invalid = serde_json::from_str::<LampshadeParams>(
            r#"{"distance_to_center":5.0,"radius":5.0,"thickness":5.0}"#,
        );
        assert!(invalid.is_err());
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let json = serde_json::to_string(&LampshadeParams::default()).unwrap();
        assert!(json.contains("distance_to_center"));
    }

    #[test]
    fn test_build_options_validate_scale() {
        let options = BuildOptions {
            import_scale: 0.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
        assert!(BuildOptions::default().validate().is_ok());
    }
}
