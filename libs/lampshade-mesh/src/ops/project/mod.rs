//! # Inverse Stereographic Projection
//!
//! Lifts a flat pattern onto a spherical cap.
//!
//! ## Geometry
//!
//! The pattern lies in the plane tangent to the sphere's south pole. A planar
//! radius `r` subtends the half-angle `theta = atan(r / (d + R))` at the
//! projection apex, and the lifted point sits at polar angle `alpha = 2 theta`
//! on the sphere of radius `R` centered at `(0, 0, d)`:
//!
//! ```text
//! x' = R sin(alpha) cos(phi)
//! y' = R sin(alpha) sin(phi)
//! z' = d - R cos(alpha)
//! ```
//!
//! `alpha` grows monotonically with `r` and tends to PI as `r` goes to
//! infinity, so the pattern's rim wraps toward the far pole.
//!
//! The mesh-level entry points never mutate positions while iterating: a new
//! position buffer is computed (in parallel with rayon) and swapped in after.


use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::ops::polar::to_polar;
use crate::params::LampshadeParams;
use config::constants::PROJECTION_MIN_CHUNK;
use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Projects one planar vertex onto the sphere. The input's z is ignored.
///
/// Total over finite floats; the pattern center maps to `(0, 0, d - R)`
/// whatever its angle.
///
/// # Example
///
/// ```rust
/// use lampshade_mesh::ops::project::project_point;
/// use glam::DVec3;
///
/// let pole = project_point(DVec3::ZERO, 5.0, 5.0);
/// assert_eq!(pole, DVec3::new(0.0, 0.0, 0.0));
/// ```
#[inline]
pub fn project_point(point: DVec3, distance_to_center: f64, radius: f64) -> DVec3 {
    let polar = to_polar(point.truncate());
    if polar.radius == 0.0 {
        return DVec3::new(0.0, 0.0, distance_to_center - radius);
    }

    let theta = (polar.radius / (distance_to_center + radius)).atan();
    let alpha = 2.0 * theta;
    let (sin_alpha, cos_alpha) = alpha.sin_cos();
    let (sin_phi, cos_phi) = polar.phi.sin_cos();

    DVec3::new(
        radius * sin_alpha * cos_phi,
        radius * sin_alpha * sin_phi,
        distance_to_center - radius * cos_alpha,
    )
}

/// Projects a whole position buffer, returning a new one.
pub fn project_positions(positions: &[DVec3], params: &LampshadeParams) -> Vec<DVec3> {
    let distance = params.distance_to_center();
    let radius = params.radius();
    positions
        .par_iter()
        .with_min_len(PROJECTION_MIN_CHUNK)
        .map(|&p| project_point(p, distance, radius))
        .collect()
}

/// Fails with `NumericAnomaly` on the first non-finite position.
pub fn ensure_finite(positions: &[DVec3]) -> Result<(), MeshError> {
    match positions.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(MeshError::numeric(format!(
            "projected vertex {index} is not finite: {:?}",
            positions[index]
        ))),
        None => Ok(()),
    }
}

/// Projects every vertex of a mesh, keeping its topology.
///
/// # Example
///
/// ```rust
/// use lampshade_mesh::{LampshadeParams, Mesh};
/// use lampshade_mesh::ops::project::project_mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// let params = LampshadeParams::default();
/// let lifted = project_mesh(&mesh, &params).unwrap();
/// let center = params.sphere_center();
/// assert!(((lifted.vertex(0) - center).length() - params.radius()).abs() < 1e-9);
/// ```
#[instrument(skip(mesh), fields(vertices = mesh.vertex_count()))]
pub fn project_mesh(mesh: &Mesh, params: &LampshadeParams) -> Result<Mesh, MeshError> {
    let positions = project_positions(mesh.vertices(), params);
    ensure_finite(&positions)?;
    debug!(count = positions.len(), "projected vertices onto sphere");
    Ok(Mesh::from_parts(positions, mesh.faces().to_vec()))
}
