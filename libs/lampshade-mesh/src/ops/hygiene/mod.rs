//! # Mesh Hygiene
//!
//! Clean-up passes the projection and shelling steps rely on:
//! - **dedup**: merge coincident vertices and drop faces that collapse
//! - **regularize**: split sliver polygons and flip diagonals of thin triangles
//! - **orient**: make face winding consistent and outward
//!
//! Every pass is idempotent and works over the whole mesh.

mod dedup;
mod orient;
mod regularize;


pub use dedup::{merge_coincident_vertices, remove_isolated_vertices};
pub use orient::unify_normals;
pub use regularize::{aspect_ratio, regularize_faces};

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::HygieneConfig;
use tracing::debug;

/// What a full pattern clean-up changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HygieneReport {
    /// Vertices merged into a coincident neighbour
    pub merged_vertices: usize,
    /// Unreferenced vertices dropped
    pub isolated_vertices: usize,
    /// Slivers split plus diagonals flipped
    pub regularized: usize,
}

/// Runs deduplication, isolated-vertex removal and regularization in order.
pub fn clean_pattern(mesh: &mut Mesh, config: &HygieneConfig) -> Result<HygieneReport, MeshError> {
    let merged_vertices = merge_coincident_vertices(mesh, config.merge_tolerance)?;
    let isolated_vertices = remove_isolated_vertices(mesh);
    let regularized = regularize_faces(mesh, config);
    let report = HygieneReport {
        merged_vertices,
        isolated_vertices,
        regularized,
    };
    debug!(?report, "cleaned pattern");
    Ok(report)
}
