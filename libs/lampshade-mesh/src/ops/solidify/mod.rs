//! # Shell Builder
//!
//! Thickens an open surface into a closed solid.
//!
//! ## Algorithm Overview
//!
//! 1. Duplicate every vertex and move the copy by a fixed offset (`+z` by the
//!    thickness for [`ShellStrategy::ExtrudeScale`], no offset for
//!    [`ShellStrategy::Radial`]).
//! 2. Add the copy of every face with reversed winding.
//! 3. Stitch one quad per boundary edge between the surface and its copy.
//! 4. Scale the copy by `1 - thickness / radius` about the sphere center.
//!
//! The result has no open edges as long as the input boundary decomposes into
//! closed loops. With `ExtrudeScale` the wall is only approximately uniform:
//! the z offset adds to the radial shrink near the pole and slides
//! tangentially near the equator.

#[cfg(test)]
mod tests;

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::params::{validate_radius, validate_thickness, ShellStrategy};
use crate::topology::boundary_loops;
use glam::DVec3;
use std::ops::Range;
use tracing::{debug, instrument};

/// Vertices created by an extrusion, by index range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    range: Range<u32>,
}

impl Selection {
    /// Selects the vertex indices in `range`.
    pub fn new(range: Range<u32>) -> Self {
        Self { range }
    }

    /// Selected vertex indices.
    pub fn indices(&self) -> Range<u32> {
        self.range.clone()
    }

    /// Number of selected vertices.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Extrudes the whole surface by `offset` and welds the side walls.
///
/// The original faces stay in place; the duplicate faces wind the opposite
/// way so the two sheets face away from each other. Returns the selection of
/// duplicated vertices.
pub fn extrude_region(mesh: &mut Mesh, offset: DVec3) -> Result<Selection, MeshError> {
    if mesh.face_count() == 0 {
        return Err(MeshError::degenerate("cannot extrude a mesh without faces"));
    }
    let loops = boundary_loops(mesh)?;
    if loops.is_empty() {
        return Err(MeshError::degenerate(
            "surface is already closed, nothing to extrude",
        ));
    }

    let n = mesh.vertex_count() as u32;
    let face_count = mesh.face_count();

    let copies: Vec<DVec3> = mesh.vertices().iter().map(|&v| v + offset).collect();
    mesh.vertices_mut().extend(copies);

    let faces = mesh.faces_mut();
    for i in 0..face_count {
        let copy: Vec<u32> = faces[i].iter().rev().map(|&v| v + n).collect();
        faces.push(copy);
    }

    // Boundary edge a -> b of the surface gets the wall b -> a -> a' -> b'
    let mut walls = 0usize;
    for boundary in &loops {
        let len = boundary.len();
        for i in 0..len {
            let a = boundary[i];
            let b = boundary[(i + 1) % len];
            faces.push(vec![b, a, a + n, b + n]);
            walls += 1;
        }
    }

    debug!(loops = loops.len(), walls, "extruded region");
    Ok(Selection::new(n..2 * n))
}

/// Scales the selected vertices by `factor` about `center`.
pub fn scale_selection(mesh: &mut Mesh, selection: &Selection, factor: f64, center: DVec3) {
    let vertices = mesh.vertices_mut();
    for index in selection.indices() {
        let v = &mut vertices[index as usize];
        *v = center + (*v - center) * factor;
    }
}

/// Builds a closed shell of the given wall thickness around an open surface.
///
/// # Arguments
///
/// * `mesh` - Open surface, typically the projected pattern
/// * `thickness` - Wall thickness, `0 < thickness < radius`
/// * `radius` - Sphere radius the surface was projected onto
/// * `center` - Sphere center the inner copy is scaled about
/// * `strategy` - How the inner surface is derived
///
/// # Example
///
/// ```rust
/// use lampshade_mesh::{Mesh, ShellStrategy};
/// use lampshade_mesh::ops::solidify::solidify;
/// use lampshade_mesh::topology::is_closed;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_face(&[0, 1, 2]).unwrap();
///
/// let shell = solidify(&mesh, 0.1, 5.0, DVec3::new(0.0, 0.0, 5.0), ShellStrategy::Radial).unwrap();
/// assert_eq!(shell.vertex_count(), 6);
/// assert!(is_closed(&shell));
/// ```
#[instrument(skip(mesh), fields(vertices = mesh.vertex_count(), faces = mesh.face_count()))]
pub fn solidify(
    mesh: &Mesh,
    thickness: f64,
    radius: f64,
    center: DVec3,
    strategy: ShellStrategy,
) -> Result<Mesh, MeshError> {
    validate_radius(radius)?;
    validate_thickness(thickness, radius)?;

    let mut shell = mesh.clone();
    let offset = match strategy {
        ShellStrategy::ExtrudeScale => DVec3::Z * thickness,
        ShellStrategy::Radial => DVec3::ZERO,
    };
    let selection = extrude_region(&mut shell, offset)?;
    scale_selection(&mut shell, &selection, shrink_factor(thickness, radius), center);

    debug!(
        vertices = shell.vertex_count(),
        faces = shell.face_count(),
        "built shell"
    );
    Ok(shell)
}

/// Scale that moves a point on the sphere inward by `thickness`.
#[inline]
pub fn shrink_factor(thickness: f64, radius: f64) -> f64 {
    1.0 - thickness / radius
}
