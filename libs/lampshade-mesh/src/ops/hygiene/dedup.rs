//! Coincident vertex merging.
//!
//! Vertices are bucketed on a grid with cell size equal to the tolerance, so
//! every candidate within range sits in one of the 27 surrounding cells. The
//! first vertex seen in a neighbourhood becomes its representative, which
//! keeps representatives more than one tolerance apart and makes a second
//! run a no-op.

use crate::error::MeshError;
use crate::mesh::{Face, Mesh};
use glam::DVec3;
use std::collections::HashMap;
use tracing::debug;

type Cell = (i64, i64, i64);

fn cell_of(point: DVec3, inv_tolerance: f64) -> Cell {
    let scaled = (point * inv_tolerance).floor();
    (scaled.x as i64, scaled.y as i64, scaled.z as i64)
}

/// Merges vertices closer than `tolerance` and remaps face indices.
///
/// Faces left with fewer than three distinct vertices are removed. Returns
/// the number of vertices merged away.
pub fn merge_coincident_vertices(mesh: &mut Mesh, tolerance: f64) -> Result<usize, MeshError> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(MeshError::invalid_parameter(
            "merge_tolerance",
            tolerance,
            "must be positive and finite",
        ));
    }
    if let Some(index) = mesh.vertices().iter().position(|v| !v.is_finite()) {
        return Err(MeshError::numeric(format!(
            "vertex {index} is not finite: {:?}",
            mesh.vertex(index as u32)
        )));
    }

    let inv_tolerance = 1.0 / tolerance;
    let tolerance_sq = tolerance * tolerance;
    let mut grid: HashMap<Cell, Vec<u32>> = HashMap::new();
    let mut kept: Vec<DVec3> = Vec::with_capacity(mesh.vertex_count());
    let mut remap: Vec<u32> = Vec::with_capacity(mesh.vertex_count());

    for &position in mesh.vertices() {
        let (cx, cy, cz) = cell_of(position, inv_tolerance);
        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &candidate in bucket {
                        if kept[candidate as usize].distance_squared(position) <= tolerance_sq {
                            found = Some(candidate);
                            break 'search;
                        }
                    }
                }
            }
        }

        let target = match found {
            Some(candidate) => candidate,
            None => {
                let index = kept.len() as u32;
                kept.push(position);
                grid.entry((cx, cy, cz)).or_default().push(index);
                index
            }
        };
        remap.push(target);
    }

    let merged = mesh.vertex_count() - kept.len();
    if merged == 0 {
        return Ok(0);
    }

    let faces: Vec<Face> = mesh
        .faces()
        .iter()
        .filter_map(|face| collapse_face(face, &remap))
        .collect();
    let dropped = mesh.face_count() - faces.len();

    *mesh = Mesh::from_parts(kept, faces);
    debug!(merged, dropped_faces = dropped, "merged coincident vertices");
    Ok(merged)
}

/// Remaps a face, removing repeated neighbours. `None` if it degenerates.
fn collapse_face(face: &[u32], remap: &[u32]) -> Option<Face> {
    let mut out: Face = Vec::with_capacity(face.len());
    for &index in face {
        let mapped = remap[index as usize];
        if out.last() != Some(&mapped) {
            out.push(mapped);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    if out.len() < 3 {
        return None;
    }
    // A vertex revisited further along pinches the polygon
    for (i, index) in out.iter().enumerate() {
        if out[i + 1..].contains(index) {
            return None;
        }
    }
    Some(out)
}

/// Drops vertices no face references. Returns how many were removed.
pub fn remove_isolated_vertices(mesh: &mut Mesh) -> usize {
    let mut used = vec![false; mesh.vertex_count()];
    for face in mesh.faces() {
        for &index in face {
            used[index as usize] = true;
        }
    }

    let mut remap = vec![0u32; mesh.vertex_count()];
    let mut kept = Vec::with_capacity(mesh.vertex_count());
    for (old, &is_used) in used.iter().enumerate() {
        if is_used {
            remap[old] = kept.len() as u32;
            kept.push(mesh.vertex(old as u32));
        }
    }

    let removed = mesh.vertex_count() - kept.len();
    if removed == 0 {
        return 0;
    }

    let faces: Vec<Face> = mesh
        .faces()
        .iter()
        .map(|face| face.iter().map(|&i| remap[i as usize]).collect())
        .collect();
    *mesh = Mesh::from_parts(kept, faces);
    debug!(removed, "removed isolated vertices");
    removed
}
