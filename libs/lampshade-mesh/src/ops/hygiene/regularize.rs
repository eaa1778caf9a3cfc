//! Sliver regularization.
//!
//! Face quality is measured as `longest_edge² / (2 * area)`, the worst ratio
//! of an edge length to its opposite altitude for a triangle. Polygons above
//! the sliver limit are ear-clipped, then shared diagonals of triangle pairs
//! are flipped while that lowers the worse of the two ratios. Boundary edges
//! are never touched.

use crate::mesh::{Face, Mesh};
use crate::topology::{edge_key, edge_uses, EdgeKey};
use config::constants::{HygieneConfig, EPSILON};
use glam::{DVec2, DVec3};
use tracing::debug;

/// Quality of a polygon: longest edge squared over twice its area.
///
/// Infinite for zero-area polygons.
pub fn aspect_ratio(points: &[DVec3]) -> f64 {
    let n = points.len();
    let mut longest_sq: f64 = 0.0;
    let mut area_vector = DVec3::ZERO;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        longest_sq = longest_sq.max(a.distance_squared(b));
        area_vector += a.cross(b);
    }
    let double_area = area_vector.length();
    if double_area <= EPSILON {
        return f64::INFINITY;
    }
    longest_sq / double_area
}

fn face_points(mesh: &Mesh, face: &[u32]) -> Vec<DVec3> {
    face.iter().map(|&i| mesh.vertex(i)).collect()
}

/// Splits slivers and flips thin diagonals. Returns the number of changes.
pub fn regularize_faces(mesh: &mut Mesh, config: &HygieneConfig) -> usize {
    let split = split_sliver_polygons(mesh, config.sliver_aspect);

    let mut flipped = 0;
    for _ in 0..config.max_passes {
        let pass = flip_pass(mesh);
        flipped += pass;
        if pass == 0 {
            break;
        }
    }

    if split + flipped > 0 {
        debug!(split, flipped, "regularized faces");
    }
    split + flipped
}

fn split_sliver_polygons(mesh: &mut Mesh, sliver_aspect: f64) -> usize {
    let mut extra: Vec<Face> = Vec::new();
    let mut split = 0;

    for face_index in 0..mesh.face_count() {
        let face = mesh.face(face_index).to_vec();
        if face.len() <= 3 {
            continue;
        }
        let points = face_points(mesh, &face);
        if aspect_ratio(&points) <= sliver_aspect {
            continue;
        }
        let Some(triangles) = ear_clip(&points) else {
            continue;
        };
        let mut triangles = triangles
            .into_iter()
            .map(|[a, b, c]| vec![face[a], face[b], face[c]]);
        if let Some(first) = triangles.next() {
            mesh.faces_mut()[face_index] = first;
            extra.extend(triangles);
            split += 1;
        }
    }

    mesh.faces_mut().extend(extra);
    split
}

/// Ear-clips a simple polygon, returning triangles as local indices in the
/// polygon's own winding. `None` when no ear can be found.
fn ear_clip(points: &[DVec3]) -> Option<Vec<[usize; 3]>> {
    let mut normal = DVec3::ZERO;
    for i in 0..points.len() {
        normal += points[i].cross(points[(i + 1) % points.len()]);
    }
    if normal.length_squared() <= EPSILON * EPSILON {
        return None;
    }

    // Drop the dominant axis; flip the 2D winding back if that mirrored it
    let abs = normal.abs();
    let flat: Vec<DVec2> = if abs.z >= abs.x && abs.z >= abs.y {
        points.iter().map(|p| DVec2::new(p.x, p.y)).collect()
    } else if abs.y >= abs.x {
        points.iter().map(|p| DVec2::new(p.z, p.x)).collect()
    } else {
        points.iter().map(|p| DVec2::new(p.y, p.z)).collect()
    };
    let dominant = if abs.z >= abs.x && abs.z >= abs.y {
        normal.z
    } else if abs.y >= abs.x {
        normal.y
    } else {
        normal.x
    };
    let sign = dominant.signum();

    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len() - 2);

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let prev = remaining[(i + n - 1) % n];
            let cur = remaining[i];
            let next = remaining[(i + 1) % n];
            let (a, b, c) = (flat[prev], flat[cur], flat[next]);
            if (b - a).perp_dot(c - b) * sign <= EPSILON {
                return false;
            }
            remaining
                .iter()
                .filter(|&&k| k != prev && k != cur && k != next)
                .all(|&k| !point_in_triangle(flat[k], a, b, c, sign))
        })?;
        let prev = remaining[(ear + n - 1) % n];
        let next = remaining[(ear + 1) % n];
        triangles.push([prev, remaining[ear], next]);
        remaining.remove(ear);
    }
    triangles.push([remaining[0], remaining[1], remaining[2]]);
    Some(triangles)
}

fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2, sign: f64) -> bool {
    let d1 = (b - a).perp_dot(p - a) * sign;
    let d2 = (c - b).perp_dot(p - b) * sign;
    let d3 = (a - c).perp_dot(p - c) * sign;
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

/// Vertex of a triangle opposite its directed edge `from -> to`.
fn apex(face: &[u32], from: u32, to: u32) -> Option<u32> {
    (0..3).find_map(|i| {
        (face[i] == from && face[(i + 1) % 3] == to).then_some(face[(i + 2) % 3])
    })
}

fn flip_pass(mesh: &mut Mesh) -> usize {
    let uses = edge_uses(mesh);
    let mut keys: Vec<EdgeKey> = uses.keys().copied().collect();
    keys.sort_unstable();

    let mut touched = vec![false; mesh.face_count()];
    let mut flips = 0;

    for key in keys {
        let [first, second] = uses[&key].as_slice() else {
            continue;
        };
        let (f1, f2) = (first.face, second.face);
        if touched[f1] || touched[f2] || f1 == f2 {
            continue;
        }
        if mesh.face(f1).len() != 3 || mesh.face(f2).len() != 3 {
            continue;
        }
        // Neighbours must walk the shared edge in opposite directions
        if first.from != second.to || first.to != second.from {
            continue;
        }

        let (a, b) = (first.from, first.to);
        let (Some(c), Some(d)) = (apex(mesh.face(f1), a, b), apex(mesh.face(f2), b, a)) else {
            continue;
        };
        if c == d || uses.contains_key(&edge_key(c, d)) {
            continue;
        }

        let (pa, pb, pc, pd) = (mesh.vertex(a), mesh.vertex(b), mesh.vertex(c), mesh.vertex(d));
        let before = aspect_ratio(&[pa, pb, pc]).max(aspect_ratio(&[pb, pa, pd]));
        let after = aspect_ratio(&[pc, pa, pd]).max(aspect_ratio(&[pd, pb, pc]));
        if after >= before * (1.0 - 1.0e-9) {
            continue;
        }

        // Only flip inside a convex quad: both new triangles keep facing the
        // same way as the pair they replace
        let reference = (pb - pa).cross(pc - pa) + (pa - pb).cross(pd - pb);
        let new_first = (pa - pc).cross(pd - pc);
        let new_second = (pb - pd).cross(pc - pd);
        if new_first.dot(reference) <= EPSILON || new_second.dot(reference) <= EPSILON {
            continue;
        }

        mesh.faces_mut()[f1] = vec![c, a, d];
        mesh.faces_mut()[f2] = vec![d, b, c];
        touched[f1] = true;
        touched[f2] = true;
        flips += 1;
    }

    flips
}
