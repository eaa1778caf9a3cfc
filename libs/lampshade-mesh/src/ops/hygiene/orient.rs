//! Winding unification.
//!
//! Each connected component is flood-filled across its manifold edges so that
//! neighbouring faces walk their shared edge in opposite directions. Closed
//! components are then turned outward: if the volume they enclose about
//! their own centroid is negative, every face in them is reversed.

use crate::mesh::Mesh;
use crate::topology::{edge_key, edge_uses, face_components, face_edges};
use glam::DVec3;
use std::collections::VecDeque;
use tracing::debug;

/// Makes winding consistent and outward. Returns how many faces were reversed.
///
/// Faces reachable only through non-manifold edges keep the winding of their
/// own seed. Open components are made consistent but not flipped as a whole.
pub fn unify_normals(mesh: &mut Mesh) -> usize {
    let uses = edge_uses(mesh);
    let mut flip = vec![false; mesh.face_count()];
    let mut seen = vec![false; mesh.face_count()];

    for seed in 0..mesh.face_count() {
        if seen[seed] {
            continue;
        }
        seen[seed] = true;
        let mut queue = VecDeque::from([seed]);

        while let Some(face) = queue.pop_front() {
            for (from, to) in face_edges(mesh.face(face)) {
                let [first, second] = uses[&edge_key(from, to)].as_slice() else {
                    continue;
                };
                let (mine, other) = if first.face == face {
                    (first, second)
                } else {
                    (second, first)
                };
                if seen[other.face] {
                    continue;
                }
                // Walking the edge the same way means exactly one of them is reversed
                let same_direction = mine.from == other.from;
                flip[other.face] = flip[face] ^ same_direction;
                seen[other.face] = true;
                queue.push_back(other.face);
            }
        }
    }

    for (face, &reverse) in mesh.faces_mut().iter_mut().zip(&flip) {
        if reverse {
            face.reverse();
        }
    }

    // Re-read edge uses after the local fix so closedness reflects the result
    let uses = edge_uses(mesh);
    for component in face_components(mesh) {
        let closed = component.iter().all(|&face| {
            face_edges(mesh.face(face)).all(|(from, to)| uses[&edge_key(from, to)].len() == 2)
        });
        if !closed {
            continue;
        }
        let centroid = component_centroid(mesh, &component);
        if mesh.signed_volume_of(&component, centroid) < 0.0 {
            for &face in &component {
                mesh.faces_mut()[face].reverse();
                flip[face] = !flip[face];
            }
        }
    }

    let reversed = flip.iter().filter(|&&f| f).count();
    if reversed > 0 {
        debug!(reversed, "unified face winding");
    }
    reversed
}

fn component_centroid(mesh: &Mesh, faces: &[usize]) -> DVec3 {
    let mut sum = DVec3::ZERO;
    let mut count = 0usize;
    for &face in faces {
        for &index in mesh.face(face) {
            sum += mesh.vertex(index);
            count += 1;
        }
    }
    if count == 0 {
        DVec3::ZERO
    } else {
        sum / count as f64
    }
}
