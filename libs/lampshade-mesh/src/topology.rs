//! # Topology Queries
//!
//! Edge-based connectivity queries over a [`Mesh`]: which faces use an edge,
//! where the open boundary is, and how faces group into connected pieces.
//! Edges are keyed by their sorted vertex pair, directed uses keep the
//! orientation the face walks them in.

use crate::error::MeshError;
use crate::mesh::Mesh;
use std::collections::{HashMap, HashSet, VecDeque};

/// Undirected edge key: `(min, max)` vertex indices.
pub type EdgeKey = (u32, u32);

/// One face walking an edge `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeUse {
    pub face: usize,
    pub from: u32,
    pub to: u32,
}

/// Returns the undirected key of an edge.
#[inline]
pub fn edge_key(a: u32, b: u32) -> EdgeKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Iterates over the directed edges of a face.
pub fn face_edges(face: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    let n = face.len();
    (0..n).map(move |i| (face[i], face[(i + 1) % n]))
}

/// Maps every undirected edge to the faces that use it.
pub fn edge_uses(mesh: &Mesh) -> HashMap<EdgeKey, Vec<EdgeUse>> {
    let mut map: HashMap<EdgeKey, Vec<EdgeUse>> = HashMap::new();
    for (face_index, face) in mesh.faces().iter().enumerate() {
        for (from, to) in face_edges(face) {
            map.entry(edge_key(from, to)).or_default().push(EdgeUse {
                face: face_index,
                from,
                to,
            });
        }
    }
    map
}

/// Directed edges used by exactly one face, in face order, sorted.
pub fn boundary_edges(mesh: &Mesh) -> Vec<(u32, u32)> {
    let mut edges: Vec<(u32, u32)> = edge_uses(mesh)
        .values()
        .filter(|uses| uses.len() == 1)
        .map(|uses| (uses[0].from, uses[0].to))
        .collect();
    edges.sort_unstable();
    edges
}

/// Edges shared by more than two faces.
pub fn non_manifold_edges(mesh: &Mesh) -> Vec<EdgeKey> {
    let mut edges: Vec<EdgeKey> = edge_uses(mesh)
        .into_iter()
        .filter(|(_, uses)| uses.len() > 2)
        .map(|(key, _)| key)
        .collect();
    edges.sort_unstable();
    edges
}

/// True when every edge is shared by exactly two faces.
pub fn is_closed(mesh: &Mesh) -> bool {
    mesh.face_count() > 0 && edge_uses(mesh).values().all(|uses| uses.len() == 2)
}

/// True when no directed edge is walked by two faces, i.e. every pair of
/// neighbouring faces traverses their shared edge in opposite directions.
pub fn has_consistent_winding(mesh: &Mesh) -> bool {
    edge_uses(mesh).values().all(|uses| match uses.as_slice() {
        [a, b] => a.from == b.to && a.to == b.from,
        [_] => true,
        _ => false,
    })
}

/// Chains the open boundary into closed vertex loops.
///
/// Each loop follows the winding of the faces it bounds. Loops are returned
/// ordered by their smallest starting vertex.
///
/// Fails on non-manifold edges, on boundary vertices touched by more than one
/// loop, and on boundary chains that never close.
pub fn boundary_loops(mesh: &Mesh) -> Result<Vec<Vec<u32>>, MeshError> {
    if let Some(&(a, b)) = non_manifold_edges(mesh).first() {
        return Err(MeshError::degenerate(format!(
            "edge ({a}, {b}) is shared by more than two faces"
        )));
    }

    let edges = boundary_edges(mesh);
    let mut next: HashMap<u32, u32> = HashMap::with_capacity(edges.len());
    for &(from, to) in &edges {
        if next.insert(from, to).is_some() {
            return Err(MeshError::degenerate(format!(
                "boundary vertex {from} starts more than one boundary edge"
            )));
        }
    }

    let mut loops = Vec::new();
    let mut starts: Vec<u32> = next.keys().copied().collect();
    starts.sort_unstable();
    let mut visited: HashSet<u32> = HashSet::with_capacity(next.len());

    for start in starts {
        if visited.contains(&start) {
            continue;
        }
        let mut chain = vec![start];
        visited.insert(start);
        let mut current = start;
        loop {
            let Some(&to) = next.get(&current) else {
                return Err(MeshError::degenerate(format!(
                    "boundary chain starting at vertex {start} is not closed"
                )));
            };
            if to == start {
                break;
            }
            if !visited.insert(to) {
                return Err(MeshError::degenerate(format!(
                    "boundary vertex {to} is shared by more than one loop"
                )));
            }
            chain.push(to);
            current = to;
        }
        loops.push(chain);
    }

    Ok(loops)
}

/// Groups faces into components connected through shared edges.
pub fn face_components(mesh: &Mesh) -> Vec<Vec<usize>> {
    let uses = edge_uses(mesh);
    let mut component_of = vec![usize::MAX; mesh.face_count()];
    let mut components = Vec::new();

    for seed in 0..mesh.face_count() {
        if component_of[seed] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut members = Vec::new();
        let mut queue = VecDeque::from([seed]);
        component_of[seed] = id;

        while let Some(face) = queue.pop_front() {
            members.push(face);
            for (from, to) in face_edges(mesh.face(face)) {
                for neighbour in &uses[&edge_key(from, to)] {
                    if component_of[neighbour.face] == usize::MAX {
                        component_of[neighbour.face] = id;
                        queue.push_back(neighbour.face);
                    }
                }
            }
        }
        components.push(members);
    }

    components
}

/// Vertices no face references.
pub fn isolated_vertices(mesh: &Mesh) -> Vec<u32> {
    let mut used = vec![false; mesh.vertex_count()];
    for face in mesh.faces() {
        for &index in face {
            used[index as usize] = true;
        }
    }
    (0..mesh.vertex_count() as u32)
        .filter(|&index| !used[index as usize])
        .collect()
}
