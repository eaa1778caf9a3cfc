//! # Pattern Input
//!
//! What the host hands over: either a polygon mesh that is already flat, or
//! a set of closed outlines tessellated from curves.

use crate::error::MeshError;
use crate::mesh::{Face, Mesh};
use config::constants::VERTEX_MERGE_EPSILON;
use glam::{DVec2, DVec3};
use tracing::debug;

/// A flat pattern waiting to be lifted onto the sphere.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Polygon mesh in the xy plane.
    Mesh(Mesh),
    /// Closed outlines, each becoming one polygon face.
    Outlines(Vec<Vec<DVec2>>),
}

impl Pattern {
    /// Total number of points in the pattern.
    pub fn point_count(&self) -> usize {
        match self {
            Self::Mesh(mesh) => mesh.vertex_count(),
            Self::Outlines(outlines) => outlines.iter().map(Vec::len).sum(),
        }
    }

    /// True if the pattern has no points at all.
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Median point of the pattern: the mean of all its points.
    pub fn median(&self) -> DVec3 {
        let count = self.point_count();
        if count == 0 {
            return DVec3::ZERO;
        }
        let sum = match self {
            Self::Mesh(mesh) => mesh.vertices().iter().copied().sum::<DVec3>(),
            Self::Outlines(outlines) => outlines
                .iter()
                .flatten()
                .map(|p| p.extend(0.0))
                .sum::<DVec3>(),
        };
        sum / count as f64
    }

    /// Moves the median point to the origin, then scales x and y by
    /// `import_scale`. z is never scaled since the source is flat.
    pub fn normalize(&mut self, import_scale: f64) {
        let median = self.median();
        let scale = DVec3::new(import_scale, import_scale, 1.0);
        match self {
            Self::Mesh(mesh) => {
                for v in mesh.vertices_mut().iter_mut() {
                    *v = (*v - median) * scale;
                }
            }
            Self::Outlines(outlines) => {
                let shift = median.truncate();
                for point in outlines.iter_mut().flatten() {
                    *point = (*point - shift) * import_scale;
                }
            }
        }
        debug!(?median, import_scale, "normalized pattern");
    }

    /// Converts the pattern into a polygon mesh.
    ///
    /// Each outline becomes one face over its own vertices; a closing point
    /// equal to the first one is dropped. Outlines left with fewer than three
    /// points are degenerate, and so is an outline lying inside another one:
    /// outlines are always filled, so a cut-out has to arrive as a
    /// [`Pattern::Mesh`] whose faces surround the hole.
    pub fn into_mesh(self) -> Result<Mesh, MeshError> {
        match self {
            Self::Mesh(mesh) => {
                mesh.validate()?;
                Ok(mesh)
            }
            Self::Outlines(outlines) => outlines_to_mesh(&outlines),
        }
    }
}

impl From<Mesh> for Pattern {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

fn outlines_to_mesh(outlines: &[Vec<DVec2>]) -> Result<Mesh, MeshError> {
    let mut trimmed: Vec<&[DVec2]> = Vec::with_capacity(outlines.len());
    for (index, outline) in outlines.iter().enumerate() {
        let mut outline = outline.as_slice();
        if outline.len() > 1 && outline.first() == outline.last() {
            outline = &outline[..outline.len() - 1];
        }
        if outline.len() < 3 {
            return Err(MeshError::degenerate(format!(
                "outline {index} has {} points, need at least 3",
                outline.len()
            )));
        }
        trimmed.push(outline);
    }

    for (inner_index, inner) in trimmed.iter().enumerate() {
        for (outer_index, outer) in trimmed.iter().enumerate() {
            if inner_index != outer_index && overlaps(inner, outer) {
                return Err(MeshError::degenerate(format!(
                    "outline {inner_index} lies inside outline {outer_index}; \
                     holes must be given as a mesh pattern"
                )));
            }
        }
    }

    let points: usize = trimmed.iter().map(|outline| outline.len()).sum();
    let mut mesh = Mesh::with_capacity(points, trimmed.len());
    for outline in trimmed {
        let face: Face = outline
            .iter()
            .map(|p| mesh.add_vertex(p.extend(0.0)))
            .collect();
        mesh.add_face(&face)?;
    }

    Ok(mesh)
}

/// True if any point of `inner` lies strictly inside `outer`.
///
/// Points on the edges of `outer` do not count, so neighbouring outlines
/// that share a seam are not reported.
fn overlaps(inner: &[DVec2], outer: &[DVec2]) -> bool {
    inner
        .iter()
        .any(|&p| !on_outline(p, outer) && contains(outer, p))
}

fn on_outline(p: DVec2, outline: &[DVec2]) -> bool {
    let n = outline.len();
    (0..n).any(|i| {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        let ab = b - a;
        let t = if ab.length_squared() > 0.0 {
            ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (a + ab * t).distance(p) <= VERTEX_MERGE_EPSILON
    })
}

/// Even-odd ray test along +x.
fn contains(outline: &[DVec2], p: DVec2) -> bool {
    let n = outline.len();
    let mut inside = false;
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}
