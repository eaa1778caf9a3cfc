//! # Mesh Data Structure
//!
//! Core polygon mesh representation: an ordered vertex buffer plus faces that
//! index into it. Face winding defines the face normal (counter-clockwise seen
//! from the front).

use crate::error::MeshError;
use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// A polygon face: three or more distinct vertex indices in winding order.
pub type Face = Vec<u32>;

/// A polygon mesh with vertices and faces.
///
/// All geometry calculations use f64 internally. Export to f32 only
/// happens at the host boundary.
///
/// # Example
///
/// ```rust
/// use lampshade_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_face(&[0, 1, 2]).unwrap();
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Polygon faces (3+ indices per face)
    faces: Vec<Face>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Builds a mesh from raw buffers, validating every face.
    pub fn from_raw(vertices: Vec<DVec3>, faces: Vec<Face>) -> Result<Self, MeshError> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Builds a mesh from buffers the caller has already validated.
    pub(crate) fn from_parts(vertices: Vec<DVec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a face by vertex indices and returns its index.
    ///
    /// Fails if the face has fewer than three vertices, repeats a vertex, or
    /// references a vertex that does not exist.
    pub fn add_face(&mut self, indices: &[u32]) -> Result<usize, MeshError> {
        check_face(indices, self.vertices.len())?;
        self.faces.push(indices.to_vec());
        Ok(self.faces.len() - 1)
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the face at the given index.
    #[inline]
    pub fn face(&self, index: usize) -> &[u32] {
        &self.faces[index]
    }

    pub(crate) fn faces_mut(&mut self) -> &mut Vec<Face> {
        &mut self.faces
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut Vec<DVec3> {
        &mut self.vertices
    }

    /// Consumes the mesh and returns its buffers.
    pub fn into_parts(self) -> (Vec<DVec3>, Vec<Face>) {
        (self.vertices, self.faces)
    }

    /// Swaps in a new vertex buffer, keeping the topology untouched.
    ///
    /// The new buffer must have exactly as many positions as the old one.
    pub fn set_positions(&mut self, positions: Vec<DVec3>) -> Result<(), MeshError> {
        if positions.len() != self.vertices.len() {
            return Err(MeshError::invalid_topology(format!(
                "position buffer has {} entries, mesh has {} vertices",
                positions.len(),
                self.vertices.len()
            )));
        }
        self.vertices = positions;
        Ok(())
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Returns the mean of all vertex positions (the median point).
    pub fn centroid(&self) -> DVec3 {
        if self.vertices.is_empty() {
            return DVec3::ZERO;
        }
        let sum: DVec3 = self.vertices.iter().copied().sum();
        sum / self.vertices.len() as f64
    }

    /// Transforms all vertices by a 4x4 matrix.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Area-weighted normal of a face (Newell's method).
    ///
    /// The length of the returned vector is twice the polygon area, so it also
    /// works for non-planar quads and n-gons.
    pub fn face_area_vector(&self, index: usize) -> DVec3 {
        let face = &self.faces[index];
        let n = face.len();
        let mut normal = DVec3::ZERO;
        for i in 0..n {
            let current = self.vertices[face[i] as usize];
            let next = self.vertices[face[(i + 1) % n] as usize];
            normal += current.cross(next);
        }
        normal
    }

    /// Unit normal of a face, or zero for a degenerate face.
    pub fn face_normal(&self, index: usize) -> DVec3 {
        self.face_area_vector(index).normalize_or_zero()
    }

    /// Signed volume enclosed by the given faces, measured against `origin`.
    ///
    /// Positive when the faces wind counter-clockwise seen from outside.
    pub fn signed_volume_of(&self, faces: &[usize], origin: DVec3) -> f64 {
        let mut volume = 0.0;
        for &face_index in faces {
            let face = &self.faces[face_index];
            let v0 = self.vertices[face[0] as usize] - origin;
            for i in 1..face.len() - 1 {
                let v1 = self.vertices[face[i] as usize] - origin;
                let v2 = self.vertices[face[i + 1] as usize] - origin;
                volume += v0.dot(v1.cross(v2));
            }
        }
        volume / 6.0
    }

    /// Signed volume of the whole mesh.
    pub fn signed_volume(&self) -> f64 {
        let all: Vec<usize> = (0..self.faces.len()).collect();
        self.signed_volume_of(&all, self.centroid())
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All face indices are valid
    /// - Every face has at least three distinct vertices
    /// - All positions are finite
    pub fn validate(&self) -> Result<(), MeshError> {
        for face in &self.faces {
            check_face(face, self.vertices.len())?;
        }
        if let Some(index) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::numeric(format!(
                "vertex {index} is not finite: {:?}",
                self.vertices[index]
            )));
        }
        Ok(())
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            result.push(v.x as f32);
            result.push(v.y as f32);
            result.push(v.z as f32);
        }
        result
    }

    /// Exports faces as fan-triangulated u32 indices for GPU.
    ///
    /// Returns flattened [i0, i1, i2, i0, i1, i2, ...] array.
    pub fn indices_u32(&self) -> Vec<u32> {
        let mut result = Vec::new();
        for face in &self.faces {
            for i in 1..face.len() - 1 {
                result.push(face[0]);
                result.push(face[i]);
                result.push(face[i + 1]);
            }
        }
        result
    }
}

fn check_face(face: &[u32], vertex_count: usize) -> Result<(), MeshError> {
    if face.len() < 3 {
        return Err(MeshError::invalid_topology(format!(
            "face has {} vertices, at least 3 required",
            face.len()
        )));
    }
    for (i, &index) in face.iter().enumerate() {
        if index as usize >= vertex_count {
            return Err(MeshError::invalid_topology(format!(
                "face index {index} out of range for {vertex_count} vertices"
            )));
        }
        if face[..i].contains(&index) {
            return Err(MeshError::invalid_topology(format!(
                "face repeats vertex {index}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh
    }

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_mesh_add_vertex() {
        let mut mesh = Mesh::new();
        let idx = mesh.add_vertex(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(idx, 0);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.vertex(0), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_mesh_add_face_rejects_bad_faces() {
        let mut mesh = unit_square();
        assert!(mesh.add_face(&[0, 1]).is_err());
        assert!(mesh.add_face(&[0, 1, 1]).is_err());
        assert!(mesh.add_face(&[0, 1, 9]).is_err());
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_from_raw_validates() {
        let result = Mesh::from_raw(vec![DVec3::ZERO], vec![vec![0, 1, 2]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mesh_bounding_box() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(DVec3::new(4.0, 5.0, 6.0));
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let mesh = unit_square();
        assert_relative_eq!(mesh.face_normal(0).z, 1.0);
        assert_relative_eq!(mesh.face_area_vector(0).length(), 2.0);
    }

    #[test]
    fn test_set_positions_requires_same_length() {
        let mut mesh = unit_square();
        assert!(mesh.set_positions(vec![DVec3::ZERO]).is_err());
        let moved: Vec<DVec3> = mesh.vertices().iter().map(|v| *v + DVec3::Z).collect();
        mesh.set_positions(moved).unwrap();
        assert_eq!(mesh.vertex(0), DVec3::Z);
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut mesh = unit_square();
        mesh.add_vertex(DVec3::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(mesh.validate(), Err(MeshError::NumericAnomaly { .. })));
    }

    #[test]
    fn test_indices_fan_triangulation() {
        let mesh = unit_square();
        assert_eq!(mesh.indices_u32(), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices_f32().len(), 12);
    }

    #[test]
    fn test_centroid_and_translate() {
        let mut mesh = unit_square();
        assert_eq!(mesh.centroid(), DVec3::new(0.5, 0.5, 0.0));
        mesh.translate(DVec3::new(-0.5, -0.5, 1.0));
        assert_eq!(mesh.centroid(), DVec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_transform_scales_then_translates() {
        let mut mesh = unit_square();
        let matrix = DMat4::from_translation(DVec3::new(0.0, 0.0, 2.0))
            * DMat4::from_scale(DVec3::new(2.0, 2.0, 1.0));
        mesh.transform(&matrix);

        let (min, max) = mesh.bounding_box();
        assert!(min.abs_diff_eq(DVec3::new(0.0, 0.0, 2.0), 1e-12));
        assert!(max.abs_diff_eq(DVec3::new(2.0, 2.0, 2.0), 1e-12));
        // Uniform in-plane scale keeps the winding
        assert_relative_eq!(mesh.face_normal(0).z, 1.0);
    }
}
