//! # Mesh Editor Capability
//!
//! The narrow set of editing operations the pipeline needs from whatever
//! owns the mesh. A host application can drive its own editing tools through
//! this trait; [`NativeEditor`] implements it directly over [`Mesh`].

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::ops::hygiene;
use crate::ops::solidify::{extrude_region, scale_selection, Selection};
use crate::pattern::Pattern;
use config::constants::HygieneConfig;
use glam::DVec3;

/// Editing operations a lampshade build is expressed in.
///
/// Every operation acts on the whole mesh, except [`uniform_scale`] which
/// acts on a selection returned by [`extrude_along_normal`].
///
/// [`uniform_scale`]: MeshEditor::uniform_scale
/// [`extrude_along_normal`]: MeshEditor::extrude_along_normal
pub trait MeshEditor {
    /// Current working mesh.
    fn mesh(&self) -> &Mesh;

    /// Consumes the editor, handing the mesh back.
    fn into_mesh(self) -> Mesh
    where
        Self: Sized;

    /// Recenters the raw pattern on its median point and scales x and y.
    fn normalize(&mut self, import_scale: f64);

    /// Turns pending curve outlines into polygon faces.
    fn convert_curve_to_polygon(&mut self) -> Result<(), MeshError>;

    /// Welds vertices closer than `tolerance`; returns how many merged.
    fn merge_coincident_vertices(&mut self, tolerance: f64) -> Result<usize, MeshError>;

    /// Splits and flips sliver faces; returns how many changed.
    fn regularize_faces(&mut self, config: &HygieneConfig) -> usize;

    /// Makes winding consistent and outward; returns faces reversed.
    fn unify_normals(&mut self) -> usize;

    /// Extrudes the whole surface by `distance` along the pattern normal
    /// (+z) and welds the side walls. Returns the new vertices.
    fn extrude_along_normal(&mut self, distance: f64) -> Result<Selection, MeshError>;

    /// Scales the selected vertices about `center`.
    fn uniform_scale(&mut self, selection: &Selection, factor: f64, center: DVec3);

    /// Replaces every vertex position, keeping topology.
    fn set_positions(&mut self, positions: Vec<DVec3>) -> Result<(), MeshError>;

    /// Moves the whole mesh.
    fn translate(&mut self, offset: DVec3);
}

/// [`MeshEditor`] over an in-memory [`Mesh`].
///
/// Outlines stay pending until [`MeshEditor::convert_curve_to_polygon`] runs.
#[derive(Debug, Clone, Default)]
pub struct NativeEditor {
    mesh: Mesh,
    pending: Option<Pattern>,
}

impl NativeEditor {
    /// Starts editing a pattern.
    pub fn new(pattern: Pattern) -> Self {
        match pattern {
            Pattern::Mesh(mesh) => Self {
                mesh,
                pending: None,
            },
            outlines @ Pattern::Outlines(_) => Self {
                mesh: Mesh::new(),
                pending: Some(outlines),
            },
        }
    }
}

impl From<Mesh> for NativeEditor {
    fn from(mesh: Mesh) -> Self {
        Self::new(Pattern::Mesh(mesh))
    }
}

impl MeshEditor for NativeEditor {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn into_mesh(self) -> Mesh {
        self.mesh
    }

    fn normalize(&mut self, import_scale: f64) {
        let mut pattern = self
            .pending
            .take()
            .unwrap_or_else(|| Pattern::Mesh(std::mem::take(&mut self.mesh)));
        pattern.normalize(import_scale);
        match pattern {
            Pattern::Mesh(mesh) => self.mesh = mesh,
            outlines => self.pending = Some(outlines),
        }
    }

    fn convert_curve_to_polygon(&mut self) -> Result<(), MeshError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let converted = pending.into_mesh()?;
        // Keep any faces already present alongside the converted outlines
        let offset = self.mesh.vertex_count() as u32;
        let (vertices, faces) = converted.into_parts();
        self.mesh.vertices_mut().extend(vertices);
        self.mesh.faces_mut().extend(
            faces
                .into_iter()
                .map(|face| face.into_iter().map(|i| i + offset).collect()),
        );
        Ok(())
    }

    fn merge_coincident_vertices(&mut self, tolerance: f64) -> Result<usize, MeshError> {
        let merged = hygiene::merge_coincident_vertices(&mut self.mesh, tolerance)?;
        hygiene::remove_isolated_vertices(&mut self.mesh);
        Ok(merged)
    }

    fn regularize_faces(&mut self, config: &HygieneConfig) -> usize {
        hygiene::regularize_faces(&mut self.mesh, config)
    }

    fn unify_normals(&mut self) -> usize {
        hygiene::unify_normals(&mut self.mesh)
    }

    fn extrude_along_normal(&mut self, distance: f64) -> Result<Selection, MeshError> {
        extrude_region(&mut self.mesh, DVec3::Z * distance)
    }

    fn uniform_scale(&mut self, selection: &Selection, factor: f64, center: DVec3) {
        scale_selection(&mut self.mesh, selection, factor, center);
    }

    fn set_positions(&mut self, positions: Vec<DVec3>) -> Result<(), MeshError> {
        self.mesh.set_positions(positions)
    }

    fn translate(&mut self, offset: DVec3) {
        self.mesh.translate(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::topology::is_closed;
    use approx::assert_relative_eq;
    use glam::DVec2;

    fn square_outline() -> Vec<DVec2> {
        vec![
            DVec2::new(-1.0, -1.0),
            DVec2::new(1.0, -1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn test_outlines_pending_until_converted() {
        let mut editor = NativeEditor::new(Pattern::Outlines(vec![square_outline()]));
        assert!(editor.mesh().is_empty());

        editor.convert_curve_to_polygon().unwrap();
        assert_eq!(editor.mesh().vertex_count(), 4);
        assert_eq!(editor.mesh().face_count(), 1);

        // Nothing left to convert
        editor.convert_curve_to_polygon().unwrap();
        assert_eq!(editor.mesh().face_count(), 1);
    }

    #[test]
    fn test_normalize_applies_to_pending_outlines() {
        let shifted: Vec<DVec2> = square_outline().iter().map(|p| *p + DVec2::splat(3.0)).collect();
        let mut editor = NativeEditor::new(Pattern::Outlines(vec![shifted]));
        editor.normalize(2.0);
        editor.convert_curve_to_polygon().unwrap();
        assert_relative_eq!(editor.mesh().vertex(0).x, -2.0, epsilon = 1e-12);
        assert_relative_eq!(editor.mesh().vertex(2).y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrude_and_scale() {
        let mut editor = NativeEditor::new(Pattern::Outlines(vec![square_outline()]));
        editor.convert_curve_to_polygon().unwrap();

        let selection = editor.extrude_along_normal(0.5).unwrap();
        assert_eq!(selection.len(), 4);
        editor.uniform_scale(&selection, 0.5, DVec3::ZERO);

        assert!(is_closed(editor.mesh()));
        let inner = editor.mesh().vertex(selection.indices().start);
        assert_relative_eq!(inner.z, 0.25, epsilon = 1e-12);
        assert_relative_eq!(inner.x, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_set_positions_length_mismatch() {
        let mut editor = NativeEditor::new(Pattern::Outlines(vec![square_outline()]));
        editor.convert_curve_to_polygon().unwrap();
        let err = editor.set_positions(vec![DVec3::ZERO]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
    }

    #[test]
    fn test_translate_and_into_mesh() {
        let mut editor = NativeEditor::new(Pattern::Outlines(vec![square_outline()]));
        editor.convert_curve_to_polygon().unwrap();
        editor.translate(DVec3::Z);
        let mesh = editor.into_mesh();
        assert!(mesh.vertices().iter().all(|v| v.z == 1.0));
    }
}
