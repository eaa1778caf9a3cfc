//! # Lampshade Pipeline
//!
//! Drives a pattern through every build stage in order:
//!
//! ```text
//! RawImport → Normalized → Meshified → Projected → Shelled → Oriented → Recentered → Done
//! ```
//!
//! Parameters and options are validated before anything is touched. The
//! first failing stage aborts the build; the editor is dropped, so a failed
//! build never hands back a partially built mesh.

use crate::editor::{MeshEditor, NativeEditor};
use crate::error::{ErrorKind, MeshError};
use crate::mesh::Mesh;
use crate::ops::project::{ensure_finite, project_positions};
use crate::ops::solidify::shrink_factor;
use crate::params::{BuildOptions, LampshadeParams, ShellStrategy};
use crate::pattern::Pattern;
use crate::topology::boundary_loops;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Build stage, named after the state it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    RawImport,
    Normalized,
    Meshified,
    Projected,
    Shelled,
    Oriented,
    Recentered,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RawImport => "RawImport",
            Self::Normalized => "Normalized",
            Self::Meshified => "Meshified",
            Self::Projected => "Projected",
            Self::Shelled => "Shelled",
            Self::Oriented => "Oriented",
            Self::Recentered => "Recentered",
            Self::Done => "Done",
        };
        f.write_str(name)
    }
}

/// A build failure and the stage that could not be reached.
///
/// Parameter validation failures report [`Stage::RawImport`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} stage failed: {error}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub error: MeshError,
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(MeshError) -> Self {
        move |error| Self { stage, error }
    }

    /// Kind of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Builds a lampshade from a pattern using the in-memory editor.
///
/// # Example
///
/// ```rust
/// use lampshade_mesh::{build_lampshade, BuildOptions, LampshadeParams, Pattern};
/// use lampshade_mesh::topology::is_closed;
/// use glam::DVec2;
///
/// let square = vec![
///     DVec2::new(-1.0, -1.0),
///     DVec2::new(1.0, -1.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(-1.0, 1.0),
/// ];
/// let options = BuildOptions { import_scale: 1.0, ..Default::default() };
/// let params = LampshadeParams::new(5.0, 5.0, 0.08).unwrap();
///
/// let shell = build_lampshade(Pattern::Outlines(vec![square]), &params, &options).unwrap();
/// assert_eq!(shell.vertex_count(), 8);
/// assert!(is_closed(&shell));
/// ```
pub fn build_lampshade(
    pattern: Pattern,
    params: &LampshadeParams,
    options: &BuildOptions,
) -> Result<Mesh, PipelineError> {
    build_lampshade_with(NativeEditor::new(pattern), params, options)
}

/// Builds a lampshade through any [`MeshEditor`].
#[instrument(skip_all, fields(
    distance_to_center = params.distance_to_center(),
    radius = params.radius(),
    thickness = params.thickness()
))]
pub fn build_lampshade_with<E: MeshEditor>(
    mut editor: E,
    params: &LampshadeParams,
    options: &BuildOptions,
) -> Result<Mesh, PipelineError> {
    // LampshadeParams can only exist validated
    options.validate().map_err(PipelineError::at(Stage::RawImport))?;

    editor.normalize(options.import_scale);
    debug!(stage = %Stage::Normalized, import_scale = options.import_scale);

    meshify(&mut editor, options).map_err(PipelineError::at(Stage::Meshified))?;

    let positions = project_positions(editor.mesh().vertices(), params);
    ensure_finite(&positions)
        .and_then(|()| editor.set_positions(positions))
        .map_err(PipelineError::at(Stage::Projected))?;
    debug!(stage = %Stage::Projected, vertices = editor.mesh().vertex_count());

    shell(&mut editor, params, options.shell_strategy).map_err(PipelineError::at(Stage::Shelled))?;

    let flipped_faces = editor.unify_normals();
    debug!(stage = %Stage::Oriented, flipped_faces);

    editor.translate(params.recenter_offset());
    debug!(stage = %Stage::Recentered, offset = ?params.recenter_offset());

    let mesh = editor.into_mesh();
    let (min, max) = mesh.bounding_box();
    info!(
        stage = %Stage::Done,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        height = max.z - min.z,
        "built lampshade"
    );
    Ok(mesh)
}

fn meshify<E: MeshEditor>(editor: &mut E, options: &BuildOptions) -> Result<(), MeshError> {
    editor.convert_curve_to_polygon()?;
    let mesh = editor.mesh();
    if mesh.vertex_count() == 0 || mesh.face_count() == 0 {
        return Err(MeshError::degenerate("pattern has no geometry"));
    }
    mesh.validate()?;

    let merged = editor.merge_coincident_vertices(options.hygiene.merge_tolerance)?;
    // Outline direction is arbitrary; boundary chaining and diagonal flips
    // both need neighbours to walk shared edges in opposite directions
    let rewound = editor.unify_normals();
    let regularized = editor.regularize_faces(&options.hygiene);

    let loops = boundary_loops(editor.mesh())?;
    match loops.len() {
        0 => return Err(MeshError::degenerate("pattern has no open boundary")),
        1 => {}
        n if !options.allow_holes => {
            return Err(MeshError::degenerate(format!(
                "pattern boundary has {n} loops, expected a single closed loop"
            )));
        }
        _ => {}
    }

    debug!(
        stage = %Stage::Meshified,
        vertices = editor.mesh().vertex_count(),
        faces = editor.mesh().face_count(),
        merged,
        rewound,
        regularized,
        boundary_loops = loops.len(),
    );
    Ok(())
}

fn shell<E: MeshEditor>(
    editor: &mut E,
    params: &LampshadeParams,
    strategy: ShellStrategy,
) -> Result<(), MeshError> {
    let distance = match strategy {
        ShellStrategy::ExtrudeScale => params.thickness(),
        ShellStrategy::Radial => 0.0,
    };
    let selection = editor.extrude_along_normal(distance)?;
    editor.uniform_scale(
        &selection,
        shrink_factor(params.thickness(), params.radius()),
        params.sphere_center(),
    );
    debug!(
        stage = %Stage::Shelled,
        ?strategy,
        vertices = editor.mesh().vertex_count(),
        faces = editor.mesh().face_count(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn square(half: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(-half, -half),
            DVec2::new(half, -half),
            DVec2::new(half, half),
            DVec2::new(-half, half),
        ]
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::RawImport.to_string(), "RawImport");
        assert_eq!(Stage::Recentered.to_string(), "Recentered");
    }

    #[test]
    fn test_invalid_options_fail_before_import() {
        let options = BuildOptions {
            import_scale: -1.0,
            ..Default::default()
        };
        let err = build_lampshade(
            Pattern::Outlines(vec![square(1.0)]),
            &LampshadeParams::default(),
            &options,
        )
        .unwrap_err();
        assert_eq!(err.stage, Stage::RawImport);
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_closed_input_has_no_boundary() {
        // Two copies of the square, back to back, enclose nothing but have no rim
        let mut mesh = Mesh::new();
        for p in square(1.0) {
            mesh.add_vertex(p.extend(0.0));
        }
        mesh.add_face(&[0, 1, 2, 3]).unwrap();
        mesh.add_face(&[3, 2, 1, 0]).unwrap();

        let err = build_lampshade(
            Pattern::Mesh(mesh),
            &LampshadeParams::default(),
            &BuildOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.stage, Stage::Meshified);
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
    }

    #[test]
    fn test_error_message_names_stage() {
        let err = build_lampshade(
            Pattern::Outlines(Vec::new()),
            &LampshadeParams::default(),
            &BuildOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Meshified stage failed"));
    }
}
