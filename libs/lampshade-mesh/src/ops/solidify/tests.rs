//! # Shell Builder Tests
//!
//! Closedness, parameter rejection and inner-surface placement.

use super::*;
use crate::error::ErrorKind;
use crate::ops::project::project_mesh;
use crate::params::LampshadeParams;
use crate::topology::{boundary_edges, has_consistent_winding, is_closed};
use approx::assert_relative_eq;

fn square_pattern() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_vertex(DVec3::new(-1.0, -1.0, 0.0));
    mesh.add_vertex(DVec3::new(1.0, -1.0, 0.0));
    mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
    mesh.add_vertex(DVec3::new(-1.0, 1.0, 0.0));
    mesh.add_face(&[0, 1, 2, 3]).unwrap();
    mesh
}

/// A 4x4 frame with a 2x2 window, as four quads.
fn square_frame() -> Mesh {
    let mut mesh = Mesh::new();
    for &(x, y) in &[(-2.0, -2.0), (2.0, -2.0), (2.0, 2.0), (-2.0, 2.0)] {
        mesh.add_vertex(DVec3::new(x, y, 0.0));
    }
    for &(x, y) in &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        mesh.add_vertex(DVec3::new(x, y, 0.0));
    }
    for i in 0..4u32 {
        let j = (i + 1) % 4;
        mesh.add_face(&[i, j, j + 4, i + 4]).unwrap();
    }
    mesh
}

fn projected_square(params: &LampshadeParams) -> Mesh {
    project_mesh(&square_pattern(), params).unwrap()
}

#[test]
fn test_square_shell_counts_and_closure() {
    let params = LampshadeParams::new(5.0, 5.0, 0.08).unwrap();
    let surface = projected_square(&params);
    let shell = solidify(
        &surface,
        params.thickness(),
        params.radius(),
        params.sphere_center(),
        ShellStrategy::ExtrudeScale,
    )
    .unwrap();

    assert_eq!(shell.vertex_count(), 8);
    // outer + inner + four walls
    assert_eq!(shell.face_count(), 6);
    assert!(boundary_edges(&shell).is_empty());
    assert!(is_closed(&shell));
    assert!(has_consistent_winding(&shell));
    assert!(shell.validate().is_ok());
}

#[test]
fn test_outer_surface_is_unchanged() {
    let params = LampshadeParams::new(5.0, 5.0, 0.08).unwrap();
    let surface = projected_square(&params);
    let shell = solidify(&surface, 0.08, 5.0, params.sphere_center(), ShellStrategy::ExtrudeScale).unwrap();
    assert_eq!(&shell.vertices()[..4], surface.vertices());
}

#[test]
fn test_extrude_scale_places_inner_surface() {
    let params = LampshadeParams::new(5.0, 5.0, 0.1).unwrap();
    let surface = projected_square(&params);
    let center = params.sphere_center();
    let shell = solidify(&surface, 0.1, 5.0, center, ShellStrategy::ExtrudeScale).unwrap();

    let factor = shrink_factor(0.1, 5.0);
    for i in 0..4u32 {
        let expected = center + (surface.vertex(i) + DVec3::Z * 0.1 - center) * factor;
        let inner = shell.vertex(i + 4);
        assert_relative_eq!(inner.x, expected.x, max_relative = 1e-12);
        assert_relative_eq!(inner.y, expected.y, max_relative = 1e-12);
        assert_relative_eq!(inner.z, expected.z, max_relative = 1e-12);
    }
}

#[test]
fn test_radial_strategy_is_concentric() {
    let params = LampshadeParams::new(5.0, 5.0, 0.25).unwrap();
    let surface = projected_square(&params);
    let center = params.sphere_center();
    let shell = solidify(&surface, 0.25, 5.0, center, ShellStrategy::Radial).unwrap();

    for i in 4..8u32 {
        assert_relative_eq!((shell.vertex(i) - center).length(), 4.75, max_relative = 1e-12);
    }
}

#[test]
fn test_rejects_thickness_out_of_range() {
    let surface = square_pattern();
    for thickness in [0.0, -0.5, 5.0, 6.0, f64::NAN] {
        let err = solidify(&surface, thickness, 5.0, DVec3::Z * 5.0, ShellStrategy::ExtrudeScale)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "thickness {thickness}");
    }
}

#[test]
fn test_rejects_invalid_radius() {
    let err = solidify(&square_pattern(), 0.1, 0.0, DVec3::ZERO, ShellStrategy::Radial).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_frame_with_window_is_closed() {
    let shell = solidify(&square_frame(), 0.1, 5.0, DVec3::Z * 5.0, ShellStrategy::Radial).unwrap();
    assert_eq!(shell.vertex_count(), 16);
    // 4 quads, their copies, 4 rim walls and 4 window walls
    assert_eq!(shell.face_count(), 16);
    assert!(is_closed(&shell));
    assert!(has_consistent_winding(&shell));
}

#[test]
fn test_closed_input_is_degenerate() {
    let shell = solidify(&square_pattern(), 0.1, 5.0, DVec3::ZERO, ShellStrategy::Radial).unwrap();
    let err = solidify(&shell, 0.1, 5.0, DVec3::ZERO, ShellStrategy::Radial).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegenerateInput);
}

#[test]
fn test_empty_input_is_degenerate() {
    let err = solidify(&Mesh::new(), 0.1, 5.0, DVec3::ZERO, ShellStrategy::Radial).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegenerateInput);
}

#[test]
fn test_extrude_region_selection() {
    let mut mesh = square_pattern();
    let selection = extrude_region(&mut mesh, DVec3::Z).unwrap();
    assert_eq!(selection.indices(), 4..8);
    assert_eq!(selection.len(), 4);
    assert_eq!(mesh.vertex(4), DVec3::new(-1.0, -1.0, 1.0));

    scale_selection(&mut mesh, &selection, 0.5, DVec3::ZERO);
    assert_eq!(mesh.vertex(4), DVec3::new(-0.5, -0.5, 0.5));
    assert_eq!(mesh.vertex(0), DVec3::new(-1.0, -1.0, 0.0));
}
