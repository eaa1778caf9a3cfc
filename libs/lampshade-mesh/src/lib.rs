//! # Lampshade Mesh
//!
//! Turns a flat, closed pattern into a printable lampshade shell by inverse
//! stereographic projection onto a sphere followed by wall thickening.
//!
//! ## Architecture
//!
//! ```text
//! Pattern → normalize → meshify + hygiene → project → shell → orient → recenter → Mesh
//! ```
//!
//! ## Modules
//!
//! - [`ops::polar`] / [`ops::project`]: the per-vertex spherical lift (parallel)
//! - [`ops::solidify`]: extrusion, inner-surface scaling, wall stitching
//! - [`ops::hygiene`]: vertex merging, sliver regularization, winding repair
//! - [`editor`]: the editing capability the pipeline is written against
//! - [`pipeline`]: the staged build with all-or-nothing failure
//!
//! ## Usage
//!
//! ```rust
//! use lampshade_mesh::{build_lampshade, BuildOptions, LampshadeParams, Pattern};
//! use glam::DVec2;
//!
//! let outline = vec![
//!     DVec2::new(-0.01, -0.01),
//!     DVec2::new(0.01, -0.01),
//!     DVec2::new(0.01, 0.01),
//!     DVec2::new(-0.01, 0.01),
//! ];
//! let shell = build_lampshade(
//!     Pattern::Outlines(vec![outline]),
//!     &LampshadeParams::default(),
//!     &BuildOptions::default(),
//! )?;
//! assert_eq!(shell.face_count(), 6);
//! # Ok::<(), lampshade_mesh::PipelineError>(())
//! ```

pub mod editor;
pub mod error;
pub mod mesh;
pub mod ops;
pub mod params;
pub mod pattern;
pub mod pipeline;
pub mod topology;

pub use editor::{MeshEditor, NativeEditor};
pub use error::{ErrorKind, MeshError};
pub use mesh::{Face, Mesh};
pub use ops::solidify::Selection;
pub use params::{BuildOptions, LampshadeParams, ShellStrategy};
pub use pattern::Pattern;
pub use pipeline::{build_lampshade, build_lampshade_with, PipelineError, Stage};
