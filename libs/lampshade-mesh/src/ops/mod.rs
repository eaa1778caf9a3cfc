//! # Mesh Operations
//!
//! The geometric stages of a lampshade build: polar mapping, inverse
//! stereographic projection, shell construction and mesh hygiene.

pub mod hygiene;
pub mod polar;
pub mod project;
pub mod solidify;

pub use hygiene::{clean_pattern, HygieneReport};
pub use project::{project_mesh, project_point};
pub use solidify::{solidify, Selection};
