// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Embeddable GPU viewer for STL meshes with an auto-framing camera.
//!
//! Mirador loads a mesh file, centers it at the origin, and places the
//! camera so the whole model fits the view: flat or elongated models
//! are framed face-on along their thinnest dimension, roughly cubic
//! models along the diagonal. Pan, zoom, rotate, inertia, and an axis
//! gizmo are independently toggleable, and rendering is gated on a
//! host-provided visibility signal so off-screen widgets cost nothing.
//!
//! # Key entry points
//!
//! - [`ViewerSession`] - the embeddable widget state (lifecycle, load
//!   pipeline, events, per-frame update/render)
//! - [`camera::framing`] - the pure auto-framing heuristic
//! - [`Options`] - runtime configuration (camera, control toggles,
//!   display)
//! - `Viewer` - a standalone winit window (`viewer` feature)
//!
//! # Architecture
//!
//! Mesh parsing runs on a background `mesh-loader` thread; results
//! carry a generation token and the session discards any result that
//! is not from the most recently issued request, so a stale mesh can
//! never overwrite a newer one. The main thread only uploads prepared
//! vertices and records a single forward pass.

/// Camera, orbital controller, and auto-framing.
pub mod camera;
/// Crate-level error types.
pub mod error;
/// GPU resource management utilities.
pub mod gpu;
/// Platform-agnostic input handling.
pub mod input;
/// Scene lighting uniform.
pub mod lighting;
/// STL mesh loading and CPU-side mesh data.
pub mod mesh;
/// Runtime configuration with TOML preset support.
pub mod options;
/// Forward renderers for the mesh and the axis gizmo.
pub mod renderer;
/// The embeddable viewer session.
pub mod session;
/// Small shared utilities.
pub mod util;
/// Standalone winit viewer window.
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::ViewerError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
pub use session::{LoadToken, ViewerEvent, ViewerSession};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
