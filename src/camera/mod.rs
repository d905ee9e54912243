//! Camera system for framing and viewing a loaded mesh.
//!
//! Provides the perspective camera, the orbital controller with
//! per-gesture enables and inertia, and the auto-framing heuristic that
//! places the camera from mesh bounds.

/// Orbital camera controller with rotate/pan/zoom enables and inertia.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;
/// Auto-framing camera placement from mesh bounds.
pub mod framing;
