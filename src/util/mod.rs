//! Small shared utilities.

/// Frame pacing with FPS tracking.
pub mod frame_timing;
