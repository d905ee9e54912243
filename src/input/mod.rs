//! Platform-agnostic input handling.
//!
//! Raw events are fed into an [`InputProcessor`] which converts them
//! into [`ViewerCommand`] values the session applies to the camera.

/// Platform-agnostic input events.
pub mod event;
/// Raw-event to command conversion.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, ViewerCommand};
