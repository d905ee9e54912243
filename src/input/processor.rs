//! Converts raw platform events into camera commands.
//!
//! The `InputProcessor` owns the transient input state (cursor
//! tracking, button and modifier flags); the session applies the
//! resulting commands to its camera controller, where the per-gesture
//! enable flags live.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};

/// Camera-facing commands produced from raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    /// Orbit by a screen-space delta.
    Rotate {
        /// Drag delta in physical pixels.
        delta: Vec2,
    },
    /// Pan by a screen-space delta.
    Pan {
        /// Drag delta in physical pixels.
        delta: Vec2,
    },
    /// Zoom by a scroll delta.
    Zoom {
        /// Scroll amount (positive = zoom in).
        delta: f32,
    },
    /// The primary button went down.
    BeginDrag,
    /// The primary button was released.
    EndDrag,
}

/// Converts raw input events into [`ViewerCommand`]s.
pub struct InputProcessor {
    mouse_pos: (f32, f32),
    mouse_pressed: bool,
    shift_pressed: bool,
}

impl InputProcessor {
    /// Create a processor with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mouse_pos: (0.0, 0.0),
            mouse_pressed: false,
            shift_pressed: false,
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> (f32, f32) {
        self.mouse_pos
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
    ) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => {
                Some(ViewerCommand::Zoom { delta })
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    fn handle_cursor_moved(
        &mut self,
        x: f32,
        y: f32,
    ) -> Option<ViewerCommand> {
        let delta =
            Vec2::new(x - self.mouse_pos.0, y - self.mouse_pos.1);
        self.mouse_pos = (x, y);

        if !self.mouse_pressed {
            return None;
        }
        if self.shift_pressed {
            return Some(ViewerCommand::Pan { delta });
        }
        Some(ViewerCommand::Rotate { delta })
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<ViewerCommand> {
        if button != MouseButton::Left {
            return None;
        }
        self.mouse_pressed = pressed;
        if pressed {
            Some(ViewerCommand::BeginDrag)
        } else {
            Some(ViewerCommand::EndDrag)
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(p: &mut InputProcessor) -> Option<ViewerCommand> {
        p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        })
    }

    #[test]
    fn drag_produces_rotate() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::CursorMoved { x: 5.0, y: 5.0 }),
            None
        );
        assert_eq!(press(&mut p), Some(ViewerCommand::BeginDrag));
        assert_eq!(
            p.handle_event(InputEvent::CursorMoved { x: 8.0, y: 4.0 }),
            Some(ViewerCommand::Rotate {
                delta: Vec2::new(3.0, -1.0)
            })
        );
    }

    #[test]
    fn shift_drag_produces_pan() {
        let mut p = InputProcessor::new();
        let _ = press(&mut p);
        let _ =
            p.handle_event(InputEvent::ModifiersChanged { shift: true });
        assert!(matches!(
            p.handle_event(InputEvent::CursorMoved { x: 2.0, y: 0.0 }),
            Some(ViewerCommand::Pan { .. })
        ));
    }

    #[test]
    fn scroll_produces_zoom() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(ViewerCommand::Zoom { delta: 1.5 })
        );
    }

    #[test]
    fn secondary_buttons_are_ignored() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            }),
            None
        );
    }
}
