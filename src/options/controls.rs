use serde::{Deserialize, Serialize};

/// Interactive control toggles, one independent flag per gesture class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ControlOptions {
    /// Pan gestures move the focus point.
    pub pan: bool,
    /// Scroll gestures change the eye distance.
    pub zoom: bool,
    /// Drag gestures orbit the camera.
    pub rotate: bool,
    /// Rotation coasts after the drag ends.
    pub inertia: bool,
    /// Axis gizmo is drawn over the scene.
    pub gizmos: bool,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            pan: true,
            zoom: true,
            rotate: true,
            inertia: false,
            gizmos: false,
        }
    }
}

/// Parse an `"on"`/`"off"` toggle string.
///
/// Any other value returns `None` — callers treat that as "leave the
/// flag unchanged".
#[must_use]
pub fn parse_toggle(value: &str) -> Option<bool> {
    match value {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_accepts_only_on_and_off() {
        assert_eq!(parse_toggle("on"), Some(true));
        assert_eq!(parse_toggle("off"), Some(false));
        assert_eq!(parse_toggle("ON"), None);
        assert_eq!(parse_toggle("true"), None);
        assert_eq!(parse_toggle(""), None);
    }

    #[test]
    fn defaults_match_widget_contract() {
        let c = ControlOptions::default();
        assert!(c.pan);
        assert!(c.zoom);
        assert!(c.rotate);
        assert!(!c.inertia);
        assert!(!c.gizmos);
    }
}
