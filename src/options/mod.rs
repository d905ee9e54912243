//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (camera projection and sensitivities, control
//! toggles, surface display) are consolidated here. Options serialize
//! to/from TOML so hosts can ship view presets.

mod camera;
mod controls;
mod display;

use std::path::Path;

pub use camera::CameraOptions;
pub use controls::{parse_toggle, ControlOptions};
pub use display::DisplayOptions;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]`
/// so partial TOML files (e.g. only overriding `[controls]`) work
/// correctly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control-sensitivity parameters.
    pub camera: CameraOptions,
    /// Interactive control toggles.
    pub controls: ControlOptions,
    /// Surface material and background parameters.
    pub display: DisplayOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[controls]
inertia = true
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert!(opts.controls.inertia);
        // Everything else should be default
        assert!(opts.controls.pan);
        assert!(!opts.controls.gizmos);
        assert_eq!(opts.camera.fovy, 60.0);
        assert_eq!(opts.display.roughness, 0.8);
    }
}
