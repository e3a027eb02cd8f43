use std::path::Path;

use anyhow::{Context, Result};
use emath::{Pos2, Vec2, pos2};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ITERATIONS: usize = 300;
pub const DEFAULT_CANCEL_CHECK_INTERVAL: usize = 25;

// Margin added to the focus node so it clears the dashboard's overlay panels.
pub const DEFAULT_FOCUS_OFFSET: Vec2 = Vec2::new(150.0, 50.0);
pub const DEFAULT_CAMERA_DURATION_MS: u32 = 800;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Pos2 {
        pos2(self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationSettings {
    pub iterations: usize,
    pub cancel_check_interval: usize,
    // When set, stop once no node moves further than this in one tick.
    // Off by default: the layout always runs `iterations` ticks.
    pub stop_on_displacement: Option<f32>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
            stop_on_displacement: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FocusSettings {
    pub offset: Vec2,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_numerator: f32,
    pub duration_ms: u32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            offset: DEFAULT_FOCUS_OFFSET,
            min_zoom: 1.0,
            max_zoom: 1.5,
            zoom_numerator: 8.0,
            duration_ms: DEFAULT_CAMERA_DURATION_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionPolicy {
    #[default]
    Reset,
    CarryForward,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub viewport: Viewport,
    pub simulation: SimulationSettings,
    pub focus: FocusSettings,
    pub positions: PositionPolicy,
}

impl EngineSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_use_defaults() {
        let settings: EngineSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.simulation.iterations, 300);
        assert_eq!(settings.viewport.center(), pos2(400.0, 300.0));
        assert_eq!(settings.focus.offset, Vec2::new(150.0, 50.0));
        assert_eq!(settings.positions, PositionPolicy::Reset);
    }

    #[test]
    fn partial_settings_override_selected_fields() {
        let settings: EngineSettings = serde_json::from_str(
            r#"{
                "viewport": {"width": 1200},
                "simulation": {"stopOnDisplacement": 0.05},
                "positions": "carryForward"
            }"#,
        )
        .unwrap();
        assert_eq!(settings.viewport.width, 1200.0);
        assert_eq!(settings.viewport.height, 600.0);
        assert_eq!(settings.simulation.stop_on_displacement, Some(0.05));
        assert_eq!(settings.simulation.iterations, 300);
        assert_eq!(settings.positions, PositionPolicy::CarryForward);
    }
}
