use std::path::Path;

use anyhow::Context;
use macroquad::prelude::{vec2, Vec2};
use serde::Deserialize;
use tracing::info;

use crate::input::KeyPreset;
use crate::map::DEFAULT_GRID;
use crate::motion::MotionConfig;
use crate::render::CompositeMode;

/// Tunables of a playable stage, read from a JSON file.
///
/// Every field is optional; missing ones keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Cell width in pixels.
    pub tile_width: f32,
    /// Cell height in pixels.
    pub tile_height: f32,
    /// Step size and speed.
    pub motion: MotionConfig,
    /// Which keys walk.
    pub keys: KeyPreset,
    /// Tile/actor interleaving.
    pub composite: CompositeMode,
    /// Keep the camera inside the world.
    pub clamp_camera: bool,
    /// Refuse steps that leave the map's bounding rect.
    pub confine_to_map: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            tile_width: DEFAULT_GRID,
            tile_height: DEFAULT_GRID,
            motion: MotionConfig::default(),
            keys: KeyPreset::default(),
            composite: CompositeMode::default(),
            clamp_camera: true,
            confine_to_map: false,
        }
    }
}

impl StageConfig {
    /// Parses a config document.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let cfg: StageConfig = serde_json::from_str(text).context("invalid stage config")?;
        anyhow::ensure!(
            cfg.tile_width > 0.0 && cfg.tile_height > 0.0,
            "tile size must be positive, got {}x{}",
            cfg.tile_width,
            cfg.tile_height
        );
        anyhow::ensure!(
            cfg.motion.step_distance > 0.0 && cfg.motion.pixels_per_second > 0.0,
            "motion step and speed must be positive"
        );
        Ok(cfg)
    }

    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read stage config {}", path.display()))?;
        let cfg = Self::from_json(&text)
            .with_context(|| format!("failed to load stage config {}", path.display()))?;
        info!(path = %path.display(), "loaded stage config");
        Ok(cfg)
    }

    /// Cell size as a vector.
    pub fn grid(&self) -> Vec2 {
        vec2(self.tile_width, self.tile_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = StageConfig::from_json("{}").expect("config");
        assert_eq!(cfg, StageConfig::default());
        assert_eq!(cfg.motion.step_distance, 32.0);
        assert!(cfg.clamp_camera);
    }

    #[test]
    fn fields_override_defaults() {
        let cfg = StageConfig::from_json(
            r#"{"tile_width":16,"tile_height":16,"keys":"wasd_neo","composite":"stacked",
                "motion":{"pixels_per_second":64}}"#,
        )
        .expect("config");
        assert_eq!(cfg.grid(), vec2(16.0, 16.0));
        assert_eq!(cfg.keys, KeyPreset::WasdNeo);
        assert_eq!(cfg.composite, CompositeMode::Stacked);
        assert_eq!(cfg.motion.step_distance, 32.0);
        assert_eq!(cfg.motion.pixels_per_second, 64.0);
    }

    #[test]
    fn zero_speed_is_rejected() {
        assert!(StageConfig::from_json(r#"{"motion":{"pixels_per_second":0}}"#).is_err());
    }
}
