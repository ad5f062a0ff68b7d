use crate::error::{EngineError, Result};
use crate::geom::Rgba;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Engine settings, usually read from a small JSON file next to the game.
///
/// Every field is optional in JSON; missing ones take the [`Default`] value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    pub window_width: i32,
    pub window_height: i32,
    pub target_fps: u32,
    pub clear_color: Rgba,
    pub initial_zoom: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "isoframe".to_owned(),
            window_width: 800,
            window_height: 600,
            target_fps: 30,
            clear_color: Rgba::new(20, 0, 20, 255),
            initial_zoom: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(|source| EngineError::Json {
            path: "<inline>".into(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&txt).map_err(|source| EngineError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(EngineError::InvalidConfig(
                "target_fps must be greater than 0".into(),
            ));
        }
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "window size must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        Ok(())
    }

    /// Time budget of one frame at `target_fps`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}
