//! Game settings, loaded from `settings.json`.

use std::collections::HashMap;
use std::path::Path;

use bevy_ecs::resource::Resource;
use glam::Vec2;
use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::debug;

use crate::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::error::ConfigError;

/// The named layers of a level map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Layer {
    #[strum(serialize = "BG")]
    Background,
    #[strum(serialize = "BG Detail")]
    BackgroundDetail,
    #[strum(serialize = "Level")]
    Level,
    #[strum(serialize = "FG Detail Bottom")]
    ForegroundDetailBottom,
    #[strum(serialize = "FG Detail Top")]
    ForegroundDetailTop,
    #[strum(serialize = "Entities")]
    Entities,
    #[strum(serialize = "Platforms")]
    Platforms,
}

impl Layer {
    /// Purely decorative tile layers, drawn but never collided with.
    pub const DECORATIVE: [Layer; 4] = [
        Layer::Background,
        Layer::BackgroundDetail,
        Layer::ForegroundDetailBottom,
        Layer::ForegroundDetailTop,
    ];

    /// Depth used when the settings file omits the layer.
    pub fn default_depth(self) -> i32 {
        match self {
            Layer::Background => 0,
            Layer::BackgroundDetail => 1,
            Layer::Level | Layer::Entities | Layer::Platforms => 2,
            Layer::ForegroundDetailBottom => 3,
            Layer::ForegroundDetailTop => 4,
        }
    }
}

/// Viewport size and per-layer draw depth.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_width")]
    pub window_width: u32,
    #[serde(default = "default_height")]
    pub window_height: u32,
    /// Layer name (as written in the map) to depth key.
    #[serde(default)]
    pub layers: HashMap<String, i32>,
}

fn default_width() -> u32 {
    WINDOW_WIDTH
}

fn default_height() -> u32 {
    WINDOW_HEIGHT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            layers: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading settings");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.window_width,
                height: self.window_height,
            });
        }
        Ok(())
    }

    /// Depth key for a layer, falling back to the built-in ordering.
    pub fn depth(&self, layer: Layer) -> i32 {
        let name: &'static str = layer.into();
        self.layers.get(name).copied().unwrap_or_else(|| layer.default_depth())
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }
}
