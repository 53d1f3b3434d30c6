//! Serde model of the subset of the Tiled JSON map format (`.tmj`) the game reads.

use serde::Deserialize;

/// Flip/rotation flags stored in the top bits of a tile gid.
pub const GID_FLAGS: u32 = 0xE000_0000;

/// Strips the flip/rotation flags from a gid.
pub fn strip_flags(gid: u32) -> u32 {
    gid & !GID_FLAGS
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMap {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<RawLayer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RawLayer {
    #[serde(rename = "tilelayer")]
    Tiles(RawTileLayer),
    #[serde(rename = "objectgroup")]
    Objects(RawObjectGroup),
    /// Image and group layers carry nothing the game uses.
    #[serde(other)]
    Other,
}

impl RawLayer {
    pub fn name(&self) -> Option<&str> {
        match self {
            RawLayer::Tiles(layer) => Some(&layer.name),
            RawLayer::Objects(group) => Some(&group.name),
            RawLayer::Other => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major gids; absent for infinite (chunked) maps.
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawObjectGroup {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<RawObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawObject {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub gid: Option<u32>,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

impl RawObject {
    /// Top-left corner. Tile objects are anchored bottom-left in Tiled, everything else top-left.
    pub fn top_left(&self) -> (f32, f32) {
        match self.gid {
            Some(_) => (self.x, self.y - self.height),
            None => (self.x, self.y),
        }
    }

    pub fn float_property(&self, name: &str) -> Option<f32> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .and_then(|property| property.value.as_f64())
            .map(|value| value as f32)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    pub name: String,
    pub value: serde_json::Value,
}
