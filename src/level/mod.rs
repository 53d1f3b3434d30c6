//! Level data: the parsed map, independent of the ECS world it is spawned into.

use std::path::Path;

use glam::{IVec2, UVec2};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::config::Layer;
use crate::error::LevelError;
use crate::geometry::Rect;

pub mod spawn;
pub mod tiled;

use self::tiled::{strip_flags, RawLayer, RawMap, RawObject};

/// One non-empty cell of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub cell: UVec2,
    /// Global tile id with flip flags already stripped.
    pub gid: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    pub position: IVec2,
    /// Patrol half-width in pixels, from the object's `patrol` property.
    pub patrol: f32,
}

/// A parsed map: tile layers, spawn points, platforms and their borders.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Map size in tiles.
    pub size: UVec2,
    pub tile_size: UVec2,
    /// Tile layers that are present in the map, in load order.
    pub layers: Vec<(Layer, Vec<TilePlacement>)>,
    pub player: IVec2,
    pub enemies: Vec<EnemySpawn>,
    pub platforms: Vec<IVec2>,
    /// Invisible rectangles that turn moving platforms around.
    pub borders: Vec<Rect>,
}

/// Order in which tile layers are spawned: collision geometry first, decoration after.
const TILE_LAYERS: [Layer; 5] = [
    Layer::Level,
    Layer::Background,
    Layer::BackgroundDetail,
    Layer::ForegroundDetailBottom,
    Layer::ForegroundDetailTop,
];

impl Level {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading level");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let map: RawMap = serde_json::from_str(json)?;
        Self::from_raw(map)
    }

    fn from_raw(map: RawMap) -> Result<Self, LevelError> {
        let find = |name: &str| map.layers.iter().find(|layer| layer.name() == Some(name));

        let mut layers = Vec::new();
        for layer in TILE_LAYERS {
            let name: &'static str = layer.into();
            match find(name) {
                Some(RawLayer::Tiles(raw)) => {
                    if let Some(encoding) = raw.encoding.as_deref().filter(|encoding| *encoding != "csv") {
                        return Err(LevelError::UnsupportedEncoding {
                            name: name.to_string(),
                            encoding: encoding.to_string(),
                        });
                    }
                    let expected = (raw.width * raw.height) as usize;
                    if raw.data.len() != expected {
                        return Err(LevelError::LayerSize {
                            name: name.to_string(),
                            expected,
                            actual: raw.data.len(),
                        });
                    }
                    let tiles = raw
                        .data
                        .iter()
                        .enumerate()
                        .map(|(index, &gid)| (index as u32, strip_flags(gid)))
                        .filter(|&(_, gid)| gid != 0)
                        .map(|(index, gid)| TilePlacement {
                            cell: UVec2::new(index % raw.width, index / raw.width),
                            gid,
                        })
                        .collect();
                    layers.push((layer, tiles));
                }
                _ if layer == Layer::Level => return Err(LevelError::MissingLayer(name.to_string())),
                _ => debug!(layer = name, "Optional tile layer not present"),
            }
        }

        let entities = match find(Layer::Entities.into()) {
            Some(RawLayer::Objects(group)) => group.objects.as_slice(),
            _ => return Err(LevelError::MissingLayer(Layer::Entities.to_string())),
        };

        let players: Vec<&RawObject> = entities.iter().filter(|object| object.name == "Player").collect();
        let player = match players.as_slice() {
            [player] => pixel(player.top_left()),
            [] => return Err(LevelError::MissingPlayer),
            many => return Err(LevelError::DuplicatePlayer(many.len())),
        };

        let enemies = entities
            .iter()
            .filter(|object| object.name == "Enemy")
            .map(|object| EnemySpawn {
                position: pixel(object.top_left()),
                patrol: object.float_property("patrol").unwrap_or(0.0).max(0.0),
            })
            .collect();

        for object in entities.iter().filter(|object| object.name != "Player" && object.name != "Enemy") {
            warn!(name = %object.name, "Ignoring unknown entity object");
        }

        let mut platforms = Vec::new();
        let mut borders = Vec::new();
        if let Some(RawLayer::Objects(group)) = find(Layer::Platforms.into()) {
            for object in &group.objects {
                let top_left = pixel(object.top_left());
                if object.name == "Platform" {
                    platforms.push(top_left);
                } else {
                    borders.push(Rect::from_top_left(
                        top_left,
                        UVec2::new(object.width.max(0.0) as u32, object.height.max(0.0) as u32),
                    ));
                }
            }
        }

        let level = Level {
            size: UVec2::new(map.width, map.height),
            tile_size: UVec2::new(map.tile_width, map.tile_height),
            layers,
            player,
            enemies,
            platforms,
            borders,
        };
        debug!(
            width = level.size.x,
            height = level.size.y,
            enemies = level.enemies.len(),
            platforms = level.platforms.len(),
            "Level parsed"
        );
        Ok(level)
    }

    /// The whole map in pixels, anchored at the origin.
    pub fn pixel_rect(&self) -> Rect {
        Rect::from_top_left(IVec2::ZERO, self.size * self.tile_size)
    }

    pub fn tiles(&self, layer: Layer) -> &[TilePlacement] {
        self.layers
            .iter()
            .find(|(candidate, _)| *candidate == layer)
            .map(|(_, tiles)| tiles.as_slice())
            .unwrap_or(&[])
    }

    /// Pixel rectangles of every collision tile.
    pub fn collision_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.tiles(Layer::Level)
            .iter()
            .map(|tile| Rect::from_top_left((tile.cell * self.tile_size).as_ivec2(), self.tile_size))
    }

    /// Names of the layers this level knows about but that were missing from the map.
    pub fn missing_layers(&self) -> Vec<Layer> {
        Layer::iter()
            .filter(|layer| !matches!(layer, Layer::Entities | Layer::Platforms))
            .filter(|layer| !self.layers.iter().any(|(present, _)| present == layer))
            .collect()
    }
}

fn pixel((x, y): (f32, f32)) -> IVec2 {
    IVec2::new(x.round() as i32, y.round() as i32)
}
