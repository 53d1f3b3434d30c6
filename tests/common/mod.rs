#![allow(dead_code)]

use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use contra::config::Settings;
use contra::game::Game;
use contra::level::Level;
use contra::systems::{Enemy, PlayerControlled};
use serde_json::{json, Value};

pub const TILE: u32 = 64;

/// Builds Tiled JSON maps in memory.
pub struct MapBuilder {
    width: u32,
    height: u32,
    level: Vec<u32>,
    background: Option<Vec<u32>>,
    entities: Vec<Value>,
    platforms: Vec<Value>,
}

impl MapBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            level: vec![0; (width * height) as usize],
            background: None,
            entities: Vec::new(),
            platforms: Vec::new(),
        }
    }

    /// A map with a solid bottom row and the player standing on it at column 2.
    pub fn floor(width: u32, height: u32) -> Self {
        let mut map = Self::new(width, height);
        for x in 0..width {
            map = map.solid(x, height - 1);
        }
        map.player(2 * TILE as i32, ((height - 2) * TILE) as i32)
    }

    pub fn solid(mut self, x: u32, y: u32) -> Self {
        self.level[(y * self.width + x) as usize] = 1;
        self
    }

    pub fn background(mut self, x: u32, y: u32, gid: u32) -> Self {
        let size = (self.width * self.height) as usize;
        let layer = self.background.get_or_insert_with(|| vec![0; size]);
        layer[(y * self.width + x) as usize] = gid;
        self
    }

    pub fn player(mut self, x: i32, y: i32) -> Self {
        self.entities.push(json!({ "name": "Player", "x": x, "y": y }));
        self
    }

    pub fn enemy(mut self, x: i32, y: i32, patrol: f32) -> Self {
        self.entities.push(json!({
            "name": "Enemy",
            "x": x,
            "y": y,
            "properties": [{ "name": "patrol", "type": "float", "value": patrol }]
        }));
        self
    }

    pub fn platform(mut self, x: i32, y: i32) -> Self {
        self.platforms.push(json!({ "name": "Platform", "x": x, "y": y, "width": 128, "height": 32 }));
        self
    }

    pub fn border(mut self, x: i32, y: i32, width: u32, height: u32) -> Self {
        self.platforms
            .push(json!({ "name": "Border", "x": x, "y": y, "width": width, "height": height }));
        self
    }

    fn tile_layer(&self, name: &str, data: &[u32]) -> Value {
        json!({
            "type": "tilelayer",
            "name": name,
            "width": self.width,
            "height": self.height,
            "data": data,
        })
    }

    pub fn to_json(&self) -> String {
        let mut layers = vec![self.tile_layer("Level", &self.level)];
        if let Some(background) = &self.background {
            layers.push(self.tile_layer("BG", background));
        }
        layers.push(json!({ "type": "objectgroup", "name": "Entities", "objects": self.entities }));
        layers.push(json!({ "type": "objectgroup", "name": "Platforms", "objects": self.platforms }));

        json!({
            "width": self.width,
            "height": self.height,
            "tilewidth": TILE,
            "tileheight": TILE,
            "layers": layers,
        })
        .to_string()
    }

    pub fn build(&self) -> Level {
        Level::from_json(&self.to_json()).expect("test map should parse")
    }
}

pub fn game(level: Level) -> Game {
    Game::headless(Settings::default(), level).expect("test level should spawn")
}

pub fn player(game: &mut Game) -> Entity {
    game.world
        .query_filtered::<Entity, With<PlayerControlled>>()
        .single(&game.world)
        .expect("exactly one player")
}

pub fn enemies(game: &mut Game) -> Vec<Entity> {
    game.world.query_filtered::<Entity, With<Enemy>>().iter(&game.world).collect()
}

/// Runs `ticks` fixed steps of `dt` seconds.
pub fn run(game: &mut Game, ticks: usize, dt: f32) {
    for _ in 0..ticks {
        game.tick(dt);
    }
}
