//! Populates an ECS world from a [`Level`].

use bevy_ecs::{entity::Entity, world::World};
use glam::UVec2;
use tracing::{debug, info};

use crate::config::{Layer, Settings};
use crate::constants::platform::{DEFAULT_TRAVEL, SPEED};
use crate::error::{GameError, GameResult};
use crate::geometry::Rect;
use crate::level::Level;
use crate::sprite::{ActorKind, Facing, Pose, SpriteKey, SpriteMetrics};
use crate::systems::{
    ActorBundle, Collidable, Depth, Hitbox, MovingPlatform, Position, PreviousHitbox, Renderable, SpawnCounter, TileBundle,
};

/// Vertical travel limits for a platform at `rect`: the nearest border above and below that shares
/// some horizontal span with it, or `DEFAULT_TRAVEL` from the spawn point when a side is open.
pub fn platform_bounds(rect: &Rect, borders: &[Rect]) -> (i32, i32) {
    let spans = |border: &&Rect| border.left() < rect.right() && rect.left() < border.right();
    let travel = DEFAULT_TRAVEL as i32;

    let min_top = borders
        .iter()
        .filter(spans)
        .filter(|border| border.bottom() <= rect.top())
        .map(|border| border.bottom())
        .max()
        .unwrap_or(rect.top() - travel);
    let max_bottom = borders
        .iter()
        .filter(spans)
        .filter(|border| border.top() >= rect.bottom())
        .map(|border| border.top())
        .min()
        .unwrap_or(rect.bottom() + travel);

    (min_top, max_bottom)
}

/// Drops an actor onto the collision tile under its mid-bottom point, if there is one.
pub fn snap_to_ground(rect: &mut Rect, tiles: &[Rect]) {
    let foot = rect.midbottom();
    if let Some(tile) = tiles.iter().find(|tile| tile.contains_point(foot)) {
        rect.set_bottom(tile.top());
    }
}

fn actor_size(metrics: &SpriteMetrics, kind: ActorKind) -> UVec2 {
    metrics.size(&SpriteKey::Actor {
        kind,
        pose: Pose::Idle,
        facing: Facing::Right,
        frame: 0,
    })
}

/// Spawns tiles, the player, enemies and platforms. Returns the player entity.
///
/// The world must already hold `Settings`, `SpriteMetrics` and a `SpawnCounter`.
pub fn spawn_level(world: &mut World, level: &Level) -> GameResult<Entity> {
    let settings = world
        .get_resource::<Settings>()
        .cloned()
        .ok_or_else(|| GameError::InvalidState("Settings resource missing".to_string()))?;
    let metrics = world
        .get_resource::<SpriteMetrics>()
        .cloned()
        .ok_or_else(|| GameError::InvalidState("SpriteMetrics resource missing".to_string()))?;
    let mut counter = world.remove_resource::<SpawnCounter>().unwrap_or_default();

    for layer in level.missing_layers() {
        debug!(layer = %layer, "Layer absent from map, nothing to draw");
    }

    for (layer, tiles) in &level.layers {
        let depth = settings.depth(*layer);
        for tile in tiles {
            let rect = Rect::from_top_left((tile.cell * level.tile_size).as_ivec2(), level.tile_size);
            let bundle = TileBundle {
                position: Position(rect.top_left().as_vec2()),
                hitbox: Hitbox(rect),
                previous: PreviousHitbox(rect),
                depth: Depth(depth),
                order: counter.next(),
                sprite: Renderable::new(SpriteKey::Tile(tile.gid)),
            };
            if *layer == Layer::Level {
                world.spawn((bundle, Collidable));
            } else {
                world.spawn(bundle);
            }
        }
    }

    let actor_depth = settings.depth(Layer::Entities);
    let ground: Vec<Rect> = level.collision_rects().collect();

    let player_rect = Rect::from_top_left(level.player, actor_size(&metrics, ActorKind::Player));
    let player = world.spawn(ActorBundle::player(player_rect, actor_depth, counter.next())).id();
    info!(?player, x = player_rect.x, y = player_rect.y, "Player spawned");

    for spawn in &level.enemies {
        let mut rect = Rect::from_top_left(spawn.position, actor_size(&metrics, ActorKind::Enemy));
        snap_to_ground(&mut rect, &ground);
        let enemy = world
            .spawn(ActorBundle::enemy(rect, actor_depth, counter.next(), Some(player), spawn.patrol))
            .id();
        debug!(?enemy, x = rect.x, y = rect.y, patrol = spawn.patrol, "Enemy spawned");
    }

    let platform_depth = settings.depth(Layer::Platforms);
    for &top_left in &level.platforms {
        let rect = Rect::from_top_left(top_left, metrics.size(&SpriteKey::Platform));
        let (min_top, max_bottom) = platform_bounds(&rect, &level.borders);
        world.spawn((
            TileBundle {
                position: Position(top_left.as_vec2()),
                hitbox: Hitbox(rect),
                previous: PreviousHitbox(rect),
                depth: Depth(platform_depth),
                order: counter.next(),
                sprite: Renderable::new(SpriteKey::Platform),
            },
            Collidable,
            MovingPlatform {
                direction: -1.0,
                speed: SPEED,
                min_top,
                max_bottom,
            },
        ));
        debug!(x = rect.x, y = rect.y, min_top, max_bottom, "Platform spawned");
    }

    world.insert_resource(counter);
    Ok(player)
}
