use bevy_ecs::{system::RunSystemOnce, world::World};
use contra::geometry::Rect;
use contra::systems::{
    platform_collision_system, platform_motion_system, Collidable, DeltaTime, Hitbox, MovingPlatform, PlayerControlled,
    Position,
};
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{game, player, run, MapBuilder, TILE};

fn spawn_platform(world: &mut World, rect: Rect, direction: f32) -> bevy_ecs::entity::Entity {
    world
        .spawn((
            Position(rect.top_left().as_vec2()),
            Hitbox(rect),
            Collidable,
            MovingPlatform {
                direction,
                speed: 200.0,
                min_top: 0,
                max_bottom: 1000,
            },
        ))
        .id()
}

#[test]
fn test_rising_platform_is_held_at_player_feet() {
    let mut world = World::default();
    world.spawn((PlayerControlled, Hitbox(Rect::new(100, 400, 48, 64))));
    // Feet at 464, platform center at 476
    let platform = spawn_platform(&mut world, Rect::new(80, 460, 128, 32), -1.0);

    world.run_system_once(platform_collision_system).unwrap();

    let rect = world.get::<Hitbox>(platform).unwrap().0;
    assert_eq!(rect.top(), 464);
    assert_eq!(world.get::<Position>(platform).unwrap().0.y, 464.0);
    assert_that(&world.get::<MovingPlatform>(platform).unwrap().direction).is_less_than(0.0);
}

#[test]
fn test_falling_platform_under_player_is_left_alone() {
    let mut world = World::default();
    world.spawn((PlayerControlled, Hitbox(Rect::new(100, 400, 48, 64))));
    let platform = spawn_platform(&mut world, Rect::new(80, 460, 128, 32), 1.0);

    world.run_system_once(platform_collision_system).unwrap();

    assert_eq!(world.get::<Hitbox>(platform).unwrap().0.top(), 460);
    assert_eq!(world.get::<MovingPlatform>(platform).unwrap().direction, 1.0);
}

#[test]
fn test_platform_above_player_is_pushed_up_regardless_of_direction() {
    let mut world = World::default();
    world.spawn((PlayerControlled, Hitbox(Rect::new(100, 400, 48, 64))));
    let platform = spawn_platform(&mut world, Rect::new(80, 380, 128, 32), 1.0);

    world.run_system_once(platform_collision_system).unwrap();

    assert_eq!(world.get::<Hitbox>(platform).unwrap().0.bottom(), 400);
    assert_eq!(world.get::<MovingPlatform>(platform).unwrap().direction, -1.0);
}

#[test]
fn test_platforms_turn_at_their_limits() {
    let mut world = World::default();
    world.insert_resource(DeltaTime(0.1));
    let platform = world
        .spawn((
            Position(Vec2::new(0.0, 110.0)),
            Hitbox(Rect::new(0, 110, 128, 32)),
            MovingPlatform {
                direction: -1.0,
                speed: 200.0,
                min_top: 100,
                max_bottom: 300,
            },
        ))
        .id();

    world.run_system_once(platform_motion_system).unwrap();
    assert_eq!(world.get::<Hitbox>(platform).unwrap().0.top(), 100);
    assert_eq!(world.get::<MovingPlatform>(platform).unwrap().direction, 1.0);

    world.run_system_once(platform_motion_system).unwrap();
    assert_eq!(world.get::<Hitbox>(platform).unwrap().0.top(), 120);
}

#[test]
fn test_player_rides_platform() {
    let level = MapBuilder::new(12, 12)
        .platform(4 * TILE as i32, 8 * TILE as i32)
        .border(4 * TILE as i32, 4 * TILE as i32, 128, 8)
        .border(4 * TILE as i32, 11 * TILE as i32, 128, 8)
        .player(4 * TILE as i32 + 40, 7 * TILE as i32 - 10)
        .build();
    let mut game = game(level);
    let rider = player(&mut game);

    run(&mut game, 30, 1.0 / 60.0);

    let platforms: Vec<Rect> = game
        .world
        .query::<(&Hitbox, &MovingPlatform)>()
        .iter(&game.world)
        .map(|(hitbox, _)| hitbox.0)
        .collect();
    let feet = game.world.get::<Hitbox>(rider).unwrap().0.bottom();
    assert_eq!(platforms.len(), 1);
    assert_that(&(feet - platforms[0].top()).abs()).is_less_than_or_equal_to(1);
}

#[test]
fn test_rider_stays_flush_through_platform_turns() {
    let level = MapBuilder::new(12, 12)
        .platform(4 * TILE as i32, 8 * TILE as i32)
        .border(4 * TILE as i32, 4 * TILE as i32, 128, 8)
        .border(4 * TILE as i32, 11 * TILE as i32, 128, 8)
        .player(4 * TILE as i32 + 40, 7 * TILE as i32 - 10)
        .build();
    let mut game = game(level);
    let rider = player(&mut game);
    run(&mut game, 30, 1.0 / 60.0);

    let mut lowest = i32::MIN;
    for tick in 0..720 {
        game.tick(1.0 / 60.0);
        let top = game
            .world
            .query::<(&Hitbox, &MovingPlatform)>()
            .iter(&game.world)
            .map(|(hitbox, _)| hitbox.0.top())
            .next()
            .unwrap();
        let feet = game.world.get::<Hitbox>(rider).unwrap().0.bottom();
        lowest = lowest.max(top);
        assert!((feet - top).abs() <= 1, "tick {tick}: feet at {feet}, platform top at {top}");
    }

    // The platform reached its lower border at least once
    assert_eq!(lowest, 11 * TILE as i32 - 32);
}
