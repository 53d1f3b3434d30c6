use bevy_ecs::entity::Entity;
use contra::constants::mechanics::KILL_SCORE;
use contra::constants::projectile::{FIRE_FPS, LIFETIME, SPEED};
use contra::sprite::{Facing, SpriteKey, SpriteMetrics};
use contra::systems::{
    ActorState, AudioEvent, Bullet, BulletBundle, FireAnimation, Health, Hitbox, InputState, ScoreResource, Sound,
    SpawnCounter, WorldBounds,
};
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{enemies, game, player, run, MapBuilder, TILE};

fn spawn_bullet(game: &mut contra::game::Game, center: Vec2, facing: Facing, speed: f32, owner: Entity) -> Entity {
    let order = game.world.resource_mut::<SpawnCounter>().next();
    let metrics = game.world.resource::<SpriteMetrics>().clone();
    game.world
        .spawn(BulletBundle::new(center, facing, speed, owner, &metrics, 2, order))
        .id()
}

fn bullet_count(game: &mut contra::game::Game) -> usize {
    game.world.query::<&Bullet>().iter(&game.world).count()
}

fn flash_count(game: &mut contra::game::Game) -> usize {
    game.world.query::<&FireAnimation>().iter(&game.world).count()
}

/// Settles the player on the floor and fires a single shot.
fn fire_once(game: &mut contra::game::Game) {
    run(game, 5, 1.0 / 60.0);
    game.set_input(InputState::FIRE);
    game.tick(1.0 / 60.0);
    game.set_input(InputState::empty());
}

#[test]
fn test_bullet_is_absorbed_by_tile() {
    let level = MapBuilder::new(10, 10).solid(0, 0).player(5 * TILE as i32, 5 * TILE as i32).build();
    let mut game = game(level);
    let shooter = player(&mut game);

    let bullet = spawn_bullet(&mut game, Vec2::new(-10.0, 32.0), Facing::Right, 10.0, shooter);
    run(&mut game, 2, 0.1);

    assert_that(&game.world.get_entity(bullet).is_err()).is_true();
    assert_that(&game.draw_list().contains(&SpriteKey::Bullet(Facing::Right))).is_false();
}

#[test]
fn test_simultaneous_bullets_kill_once() {
    let level = MapBuilder::floor(20, 8).enemy(10 * TILE as i32, 6 * TILE as i32, 0.0).build();
    let mut game = game(level);
    let shooter = player(&mut game);
    let enemy = enemies(&mut game)[0];
    *game.world.get_mut::<Health>(enemy).unwrap() = Health::new(1);

    let center = game.world.get::<Hitbox>(enemy).unwrap().0.center().as_vec2();
    let first = spawn_bullet(&mut game, center, Facing::Right, 10.0, shooter);
    let second = spawn_bullet(&mut game, center, Facing::Right, 10.0, shooter);

    game.tick(1.0 / 60.0);

    assert_that(&game.world.get_entity(enemy).is_err()).is_true();
    assert_that(&game.world.get_entity(first).is_err()).is_true();
    assert_that(&game.world.get_entity(second).is_err()).is_true();
    assert_eq!(game.world.resource::<ScoreResource>().0, KILL_SCORE);
    assert_eq!(game.status().enemies_alive, 0);
}

#[test]
fn test_bullets_ignore_their_owner() {
    let level = MapBuilder::floor(20, 8).enemy(10 * TILE as i32, 6 * TILE as i32, 0.0).build();
    let mut game = game(level);
    let enemy = enemies(&mut game)[0];

    let center = game.world.get::<Hitbox>(enemy).unwrap().0.center().as_vec2();
    let bullet = spawn_bullet(&mut game, center, Facing::Left, 0.0, enemy);
    game.tick(1.0 / 60.0);

    assert_that(&game.world.get_entity(bullet).is_ok()).is_true();
    assert_eq!(game.world.get::<Health>(enemy).unwrap().current, 3);
}

#[test]
fn test_hit_starts_hurt_window() {
    let level = MapBuilder::floor(20, 8).enemy(10 * TILE as i32, 6 * TILE as i32, 0.0).build();
    let mut game = game(level);
    let shooter = player(&mut game);
    let enemy = enemies(&mut game)[0];

    let center = game.world.get::<Hitbox>(enemy).unwrap().0.center().as_vec2();
    spawn_bullet(&mut game, center, Facing::Right, 0.0, shooter);
    game.tick(0.1);

    let health = *game.world.get::<Health>(enemy).unwrap();
    assert_eq!(health.current, 2);
    assert_that(&health.is_vulnerable()).is_false();
    assert_eq!(game.world.get::<contra::systems::Actor>(enemy).unwrap().state, ActorState::Hurt);
    assert_that(&game.drain_audio().contains(&AudioEvent::PlaySound(Sound::Hit))).is_true();

    // The window closes after half a second
    run(&mut game, 6, 0.1);
    let health = *game.world.get::<Health>(enemy).unwrap();
    assert_that(&health.is_vulnerable()).is_true();
    assert_that(&game.world.get::<contra::systems::Actor>(enemy).unwrap().state).is_not_equal_to(ActorState::Hurt);
}

#[test]
fn test_player_health_never_increases() {
    let level = MapBuilder::floor(20, 8).build();
    let mut game = game(level);
    let target = player(&mut game);

    let mut history = vec![game.status().player_health];
    for _ in 0..80 {
        let center = game.world.get::<Hitbox>(target).unwrap().0.center().as_vec2();
        spawn_bullet(&mut game, center, Facing::Left, 0.0, Entity::PLACEHOLDER);
        game.tick(0.1);
        history.push(game.status().player_health);
    }

    assert_that(&history.windows(2).all(|pair| pair[1] <= pair[0])).is_true();
    assert_eq!(history.last().copied(), Some(0));

    let status = game.status();
    assert_that(&status.game_over).is_true();
    assert_eq!(game.world.get::<contra::systems::Actor>(target).unwrap().state, ActorState::Dead);
}

#[test]
fn test_fire_input_spawns_bullet_and_flash() {
    let level = MapBuilder::floor(20, 8).build();
    let mut game = game(level);
    run(&mut game, 5, 1.0 / 60.0);
    game.drain_audio();

    game.set_input(InputState::FIRE);
    game.tick(1.0 / 60.0);

    assert_eq!(bullet_count(&mut game), 1);
    assert_that(&game.drain_audio().contains(&AudioEvent::PlaySound(Sound::Shoot))).is_true();
    assert_that(&game.draw_list().contains(&SpriteKey::Bullet(Facing::Right))).is_true();

    // Holding the trigger respects the cooldown
    game.tick(1.0 / 60.0);
    assert_eq!(bullet_count(&mut game), 1);
}

#[test]
fn test_bullet_expires_after_its_lifetime() {
    let level = MapBuilder::floor(20, 8).build();
    let mut game = game(level);
    let shooter = player(&mut game);

    let start = Vec2::new(12.0 * TILE as f32, 2.0 * TILE as f32);
    let bullet = spawn_bullet(&mut game, start, Facing::Right, 10.0, shooter);
    let lifetime_ticks = (LIFETIME * 60.0) as usize;

    run(&mut game, lifetime_ticks - 2, 1.0 / 60.0);
    assert_that(&game.world.get_entity(bullet).is_ok()).is_true();

    run(&mut game, 4, 1.0 / 60.0);
    assert_that(&game.world.get_entity(bullet).is_err()).is_true();
    assert_eq!(bullet_count(&mut game), 0);
}

#[test]
fn test_bullet_leaving_the_world_is_removed() {
    let level = MapBuilder::floor(20, 8).build();
    let mut game = game(level);
    let shooter = player(&mut game);
    let outer = game.world.resource::<WorldBounds>().outer;

    let start = Vec2::new(19.5 * TILE as f32, 2.0 * TILE as f32);
    let bullet = spawn_bullet(&mut game, start, Facing::Right, SPEED, shooter);

    let mut ticks = 0;
    while game.world.get_entity(bullet).is_ok() {
        let hitbox = game.world.get::<Hitbox>(bullet).unwrap().0;
        assert_that(&outer.overlaps(&hitbox)).is_true();
        game.tick(1.0 / 60.0);
        ticks += 1;
        assert_that(&ticks).is_less_than((LIFETIME * 60.0) as usize - 2);
    }

    // Removed as soon as it cleared the right edge, long before its lifetime ran out
    let per_tick = SPEED / 60.0;
    let distance = (outer.right() as f32 - start.x) as usize;
    assert_that(&ticks).is_less_than_or_equal_to(distance / per_tick as usize + 3);
}

#[test]
fn test_muzzle_flash_ends_with_its_animation() {
    let level = MapBuilder::floor(20, 8).build();
    let mut game = game(level);
    fire_once(&mut game);
    assert_eq!(flash_count(&mut game), 1);

    let frames = game.world.resource::<SpriteMetrics>().fire_frames() as f32;
    let ticks = (frames / FIRE_FPS * 60.0).round() as usize;

    run(&mut game, ticks - 1, 1.0 / 60.0);
    assert_eq!(flash_count(&mut game), 1);

    run(&mut game, 2, 1.0 / 60.0);
    assert_eq!(flash_count(&mut game), 0);
    assert_that(&game.draw_list().iter().any(|command| matches!(command.sprite, SpriteKey::Fire { .. }))).is_false();
}

#[test]
fn test_muzzle_flash_is_removed_with_its_owner() {
    let level = MapBuilder::floor(20, 8).build();
    let mut game = game(level);
    let shooter = player(&mut game);
    fire_once(&mut game);
    assert_eq!(flash_count(&mut game), 1);

    game.world.despawn(shooter);
    game.tick(1.0 / 60.0);

    assert_eq!(flash_count(&mut game), 0);
}
