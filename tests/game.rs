use contra::events::GameCommand;
use contra::systems::{Actor, ActorState, AudioEvent, Health, Hitbox, InputState, Position, ScoreResource};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{enemies, game, player, run, MapBuilder, TILE};

const DT: f32 = 1.0 / 60.0;

#[test]
fn test_player_settles_on_floor() {
    let mut game = game(MapBuilder::floor(20, 8).build());
    let player = player(&mut game);
    run(&mut game, 30, DT);

    let actor = game.world.get::<Actor>(player).unwrap();
    assert_that(&actor.on_floor).is_true();
    assert_eq!(actor.state, ActorState::Idle);
    assert_eq!(game.world.get::<Hitbox>(player).unwrap().0.bottom(), 7 * TILE as i32);
}

#[test]
fn test_state_machine_follows_input() {
    let mut game = game(MapBuilder::floor(20, 8).build());
    let player = player(&mut game);
    run(&mut game, 10, DT);

    game.set_input(InputState::RIGHT);
    run(&mut game, 2, DT);
    assert_eq!(game.world.get::<Actor>(player).unwrap().state, ActorState::Move);

    game.set_input(InputState::JUMP);
    run(&mut game, 2, DT);
    assert_eq!(game.world.get::<Actor>(player).unwrap().state, ActorState::Jump);

    // Rising takes a little over a second and a half
    game.set_input(InputState::empty());
    run(&mut game, 40, DT);
    assert_eq!(game.world.get::<Actor>(player).unwrap().state, ActorState::Jump);

    run(&mut game, 80, DT);
    assert_eq!(game.world.get::<Actor>(player).unwrap().state, ActorState::Fall);

    run(&mut game, 120, DT);
    assert_eq!(game.world.get::<Actor>(player).unwrap().state, ActorState::Idle);
}

#[test]
fn test_ducking_stops_the_player() {
    let mut game = game(MapBuilder::floor(20, 8).build());
    let player = player(&mut game);
    run(&mut game, 10, DT);

    game.set_input(InputState::RIGHT | InputState::DUCK);
    let before = game.world.get::<Position>(player).unwrap().0.x;
    run(&mut game, 10, DT);

    let actor = game.world.get::<Actor>(player).unwrap();
    assert_that(&actor.ducking).is_true();
    assert_eq!(game.world.get::<Position>(player).unwrap().0.x, before);
}

#[test]
fn test_walls_stop_the_player() {
    let level = MapBuilder::floor(20, 8).solid(5, 6).build();
    let mut game = game(level);
    let player = player(&mut game);

    game.set_input(InputState::RIGHT);
    run(&mut game, 120, DT);

    assert_eq!(game.world.get::<Hitbox>(player).unwrap().0.right(), 5 * TILE as i32);
}

#[test]
fn test_pause_freezes_the_simulation() {
    let mut game = game(MapBuilder::floor(20, 8).build());
    let player = player(&mut game);
    run(&mut game, 10, DT);

    game.handle_command(GameCommand::TogglePause);
    assert_that(&game.is_paused()).is_true();
    assert_that(&game.drain_audio().contains(&AudioEvent::Pause)).is_true();

    game.set_input(InputState::RIGHT);
    let before = *game.world.get::<Position>(player).unwrap();
    let frame = game.draw_list().commands.len();
    run(&mut game, 30, DT);
    assert_eq!(*game.world.get::<Position>(player).unwrap(), before);
    assert_eq!(game.draw_list().commands.len(), frame);

    game.handle_command(GameCommand::TogglePause);
    assert_that(&game.drain_audio().contains(&AudioEvent::Resume)).is_true();
    run(&mut game, 10, DT);
    assert_that(&game.world.get::<Position>(player).unwrap().0.x).is_greater_than(before.0.x);
}

#[test]
fn test_restart_rebuilds_level() {
    let level = MapBuilder::floor(20, 8).enemy(12 * TILE as i32, 6 * TILE as i32, 0.0).build();
    let mut game = game(level);
    let original = player(&mut game);

    game.handle_command(GameCommand::MuteAudio);
    game.world.resource_mut::<ScoreResource>().0 = 40;
    game.world.get_mut::<Health>(original).unwrap().current = 2;
    game.set_input(InputState::RIGHT);
    run(&mut game, 20, DT);

    game.handle_command(GameCommand::Restart);
    game.tick(DT);

    let player = player(&mut game);
    let status = game.status();
    assert_eq!(status.score, 0);
    assert_eq!(status.player_health, 10);
    assert_eq!(status.enemies_alive, 1);
    assert_that(&status.game_over).is_false();
    assert_that(&game.is_muted()).is_true();
    assert_eq!(enemies(&mut game).len(), 1);
    assert_that(&game.world.get::<Position>(player).unwrap().0.x).is_less_than(2.0 * TILE as f32 + 1.0);
}

#[test]
fn test_exit_command_ends_loop() {
    let mut game = game(MapBuilder::floor(10, 8).build());
    assert_that(&game.tick(DT)).is_false();
    game.handle_command(GameCommand::Exit);
    assert_that(&game.tick(DT)).is_true();
}

#[test]
fn test_enemy_turns_toward_and_shoots_player() {
    let level = MapBuilder::floor(20, 8).enemy(8 * TILE as i32, 6 * TILE as i32, 0.0).build();
    let mut game = game(level);
    let enemy = enemies(&mut game)[0];

    game.tick(DT);

    let actor = game.world.get::<Actor>(enemy).unwrap();
    assert_eq!(actor.facing, contra::sprite::Facing::Left);
    assert_that(&game.drain_audio().contains(&AudioEvent::PlaySound(contra::systems::Sound::Shoot))).is_true();
}

#[test]
fn test_distant_enemy_patrols() {
    let level = MapBuilder::floor(40, 8).enemy(30 * TILE as i32, 6 * TILE as i32, 64.0).build();
    let mut game = game(level);
    let enemy = enemies(&mut game)[0];
    let start = game.world.get::<Hitbox>(enemy).unwrap().0.x;

    let mut xs = Vec::new();
    for _ in 0..240 {
        game.tick(DT);
        xs.push(game.world.get::<Hitbox>(enemy).unwrap().0.x);
    }

    let min = *xs.iter().min().unwrap();
    let max = *xs.iter().max().unwrap();
    assert_that(&max).is_greater_than(start);
    assert_that(&min).is_less_than(start);
    assert_that(&(max - start)).is_less_than_or_equal_to(64 + 3);
    assert_that(&(start - min)).is_less_than_or_equal_to(64 + 3);
}
