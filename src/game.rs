//! This module contains the main game logic and state.

use std::time::Instant;

use bevy_ecs::event::{EventRegistry, EventWriter, Events};
use bevy_ecs::observer::Trigger;
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::{Res, ResMut};
use bevy_ecs::world::World;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::error::GameResult;
use crate::events::{FireRequest, GameCommand, GameEvent};
use crate::formatter;
use crate::level::spawn::spawn_level;
use crate::level::Level;
use crate::sprite::SpriteMetrics;
use crate::systems::{
    actor_physics_system, actor_state_system, blinking_system, bullet_collision_system, bullet_motion_system, camera_system,
    death_system, enemy_ai_system, fire_animation_system, platform_collision_system, platform_motion_system,
    player_control_system, render_system, shoot_system, snapshot_hitbox_system, AudioEvent, AudioState, Camera, DeltaTime,
    DrawList, Enemy, GameClock, GlobalState, Health, InputState, PlayerControlled, ScoreResource, SpawnCounter, WorldBounds,
};

/// Gameplay systems, skipped entirely while paused.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Input and AI decide what every actor wants to do
    Input,
    /// Everything moves
    Update,
    /// Collision passes and their consequences
    Resolve,
}

/// Presentation systems; these keep running while paused so the frame stays on screen.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum RenderSet {
    Draw,
}

fn running(state: Res<GlobalState>) -> bool {
    !state.paused
}

/// A snapshot of the simulation, cheap to copy and serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GameStatus {
    pub tick: u64,
    pub player_health: u32,
    pub enemies_alive: u32,
    pub score: u32,
    pub game_over: bool,
    pub paused: bool,
}

/// Headless game state built on the Bevy ECS architecture.
///
/// The world holds every entity and resource; the schedule runs one fixed tick of gameplay and
/// finishes by building the `DrawList`. The host owns the clock, the window and the speakers:
/// it calls [`Game::tick`], then reads [`Game::draw_list`] and drains [`Game::drain_audio`].
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    level: Level,
    ticks: u64,
}

impl Game {
    /// Builds the world for `level` and spawns its contents.
    ///
    /// `metrics` carries the real sprite sizes and masks when a front end has loaded images;
    /// pass `SpriteMetrics::default()` to run with the built-in fallbacks.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the level cannot be spawned into the world.
    pub fn new(settings: Settings, level: Level, metrics: SpriteMetrics) -> GameResult<Game> {
        debug!("Initializing ECS world and system schedule");
        let mut world = World::default();
        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, settings, metrics, &level);

        let player = spawn_level(&mut world, &level)?;
        info!(?player, entities = world.entities().len(), "Level spawned");

        let mut schedule = Schedule::default();
        Self::configure_schedule(&mut schedule);

        Ok(Game {
            world,
            schedule,
            level,
            ticks: 0,
        })
    }

    /// A game using fallback sprite metrics, for servers and tests.
    pub fn headless(settings: Settings, level: Level) -> GameResult<Game> {
        Self::new(settings, level, SpriteMetrics::default())
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<FireRequest>(world);
        EventRegistry::register_event::<AudioEvent>(world);

        world.add_observer(
            |event: Trigger<GameEvent>,
             mut state: ResMut<GlobalState>,
             mut audio_state: ResMut<AudioState>,
             mut audio: EventWriter<AudioEvent>| {
                let GameEvent::Command(command) = *event;
                match command {
                    GameCommand::Exit => state.exit = true,
                    GameCommand::TogglePause => {
                        state.paused = !state.paused;
                        info!(paused = state.paused, "Pause toggled");
                        audio.write(if state.paused { AudioEvent::Pause } else { AudioEvent::Resume });
                    }
                    GameCommand::MuteAudio => {
                        audio_state.muted = !audio_state.muted;
                        debug!(muted = audio_state.muted, "Mute toggled");
                    }
                    GameCommand::Restart => state.restart = true,
                }
            },
        );
    }

    fn insert_resources(world: &mut World, settings: Settings, metrics: SpriteMetrics, level: &Level) {
        let viewport = glam::UVec2::new(settings.window_width, settings.window_height);
        world.insert_resource(WorldBounds::new(level.pixel_rect(), viewport));
        world.insert_resource(settings);
        world.insert_resource(metrics);
        world.insert_resource(GlobalState::default());
        world.insert_resource(ScoreResource(0));
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(GameClock(0.0));
        world.insert_resource(InputState::empty());
        world.insert_resource(Camera::default());
        world.insert_resource(DrawList::default());
        world.insert_resource(AudioState::default());
        world.insert_resource(SpawnCounter::default());
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                (snapshot_hitbox_system, player_control_system, enemy_ai_system)
                    .chain()
                    .in_set(GameplaySet::Input),
                (
                    platform_motion_system,
                    actor_physics_system,
                    actor_state_system,
                    bullet_motion_system,
                    fire_animation_system,
                    shoot_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                (platform_collision_system, bullet_collision_system, death_system)
                    .chain()
                    .in_set(GameplaySet::Resolve),
                (camera_system, blinking_system, render_system).chain().in_set(RenderSet::Draw),
            ))
            .configure_sets((GameplaySet::Input, GameplaySet::Update, GameplaySet::Resolve, RenderSet::Draw).chain())
            .configure_sets((
                GameplaySet::Input.run_if(running),
                GameplaySet::Update.run_if(running),
                GameplaySet::Resolve.run_if(running),
            ));
    }

    /// Executes one frame of game logic.
    ///
    /// Applies a pending restart, advances the clock by `dt` seconds (unless paused), runs the
    /// schedule and rotates event buffers.
    ///
    /// Returns `true` if the game should exit.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.world.resource::<GlobalState>().restart {
            if let Err(e) = self.reset() {
                error!(error = %e, "Failed to restart level");
                self.world.resource_mut::<GlobalState>().restart = false;
            }
        }

        self.world.insert_resource(DeltaTime(dt));
        if !self.world.resource::<GlobalState>().paused {
            self.world.resource_mut::<GameClock>().0 += dt;
        }

        let start = Instant::now();
        self.schedule.run(&mut self.world);
        let elapsed = start.elapsed();

        self.ticks += 1;
        formatter::increment_tick();

        let budget = dt * 1.2;
        if dt > 0.0 && elapsed.as_secs_f32() > budget {
            warn!(elapsed = format!("{:.3?}", elapsed), budget_ms = budget * 1000.0, "Slow frame");
        }

        self.world.resource_mut::<Events<FireRequest>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();

        self.world.resource::<GlobalState>().exit
    }

    /// Rebuilds the level from scratch, keeping settings, sprite metrics and the mute setting.
    pub fn reset(&mut self) -> GameResult<()> {
        info!("Restarting level");
        let settings = self.world.resource::<Settings>().clone();
        let metrics = self.world.resource::<SpriteMetrics>().clone();
        let muted = self.world.resource::<AudioState>().muted;

        let mut game = Game::new(settings, self.level.clone(), metrics)?;
        game.world.resource_mut::<AudioState>().muted = muted;
        game.ticks = self.ticks;
        *self = game;
        Ok(())
    }

    pub fn handle_command(&mut self, command: GameCommand) {
        debug!(?command, "Handling command");
        self.world.trigger(GameEvent::Command(command));
    }

    /// Replaces the buttons held for the next tick.
    pub fn set_input(&mut self, input: InputState) {
        self.world.insert_resource(input);
    }

    pub fn draw_list(&self) -> &DrawList {
        self.world.resource::<DrawList>()
    }

    /// Takes every audio cue raised since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioEvent> {
        self.world.resource_mut::<Events<AudioEvent>>().drain().collect()
    }

    pub fn is_muted(&self) -> bool {
        self.world.resource::<AudioState>().muted
    }

    pub fn is_paused(&self) -> bool {
        self.world.resource::<GlobalState>().paused
    }

    pub fn status(&mut self) -> GameStatus {
        let player_health = self
            .world
            .query_filtered::<&Health, With<PlayerControlled>>()
            .iter(&self.world)
            .next()
            .map(|health| health.current)
            .unwrap_or(0);
        let enemies_alive = self.world.query::<&Enemy>().iter(&self.world).count() as u32;
        let state = *self.world.resource::<GlobalState>();

        GameStatus {
            tick: self.ticks,
            player_health,
            enemies_alive,
            score: self.world.resource::<ScoreResource>().0,
            game_over: state.game_over,
            paused: state.paused,
        }
    }
}
