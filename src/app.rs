use std::path::PathBuf;
use std::time::{Duration, Instant};

use sdl2::event::{Event, WindowEvent};
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::{AudioSubsystem, EventPump, Sdl};
use tracing::{debug, error, info, trace, warn};

use crate::audio::Audio;
use crate::bindings::{binding, Binding, HeldKeys};
use crate::config::Settings;
use crate::constants::{BACKGROUND_COLOR, LOOP_TIME};
use crate::error::{GameError, GameResult};
use crate::events::GameCommand;
use crate::game::Game;
use crate::level::Level;
use crate::platform;
use crate::sprite::SpriteMetrics;
use crate::texture::SpriteSheet;

/// Longest step fed to the simulation; longer stalls (window drags, breakpoints) are clamped.
const MAX_DT: f32 = 0.1;

/// Where the app finds its level, settings and assets.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub asset_root: PathBuf,
    pub level: PathBuf,
    pub settings: Option<PathBuf>,
}

impl AppOptions {
    /// `contra [LEVEL] [SETTINGS]`, relative to the asset root.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let asset_root = platform::asset_root();
        let mut args = args.into_iter().filter(|arg| !arg.starts_with('-'));
        let level = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| asset_root.join("data").join("map.tmj"));
        let settings = args.next().map(PathBuf::from).or_else(|| {
            let default = asset_root.join("settings.json");
            default.exists().then_some(default)
        });
        Self {
            asset_root,
            level,
            settings,
        }
    }
}

/// Main application wrapper that manages SDL initialization, the window and the game loop.
pub struct App {
    pub game: Game,
    canvas: Canvas<Window>,
    event_pump: EventPump,
    sprites: SpriteSheet,
    audio: Audio,
    held: HeldKeys,
    last_tick: Instant,
    focused: bool,
    // Keep SDL alive for the app lifetime so subsystems (audio) are not shut down
    _sdl_context: Sdl,
    _audio_subsystem: AudioSubsystem,
}

impl App {
    /// Initializes SDL, loads the level and its assets and builds the game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Sdl` if any SDL initialization step fails, or the level, settings
    /// and asset errors raised while loading.
    pub fn new(options: AppOptions) -> GameResult<Self> {
        info!(?options, "Initializing SDL2 application");
        let settings = match &options.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let level = Level::load(&options.level)?;

        let sdl_context = sdl2::init().map_err(GameError::Sdl)?;
        let video_subsystem = sdl_context.video().map_err(GameError::Sdl)?;
        let audio_subsystem = sdl_context.audio().map_err(GameError::Sdl)?;
        let event_pump = sdl_context.event_pump().map_err(GameError::Sdl)?;
        trace!("Yielding after subsystem init");
        platform::yield_to_browser();

        let window = video_subsystem
            .window("Contra", settings.window_width, settings.window_height)
            .position_centered()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        let mut canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        canvas
            .set_logical_size(settings.window_width, settings.window_height)
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        debug!(renderer_info = ?canvas.info(), "Canvas renderer initialized");
        platform::yield_to_browser();

        let texture_creator = canvas.texture_creator();
        let mut metrics = SpriteMetrics::new(level.tile_size);
        let sprites = SpriteSheet::load(&options.asset_root, &level, &texture_creator, &mut metrics)?;
        platform::yield_to_browser();

        let mut audio = Audio::new(&options.asset_root);
        audio.start_music();

        let game = Game::new(settings, level, metrics)?;

        info!("Application initialization completed successfully");
        Ok(App {
            game,
            canvas,
            event_pump,
            sprites,
            audio,
            held: HeldKeys::default(),
            last_tick: Instant::now(),
            focused: true,
            _sdl_context: sdl_context,
            _audio_subsystem: audio_subsystem,
        })
    }

    fn handle_events(&mut self) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::FocusGained => {
                        debug!("Window focused");
                        self.focused = true;
                    }
                    WindowEvent::FocusLost => {
                        debug!("Window lost focus");
                        self.focused = false;
                    }
                    _ => {}
                },
                // Closing the tab is the only way out in the browser
                #[cfg(not(target_os = "emscripten"))]
                Event::Quit { .. } => {
                    info!("Exit requested. Exiting...");
                    self.game.handle_command(GameCommand::Exit);
                }
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat,
                    ..
                } => match binding(keycode) {
                    Some(Binding::Hold(buttons)) => self.held.press(buttons),
                    Some(Binding::Command(command)) if !repeat => self.game.handle_command(command),
                    _ => {}
                },
                Event::KeyUp {
                    keycode: Some(keycode), ..
                } => {
                    if let Some(Binding::Hold(buttons)) = binding(keycode) {
                        self.held.release(buttons);
                    }
                }
                _ => {}
            }
        }
    }

    fn draw(&mut self) -> GameResult<()> {
        let (r, g, b) = BACKGROUND_COLOR;
        self.canvas.set_draw_color(sdl2::pixels::Color::RGB(r, g, b));
        self.canvas.clear();
        for command in self.game.draw_list().iter() {
            self.sprites.draw(&mut self.canvas, command)?;
        }
        self.canvas.present();
        Ok(())
    }

    /// Executes a single frame: input, one simulation tick, audio, drawing, then sleeping off
    /// whatever is left of `LOOP_TIME`.
    ///
    /// # Returns
    ///
    /// `true` if the game should continue running, `false` if the game requested exit.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();
        let dt = self.last_tick.elapsed().as_secs_f32().min(MAX_DT);
        self.last_tick = start;

        self.handle_events();
        self.game.set_input(self.held.state());
        if self.game.tick(dt) {
            return false;
        }

        self.audio.set_mute(self.game.is_muted());
        for event in self.game.drain_audio() {
            self.audio.handle(event);
        }

        if let Err(e) = self.draw() {
            error!("Failed to draw frame: {e}");
        }

        let elapsed = start.elapsed();
        if elapsed < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(elapsed);
            if time != Duration::ZERO {
                platform::sleep(time, self.focused);
            }
        } else {
            warn!("Game loop behind schedule by: {:?}", elapsed - LOOP_TIME);
        }

        true
    }
}
