//! The headless game the server reports on.
//!
//! The simulation runs on its own OS thread at the game's fixed tick rate. After every tick it
//! writes a [`GameStatus`] snapshot into a shared [`SimulationStatus`]; request handlers only
//! ever read that snapshot.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use contra::config::Settings;
use contra::constants::LOOP_TIME;
use contra::error::GameResult;
use contra::game::{Game, GameStatus};
use contra::level::Level;
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct SimulationStatus {
    pub game_running: bool,
    /// Wall-clock start, reported as Unix seconds.
    pub started_at: Option<SystemTime>,
    /// Monotonic start, used for uptime.
    pub started: Option<Instant>,
    /// Why the simulation failed to start or stopped early.
    pub error: Option<String>,
    pub game: GameStatus,
}

impl SimulationStatus {
    pub fn start_time(&self) -> Option<f64> {
        self.started_at
            .and_then(|at| at.duration_since(UNIX_EPOCH).ok())
            .map(|since| since.as_secs_f64())
    }

    /// Seconds since the simulation started, rounded to hundredths; zero if it never started.
    pub fn uptime_seconds(&self) -> f64 {
        self.started
            .map(|started| (started.elapsed().as_secs_f64() * 100.0).round() / 100.0)
            .unwrap_or(0.0)
    }
}

pub type SharedStatus = Arc<RwLock<SimulationStatus>>;

/// Handle to the simulation thread. Dropping it stops the thread.
pub struct Simulation {
    status: SharedStatus,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

fn load_game(level: &Path, settings: Option<&Path>) -> GameResult<Game> {
    let settings = match settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let level = Level::load(level)?;
    Game::headless(settings, level)
}

impl Simulation {
    /// Starts the simulation thread for the level named by `config`.
    ///
    /// Loading happens on the new thread; failures land in the status `error` field instead of
    /// being returned.
    pub fn spawn(config: &Config) -> Self {
        let status = SharedStatus::default();
        let stop = Arc::new(AtomicBool::new(false));
        let level = config.level_path();
        let settings = config.settings_path();

        let handle = {
            let status = status.clone();
            let stop = stop.clone();
            thread::Builder::new()
                .name("simulation".into())
                .spawn(move || run(level, settings, status, stop))
        };
        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(error = %e, "Failed to spawn simulation thread");
                status.write().error = Some(format!("failed to spawn simulation thread: {e}"));
                None
            }
        };

        Self { status, stop, handle }
    }

    pub fn status(&self) -> SharedStatus {
        self.status.clone()
    }

    /// Asks the thread to stop after its current tick and waits for it.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Simulation thread panicked");
            }
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(level: PathBuf, settings: Option<PathBuf>, status: SharedStatus, stop: Arc<AtomicBool>) {
    let mut game = match load_game(&level, settings.as_deref()) {
        Ok(game) => game,
        Err(e) => {
            error!(level = %level.display(), error = %e, "Simulation failed to start");
            status.write().error = Some(e.to_string());
            return;
        }
    };

    {
        let mut status = status.write();
        status.game_running = true;
        status.started_at = Some(SystemTime::now());
        status.started = Some(Instant::now());
        status.error = None;
        status.game = game.status();
    }
    info!(level = %level.display(), "Simulation started");

    let dt = LOOP_TIME.as_secs_f32();
    let mut game_over = false;
    while !stop.load(Ordering::Relaxed) {
        let start = Instant::now();
        if game.tick(dt) {
            info!("Game requested exit");
            break;
        }
        // Nobody is listening to the speakers
        game.drain_audio();

        let snapshot = game.status();
        if snapshot.game_over && !game_over {
            info!(tick = snapshot.tick, score = snapshot.score, "Player defeated");
        }
        game_over = snapshot.game_over;
        status.write().game = snapshot;

        if let Some(rest) = LOOP_TIME.checked_sub(start.elapsed()) {
            thread::sleep(rest);
        }
    }

    status.write().game_running = false;
    debug!(tick = game.status().tick, "Simulation stopped");
}
