//! Desktop platform implementation.

use std::path::PathBuf;
use std::time::Duration;

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::GameError;
use crate::formatter::TickFormatter;

/// Environment variable overriding the directory that holds `graphics/`, `audio/` and `data/`.
pub const ASSET_ROOT_VAR: &str = "CONTRA_ASSETS";

/// Sleeps precisely while focused; a coarse sleep is enough (and cheaper) in the background.
pub fn sleep(duration: Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}

/// Nothing to yield to outside the browser.
pub fn yield_to_browser() {}

pub fn init_console() -> Result<(), GameError> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().event_format(TickFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,contra=debug")))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GameError::Platform(format!("Failed to set tracing subscriber: {e}")))
}

pub fn asset_root() -> PathBuf {
    std::env::var_os(ASSET_ROOT_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
