//! Emscripten platform implementation.

use std::ffi::{c_void, CString};
use std::io::{self, Write};
use std::os::raw::c_int;
use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::GameError;
use crate::formatter::TickFormatter;

/// Callback function type for the emscripten main loop.
pub type EmMainLoopCallback = unsafe extern "C" fn(*mut c_void);

extern "C" {
    fn emscripten_sleep(ms: u32);
    fn printf(format: *const u8, ...) -> i32;
    fn emscripten_run_script(script: *const i8);

    /// `fps = 0` uses requestAnimationFrame; `simulate_infinite_loop = 1` never returns.
    pub fn emscripten_set_main_loop_arg(func: EmMainLoopCallback, arg: *mut c_void, fps: c_int, simulate_infinite_loop: c_int);

    pub fn emscripten_cancel_main_loop();
}

/// Runs a JavaScript snippet, used to signal the page.
pub fn run_script(script: &str) {
    if let Ok(script) = CString::new(script) {
        unsafe {
            emscripten_run_script(script.as_ptr());
        }
    }
}

pub fn sleep(duration: Duration, _focused: bool) {
    unsafe {
        emscripten_sleep(duration.as_millis() as u32);
    }
}

/// Lets the browser process events during long initialization steps (requires ASYNCIFY).
pub fn yield_to_browser() {
    unsafe {
        emscripten_sleep(0);
    }
}

pub fn init_console() -> Result<(), GameError> {
    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(|| ConsoleWriter)
                .with_ansi(false)
                .event_format(TickFormatter),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GameError::Platform(format!("Failed to set tracing subscriber: {e}")))
}

/// Assets are preloaded into the virtual filesystem root.
pub fn asset_root() -> PathBuf {
    PathBuf::from("/")
}

/// Writes log lines to the browser console through `printf`.
struct ConsoleWriter;

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(line) = std::str::from_utf8(buf) {
            if let (Ok(line), Ok(format)) = (CString::new(line.trim_end_matches('\n')), CString::new("%s\n")) {
                unsafe {
                    printf(format.as_ptr().cast(), line.as_ptr());
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
