#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use anyhow::Context;
use contra::app::{App, AppOptions};
use contra::constants::LOOP_TIME;
use contra::platform;
use tracing::info;

#[cfg(target_os = "emscripten")]
thread_local! {
    // emscripten_set_main_loop_arg needs the app to outlive main()
    static APP: std::cell::RefCell<Option<App>> = const { std::cell::RefCell::new(None) };
}

/// Emscripten main loop callback, runs once per frame.
#[cfg(target_os = "emscripten")]
unsafe extern "C" fn main_loop_callback(_arg: *mut std::ffi::c_void) {
    let running = APP.with(|app| app.borrow_mut().as_mut().is_some_and(|app| app.run()));
    if !running {
        platform::emscripten_cancel_main_loop();
    }
}

/// Called from JavaScript when navigating away from the game page.
#[cfg(target_os = "emscripten")]
#[no_mangle]
pub extern "C" fn stop_game() {
    info!("Stopping game loop and halting audio");
    unsafe {
        platform::emscripten_cancel_main_loop();
    }
    sdl2::mixer::Channel::all().halt();
}

/// The main entry point of the application.
///
/// Sets up logging, loads the level named on the command line (or the bundled one) and runs
/// the game loop until the player quits.
pub fn main() -> anyhow::Result<()> {
    platform::init_console().context("Could not initialize console")?;

    let options = AppOptions::from_args(std::env::args().skip(1));
    let app = App::new(options).context("Could not create app")?;

    info!(loop_time = ?LOOP_TIME, "Starting game loop");

    #[cfg(target_os = "emscripten")]
    {
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        platform::run_script("if (window.contraReady) window.contraReady()");
        unsafe {
            platform::emscripten_set_main_loop_arg(main_loop_callback, std::ptr::null_mut(), 0, 1);
        }
    }

    #[cfg(not(target_os = "emscripten"))]
    {
        let mut app = app;
        while app.run() {}
        info!("Exiting");
    }

    Ok(())
}
