//! Platform abstraction layer: frame sleeping, log output and where assets live.

#[cfg(not(target_os = "emscripten"))]
mod desktop;
#[cfg(not(target_os = "emscripten"))]
pub use desktop::*;

#[cfg(target_os = "emscripten")]
mod emscripten;
#[cfg(target_os = "emscripten")]
pub use emscripten::*;
