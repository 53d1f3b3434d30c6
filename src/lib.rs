//! Contra game library crate.
//!
//! The simulation (`game`, `systems`, `level`) is headless and always built. The SDL2 window,
//! textures and mixer live behind the `sdl` feature.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[cfg(feature = "sdl")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod app;
#[cfg(feature = "sdl")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod audio;
#[cfg(feature = "sdl")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod bindings;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod error;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod events;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod formatter;
#[cfg(feature = "sdl")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod platform;
#[cfg(feature = "sdl")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod texture;

pub mod config;
pub mod constants;
pub mod game;
pub mod geometry;
pub mod level;
pub mod mask;
pub mod sprite;
pub mod systems;
