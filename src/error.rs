//! Centralized error types for the game.
//!
//! Runtime simulation is total and never fails; everything here describes start-up problems:
//! unreadable settings, malformed levels, missing assets, or a front end that could not
//! initialize.

use std::io;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors produced while reading or interpreting a level file.
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    #[error("Failed to read level: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing layer: {0}")]
    MissingLayer(String),

    #[error("Layer {name} has {actual} tiles, expected {expected}")]
    LayerSize { name: String, expected: usize, actual: usize },

    #[error("Layer {name} uses {encoding} encoding; save the map with CSV layer data")]
    UnsupportedEncoding { name: String, encoding: String },

    #[error("Level has no Player object in the Entities layer")]
    MissingPlayer,

    #[error("Level declares {0} Player objects, expected exactly one")]
    DuplicatePlayer(usize),
}

/// Errors produced while loading `settings.json`.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Viewport must be non-empty, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
