//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::{UVec2, Vec2};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of a map tile, in pixels, when the level does not say otherwise.
pub const TILE_SIZE: u32 = 64;

/// Default viewport, used when no settings file is given.
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;

/// Clear color behind the sky strips.
pub const BACKGROUND_COLOR: (u8, u8, u8) = (249, 131, 103);

pub mod player {
    /// Horizontal run speed, in pixels per second.
    pub const SPEED: f32 = 400.0;
    pub const JUMP_SPEED: f32 = 1400.0;
    pub const HEALTH: u32 = 10;
    /// Minimum time between two shots, in seconds.
    pub const FIRE_COOLDOWN: f32 = 0.2;
    /// Horizontal distance from the body center to the muzzle.
    pub const MUZZLE_DISTANCE: f32 = 60.0;
}

pub mod enemy {
    pub const HEALTH: u32 = 3;
    pub const FIRE_COOLDOWN: f32 = 1.0;
    pub const MUZZLE_DISTANCE: f32 = 80.0;
    /// Distance (center to center) within which an enemy tracks and fires at the player.
    pub const DETECTION_RANGE: f32 = 600.0;
    /// How far above its own top edge an enemy still considers the player "level" with it.
    pub const SIGHT_SLACK: i32 = 20;
    pub const PATROL_SPEED: f32 = 120.0;
}

pub mod mechanics {
    /// Downward acceleration, in pixels per second squared.
    pub const GRAVITY: f32 = 900.0;
    /// Terminal falling speed.
    pub const TERMINAL_VELOCITY: f32 = 1400.0;
    /// Duration of the post-hit invulnerability (and hurt stun), in seconds.
    pub const INVULNERABILITY: f32 = 0.5;
    /// Health removed by a single bullet.
    pub const BULLET_DAMAGE: u32 = 1;
    /// Animation speed of actors, in frames per second.
    pub const ANIMATION_FPS: f32 = 7.0;
    /// Height of the probe below an actor's feet used to detect standing contact.
    pub const CONTACT_PROBE: u32 = 5;
    /// Muzzle height relative to the body center when standing and when ducking.
    pub const MUZZLE_RAISE: f32 = -16.0;
    pub const MUZZLE_DUCK: f32 = 10.0;
    /// Points awarded for removing an enemy.
    pub const KILL_SCORE: u32 = 10;
}

pub mod projectile {
    pub const SPEED: f32 = 1200.0;
    /// Seconds before an unobstructed bullet disappears.
    pub const LIFETIME: f32 = 1.0;
    /// Muzzle flash animation speed, in frames per second.
    pub const FIRE_FPS: f32 = 15.0;
    /// Horizontal distance from the firer's center to the muzzle flash, for every actor.
    pub const FIRE_DISTANCE: f32 = 60.0;
}

pub mod platform {
    pub const SPEED: f32 = 200.0;
    /// Travel distance from the spawn point when no border object bounds a side.
    pub const DEFAULT_TRAVEL: f32 = 256.0;
}

pub mod sky {
    /// Vertical placement of the sky strips before parallax is applied.
    pub const BG_Y: f32 = 850.0;
    pub const FG_Y: f32 = 800.0;
    /// Parallax divisors: larger means slower scrolling.
    pub const BG_PARALLAX: f32 = 2.5;
    pub const FG_PARALLAX: f32 = 2.0;
}

pub mod overlay {
    pub const MARGIN: i32 = 10;
    pub const SPACING: i32 = 4;
}

/// Fallback sprite dimensions, used until the front end registers real image sizes.
pub mod sizes {
    use super::UVec2;

    pub const ACTOR: UVec2 = UVec2::new(48, 64);
    pub const BULLET: UVec2 = UVec2::new(20, 8);
    pub const FIRE: UVec2 = UVec2::new(32, 32);
    pub const HEART: UVec2 = UVec2::new(24, 24);
    pub const SKY: UVec2 = UVec2::new(1600, 400);
    pub const PLATFORM: UVec2 = UVec2::new(128, 32);
}

/// Fallback frame counts per animation, used when no sprite folder has been scanned.
pub mod frames {
    pub const ACTOR: u8 = 4;
    pub const FIRE: u8 = 2;
}

/// A unit vector pointing right.
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);
/// A unit vector pointing left.
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
