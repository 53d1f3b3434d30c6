//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources. Everything is re-exported flat so callers can `use crate::systems::{...}`.

pub mod actor;
pub mod audio;
pub mod blinking;
pub mod camera;
pub mod collision;
pub mod components;
pub mod enemy;
pub mod input;
pub mod physics;
pub mod platform;
pub mod player;
pub mod projectile;
pub mod render;

pub use self::actor::*;
pub use self::audio::*;
pub use self::blinking::*;
pub use self::camera::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::enemy::*;
pub use self::input::*;
pub use self::physics::*;
pub use self::platform::*;
pub use self::player::*;
pub use self::projectile::*;
pub use self::render::*;
