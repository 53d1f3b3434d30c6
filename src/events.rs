use bevy_ecs::prelude::*;

use crate::sprite::Facing;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    TogglePause,
    MuteAudio,
    /// Rebuild the level from scratch: fresh actors, full health, zero score.
    Restart,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Asks `shoot_system` to fire a bullet (and muzzle flash) on behalf of `owner`.
///
/// The muzzle position is derived from the owner's hitbox when the request is consumed,
/// so a request from an entity that vanished in the meantime is dropped.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FireRequest {
    pub owner: Entity,
    pub facing: Facing,
}
