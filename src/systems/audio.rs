//! Audio cues raised by the simulation.
//!
//! The core never plays sound itself. Systems write [`AudioEvent`]s and the host drains them
//! after each tick (see `Game::drain_audio`), honouring [`AudioState::muted`].

use bevy_ecs::{event::Event, resource::Resource};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Sound effects, named after their files under `audio/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Sound {
    /// `audio/music.wav`, looped for the whole session.
    Music,
    /// `audio/bullet.wav`
    #[strum(serialize = "bullet")]
    Shoot,
    /// `audio/hit.wav`
    Hit,
}

impl Sound {
    pub fn file_name(self) -> String {
        format!("{self}.wav")
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    PlaySound(Sound),
    /// Pause all channels, including music.
    Pause,
    Resume,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioState {
    pub muted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sounds_map_to_asset_files() {
        assert_eq!(Sound::Shoot.file_name(), "bullet.wav");
        assert_eq!(Sound::Hit.file_name(), "hit.wav");
        assert_eq!(Sound::Music.file_name(), "music.wav");
    }
}
