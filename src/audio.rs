//! This module plays the audio cues raised by the simulation through SDL2_mixer.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use sdl2::mixer::{self, Chunk, InitFlag, Music, AUDIO_S16LSB};
use strum::IntoEnumIterator;
use tracing::{debug, trace, warn};

use crate::systems::{AudioEvent, Sound};

const AUDIO_FREQUENCY: i32 = 44_100;
const AUDIO_CHANNELS: i32 = 8;
const DEFAULT_VOLUME: i32 = mixer::MAX_VOLUME;
/// Background music plays at half volume.
const MUSIC_VOLUME: i32 = mixer::MAX_VOLUME / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioState {
    Enabled,
    Muted,
    Disabled,
}

/// The audio system for the game.
///
/// If the mixer fails to open, audio is disabled and every call silently does nothing.
pub struct Audio {
    _mixer_context: Option<mixer::Sdl2MixerContext>,
    sounds: HashMap<Sound, Chunk>,
    music: Option<Music<'static>>,
    state: AudioState,
}

impl Audio {
    pub fn new(root: &Path) -> Self {
        match Self::try_new(root) {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Failed to initialize audio: {}. Audio will be disabled.", e);
                Self {
                    _mixer_context: None,
                    sounds: HashMap::new(),
                    music: None,
                    state: AudioState::Disabled,
                }
            }
        }
    }

    fn try_new(root: &Path) -> Result<Self> {
        let chunk_size = if cfg!(target_os = "emscripten") { 1024 } else { 512 };
        mixer::open_audio(AUDIO_FREQUENCY, AUDIO_S16LSB, 2, chunk_size).map_err(|e| anyhow!("Failed to open audio: {}", e))?;
        mixer::allocate_channels(AUDIO_CHANNELS);
        mixer::Channel::all().set_volume(DEFAULT_VOLUME);

        let mixer_context = mixer::init(InitFlag::empty()).map_err(|e| anyhow!("Failed to initialize SDL2_mixer: {}", e))?;

        let audio_dir = root.join("audio");
        let sounds: HashMap<Sound, Chunk> = Sound::iter()
            .filter(|sound| *sound != Sound::Music)
            .filter_map(|sound| {
                let path = audio_dir.join(sound.file_name());
                match Chunk::from_file(&path) {
                    Ok(chunk) => Some((sound, chunk)),
                    Err(e) => {
                        warn!(path = %path.display(), "Failed to load sound: {}", e);
                        None
                    }
                }
            })
            .collect();

        let music_path = audio_dir.join(Sound::Music.file_name());
        let music = match Music::from_file(&music_path) {
            Ok(music) => Some(music),
            Err(e) => {
                warn!(path = %music_path.display(), "Failed to load music: {}", e);
                None
            }
        };

        if sounds.is_empty() && music.is_none() {
            return Err(anyhow!("No sounds loaded successfully"));
        }
        debug!(sounds = sounds.len(), music = music.is_some(), "Audio initialized");

        Ok(Audio {
            _mixer_context: Some(mixer_context),
            sounds,
            music,
            state: AudioState::Enabled,
        })
    }

    /// Starts the looping background track.
    pub fn start_music(&mut self) {
        if self.state == AudioState::Disabled {
            return;
        }
        if let Some(music) = &self.music {
            Music::set_volume(if self.state == AudioState::Muted { 0 } else { MUSIC_VOLUME });
            if let Err(e) = music.play(-1) {
                warn!("Could not start music: {}", e);
            }
        }
    }

    pub fn play(&mut self, sound: Sound) {
        if self.state != AudioState::Enabled {
            return;
        }
        if let Some(chunk) = self.sounds.get(&sound) {
            match mixer::Channel::all().play(chunk, 0) {
                Ok(channel) => trace!(%sound, ?channel, "Playing sound"),
                Err(e) => warn!(%sound, "Could not play sound: {}", e),
            }
        }
    }

    pub fn handle(&mut self, event: AudioEvent) {
        if self.state == AudioState::Disabled {
            return;
        }
        match event {
            AudioEvent::PlaySound(sound) => self.play(sound),
            AudioEvent::Pause => {
                mixer::Channel::all().pause();
                Music::pause();
            }
            AudioEvent::Resume => {
                mixer::Channel::all().resume();
                Music::resume();
            }
        }
    }

    /// Mutes or unmutes every channel and the music, keeping the preference while disabled.
    pub fn set_mute(&mut self, mute: bool) {
        match (mute, self.state) {
            (true, AudioState::Enabled) => {
                self.state = AudioState::Muted;
                mixer::Channel::all().set_volume(0);
                Music::set_volume(0);
            }
            (false, AudioState::Muted) => {
                self.state = AudioState::Enabled;
                mixer::Channel::all().set_volume(DEFAULT_VOLUME);
                Music::set_volume(MUSIC_VOLUME);
            }
            _ => {}
        }
    }

    pub fn is_muted(&self) -> bool {
        self.state == AudioState::Muted
    }

    pub fn is_disabled(&self) -> bool {
        self.state == AudioState::Disabled
    }
}
