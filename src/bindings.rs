//! Keyboard bindings for the SDL front end.

use sdl2::keyboard::Keycode;

use crate::events::GameCommand;
use crate::systems::InputState;

/// What a key does: either it is held down as a game button, or it fires a one-shot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Hold(InputState),
    Command(GameCommand),
}

pub fn binding(keycode: Keycode) -> Option<Binding> {
    let binding = match keycode {
        Keycode::Left | Keycode::A => Binding::Hold(InputState::LEFT),
        Keycode::Right | Keycode::D => Binding::Hold(InputState::RIGHT),
        Keycode::Up | Keycode::W => Binding::Hold(InputState::JUMP),
        Keycode::Down | Keycode::S => Binding::Hold(InputState::DUCK),
        Keycode::Space => Binding::Hold(InputState::FIRE),
        Keycode::P => Binding::Command(GameCommand::TogglePause),
        Keycode::M => Binding::Command(GameCommand::MuteAudio),
        Keycode::R => Binding::Command(GameCommand::Restart),
        Keycode::Escape | Keycode::Q => Binding::Command(GameCommand::Exit),
        _ => return None,
    };
    Some(binding)
}

/// Buttons currently held, updated from key down/up events and sampled once per tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeldKeys(InputState);

impl HeldKeys {
    pub fn press(&mut self, buttons: InputState) {
        self.0.insert(buttons);
    }

    pub fn release(&mut self, buttons: InputState) {
        self.0.remove(buttons);
    }

    pub fn state(&self) -> InputState {
        self.0
    }
}
