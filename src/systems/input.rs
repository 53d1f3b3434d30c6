use bevy_ecs::resource::Resource;
use bitflags::bitflags;

bitflags! {
    /// Buttons held during the current tick, sampled once by the host before the tick runs.
    #[derive(Resource, Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InputState: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP = 1 << 2;
        const DUCK = 1 << 3;
        const FIRE = 1 << 4;
    }
}

impl InputState {
    /// Horizontal intent: -1, 0 or 1. Opposing directions cancel out.
    pub fn horizontal(self) -> f32 {
        let mut x = 0.0;
        if self.contains(InputState::RIGHT) {
            x += 1.0;
        }
        if self.contains(InputState::LEFT) {
            x -= 1.0;
        }
        x
    }
}
