use bevy_ecs::{
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};

use crate::config::Settings;
use crate::geometry::round_to_pixel;
use crate::systems::{Hitbox, PlayerControlled};

/// World-to-screen translation: subtract `offset` from a world position to get screen pixels.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    /// The offset that puts `target` in the middle of a `viewport`-sized screen.
    pub fn centered_on(target: IVec2, viewport: Vec2) -> Self {
        Self {
            offset: target.as_vec2() - viewport / 2.0,
        }
    }

    pub fn pixel_offset(&self) -> IVec2 {
        round_to_pixel(self.offset)
    }
}

/// Locks the camera on the player every frame, with no smoothing or clamping.
pub fn camera_system(settings: Res<Settings>, players: Query<&Hitbox, With<PlayerControlled>>, mut camera: ResMut<Camera>) {
    if let Ok(player) = players.single() {
        *camera = Camera::centered_on(player.0.center(), settings.viewport());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_centers_target() {
        let camera = Camera::centered_on(IVec2::new(1000, 400), Vec2::new(1280.0, 720.0));
        assert_eq!(camera.offset, Vec2::new(360.0, 40.0));
        assert_eq!(camera.pixel_offset(), IVec2::new(360, 40));
    }
}
