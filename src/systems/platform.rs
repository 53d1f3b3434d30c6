//! Vertically oscillating platforms and the player-vs-platform correction pass.

use bevy_ecs::{
    query::{With, Without},
    system::{Query, Res},
};
use tracing::trace;

use crate::systems::{DeltaTime, Hitbox, MovingPlatform, PlayerControlled, Position};

pub fn platform_motion_system(
    delta_time: Res<DeltaTime>,
    mut platforms: Query<(&mut MovingPlatform, &mut Position, &mut Hitbox)>,
) {
    for (mut platform, mut position, mut hitbox) in platforms.iter_mut() {
        position.0.y += platform.direction * platform.speed * delta_time.0;
        hitbox.sync(&position);

        if platform.direction < 0.0 && hitbox.0.top() <= platform.min_top {
            hitbox.0.set_top(platform.min_top);
            platform.direction = 1.0;
        } else if platform.direction > 0.0 && hitbox.0.bottom() >= platform.max_bottom {
            hitbox.0.set_bottom(platform.max_bottom);
            platform.direction = -1.0;
        } else {
            continue;
        }
        position.0.y = hitbox.0.y as f32;
    }
}

/// Keeps platforms from pushing through the player.
///
/// A platform rising into the player from below is held at the player's feet, and a platform
/// overlapping the player from above is pushed up so its bottom meets the player's head.
/// Only the first case checks the platform's direction; the second always applies.
pub fn platform_collision_system(
    players: Query<&Hitbox, (With<PlayerControlled>, Without<MovingPlatform>)>,
    mut platforms: Query<(&mut MovingPlatform, &mut Position, &mut Hitbox), Without<PlayerControlled>>,
) {
    for player in players.iter() {
        let player = player.0;
        for (mut platform, mut position, mut hitbox) in platforms.iter_mut() {
            if !hitbox.0.overlaps(&player) {
                continue;
            }

            let center = hitbox.0.centery();
            if player.centery() < center {
                if platform.direction < 0.0 && player.bottom() < center {
                    hitbox.0.set_top(player.bottom());
                    platform.direction = -1.0;
                } else {
                    continue;
                }
            } else if player.centery() > center {
                hitbox.0.set_bottom(player.top());
                platform.direction = -1.0;
            } else {
                continue;
            }

            position.0.y = hitbox.0.y as f32;
            trace!(top = hitbox.0.top(), "Platform re-seated against player");
        }
    }
}
