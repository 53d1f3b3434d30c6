use bevy_ecs::system::{Query, Res};

use crate::systems::{GameClock, Health, Renderable};

/// Whether an invulnerable actor shows its white silhouette at `elapsed` seconds.
///
/// Follows a sine wave over the elapsed milliseconds, so the flash flickers every few frames.
pub fn flash_phase(elapsed: f32) -> bool {
    (elapsed * 1000.0).sin() >= 0.0
}

/// Flags invulnerable actors to be drawn as a flash on alternating phases.
pub fn blinking_system(clock: Res<GameClock>, mut query: Query<(&Health, &mut Renderable)>) {
    let phase = flash_phase(clock.0);
    for (health, mut renderable) in query.iter_mut() {
        let flash = !health.is_vulnerable() && phase;
        if renderable.flash != flash {
            renderable.flash = flash;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_follows_sine_sign() {
        assert!(flash_phase(0.0));
        assert!(flash_phase(0.001));
        assert!(!flash_phase(0.004));
    }
}
