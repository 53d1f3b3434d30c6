use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res},
};
use tracing::trace;

use crate::constants::player;
use crate::events::FireRequest;
use crate::sprite::Facing;
use crate::systems::{Actor, Frozen, InputState, PlayerControlled, Weapon};

/// Turns the sampled input into movement intent, jumps, ducking and fire requests.
pub fn player_control_system(
    input: Res<InputState>,
    mut players: Query<(Entity, &mut Actor, &mut Weapon), (With<PlayerControlled>, Without<Frozen>)>,
    mut fire: EventWriter<FireRequest>,
) {
    for (entity, mut actor, mut weapon) in players.iter_mut() {
        if actor.is_incapacitated() {
            actor.velocity.x = 0.0;
            actor.ducking = false;
            continue;
        }

        let intent = input.horizontal();
        actor.velocity.x = intent;
        actor.facing = Facing::from_x(intent, actor.facing);

        if input.contains(InputState::JUMP) && actor.on_floor {
            actor.velocity.y = -player::JUMP_SPEED;
            actor.on_floor = false;
            trace!(?entity, "Jump");
        }

        actor.ducking = input.contains(InputState::DUCK) && actor.on_floor;
        if actor.ducking {
            actor.velocity.x = 0.0;
        }

        if input.contains(InputState::FIRE) && weapon.trigger() {
            fire.write(FireRequest {
                owner: entity,
                facing: actor.facing,
            });
        }
    }
}
