//! Enemy behaviour: watch the player, turn to face them and shoot when level with them.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{Has, With, Without},
    system::Query,
};
use tracing::trace;

use crate::constants::enemy::SIGHT_SLACK;
use crate::events::FireRequest;
use crate::geometry::Rect;
use crate::sprite::Facing;
use crate::systems::{Actor, ActorState, Enemy, Frozen, Hitbox, PlayerControlled, Vulnerable, Weapon};

/// Whether `target` is close enough and roughly level with `shooter` to be shot at.
pub fn in_line_of_fire(shooter: &Rect, target: &Rect, range: f32) -> bool {
    let distance = (target.center() - shooter.center()).as_vec2().length();
    let level = shooter.top() - SIGHT_SLACK < target.centery() && target.centery() < shooter.bottom();
    distance < range && level
}

pub fn enemy_ai_system(
    mut enemies: Query<(Entity, &Enemy, &mut Actor, &mut Weapon, &Hitbox), (Without<PlayerControlled>, Without<Frozen>)>,
    targets: Query<(&Hitbox, Has<Vulnerable>), With<PlayerControlled>>,
    mut fire: EventWriter<FireRequest>,
) {
    for (entity, enemy, mut actor, mut weapon, hitbox) in enemies.iter_mut() {
        if actor.state == ActorState::Dead {
            continue;
        }

        let target = enemy.target.and_then(|target| targets.get(target).ok());
        let tracking = target.is_some_and(|(target, _)| {
            (target.0.center() - hitbox.0.center()).as_vec2().length() < enemy.detection_range
        });

        match target {
            Some((target, alive)) if tracking => {
                actor.velocity.x = 0.0;
                actor.facing = if target.0.centerx() < hitbox.0.centerx() {
                    Facing::Left
                } else {
                    Facing::Right
                };

                if alive && in_line_of_fire(&hitbox.0, &target.0, enemy.detection_range) && weapon.trigger() {
                    trace!(?entity, facing = %actor.facing, "Enemy fires");
                    fire.write(FireRequest {
                        owner: entity,
                        facing: actor.facing,
                    });
                }
            }
            _ => patrol(enemy, &mut actor, &hitbox.0),
        }

        if actor.is_incapacitated() {
            actor.velocity.x = 0.0;
        }
    }
}

/// Walks back and forth within `patrol` pixels of the spawn point; stands still when `patrol` is zero.
fn patrol(enemy: &Enemy, actor: &mut Actor, hitbox: &Rect) {
    if enemy.patrol <= 0.0 {
        actor.velocity.x = 0.0;
        return;
    }

    let x = hitbox.x as f32;
    if x <= enemy.anchor - enemy.patrol {
        actor.facing = Facing::Right;
    } else if x >= enemy.anchor + enemy.patrol {
        actor.facing = Facing::Left;
    }
    actor.velocity.x = actor.facing.sign();
}
