//! Actor movement against static tiles and moving platforms.
//!
//! Movement is resolved one axis at a time: horizontal first, then gravity and vertical. A side is
//! only blocked if the actor was fully on the other side of it at the start of the tick, which is
//! what `PreviousHitbox` is for.

use bevy_ecs::{
    entity::Entity,
    query::{Has, With, Without},
    system::{Query, Res},
};
use glam::{IVec2, UVec2};

use crate::constants::mechanics::{CONTACT_PROBE, GRAVITY, TERMINAL_VELOCITY};
use crate::geometry::Rect;
use crate::systems::{Actor, ActorState, Collidable, DeltaTime, Frozen, Hitbox, MovingPlatform, Position, PreviousHitbox};

/// A solid as seen by the physics pass.
#[derive(Debug, Clone, Copy)]
pub struct Solid {
    pub entity: Entity,
    pub rect: Rect,
    pub previous: Rect,
    /// Set for moving platforms.
    pub platform: bool,
}

/// Records every hitbox as it is before anything moves this tick.
pub fn snapshot_hitbox_system(mut query: Query<(&Hitbox, &mut PreviousHitbox)>) {
    for (hitbox, mut previous) in query.iter_mut() {
        previous.0 = hitbox.0;
    }
}

pub fn actor_physics_system(
    delta_time: Res<DeltaTime>,
    mut actors: Query<(&mut Actor, &mut Position, &mut Hitbox, &PreviousHitbox), (Without<Frozen>, Without<Collidable>)>,
    solids: Query<(Entity, &Hitbox, &PreviousHitbox, Has<MovingPlatform>), (With<Collidable>, Without<Actor>)>,
) {
    let solids: Vec<Solid> = solids
        .iter()
        .map(|(entity, hitbox, previous, platform)| Solid {
            entity,
            rect: hitbox.0,
            previous: previous.0,
            platform,
        })
        .collect();

    for (mut actor, mut position, mut hitbox, previous) in actors.iter_mut() {
        if actor.state == ActorState::Dead {
            continue;
        }
        step_actor(&mut actor, &mut position, &mut hitbox, previous.0, &solids, delta_time.0);
    }
}

/// Moves one actor for `dt` seconds and resolves it against `solids`.
pub fn step_actor(actor: &mut Actor, position: &mut Position, hitbox: &mut Hitbox, previous: Rect, solids: &[Solid], dt: f32) {
    // Horizontal
    position.0.x += actor.velocity.x * actor.speed * dt;
    hitbox.sync(position);
    if collide_horizontal(&mut hitbox.0, previous, solids) {
        position.0.x = hitbox.0.x as f32;
    }

    // Vertical
    if actor.gravity {
        actor.velocity.y = (actor.velocity.y + GRAVITY * dt).min(TERMINAL_VELOCITY);
    }
    position.0.y += actor.velocity.y * dt;

    let glued = actor
        .standing_on
        .and_then(|entity| solids.iter().find(|solid| solid.entity == entity))
        .filter(|solid| {
            solid.platform && solid.rect.top() > solid.previous.top() && actor.velocity.y > 0.0
        });
    if let Some(platform) = glued {
        actor.velocity.y = 0.0;
        hitbox.0.set_bottom(platform.rect.top());
        position.0.y = hitbox.0.y as f32;
        actor.on_floor = true;
    }

    hitbox.sync(position);
    if collide_vertical(&mut hitbox.0, previous, solids, &mut actor.on_floor) {
        actor.velocity.y = 0.0;
        position.0.y = hitbox.0.y as f32;
    }
    if actor.on_floor && actor.velocity.y != 0.0 {
        actor.on_floor = false;
    }

    check_contact(actor, &hitbox.0, solids);
}

/// Returns true if a wall stopped the actor.
fn collide_horizontal(rect: &mut Rect, previous: Rect, solids: &[Solid]) -> bool {
    let mut hit = false;
    for solid in solids {
        if !solid.rect.overlaps(rect) {
            continue;
        }
        if rect.left() <= solid.rect.right() && previous.left() >= solid.previous.right() {
            rect.set_left(solid.rect.right());
            hit = true;
        }
        if rect.right() >= solid.rect.left() && previous.right() <= solid.previous.left() {
            rect.set_right(solid.rect.left());
            hit = true;
        }
    }
    hit
}

/// Returns true if the actor hit a floor or ceiling.
fn collide_vertical(rect: &mut Rect, previous: Rect, solids: &[Solid], on_floor: &mut bool) -> bool {
    let mut hit = false;
    for solid in solids {
        if !solid.rect.overlaps(rect) {
            continue;
        }
        if rect.bottom() >= solid.rect.top() && previous.bottom() <= solid.previous.top() {
            rect.set_bottom(solid.rect.top());
            *on_floor = true;
            hit = true;
        }
        if rect.top() <= solid.rect.bottom() && previous.top() >= solid.previous.bottom() {
            rect.set_top(solid.rect.bottom());
            hit = true;
        }
    }
    hit
}

/// Probes a thin strip under the actor's feet for ground and for the platform it rides.
fn check_contact(actor: &mut Actor, rect: &Rect, solids: &[Solid]) {
    let probe = Rect::from_top_left(
        rect.midbottom() - IVec2::new((rect.w / 2) as i32, 0),
        UVec2::new(rect.w, CONTACT_PROBE),
    );

    actor.standing_on = None;
    for solid in solids.iter().filter(|solid| solid.rect.overlaps(&probe)) {
        if actor.velocity.y > 0.0 {
            actor.on_floor = true;
        }
        if solid.platform {
            actor.standing_on = Some(solid.entity);
        }
    }
}
