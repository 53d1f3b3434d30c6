//! Bullets and muzzle flashes.

use bevy_ecs::{
    bundle::Bundle,
    entity::Entity,
    event::{EventReader, EventWriter},
    query::Without,
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, trace};

use crate::config::{Layer, Settings};
use crate::constants::mechanics::{MUZZLE_DUCK, MUZZLE_RAISE};
use crate::constants::projectile::{FIRE_DISTANCE, FIRE_FPS, LIFETIME, SPEED};
use crate::events::FireRequest;
use crate::geometry::{round_to_pixel, Rect};
use crate::sprite::{Facing, SpriteKey, SpriteMetrics};
use crate::systems::{
    Actor, AudioEvent, Bullet, DeltaTime, Depth, FireAnimation, Hitbox, Position, PreviousHitbox, Renderable, Sound,
    SpawnCounter, SpawnOrder, Weapon, WorldBounds,
};

#[derive(Bundle)]
pub struct BulletBundle {
    pub bullet: Bullet,
    pub position: Position,
    pub hitbox: Hitbox,
    pub previous: PreviousHitbox,
    pub depth: Depth,
    pub order: SpawnOrder,
    pub sprite: Renderable,
}

impl BulletBundle {
    /// A bullet centered on `center`, flying along `facing`.
    pub fn new(center: Vec2, facing: Facing, speed: f32, owner: Entity, metrics: &SpriteMetrics, depth: i32, order: SpawnOrder) -> Self {
        let sprite = SpriteKey::Bullet(facing);
        let size = metrics.size(&sprite);
        let top_left = center - size.as_vec2() / 2.0;
        let rect = Rect::from_top_left(round_to_pixel(top_left), size);
        Self {
            bullet: Bullet {
                direction: facing.unit(),
                speed,
                owner,
                remaining: LIFETIME,
            },
            position: Position(top_left),
            hitbox: Hitbox(rect),
            previous: PreviousHitbox(rect),
            depth: Depth(depth),
            order,
            sprite: Renderable::new(sprite),
        }
    }
}

#[derive(Bundle)]
pub struct FireBundle {
    pub fire: FireAnimation,
    pub hitbox: Hitbox,
    pub depth: Depth,
    pub order: SpawnOrder,
    pub sprite: Renderable,
}

/// Muzzle height offset for an actor, lower while ducking.
fn muzzle_drop(actor: &Actor) -> f32 {
    if actor.ducking {
        MUZZLE_DUCK
    } else {
        MUZZLE_RAISE
    }
}

/// Where a bullet fired by `actor` (occupying `body`) leaves the barrel.
pub fn muzzle_position(body: &Rect, actor: &Actor, facing: Facing, distance: f32) -> Vec2 {
    body.center().as_vec2() + facing.unit() * distance + Vec2::new(0.0, muzzle_drop(actor))
}

fn fire_rect(body: &Rect, actor: &Actor, facing: Facing, sprite: &SpriteKey, metrics: &SpriteMetrics) -> Rect {
    let center = muzzle_position(body, actor, facing, FIRE_DISTANCE);
    Rect::from_center(round_to_pixel(center), metrics.size(sprite))
}

/// Consumes fire requests: spawns a bullet at the owner's muzzle plus a muzzle flash that follows it.
#[allow(clippy::too_many_arguments)]
pub fn shoot_system(
    mut commands: Commands,
    mut requests: EventReader<FireRequest>,
    owners: Query<(&Hitbox, &Actor, &Weapon)>,
    metrics: Res<SpriteMetrics>,
    settings: Res<Settings>,
    mut counter: ResMut<SpawnCounter>,
    mut audio: EventWriter<AudioEvent>,
) {
    let depth = settings.depth(Layer::Level);
    for request in requests.read() {
        let Ok((body, actor, weapon)) = owners.get(request.owner) else {
            trace!(owner = ?request.owner, "Dropping fire request from missing owner");
            continue;
        };

        let muzzle = muzzle_position(&body.0, actor, request.facing, weapon.muzzle_distance);
        let bullet = commands
            .spawn(BulletBundle::new(
                muzzle,
                request.facing,
                SPEED,
                request.owner,
                &metrics,
                depth,
                counter.next(),
            ))
            .id();

        let sprite = SpriteKey::Fire {
            facing: request.facing,
            frame: 0,
        };
        commands.spawn(FireBundle {
            fire: FireAnimation {
                owner: request.owner,
                facing: request.facing,
                frame: 0.0,
            },
            hitbox: Hitbox(fire_rect(&body.0, actor, request.facing, &sprite, &metrics)),
            depth: Depth(depth),
            order: counter.next(),
            sprite: Renderable::new(sprite),
        });

        debug!(owner = ?request.owner, ?bullet, x = muzzle.x, y = muzzle.y, "Shot fired");
        audio.write(AudioEvent::PlaySound(Sound::Shoot));
    }
}

/// Advances bullets and removes the ones that expired or left the world.
pub fn bullet_motion_system(
    mut commands: Commands,
    delta_time: Res<DeltaTime>,
    bounds: Res<WorldBounds>,
    mut bullets: Query<(Entity, &mut Bullet, &mut Position, &mut Hitbox)>,
) {
    for (entity, mut bullet, mut position, mut hitbox) in bullets.iter_mut() {
        position.0 += bullet.direction * bullet.speed * delta_time.0;
        hitbox.sync(&position);
        bullet.remaining -= delta_time.0;

        if bullet.remaining <= 0.0 || !bounds.outer.overlaps(&hitbox.0) {
            trace!(?entity, expired = bullet.remaining <= 0.0, "Bullet removed");
            commands.entity(entity).despawn();
        }
    }
}

/// Animates muzzle flashes, keeps them on their owner's muzzle and removes finished or orphaned ones.
pub fn fire_animation_system(
    mut commands: Commands,
    delta_time: Res<DeltaTime>,
    metrics: Res<SpriteMetrics>,
    mut fires: Query<(Entity, &mut FireAnimation, &mut Hitbox, &mut Renderable)>,
    owners: Query<(&Hitbox, &Actor), Without<FireAnimation>>,
) {
    let frames = metrics.fire_frames() as f32;
    for (entity, mut fire, mut hitbox, mut renderable) in fires.iter_mut() {
        fire.frame += FIRE_FPS * delta_time.0;
        let owner = owners.get(fire.owner).ok();

        let Some((body, actor)) = owner.filter(|_| fire.frame < frames) else {
            commands.entity(entity).despawn();
            continue;
        };

        let sprite = SpriteKey::Fire {
            facing: fire.facing,
            frame: fire.frame as u8,
        };
        hitbox.0 = fire_rect(&body.0, actor, fire.facing, &sprite, &metrics);
        renderable.sprite = sprite;
    }
}
