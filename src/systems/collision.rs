//! Bullet collision passes.
//!
//! Hit resolution is split in two: [`resolve_bullet_hits`] is a pure function over a snapshot of
//! positions and masks, and [`bullet_collision_system`] gathers that snapshot from the world and
//! applies the outcome (despawns, damage, audio).

use std::borrow::Cow;

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Commands, Query, Res},
};
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::mechanics::BULLET_DAMAGE;
use crate::geometry::Rect;
use crate::mask::{collide_mask, Mask};
use crate::sprite::SpriteMetrics;
use crate::systems::{
    Actor, ActorState, AudioEvent, Bullet, Collidable, Health, Hitbox, Renderable, Sound, SpawnOrder, Vulnerable,
};

/// A placed, masked shape taking part in a collision pass.
#[derive(Debug, Clone)]
pub struct Probe<'a> {
    pub entity: Entity,
    pub rect: Rect,
    pub mask: Cow<'a, Mask>,
}

impl Probe<'_> {
    pub fn collides(&self, other: &Probe<'_>) -> bool {
        collide_mask(&self.rect, &self.mask, &other.rect, &other.mask)
    }
}

#[derive(Debug, Clone)]
pub struct BulletProbe<'a> {
    pub shape: Probe<'a>,
    pub owner: Entity,
}

/// Outcome of one tick of bullet collisions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulletHits {
    /// Bullets stopped by level geometry.
    pub blocked: SmallVec<[Entity; 8]>,
    /// `(bullet, target)` pairs, in resolution order. Every bullet appears at most once.
    pub hits: SmallVec<[(Entity, Entity); 8]>,
}

impl BulletHits {
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty() && self.hits.is_empty()
    }
}

/// Resolves bullets against terrain, then the surviving bullets against vulnerable actors.
///
/// `bullets` and `targets` must be in spawn order; that order decides ties. A bullet never hits its
/// owner and stops at its first target. The target list is not updated between bullets, so a second
/// bullet striking an actor the first one just killed still counts as a hit (and is absorbed).
pub fn resolve_bullet_hits(bullets: &[BulletProbe<'_>], terrain: &[Probe<'_>], targets: &[Probe<'_>]) -> BulletHits {
    let mut result = BulletHits::default();

    for bullet in bullets {
        if terrain.iter().any(|solid| bullet.shape.collides(solid)) {
            result.blocked.push(bullet.shape.entity);
            continue;
        }

        let target = targets
            .iter()
            .filter(|target| target.entity != bullet.owner)
            .find(|target| bullet.shape.collides(target));
        if let Some(target) = target {
            result.hits.push((bullet.shape.entity, target.entity));
        }
    }

    result
}

#[allow(clippy::type_complexity)]
pub fn bullet_collision_system(
    mut commands: Commands,
    metrics: Res<SpriteMetrics>,
    bullets: Query<(Entity, &Bullet, &Hitbox, &Renderable, &SpawnOrder)>,
    terrain: Query<(Entity, &Hitbox, &Renderable), (With<Collidable>, Without<Bullet>)>,
    mut targets: Query<(Entity, &mut Health, &mut Actor, &Hitbox, &Renderable, &SpawnOrder), With<Vulnerable>>,
    mut audio: EventWriter<AudioEvent>,
) {
    if bullets.is_empty() {
        return;
    }

    let mut bullet_probes: Vec<(SpawnOrder, BulletProbe)> = bullets
        .iter()
        .map(|(entity, bullet, hitbox, renderable, order)| {
            let shape = Probe {
                entity,
                rect: hitbox.0,
                mask: metrics.mask(&renderable.sprite),
            };
            (*order, BulletProbe { shape, owner: bullet.owner })
        })
        .collect();
    bullet_probes.sort_by_key(|(order, _)| *order);
    let bullet_probes: Vec<BulletProbe> = bullet_probes.into_iter().map(|(_, probe)| probe).collect();

    let terrain_probes: Vec<Probe> = terrain
        .iter()
        .map(|(entity, hitbox, renderable)| Probe {
            entity,
            rect: hitbox.0,
            mask: metrics.mask(&renderable.sprite),
        })
        .collect();

    let mut target_probes: Vec<(SpawnOrder, Probe)> = targets
        .iter()
        .map(|(entity, _, _, hitbox, renderable, order)| {
            let shape = Probe {
                entity,
                rect: hitbox.0,
                mask: metrics.mask(&renderable.sprite),
            };
            (*order, shape)
        })
        .collect();
    target_probes.sort_by_key(|(order, _)| *order);
    let target_probes: Vec<Probe> = target_probes.into_iter().map(|(_, probe)| probe).collect();

    let outcome = resolve_bullet_hits(&bullet_probes, &terrain_probes, &target_probes);
    if outcome.is_empty() {
        return;
    }

    for bullet in &outcome.blocked {
        commands.entity(*bullet).despawn();
    }

    for &(bullet, target) in &outcome.hits {
        commands.entity(bullet).despawn();

        let Ok((_, mut health, mut actor, ..)) = targets.get_mut(target) else {
            continue;
        };
        if health.damage(BULLET_DAMAGE) {
            if actor.state != ActorState::Dead {
                actor.state = ActorState::Hurt;
            }
            debug!(?bullet, ?target, health = health.current, "Bullet hit");
            audio.write(AudioEvent::PlaySound(Sound::Hit));
        } else {
            debug!(?bullet, ?target, "Bullet absorbed by invulnerable target");
        }
    }
}
