use bevy_ecs::{
    entity::Entity,
    query::{Has, Without},
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::constants::mechanics::{ANIMATION_FPS, KILL_SCORE};
use crate::sprite::{ActorKind, Pose, SpriteMetrics};
use crate::systems::{
    Actor, ActorState, DeltaTime, Frozen, GlobalState, Health, PlayerControlled, Renderable, ScoreResource, Vulnerable, Weapon,
};

/// The state an actor should be in, given its health and motion.
pub fn next_state(actor: &Actor, health: &Health) -> ActorState {
    if health.is_dead() {
        ActorState::Dead
    } else if !health.is_vulnerable() {
        ActorState::Hurt
    } else if !actor.on_floor {
        if actor.velocity.y < 0.0 {
            ActorState::Jump
        } else {
            ActorState::Fall
        }
    } else if actor.velocity.x != 0.0 {
        ActorState::Move
    } else {
        ActorState::Idle
    }
}

/// The animation an actor should play.
pub fn next_pose(actor: &Actor) -> Pose {
    match actor.kind {
        ActorKind::Player if actor.on_floor && actor.ducking => Pose::Duck,
        ActorKind::Player if !actor.on_floor => Pose::Jump,
        _ if actor.velocity.x == 0.0 => Pose::Idle,
        _ => Pose::Run,
    }
}

/// Counts down timers, moves actors through their state machine and advances their animation.
pub fn actor_state_system(
    delta_time: Res<DeltaTime>,
    metrics: Res<SpriteMetrics>,
    mut actors: Query<(Entity, &mut Actor, &mut Health, &mut Weapon, &mut Renderable), Without<Frozen>>,
) {
    let dt = delta_time.0;
    for (entity, mut actor, mut health, mut weapon, mut renderable) in actors.iter_mut() {
        health.invulnerable = (health.invulnerable - dt).max(0.0);
        weapon.remaining = (weapon.remaining - dt).max(0.0);

        let state = next_state(&actor, &health);
        if state != actor.state {
            debug!(?entity, kind = %actor.kind, from = %actor.state, to = %state, "Actor state changed");
            actor.state = state;
        }

        let pose = next_pose(&actor);
        if pose != actor.pose {
            actor.pose = pose;
            actor.frame_timer = 0.0;
        }

        let frames = metrics.frame_count(actor.kind, actor.pose) as f32;
        actor.frame_timer += ANIMATION_FPS * dt;
        if actor.frame_timer >= frames {
            actor.frame_timer %= frames;
        }

        renderable.sprite = actor.sprite();
    }
}

/// Handles actors that reached zero health: enemies are removed and scored, the player is frozen.
#[allow(clippy::type_complexity)]
pub fn death_system(
    mut commands: Commands,
    mut actors: Query<(Entity, &mut Actor, &Health, Has<PlayerControlled>), Without<Frozen>>,
    mut score: ResMut<ScoreResource>,
    mut state: ResMut<GlobalState>,
) {
    for (entity, mut actor, health, is_player) in actors.iter_mut() {
        if !health.is_dead() {
            continue;
        }
        actor.state = ActorState::Dead;

        if is_player {
            info!(?entity, "Player died");
            commands.entity(entity).insert(Frozen).remove::<Vulnerable>();
            state.game_over = true;
        } else {
            score.0 += KILL_SCORE;
            debug!(?entity, score = score.0, "Enemy killed");
            commands.entity(entity).despawn();
        }
    }
}
