use bevy_ecs::{bundle::Bundle, component::Component, entity::Entity, resource::Resource};
use glam::Vec2;

use crate::constants::{enemy, mechanics, player};
use crate::geometry::{round_to_pixel, Rect};
use crate::sprite::{ActorKind, Facing, Pose, SpriteKey};

/// Sub-pixel top-left corner of an entity. `Hitbox` is this, rounded.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// Integer collision rectangle, kept in sync with `Position`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox(pub Rect);

impl Hitbox {
    /// Moves the rectangle to the rounded position.
    pub fn sync(&mut self, position: &Position) {
        let top_left = round_to_pixel(position.0);
        self.0.x = top_left.x;
        self.0.y = top_left.y;
    }
}

/// The hitbox as it was at the start of the current tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousHitbox(pub Rect);

/// Draw order key: lower values are drawn first.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Depth(pub i32);

/// Monotonic insertion index, used to break depth ties and to order collision passes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnOrder(pub u64);

/// A component for entities that are drawn, with the image they currently show.
#[derive(Component, Debug, Clone, Copy)]
pub struct Renderable {
    pub sprite: SpriteKey,
    pub visible: bool,
    /// Draw as a white silhouette this frame.
    pub flash: bool,
}

impl Renderable {
    pub fn new(sprite: SpriteKey) -> Self {
        Self {
            sprite,
            visible: true,
            flash: false,
        }
    }
}

/// Static level geometry and moving platforms: actors stand on these, bullets break on them.
#[derive(Component, Debug, Default)]
pub struct Collidable;

/// Entities bullets can damage.
#[derive(Component, Debug, Default)]
pub struct Vulnerable;

/// A tag component for the entity driven by `InputState`.
#[derive(Component, Debug, Default)]
pub struct PlayerControlled;

/// Entities that no longer move, animate or act.
#[derive(Component, Debug, Default)]
pub struct Frozen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum_macros::Display)]
pub enum ActorState {
    #[default]
    Idle,
    Move,
    Jump,
    Fall,
    Hurt,
    Dead,
}

/// Everything that walks, jumps and falls.
#[derive(Component, Debug, Clone)]
pub struct Actor {
    pub kind: ActorKind,
    pub state: ActorState,
    pub facing: Facing,
    /// Horizontal component is a unit intent (-1, 0, 1); vertical is pixels per second.
    pub velocity: Vec2,
    pub speed: f32,
    pub on_floor: bool,
    pub ducking: bool,
    pub gravity: bool,
    /// The moving platform found under the actor's feet at the end of the previous tick.
    pub standing_on: Option<Entity>,
    pub pose: Pose,
    pub frame_timer: f32,
}

impl Actor {
    pub fn new(kind: ActorKind, speed: f32) -> Self {
        Self {
            kind,
            state: ActorState::Idle,
            facing: Facing::Right,
            velocity: Vec2::ZERO,
            speed,
            on_floor: false,
            ducking: false,
            gravity: true,
            standing_on: None,
            pose: Pose::Idle,
            frame_timer: 0.0,
        }
    }

    /// Hurt and dead actors ignore movement intent.
    pub fn is_incapacitated(&self) -> bool {
        matches!(self.state, ActorState::Hurt | ActorState::Dead)
    }

    pub fn sprite(&self) -> SpriteKey {
        SpriteKey::Actor {
            kind: self.kind,
            pose: self.pose,
            facing: self.facing,
            frame: self.frame_timer as u8,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: u32,
    pub max: u32,
    /// Seconds of invulnerability left; also the length of the hurt stun.
    pub invulnerable: f32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            invulnerable: 0.0,
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        self.invulnerable <= 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Applies a hit. Returns false (and changes nothing) while invulnerable.
    pub fn damage(&mut self, amount: u32) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        self.invulnerable = mechanics::INVULNERABILITY;
        true
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub cooldown: f32,
    pub remaining: f32,
    /// Distance from the body center to the muzzle along the facing.
    pub muzzle_distance: f32,
}

impl Weapon {
    pub fn new(cooldown: f32, muzzle_distance: f32) -> Self {
        Self {
            cooldown,
            remaining: 0.0,
            muzzle_distance,
        }
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Starts the cooldown. Returns false if the weapon was not ready.
    pub fn trigger(&mut self) -> bool {
        if !self.ready() {
            return false;
        }
        self.remaining = self.cooldown;
        true
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    /// The actor this enemy watches; may no longer exist.
    pub target: Option<Entity>,
    pub detection_range: f32,
    /// Half-width of the patrol walk around `anchor`; zero stands still.
    pub patrol: f32,
    pub anchor: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MovingPlatform {
    /// Vertical direction: -1 up, 1 down.
    pub direction: f32,
    pub speed: f32,
    /// Highest allowed top edge.
    pub min_top: i32,
    /// Lowest allowed bottom edge.
    pub max_bottom: i32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub direction: Vec2,
    pub speed: f32,
    pub owner: Entity,
    /// Seconds until the bullet expires on its own.
    pub remaining: f32,
}

/// Muzzle flash that tracks its owner's muzzle until its frames run out.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FireAnimation {
    pub owner: Entity,
    pub facing: Facing,
    pub frame: f32,
}

#[derive(Bundle)]
pub struct TileBundle {
    pub position: Position,
    pub hitbox: Hitbox,
    pub previous: PreviousHitbox,
    pub depth: Depth,
    pub order: SpawnOrder,
    pub sprite: Renderable,
}

#[derive(Bundle)]
pub struct ActorBundle {
    pub actor: Actor,
    pub health: Health,
    pub weapon: Weapon,
    pub position: Position,
    pub hitbox: Hitbox,
    pub previous: PreviousHitbox,
    pub depth: Depth,
    pub order: SpawnOrder,
    pub sprite: Renderable,
    pub vulnerable: Vulnerable,
}

impl ActorBundle {
    pub fn player(rect: Rect, depth: i32, order: SpawnOrder) -> (Self, PlayerControlled) {
        let actor = Actor::new(ActorKind::Player, player::SPEED);
        (
            Self::build(
                actor,
                Health::new(player::HEALTH),
                Weapon::new(player::FIRE_COOLDOWN, player::MUZZLE_DISTANCE),
                rect,
                depth,
                order,
            ),
            PlayerControlled,
        )
    }

    pub fn enemy(rect: Rect, depth: i32, order: SpawnOrder, target: Option<Entity>, patrol: f32) -> (Self, Enemy) {
        let actor = Actor::new(ActorKind::Enemy, enemy::PATROL_SPEED);
        (
            Self::build(
                actor,
                Health::new(enemy::HEALTH),
                Weapon::new(enemy::FIRE_COOLDOWN, enemy::MUZZLE_DISTANCE),
                rect,
                depth,
                order,
            ),
            Enemy {
                target,
                detection_range: enemy::DETECTION_RANGE,
                patrol,
                anchor: rect.x as f32,
            },
        )
    }

    fn build(actor: Actor, health: Health, weapon: Weapon, rect: Rect, depth: i32, order: SpawnOrder) -> Self {
        let sprite = Renderable::new(actor.sprite());
        Self {
            actor,
            health,
            weapon,
            position: Position(rect.top_left().as_vec2()),
            hitbox: Hitbox(rect),
            previous: PreviousHitbox(rect),
            depth: Depth(depth),
            order,
            sprite,
            vulnerable: Vulnerable,
        }
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlobalState {
    pub exit: bool,
    pub paused: bool,
    pub game_over: bool,
    pub restart: bool,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResource(pub u32);

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct DeltaTime(pub f32);

/// Seconds simulated since the level was (re)built.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct GameClock(pub f32);

#[derive(Resource, Debug, Default)]
pub struct SpawnCounter(u64);

impl SpawnCounter {
    pub fn next(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.0);
        self.0 += 1;
        order
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldBounds {
    /// The map itself, in pixels.
    pub level: Rect,
    /// The map grown by half a viewport on each side; bullets leaving it are discarded.
    pub outer: Rect,
}

impl WorldBounds {
    pub fn new(level: Rect, viewport: glam::UVec2) -> Self {
        Self {
            level,
            outer: level.inflated(viewport / 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_is_ignored_while_invulnerable() {
        let mut health = Health::new(2);
        assert!(health.damage(1));
        assert!(!health.damage(1));
        assert_eq!(health.current, 1);

        health.invulnerable = 0.0;
        assert!(health.damage(5));
        assert_eq!(health.current, 0);
        assert!(health.is_dead());
    }

    #[test]
    fn weapon_triggers_once_per_cooldown() {
        let mut weapon = Weapon::new(0.2, 60.0);
        assert!(weapon.trigger());
        assert!(!weapon.trigger());
        weapon.remaining -= 0.25;
        assert!(weapon.ready());
    }

    #[test]
    fn spawn_counter_is_monotonic() {
        let mut counter = SpawnCounter::default();
        let first = counter.next();
        assert!(counter.next() > first);
    }

    #[test]
    fn world_bounds_extend_half_a_viewport() {
        let bounds = WorldBounds::new(Rect::new(0, 0, 3200, 640), glam::UVec2::new(1280, 720));
        assert_eq!(bounds.level, Rect::new(0, 0, 3200, 640));
        assert_eq!(bounds.outer, Rect::new(-640, -360, 4480, 1360));
    }
}
