//! Sprite identities and the per-sprite metrics (size, mask, frame count) the simulation needs.
//!
//! The core never touches pixels. It names images with [`SpriteKey`] and asks [`SpriteMetrics`]
//! how large they are and which of their pixels are opaque. A front end that loads real
//! images registers their metrics; otherwise the built-in fallbacks are solid rectangles.

use std::borrow::Cow;
use std::collections::HashMap;

use bevy_ecs::resource::Resource;
use glam::{UVec2, Vec2};
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::constants::{frames, sizes, LEFT, RIGHT, TILE_SIZE};
use crate::mask::Mask;

/// Horizontal facing of an actor or projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing matching the sign of `x`; zero keeps `self`.
    pub fn from_x(x: f32, current: Facing) -> Facing {
        if x > 0.0 {
            Facing::Right
        } else if x < 0.0 {
            Facing::Left
        } else {
            current
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Left => LEFT,
            Facing::Right => RIGHT,
        }
    }

    pub fn sign(self) -> f32 {
        self.unit().x
    }
}

/// Which animation an actor plays. Folder names under `graphics/<actor>/` are `<facing>_<pose>`,
/// with the plain `<facing>` folder holding the run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Pose {
    Idle,
    Run,
    Jump,
    Duck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ActorKind {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkyLayer {
    Back,
    Front,
}

/// Names one image the front end knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// A map tile, by its (flag-stripped) global tile id.
    Tile(u32),
    Actor {
        kind: ActorKind,
        pose: Pose,
        facing: Facing,
        frame: u8,
    },
    Bullet(Facing),
    Fire {
        facing: Facing,
        frame: u8,
    },
    Platform,
    Heart,
    Sky(SkyLayer),
}

/// Registered dimensions and opacity for one sprite.
#[derive(Debug, Clone)]
pub struct SpriteInfo {
    pub size: UVec2,
    pub mask: Mask,
}

/// Sizes, masks and frame counts for every sprite the world references.
#[derive(Resource, Debug, Clone)]
pub struct SpriteMetrics {
    tile_size: UVec2,
    sprites: HashMap<SpriteKey, SpriteInfo>,
    frame_counts: HashMap<(ActorKind, Pose), u8>,
    fire_frames: u8,
}

impl Default for SpriteMetrics {
    fn default() -> Self {
        Self::new(UVec2::splat(TILE_SIZE))
    }
}

impl SpriteMetrics {
    pub fn new(tile_size: UVec2) -> Self {
        Self {
            tile_size,
            sprites: HashMap::new(),
            frame_counts: HashMap::new(),
            fire_frames: frames::FIRE,
        }
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    pub fn set_tile_size(&mut self, tile_size: UVec2) {
        self.tile_size = tile_size;
    }

    /// Registers a sprite's real size and mask.
    pub fn register(&mut self, key: SpriteKey, mask: Mask) {
        self.sprites.insert(key, SpriteInfo { size: mask.size(), mask });
    }

    pub fn set_frame_count(&mut self, kind: ActorKind, pose: Pose, count: u8) {
        self.frame_counts.insert((kind, pose), count.max(1));
    }

    pub fn set_fire_frames(&mut self, count: u8) {
        self.fire_frames = count.max(1);
    }

    pub fn frame_count(&self, kind: ActorKind, pose: Pose) -> u8 {
        self.frame_counts.get(&(kind, pose)).copied().unwrap_or(frames::ACTOR)
    }

    pub fn fire_frames(&self) -> u8 {
        self.fire_frames
    }

    pub fn size(&self, key: &SpriteKey) -> UVec2 {
        self.sprites
            .get(key)
            .map(|info| info.size)
            .unwrap_or_else(|| self.fallback_size(key))
    }

    /// The sprite's mask, or a solid rectangle when the sprite was never registered.
    pub fn mask(&self, key: &SpriteKey) -> Cow<'_, Mask> {
        match self.sprites.get(key) {
            Some(info) => Cow::Borrowed(&info.mask),
            None => Cow::Owned(Mask::solid(self.fallback_size(key))),
        }
    }

    fn fallback_size(&self, key: &SpriteKey) -> UVec2 {
        match key {
            SpriteKey::Tile(_) => self.tile_size,
            SpriteKey::Actor { .. } => sizes::ACTOR,
            SpriteKey::Bullet(_) => sizes::BULLET,
            SpriteKey::Fire { .. } => sizes::FIRE,
            SpriteKey::Platform => sizes::PLATFORM,
            SpriteKey::Heart => sizes::HEART,
            SpriteKey::Sky(_) => sizes::SKY,
        }
    }
}
