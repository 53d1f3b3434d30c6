//! Loads sprite images from `graphics/`, registers their metrics with the simulation and blits
//! draw lists.
//!
//! Layout under the asset root:
//!
//! - `graphics/tiles/<gid>.png`
//! - `graphics/<player|enemy>/<facing>_<pose>/<n>.png`, with the run cycle in plain `<facing>/`
//! - `graphics/fire/<facing>/<n>.png`
//! - `graphics/bullet.png`, `graphics/platform.png`, `graphics/health.png`
//! - `graphics/sky/bg_sky.png`, `graphics/sky/fg_sky.png`
//!
//! Left-facing images may be omitted; they are mirrored from the right-facing ones.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use glam::UVec2;
use sdl2::image::LoadSurface;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::surface::Surface;
use sdl2::video::{Window, WindowContext};
use strum::IntoEnumIterator;
use tracing::{debug, trace, warn};

use crate::error::{AssetError, GameError, GameResult};
use crate::level::Level;
use crate::mask::Mask;
use crate::sprite::{ActorKind, Facing, Pose, SkyLayer, SpriteKey, SpriteMetrics};
use crate::systems::DrawCommand;

/// Alpha above which a pixel counts as opaque for collisions.
const ALPHA_THRESHOLD: u8 = 127;

struct Image {
    texture: Texture,
    /// White silhouette drawn while the owner is flashing.
    flash: Texture,
}

/// Every loaded image, addressed by [`SpriteKey`].
pub struct SpriteSheet {
    images: Vec<Image>,
    /// Image index and whether to mirror it.
    keys: HashMap<SpriteKey, (usize, bool)>,
    missing: HashSet<SpriteKey>,
}

fn folder_name(facing: Facing, pose: Pose) -> String {
    match pose {
        Pose::Run => facing.to_string(),
        _ => format!("{facing}_{pose}"),
    }
}

/// Mask of an RGBA32 surface, read from its alpha channel.
fn surface_mask(surface: &Surface) -> Mask {
    let size = UVec2::new(surface.width(), surface.height());
    let pitch = surface.pitch() as usize;
    let alpha = surface.with_lock(|pixels| {
        let mut alpha = Vec::with_capacity((size.x * size.y) as usize);
        for y in 0..size.y as usize {
            let row = &pixels[y * pitch..y * pitch + size.x as usize * 4];
            alpha.extend(row.chunks_exact(4).map(|pixel| pixel[3]));
        }
        alpha
    });
    Mask::from_alpha(size, &alpha, ALPHA_THRESHOLD)
}

fn mirror(mask: &Mask) -> Mask {
    let size = mask.size();
    let mut mirrored = Mask::empty(size);
    for y in 0..size.y {
        for x in 0..size.x {
            if mask.get(x, y) {
                mirrored.set(size.x - 1 - x, y, true);
            }
        }
    }
    mirrored
}

/// Numbered frames (`0.png`, `1.png`, ...) in a folder, in order.
fn frame_paths(folder: &Path) -> Vec<PathBuf> {
    let mut frames: Vec<(u32, PathBuf)> = std::fs::read_dir(folder)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter_map(|path| {
                    let index = path.file_stem()?.to_str()?.parse::<u32>().ok()?;
                    Some((index, path))
                })
                .collect()
        })
        .unwrap_or_default();
    frames.sort_by_key(|(index, _)| *index);
    frames.into_iter().map(|(_, path)| path).collect()
}

impl SpriteSheet {
    /// Loads every image the level can reference and registers its metrics.
    pub fn load(
        root: &Path,
        level: &Level,
        creator: &TextureCreator<WindowContext>,
        metrics: &mut SpriteMetrics,
    ) -> GameResult<Self> {
        let mut sheet = SpriteSheet {
            images: Vec::new(),
            keys: HashMap::new(),
            missing: HashSet::new(),
        };
        let graphics = root.join("graphics");

        let gids: HashSet<u32> = level
            .layers
            .iter()
            .flat_map(|(_, tiles)| tiles.iter().map(|tile| tile.gid))
            .collect();
        for gid in gids {
            let path = graphics.join("tiles").join(format!("{gid}.png"));
            if let Err(e) = sheet.load_single(&path, SpriteKey::Tile(gid), creator, metrics) {
                warn!(gid, error = %e, "Tile image unavailable, drawing nothing");
            }
        }

        for kind in [ActorKind::Player, ActorKind::Enemy] {
            let actor_dir = graphics.join(kind.to_string());
            for pose in Pose::iter() {
                let right = frame_paths(&actor_dir.join(folder_name(Facing::Right, pose)));
                if right.is_empty() {
                    return Err(AssetError::NotFound(actor_dir.join(folder_name(Facing::Right, pose)).display().to_string()).into());
                }
                metrics.set_frame_count(kind, pose, right.len().min(u8::MAX as usize) as u8);
                let left = frame_paths(&actor_dir.join(folder_name(Facing::Left, pose)));

                for (frame, path) in right.iter().enumerate() {
                    let key = |facing| SpriteKey::Actor {
                        kind,
                        pose,
                        facing,
                        frame: frame as u8,
                    };
                    match left.get(frame) {
                        Some(left_path) => {
                            sheet.load_single(path, key(Facing::Right), creator, metrics)?;
                            sheet.load_single(left_path, key(Facing::Left), creator, metrics)?;
                        }
                        None => sheet.load_mirrored(path, key(Facing::Right), key(Facing::Left), creator, metrics)?,
                    }
                }
            }
        }

        let fire = frame_paths(&graphics.join("fire").join(Facing::Right.to_string()));
        metrics.set_fire_frames(fire.len().min(u8::MAX as usize) as u8);
        let fire_left = frame_paths(&graphics.join("fire").join(Facing::Left.to_string()));
        for (frame, path) in fire.iter().enumerate() {
            let key = |facing| SpriteKey::Fire {
                facing,
                frame: frame as u8,
            };
            match fire_left.get(frame) {
                Some(left_path) => {
                    sheet.load_single(path, key(Facing::Right), creator, metrics)?;
                    sheet.load_single(left_path, key(Facing::Left), creator, metrics)?;
                }
                None => sheet.load_mirrored(path, key(Facing::Right), key(Facing::Left), creator, metrics)?,
            }
        }

        sheet.load_mirrored(
            &graphics.join("bullet.png"),
            SpriteKey::Bullet(Facing::Right),
            SpriteKey::Bullet(Facing::Left),
            creator,
            metrics,
        )?;
        sheet.load_single(&graphics.join("platform.png"), SpriteKey::Platform, creator, metrics)?;
        sheet.load_single(&graphics.join("health.png"), SpriteKey::Heart, creator, metrics)?;
        sheet.load_single(&graphics.join("sky").join("bg_sky.png"), SpriteKey::Sky(SkyLayer::Back), creator, metrics)?;
        sheet.load_single(&graphics.join("sky").join("fg_sky.png"), SpriteKey::Sky(SkyLayer::Front), creator, metrics)?;

        debug!(images = sheet.images.len(), sprites = sheet.keys.len(), "Sprites loaded");
        Ok(sheet)
    }

    fn read(path: &Path) -> GameResult<Surface<'static>> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()).into());
        }
        let surface = Surface::from_file(path).map_err(|reason| AssetError::Decode {
            path: path.display().to_string(),
            reason,
        })?;
        surface.convert_format(PixelFormatEnum::RGBA32).map_err(|reason| {
            GameError::from(AssetError::Decode {
                path: path.display().to_string(),
                reason,
            })
        })
    }

    fn upload(&mut self, surface: &Surface, creator: &TextureCreator<WindowContext>) -> GameResult<usize> {
        let texture = creator
            .create_texture_from_surface(surface)
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        let mut white = surface
            .convert_format(PixelFormatEnum::RGBA32)
            .map_err(GameError::Sdl)?;
        let pitch = white.pitch() as usize;
        let width = white.width() as usize;
        white.with_lock_mut(|pixels| {
            for row in pixels.chunks_mut(pitch) {
                for pixel in row[..width * 4].chunks_exact_mut(4) {
                    pixel[..3].fill(u8::MAX);
                }
            }
        });
        let flash = creator
            .create_texture_from_surface(&white)
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        self.images.push(Image { texture, flash });
        Ok(self.images.len() - 1)
    }

    fn load_single(
        &mut self,
        path: &Path,
        key: SpriteKey,
        creator: &TextureCreator<WindowContext>,
        metrics: &mut SpriteMetrics,
    ) -> GameResult<()> {
        let surface = Self::read(path)?;
        let index = self.upload(&surface, creator)?;
        metrics.register(key, surface_mask(&surface));
        self.keys.insert(key, (index, false));
        trace!(path = %path.display(), ?key, "Sprite loaded");
        Ok(())
    }

    /// Loads one image for `right` and draws `left` as its mirror image.
    fn load_mirrored(
        &mut self,
        path: &Path,
        right: SpriteKey,
        left: SpriteKey,
        creator: &TextureCreator<WindowContext>,
        metrics: &mut SpriteMetrics,
    ) -> GameResult<()> {
        let surface = Self::read(path)?;
        let index = self.upload(&surface, creator)?;
        let mask = surface_mask(&surface);
        metrics.register(left, mirror(&mask));
        metrics.register(right, mask);
        self.keys.insert(right, (index, false));
        self.keys.insert(left, (index, true));
        Ok(())
    }

    /// Blits one draw command. Unknown sprites are skipped and reported once.
    pub fn draw(&mut self, canvas: &mut Canvas<Window>, command: &DrawCommand) -> GameResult<()> {
        let Some(&(index, flip)) = self.keys.get(&command.sprite) else {
            if self.missing.insert(command.sprite) {
                warn!(sprite = ?command.sprite, "No image for sprite");
            }
            return Ok(());
        };
        let image = &self.images[index];
        let texture = if command.flash { &image.flash } else { &image.texture };
        let dest = sdl2::rect::Rect::new(command.dest.x, command.dest.y, command.dest.w, command.dest.h);
        canvas
            .copy_ex(texture, None, dest, 0.0, None, flip, false)
            .map_err(GameError::Sdl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_cycle_uses_plain_facing_folder() {
        assert_eq!(folder_name(Facing::Right, Pose::Run), "right");
        assert_eq!(folder_name(Facing::Left, Pose::Duck), "left_duck");
    }

    #[test]
    fn mirrored_masks_flip_columns() {
        let mut mask = Mask::empty(UVec2::new(4, 1));
        mask.set(0, 0, true);
        let mirrored = mirror(&mask);
        assert!(mirrored.get(3, 0));
        assert!(!mirrored.get(0, 0));
    }
}
