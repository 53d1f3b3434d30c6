//! Builds the frame's draw list: parallax sky, depth-sorted sprites, then the health overlay.
//!
//! The list is plain data in screen space. A front end blits it in order; tests inspect it.

use bevy_ecs::{
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::{IVec2, UVec2};

use crate::config::Settings;
use crate::constants::{overlay, sky};
use crate::geometry::Rect;
use crate::sprite::{SkyLayer, SpriteKey, SpriteMetrics};
use crate::systems::{Camera, Depth, Health, Hitbox, PlayerControlled, Renderable, SpawnOrder, WorldBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub sprite: SpriteKey,
    /// Destination in screen pixels.
    pub dest: Rect,
    /// Draw as a white silhouette.
    pub flash: bool,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn contains(&self, sprite: &SpriteKey) -> bool {
        self.commands.iter().any(|command| command.sprite == *sprite)
    }
}

/// How many sky strips it takes to cover the map plus one screen of scrolling.
pub fn sky_strip_count(level_width: u32, window_width: u32, sky_width: u32) -> u32 {
    if sky_width == 0 {
        return 0;
    }
    (level_width + window_width) / sky_width
}

fn push_sky(commands: &mut Vec<DrawCommand>, metrics: &SpriteMetrics, count: u32, offset: glam::Vec2) {
    for (layer, base_y, parallax) in [
        (SkyLayer::Back, sky::BG_Y, sky::BG_PARALLAX),
        (SkyLayer::Front, sky::FG_Y, sky::FG_PARALLAX),
    ] {
        let sprite = SpriteKey::Sky(layer);
        let size = metrics.size(&sprite);
        for i in 0..count {
            let x = (i * size.x) as f32 - offset.x / parallax;
            let y = base_y - offset.y / parallax;
            commands.push(DrawCommand {
                sprite,
                dest: Rect::from_top_left(IVec2::new(x as i32, y as i32), size),
                flash: false,
            });
        }
    }
}

fn push_hearts(commands: &mut Vec<DrawCommand>, metrics: &SpriteMetrics, health: u32) {
    let size = metrics.size(&SpriteKey::Heart);
    for i in 0..health as i32 {
        let x = overlay::MARGIN + i * (size.x as i32 + overlay::SPACING);
        commands.push(DrawCommand {
            sprite: SpriteKey::Heart,
            dest: Rect::from_top_left(IVec2::new(x, overlay::MARGIN), size),
            flash: false,
        });
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_system(
    settings: Res<Settings>,
    camera: Res<Camera>,
    metrics: Res<SpriteMetrics>,
    bounds: Res<WorldBounds>,
    renderables: Query<(&Renderable, &Hitbox, &Depth, &SpawnOrder)>,
    players: Query<&Health, With<PlayerControlled>>,
    mut draw_list: ResMut<DrawList>,
) {
    let screen = Rect::from_top_left(IVec2::ZERO, UVec2::new(settings.window_width, settings.window_height));
    let offset = camera.pixel_offset();
    let commands = &mut draw_list.commands;
    commands.clear();

    let sky_width = metrics.size(&SpriteKey::Sky(SkyLayer::Back)).x;
    let count = sky_strip_count(bounds.level.w, settings.window_width, sky_width);
    push_sky(commands, &metrics, count, camera.offset);

    let mut sprites: Vec<(Depth, SpawnOrder, DrawCommand)> = renderables
        .iter()
        .filter(|(renderable, ..)| renderable.visible)
        .filter_map(|(renderable, hitbox, depth, order)| {
            let dest = Rect::from_center(hitbox.0.center() - offset, metrics.size(&renderable.sprite));
            dest.overlaps(&screen).then_some((
                *depth,
                *order,
                DrawCommand {
                    sprite: renderable.sprite,
                    dest,
                    flash: renderable.flash,
                },
            ))
        })
        .collect();
    sprites.sort_by_key(|(depth, order, _)| (*depth, *order));
    commands.extend(sprites.into_iter().map(|(.., command)| command));

    if let Ok(health) = players.single() {
        push_hearts(commands, &metrics, health.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_covers_map_and_one_screen() {
        assert_eq!(sky_strip_count(6400, 1280, 1600), 4);
        assert_eq!(sky_strip_count(100, 100, 0), 0);
    }

    #[test]
    fn hearts_are_laid_out_left_to_right() {
        let mut commands = Vec::new();
        push_hearts(&mut commands, &SpriteMetrics::default(), 3);
        let xs: Vec<i32> = commands.iter().map(|c| c.dest.x).collect();
        assert_eq!(xs, vec![10, 38, 66]);
        assert!(commands.iter().all(|c| c.dest.y == 10));
    }
}
