//! Integer rectangles with the edge/center accessors the collision code is written against.

use glam::{IVec2, UVec2, Vec2};

/// An axis-aligned, pixel-aligned rectangle.
///
/// `right` and `bottom` are exclusive, so two rectangles that merely share an edge do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_top_left(top_left: IVec2, size: UVec2) -> Self {
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    /// Builds a rectangle of `size` whose center lands on `center` (rounded down like the blitter does).
    pub fn from_center(center: IVec2, size: UVec2) -> Self {
        Self::new(center.x - (size.x / 2) as i32, center.y - (size.y / 2) as i32, size.x, size.y)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn centerx(&self) -> i32 {
        self.x + (self.w / 2) as i32
    }

    pub fn centery(&self) -> i32 {
        self.y + (self.h / 2) as i32
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.centerx(), self.centery())
    }

    pub fn midbottom(&self) -> IVec2 {
        IVec2::new(self.centerx(), self.bottom())
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.w, self.h)
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w as i32;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h as i32;
    }

    /// Returns true when the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// The overlapping region of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, (right - left) as u32, (bottom - top) as u32))
    }

    /// Grows the rectangle by `margin.x` pixels left and right and `margin.y` pixels above and below.
    pub fn inflated(&self, margin: UVec2) -> Self {
        Self::new(
            self.x - margin.x as i32,
            self.y - margin.y as i32,
            self.w + 2 * margin.x,
            self.h + 2 * margin.y,
        )
    }
}

/// Rounds a sub-pixel position to the pixel grid (half away from zero).
pub fn round_to_pixel(position: Vec2) -> IVec2 {
    IVec2::new(position.x.round() as i32, position.y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 64, 64);
        let b = Rect::new(64, 0, 64, 64);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(63, 63, 10, 10)));
    }

    #[test]
    fn edge_setters_keep_size() {
        let mut rect = Rect::new(10, 10, 20, 30);
        rect.set_bottom(100);
        assert_eq!(rect.top(), 70);
        rect.set_right(50);
        assert_eq!(rect.left(), 30);
        assert_eq!(rect.size(), UVec2::new(20, 30));
    }

    #[test]
    fn center_round_trip_for_even_sizes() {
        let rect = Rect::from_center(IVec2::new(100, 50), UVec2::new(20, 8));
        assert_eq!(rect, Rect::new(90, 46, 20, 8));
        assert_eq!(rect.center(), IVec2::new(100, 50));
    }

    #[test]
    fn intersection_is_clipped() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 8, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 8, 5, 2)));
        assert_eq!(a.intersection(&Rect::new(20, 20, 1, 1)), None);
    }

    #[test]
    fn inflated_grows_each_axis_independently() {
        let rect = Rect::new(10, 20, 30, 40).inflated(UVec2::new(5, 1));
        assert_eq!(rect, Rect::new(5, 19, 40, 42));
        assert_eq!(rect.center(), Rect::new(10, 20, 30, 40).center());
    }
}
