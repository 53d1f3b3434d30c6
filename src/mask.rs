//! Pixel-precision collision masks.
//!
//! A mask marks which pixels of a sprite are opaque. Collisions between bullets and
//! terrain/actors are resolved on masks rather than bounding boxes so transparent corners
//! of a sprite never register a hit.

use glam::{IVec2, UVec2};

use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Bits {
    /// Every pixel is set; no storage needed.
    Solid,
    /// Row-major bitset, one bit per pixel.
    Sparse(Vec<u64>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    size: UVec2,
    bits: Bits,
}

impl Mask {
    /// A mask with every pixel set, equivalent to bounding-box collision.
    pub fn solid(size: UVec2) -> Self {
        Self { size, bits: Bits::Solid }
    }

    /// A mask with no pixels set.
    pub fn empty(size: UVec2) -> Self {
        let words = (size.x as usize * size.y as usize).div_ceil(64);
        Self {
            size,
            bits: Bits::Sparse(vec![0; words]),
        }
    }

    /// Builds a mask from an alpha channel, setting pixels whose alpha exceeds `threshold`.
    ///
    /// `alpha` must hold `size.x * size.y` row-major entries; missing entries are treated as transparent.
    pub fn from_alpha(size: UVec2, alpha: &[u8], threshold: u8) -> Self {
        let mut mask = Self::empty(size);
        for y in 0..size.y {
            for x in 0..size.x {
                let index = (y * size.x + x) as usize;
                if alpha.get(index).is_some_and(|&a| a > threshold) {
                    mask.set(x, y, true);
                }
            }
        }
        mask.compact()
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.size.x || y >= self.size.y {
            return false;
        }
        match &self.bits {
            Bits::Solid => true,
            Bits::Sparse(words) => {
                let index = (y * self.size.x + x) as usize;
                words[index / 64] & (1 << (index % 64)) != 0
            }
        }
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.size.x || y >= self.size.y {
            return;
        }
        let index = (y * self.size.x + x) as usize;
        if let Bits::Solid = self.bits {
            if value {
                return;
            }
            let words = (self.size.x as usize * self.size.y as usize).div_ceil(64);
            self.bits = Bits::Sparse(vec![u64::MAX; words]);
        }
        if let Bits::Sparse(words) = &mut self.bits {
            if value {
                words[index / 64] |= 1 << (index % 64);
            } else {
                words[index / 64] &= !(1 << (index % 64));
            }
        }
    }

    /// Number of set pixels.
    pub fn count(&self) -> u32 {
        match &self.bits {
            Bits::Solid => self.size.x * self.size.y,
            Bits::Sparse(_) => (0..self.size.y)
                .map(|y| (0..self.size.x).filter(|&x| self.get(x, y)).count() as u32)
                .sum(),
        }
    }

    /// Collapses a fully-set sparse mask back into the storage-free solid form.
    fn compact(self) -> Self {
        if matches!(self.bits, Bits::Sparse(_)) && self.count() == self.size.x * self.size.y {
            return Self::solid(self.size);
        }
        self
    }

    /// Returns true if any set pixel of `self` overlaps a set pixel of `other`,
    /// with `other`'s top-left placed at `offset` relative to `self`'s top-left.
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        let ours = Rect::from_top_left(IVec2::ZERO, self.size);
        let theirs = Rect::from_top_left(offset, other.size);
        let Some(region) = ours.intersection(&theirs) else {
            return false;
        };

        if matches!((&self.bits, &other.bits), (Bits::Solid, Bits::Solid)) {
            return true;
        }

        for y in region.top()..region.bottom() {
            for x in region.left()..region.right() {
                if self.get(x as u32, y as u32) && other.get((x - offset.x) as u32, (y - offset.y) as u32) {
                    return true;
                }
            }
        }
        false
    }
}

/// Mask-precision overlap of two placed sprites.
///
/// Equivalent to pygame's `collide_mask`: the cheap rect test runs first, then the masks are
/// compared at the rects' relative offset.
pub fn collide_mask(a_rect: &Rect, a_mask: &Mask, b_rect: &Rect, b_mask: &Mask) -> bool {
    if !a_rect.overlaps(b_rect) {
        return false;
    }
    a_mask.overlaps(b_mask, b_rect.top_left() - a_rect.top_left())
}
