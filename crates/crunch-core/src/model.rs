use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge coordinate (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge coordinate (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }

    /// Returns true if the interiors of `self` and `r` intersect.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.right() || r.x >= self.right() || self.y >= r.bottom() || r.y >= self.bottom())
    }
}

/// A bitmap placed on a page.
///
/// `bitmap` indexes into the pipeline's bitmap list. An alias placement
/// shares another placement's pixels: `duplicate_of` indexes the canonical
/// placement on the same page and `(x, y, rotated)` are copied from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement {
    pub bitmap: usize,
    pub x: u32,
    pub y: u32,
    /// True if the bitmap is stored rotated 90 degrees clockwise.
    pub rotated: bool,
    pub duplicate_of: Option<usize>,
}

impl Placement {
    /// Width and height occupied on the page (transposed when rotated).
    pub fn effective_size(&self, bitmap_w: u32, bitmap_h: u32) -> (u32, u32) {
        if self.rotated {
            (bitmap_h, bitmap_w)
        } else {
            (bitmap_w, bitmap_h)
        }
    }
}

/// A single atlas page (logical record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement>,
}
