//! Single-page packing: dedup, placement, page sizing, compositing.

pub mod maxrects;

use crate::bitmap::Bitmap;
use crate::model::{Page, Placement};
use image::RgbaImage;
use maxrects::MaxRectsBin;
use std::collections::HashMap;

/// Packs one batch of bitmaps onto one page.
///
/// Bitmaps that do not fit are reported back so the driver can hand them to
/// the next page. With `unique`, bitmaps whose trimmed pixels byte-match an
/// already placed bitmap become alias placements and consume no page area.
pub struct PagePacker {
    page_size: u32,
    padding: u32,
    bin: MaxRectsBin,
    placements: Vec<Placement>,
    width: u32,
    height: u32,
}

impl PagePacker {
    pub fn new(page_size: u32, padding: u32) -> Self {
        Self {
            page_size,
            padding,
            bin: MaxRectsBin::new(page_size, page_size),
            placements: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Walks `order` (indices into `bitmaps`, already in placement order) and
    /// places what fits. Returns the indices that did not fit.
    pub fn pack(
        &mut self,
        bitmaps: &[Bitmap],
        order: &[usize],
        unique: bool,
        rotate: bool,
    ) -> Vec<usize> {
        // hash -> placement indices of canonical bitmaps on this page
        let mut by_hash: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut unfit = Vec::new();

        for &bi in order {
            let bmp = &bitmaps[bi];
            if unique {
                let canonical = by_hash.get(&bmp.hash_value).and_then(|cands| {
                    cands
                        .iter()
                        .copied()
                        .find(|&pi| bitmaps[self.placements[pi].bitmap].same_pixels(bmp))
                });
                if let Some(pi) = canonical {
                    let c = self.placements[pi];
                    self.placements.push(Placement {
                        bitmap: bi,
                        x: c.x,
                        y: c.y,
                        rotated: c.rotated,
                        duplicate_of: Some(pi),
                    });
                    continue;
                }
            }

            // Inflate right/bottom so neighbours and the page edge keep
            // `padding` pixels of separation.
            let w = bmp.width() + self.padding;
            let h = bmp.height() + self.padding;
            match self.bin.insert(w, h, rotate) {
                Some((x, y, rotated)) => {
                    let pi = self.placements.len();
                    self.placements.push(Placement {
                        bitmap: bi,
                        x,
                        y,
                        rotated,
                        duplicate_of: None,
                    });
                    if unique {
                        by_hash.entry(bmp.hash_value).or_default().push(pi);
                    }
                }
                None => unfit.push(bi),
            }
        }

        self.fit_page(bitmaps);
        unfit
    }

    /// Shrinks the reported page to the smallest power of two covering the
    /// tight bounding box of all placements, capped at the configured size.
    fn fit_page(&mut self, bitmaps: &[Bitmap]) {
        let mut max_x = 0;
        let mut max_y = 0;
        for p in &self.placements {
            let b = &bitmaps[p.bitmap];
            let (w, h) = p.effective_size(b.width(), b.height());
            max_x = max_x.max(p.x + w);
            max_y = max_y.max(p.y + h);
        }
        self.width = next_pow2(max_x).min(self.page_size);
        self.height = next_pow2(max_y).min(self.page_size);
    }

    /// Composites the page: transparent canvas, one blit per non-alias
    /// placement. Alias placements contribute nothing.
    pub fn render(&self, bitmaps: &[Bitmap]) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        for p in &self.placements {
            if p.duplicate_of.is_none() {
                bitmaps[p.bitmap].blit_into(&mut canvas, p.x, p.y, p.rotated);
            }
        }
        canvas
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn into_page(self, id: usize) -> Page {
        Page {
            id,
            width: self.width,
            height: self.height,
            placements: self.placements,
        }
    }
}

fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}
