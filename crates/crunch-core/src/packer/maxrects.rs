//! MaxRects free-rectangle store for one page.
//!
//! Keeps the set of maximal free rectangles; each insert picks the
//! best-short-side-fit candidate, splits every intersected free rect into
//! full-extent strips, and prunes contained rects to restore maximality.

use crate::model::Rect;

pub struct MaxRectsBin {
    free: Vec<Rect>,
}

impl MaxRectsBin {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            free: vec![Rect::new(0, 0, width, height)],
        }
    }

    /// Places a `w x h` rectangle, trying the rotated orientation as well
    /// when `allow_rotate`. Returns the chosen position and whether the
    /// rotated orientation won. `None` when no free rect can hold either
    /// orientation.
    pub fn insert(&mut self, w: u32, h: u32, allow_rotate: bool) -> Option<(u32, u32, bool)> {
        let (node, rotated) = self.find_position(w, h, allow_rotate)?;
        self.place(&node);
        Some((node.x, node.y, rotated))
    }

    /// Best short-side fit over all free rects and both orientations; ties
    /// broken by best long-side fit, then by the first candidate seen.
    fn find_position(&self, w: u32, h: u32, allow_rotate: bool) -> Option<(Rect, bool)> {
        let mut best: Option<(Rect, bool)> = None;
        let mut best_short = u32::MAX;
        let mut best_long = u32::MAX;

        let mut consider = |fr: &Rect, pw: u32, ph: u32, rotated: bool| {
            if fr.w < pw || fr.h < ph {
                return;
            }
            let leftover_w = fr.w - pw;
            let leftover_h = fr.h - ph;
            let short = leftover_w.min(leftover_h);
            let long = leftover_w.max(leftover_h);
            if short < best_short || (short == best_short && long < best_long) {
                best_short = short;
                best_long = long;
                best = Some((Rect::new(fr.x, fr.y, pw, ph), rotated));
            }
        };

        for fr in &self.free {
            consider(fr, w, h, false);
            if allow_rotate && w != h {
                consider(fr, h, w, true);
            }
        }
        best
    }

    /// Splits every free rect intersecting `node` into up to four maximal
    /// strips (left/right span the free rect's full height, top/bottom its
    /// full width), then prunes.
    fn place(&mut self, node: &Rect) {
        let mut next: Vec<Rect> = Vec::with_capacity(self.free.len() + 3);
        for fr in &self.free {
            if !fr.intersects(node) {
                next.push(*fr);
                continue;
            }
            // Left strip.
            if node.x > fr.x {
                next.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
            }
            // Right strip.
            if node.right() < fr.right() {
                next.push(Rect::new(node.right(), fr.y, fr.right() - node.right(), fr.h));
            }
            // Top strip.
            if node.y > fr.y {
                next.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
            }
            // Bottom strip.
            if node.bottom() < fr.bottom() {
                next.push(Rect::new(fr.x, node.bottom(), fr.w, fr.bottom() - node.bottom()));
            }
        }
        self.free = next;
        self.prune();
    }

    /// Removes every free rect fully contained in another. Mandatory after
    /// each insert to bound the list and keep rects maximal.
    fn prune(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let a = self.free[i];
            let mut remove_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }

    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }
}
