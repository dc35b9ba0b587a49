//! Clipping of texture blits against a bordered container.
//!
//! A tiled canvas is drawn chunk by chunk inside a scrollable widget. Chunks
//! that hang off the edge of the widget must be cropped, not squashed, so
//! the visible part of the image keeps its scale.

use crate::geometry::{Point, Rect};

/// Adjusts `src` and `dst` in place so that copying `src` to `dst` never
/// paints outside the container placed at `p` with size `size`, inset by a
/// border of `thickness` pixels.
///
/// Overflow on the right or bottom crops the same amount off both rects.
/// Overflow on the left or top moves the destination inside the border and
/// advances the source origin by the hidden amount instead.
pub fn trim_box(src: &mut Rect, dst: &mut Rect, p: Point, size: Rect, thickness: i32) {
    // The source can never be bigger than the container itself.
    src.w = src.w.min(size.w);
    src.h = src.h.min(size.h);

    // Example: an 800 wide container and a chunk at x=790 with w=100 would
    // end at 890. The delta (800 - 890 = -90) is negative and shrinks both
    // rects by the overflowing amount.
    if dst.x + src.w > p.x + size.w {
        let delta = (p.x + size.w - thickness) - (dst.w + dst.x);
        src.w += delta;
        dst.w += delta;
    }
    if dst.y + src.h > p.y + size.h {
        let delta = (p.y + size.h - thickness) - (dst.h + dst.y);
        src.h += delta;
        dst.h += delta;
    }

    // Example: the container sits at x=80 and a chunk wants x=60. The 20
    // hidden pixels come off the left of the source, not the destination.
    if dst.x < p.x {
        let delta = p.x - dst.x;
        dst.x = p.x + thickness;
        dst.w -= delta;
        src.x += delta;
    }
    if dst.y < p.y {
        let delta = p.y - dst.y;
        dst.y = p.y + thickness;
        dst.h -= delta;
        src.y += delta;
    }

    // Keep the destination off the container's border.
    if dst.w >= size.w - thickness {
        dst.w = size.w - thickness;
    }
}
