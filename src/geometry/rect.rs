use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangle with a top-left coordinate and a width and height.
///
/// Widths and heights are expected to be non-negative but this is not
/// enforced. The all-zero value is treated as "uninitialized".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Creates a rectangle of the given size at the origin.
    pub const fn new(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub const fn at(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns true unless `other` sits left of or above this rect, or is
    /// wider or taller than it.
    pub fn bigger(&self, other: Rect) -> bool {
        !(other.x < self.x || other.y < self.y || other.w > self.w || other.h > self.h)
    }

    /// Corner-containment intersection test.
    ///
    /// True when any corner of `other` is inside `self` or any corner of
    /// `self` is inside `other`. Two rectangles that cross like a plus sign,
    /// with no corner inside the other, are reported as not intersecting.
    pub fn intersects(&self, other: Rect) -> bool {
        fn any_corner_inside(a: Rect, b: Rect) -> bool {
            let (x1, y1) = (b.x as i64, b.y as i64);
            let (x2, y2) = (x1 + b.w as i64, y1 + b.h as i64);
            [(x1, y1), (x1, y2), (x2, y1), (x2, y2)]
                .iter()
                .any(|&(x, y)| a.contains(x, y))
        }

        any_corner_inside(*self, other) || any_corner_inside(other, *self)
    }

    /// Inclusive containment on widened coordinates, so edges past
    /// `i32::MAX` are still compared correctly.
    pub(crate) fn contains(&self, x: i64, y: i64) -> bool {
        let (x1, y1) = (self.x as i64, self.y as i64);
        let (x2, y2) = (x1 + self.w as i64, y1 + self.h as i64);

        (x >= x1 && x <= x2) && (y >= y1 && y <= y2)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.w == 0 && self.h == 0
    }

    /// Field-wise sum of two rects.
    pub fn add(&self, other: Rect) -> Rect {
        Rect {
            x: self.x + other.x,
            y: self.y + other.y,
            w: self.w + other.w,
            h: self.h + other.h,
        }
    }

    /// Moves the rect by a point, keeping its size.
    pub fn add_point(&self, other: Point) -> Rect {
        Rect { x: self.x + other.x, y: self.y + other.y, ..*self }
    }

    /// Inverse of [`Rect::add_point`].
    pub fn subtract_point(&self, other: Point) -> Rect {
        Rect { x: self.x - other.x, y: self.y - other.y, ..*self }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect<{},{},{},{}>", self.x, self.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_cases() {
        let cases = [
            (Rect::at(0, 0, 1000, 1000), Rect::at(200, 200, 100, 100), true),
            (Rect::at(200, 200, 100, 100), Rect::at(0, 0, 1000, 1000), true),
            (Rect::at(0, 0, 100, 100), Rect::at(100, 0, 100, 100), true),
            (Rect::at(0, 0, 99, 99), Rect::at(100, 0, 99, 99), false),
            (Rect::at(183, 256, 283, 356), Rect::at(0, -232, 874, 490), true),
            // Crossing without contained corners is a known miss.
            (Rect::at(183, 256, 283, 356), Rect::at(0, -240, 874, 490), false),
            (Rect::at(0, 30, 9, 62), Rect::at(16, 0, 32, 64), false),
            (Rect::at(0, 30, 11, 62), Rect::at(7, 4, 17, 28), true),
        ];

        for (a, b, expect) in cases {
            assert_eq!(a.intersects(b), expect, "{a} collision with {b}");
        }
    }

    #[test]
    fn intersection_is_symmetric() {
        let rects = [
            Rect::at(0, 0, 1000, 1000),
            Rect::at(200, 200, 100, 100),
            Rect::at(100, 0, 100, 100),
            Rect::at(-50, 40, 10, 10),
            Rect::at(45, -300, 5, 900),
        ];
        for a in rects {
            for b in rects {
                assert_eq!(a.intersects(b), b.intersects(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn edges_past_i32_max() {
        let far = Rect::at(i32::MAX - 10, i32::MAX - 10, 100, 100);
        assert!(far.intersects(Rect::at(i32::MAX - 5, i32::MAX - 5, 1, 1)));
        assert!(!far.intersects(Rect::at(0, 0, 10, 10)));
        assert!(Point::new(i32::MAX, i32::MAX).inside(far));
        assert!(Point::new(i32::MIN, 0).inside(Rect::at(i32::MIN, 0, i32::MAX, 1)));
    }

    #[test]
    fn thin_crossing_rectangles_do_not_intersect() {
        let wide = Rect::at(0, 40, 100, 10);
        let tall = Rect::at(40, 0, 10, 100);
        assert!(!wide.intersects(tall));
    }

    #[test]
    fn bigger_and_zero() {
        let r = Rect::at(10, 10, 100, 100);
        assert!(r.bigger(Rect::at(20, 20, 50, 50)));
        assert!(!r.bigger(Rect::at(5, 20, 50, 50)));
        assert!(!r.bigger(Rect::at(20, 20, 150, 50)));
        assert!(Rect::default().is_zero());
        assert!(!Rect::new(0, 1).is_zero());
    }

    #[test]
    fn arithmetic_and_display() {
        let r = Rect::at(1, 2, 3, 4);
        assert_eq!(r.add(Rect::at(1, 1, 1, 1)), Rect::at(2, 3, 4, 5));
        assert_eq!(r.add_point(Point::new(10, 10)), Rect::at(11, 12, 3, 4));
        assert_eq!(r.subtract_point(Point::new(1, 2)), Rect::at(0, 0, 3, 4));
        assert_eq!(r.point(), Point::new(1, 2));
        assert_eq!(r.to_string(), "Rect<1,2,3,4>");
    }

    #[test]
    fn serializes_as_plain_object() {
        let json = serde_json::to_string(&Rect::at(1, 2, 3, 4)).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2,"w":3,"h":4}"#);
    }
}
