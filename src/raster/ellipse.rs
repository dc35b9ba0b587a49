use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Region {
    /// Slope shallower than -1: X advances every step.
    One,
    /// Slope steeper than -1: Y falls every step.
    Two,
    Done,
}

/// Lazily yields the pixels of an axis-aligned ellipse using the two-region
/// midpoint algorithm.
///
/// Each step produces up to four points mirrored across both axes of the
/// ellipse. Mirrors that land on the same pixel (on an axis, or when a
/// radius is zero) are yielded once per step.
#[derive(Clone, Debug)]
pub struct EllipseIter {
    rx: f64,
    ry: f64,
    xc: f64,
    yc: f64,
    x: f64,
    y: f64,
    dx: f64,
    dy: f64,
    d1: f64,
    d2: f64,
    region: Region,
    pending: [Point; 4],
    pending_len: usize,
    pending_pos: usize,
}

impl EllipseIter {
    /// Ellipse with radii `rx`, `ry` centered at `xc`, `yc`.
    pub fn new(rx: f64, ry: f64, xc: f64, yc: f64) -> Self {
        let (rx, ry) = (rx.abs(), ry.abs());
        let (rx2, ry2) = (rx * rx, ry * ry);

        Self {
            rx,
            ry,
            xc,
            yc,
            x: 0.0,
            y: ry,
            dx: 0.0,
            dy: 2.0 * rx2 * ry,
            d1: ry2 - rx2 * ry + 0.25 * rx2,
            d2: 0.0,
            region: Region::One,
            pending: [Point::ORIGIN; 4],
            pending_len: 0,
            pending_pos: 0,
        }
    }

    pub fn from_center(center: Point, radius: Point) -> Self {
        Self::new(radius.x as f64, radius.y as f64, center.x as f64, center.y as f64)
    }

    /// Ellipse inscribed in the box with opposite corners `a` and `b`.
    pub fn from_bounds(a: Point, b: Point) -> Self {
        let rx = (b.x - a.x).abs() as f64 / 2.0;
        let ry = (b.y - a.y).abs() as f64 / 2.0;
        let xc = (a.x + b.x) as f64 / 2.0;
        let yc = (a.y + b.y) as f64 / 2.0;

        log::trace!("ellipse between {a} and {b}: radius {rx},{ry} at center {xc},{yc}");
        Self::new(rx, ry, xc, yc)
    }

    fn queue_mirrors(&mut self) {
        let (x, y, xc, yc) = (self.x, self.y, self.xc, self.yc);
        let mirrors = [
            Point::new((x + xc) as i32, (y + yc) as i32),
            Point::new((-x + xc) as i32, (y + yc) as i32),
            Point::new((x + xc) as i32, (-y + yc) as i32),
            Point::new((-x + xc) as i32, (-y + yc) as i32),
        ];

        self.pending_len = 0;
        self.pending_pos = 0;
        for pt in mirrors {
            if !self.pending[..self.pending_len].contains(&pt) {
                self.pending[self.pending_len] = pt;
                self.pending_len += 1;
            }
        }
    }

    fn step_region_one(&mut self) {
        let (rx2, ry2) = (self.rx * self.rx, self.ry * self.ry);

        self.x += 1.0;
        self.dx += 2.0 * ry2;
        if self.d1 < 0.0 {
            self.d1 += self.dx + ry2;
        } else {
            self.y -= 1.0;
            self.dy -= 2.0 * rx2;
            self.d1 += self.dx - self.dy + ry2;
        }
    }

    fn enter_region_two(&mut self) {
        let (rx2, ry2) = (self.rx * self.rx, self.ry * self.ry);
        let (x, y) = (self.x, self.y);

        self.d2 = ry2 * (x + 0.5) * (x + 0.5) + rx2 * (y - 1.0) * (y - 1.0) - rx2 * ry2;
        self.region = Region::Two;
    }

    fn step_region_two(&mut self) {
        let (rx2, ry2) = (self.rx * self.rx, self.ry * self.ry);

        self.y -= 1.0;
        self.dy -= 2.0 * rx2;
        if self.d2 > 0.0 {
            self.d2 += rx2 - self.dy;
        } else {
            self.x += 1.0;
            self.dx += 2.0 * ry2;
            self.d2 += self.dx - self.dy + rx2;
        }
    }
}

impl Iterator for EllipseIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            if self.pending_pos < self.pending_len {
                let pt = self.pending[self.pending_pos];
                self.pending_pos += 1;
                return Some(pt);
            }

            match self.region {
                Region::One => {
                    if self.dx < self.dy {
                        self.queue_mirrors();
                        self.step_region_one();
                    } else {
                        self.enter_region_two();
                    }
                }
                Region::Two => {
                    if self.y >= 0.0 {
                        self.queue_mirrors();
                        self.step_region_two();
                    } else {
                        self.region = Region::Done;
                    }
                }
                Region::Done => return None,
            }
        }
    }
}

/// Iterates an ellipse from its center and radii.
pub fn iter_ellipse(center: Point, radius: Point) -> EllipseIter {
    EllipseIter::from_center(center, radius)
}

/// Iterates the ellipse that fits the box with opposite corners `a` and `b`.
pub fn iter_ellipse_bounds(a: Point, b: Point) -> EllipseIter {
    EllipseIter::from_bounds(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn small_circle() {
        let points: Vec<Point> = iter_ellipse(Point::new(0, 0), Point::new(2, 2)).collect();
        assert_eq!(points.len(), 12);

        let unique: HashSet<Point> = points.iter().copied().collect();
        assert_eq!(unique.len(), 12);
        for extreme in [Point::new(2, 0), Point::new(-2, 0), Point::new(0, 2), Point::new(0, -2)] {
            assert!(unique.contains(&extreme), "missing {extreme}");
        }
    }

    #[test]
    fn bounds_derive_center_and_radius() {
        let points: Vec<Point> = iter_ellipse_bounds(Point::new(0, 0), Point::new(10, 6)).collect();
        assert_eq!(points.len(), 24);

        for pt in &points {
            assert!(pt.x >= 0 && pt.x <= 10 && pt.y >= 0 && pt.y <= 6, "{pt} out of bounds");
        }
        for extreme in [Point::new(0, 3), Point::new(10, 3), Point::new(5, 0), Point::new(5, 6)] {
            assert!(points.contains(&extreme), "missing {extreme}");
        }

        // Corner order does not matter.
        let flipped: HashSet<Point> = iter_ellipse_bounds(Point::new(10, 6), Point::new(0, 0)).collect();
        assert_eq!(flipped, points.into_iter().collect());
    }

    #[test]
    fn zero_radius_is_a_single_point() {
        let points: Vec<Point> = iter_ellipse(Point::new(5, 5), Point::new(0, 0)).collect();
        assert_eq!(points, vec![Point::new(5, 5)]);
    }

    #[test]
    fn zero_width_collapses_onto_the_axis() {
        let points: Vec<Point> = iter_ellipse(Point::new(0, 0), Point::new(0, 4)).collect();
        assert_eq!(points.len(), 9);
        assert!(points.iter().all(|p| p.x == 0));
    }

    #[test]
    fn zero_height_collapses_to_the_center() {
        // Region one never runs without vertical extent, and region two
        // stops after a single step.
        let points: Vec<Point> = iter_ellipse_bounds(Point::new(0, 5), Point::new(10, 5)).collect();
        assert_eq!(points, vec![Point::new(5, 5)]);
    }

    #[test]
    fn sequences_are_independent() {
        let center = Point::new(3, 3);
        let radius = Point::new(10, 7);
        let mut first = iter_ellipse(center, radius);
        first.next();
        let second: Vec<Point> = iter_ellipse(center, radius).collect();
        assert_eq!(second.len(), 48);
        assert_eq!(first.count(), 47);
    }
}
