use crate::geometry::Point;

/// Lazily yields the pixels of a line using a digital differential analyzer.
///
/// The walk takes `max(|dx|, |dy|)` steps and yields one more point than
/// that, starting at `p1` and ending at `p2`. Coordinates are truncated
/// toward zero at each step, never rounded.
#[derive(Clone, Debug)]
pub struct LineIter {
    origin: Point,
    dx: f64,
    dy: f64,
    steps: i64,
    i: i64,
}

impl LineIter {
    pub fn new(p1: Point, p2: Point) -> Self {
        // Widened so the extremes of i32 never overflow.
        let dx = p2.x as i64 - p1.x as i64;
        let dy = p2.y as i64 - p1.y as i64;

        Self {
            origin: p1,
            dx: dx as f64,
            dy: dy as f64,
            steps: dx.abs().max(dy.abs()),
            i: 0,
        }
    }
}

impl Iterator for LineIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.i > self.steps {
            return None;
        }

        let point = if self.steps == 0 {
            self.origin
        } else {
            // Scale the total delta rather than accumulating increments so
            // whole-pixel positions (and the end point) come out exact.
            let (i, steps) = (self.i as f64, self.steps as f64);
            Point::new(
                (self.origin.x as f64 + self.dx * i / steps) as i32,
                (self.origin.y as f64 + self.dy * i / steps) as i32,
            )
        };

        self.i += 1;
        Some(point)
    }

    fn nth(&mut self, n: usize) -> Option<Point> {
        self.i = self.i.saturating_add(n as i64);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps - self.i + 1).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LineIter {}

/// Iterates the points of the line between `p1` and `p2`.
pub fn iter_line(p1: Point, p2: Point) -> LineIter {
    LineIter::new(p1, p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extreme_endpoints_do_not_overflow() {
        let (a, b) = (Point::new(i32::MIN, 0), Point::new(i32::MAX, 0));
        let line = iter_line(a, b);
        assert_eq!(line.len(), u32::MAX as usize + 1);

        let mut line = iter_line(a, b);
        assert_eq!(line.next(), Some(a));
        assert_eq!(line.nth(u32::MAX as usize - 1), Some(b));
        assert_eq!(line.next(), None);
    }

    #[test]
    fn degenerate_line_is_one_point() {
        for p in [Point::new(0, 0), Point::new(-5, 9), Point::new(1000, -1000)] {
            let points: Vec<Point> = iter_line(p, p).collect();
            assert_eq!(points, vec![p]);
        }
    }

    #[test]
    fn point_count_and_endpoints() {
        let pairs = [
            (Point::new(0, 0), Point::new(10, 0)),
            (Point::new(0, 0), Point::new(3, 10)),
            (Point::new(5, 5), Point::new(-7, 2)),
            (Point::new(-3, -3), Point::new(-3, 12)),
            (Point::new(2, 9), Point::new(9, 2)),
            (Point::new(0, 0), Point::new(7, 3)),
        ];

        for (a, b) in pairs {
            let points: Vec<Point> = iter_line(a, b).collect();
            let steps = (b.x - a.x).abs().max((b.y - a.y).abs()) as usize;
            assert_eq!(points.len(), steps + 1, "{a} -> {b}");
            assert_eq!(points.first(), Some(&a));
            assert_eq!(points.last(), Some(&b));
        }
    }

    #[test]
    fn shallow_line_truncates() {
        let points: Vec<Point> = iter_line(Point::new(0, 0), Point::new(4, 2)).collect();
        assert_eq!(
            points,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 1),
                Point::new(3, 1),
                Point::new(4, 2),
            ]
        );
    }

    #[test]
    fn reports_exact_length() {
        let mut line = iter_line(Point::new(0, 0), Point::new(0, 4));
        assert_eq!(line.len(), 5);
        line.next();
        assert_eq!(line.len(), 4);
    }
}
