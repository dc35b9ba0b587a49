use crate::geometry::Point;
use crate::raster::line::LineIter;
use std::collections::HashSet;

/// Lazily traces the outline of the rectangle spanned by `top_left` and
/// `bottom_right`, yielding every pixel exactly once.
///
/// Edges are walked in the order top, left, bottom, right. Corners shared by
/// two edges are only yielded by the first edge that reaches them.
#[derive(Clone, Debug)]
pub struct RectOutlineIter {
    edges: [(Point, Point); 4],
    edge: usize,
    current: Option<LineIter>,
    seen: HashSet<Point>,
}

impl RectOutlineIter {
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        let top_right = Point::new(bottom_right.x, top_left.y);
        let bottom_left = Point::new(top_left.x, bottom_right.y);

        Self {
            edges: [
                (top_left, top_right),
                (top_left, bottom_left),
                (bottom_left, bottom_right),
                (top_right, bottom_right),
            ],
            edge: 0,
            current: None,
            seen: HashSet::new(),
        }
    }
}

impl Iterator for RectOutlineIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            if self.current.is_none() {
                let (a, b) = *self.edges.get(self.edge)?;
                self.current = Some(LineIter::new(a, b));
                self.edge += 1;
            }

            match self.current.as_mut().and_then(Iterator::next) {
                Some(pt) => {
                    if self.seen.insert(pt) {
                        return Some(pt);
                    }
                }
                None => self.current = None,
            }
        }
    }
}

/// Iterates the outline pixels of the rectangle between two opposite corners.
pub fn iter_rect(top_left: Point, bottom_right: Point) -> RectOutlineIter {
    RectOutlineIter::new(top_left, bottom_right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_yields_each_pixel_once() {
        let points: Vec<Point> = iter_rect(Point::new(0, 0), Point::new(3, 2)).collect();

        // 4x3 box: perimeter of 2*4 + 2*3 - 4 shared corners.
        assert_eq!(points.len(), 10);

        let unique: HashSet<Point> = points.iter().copied().collect();
        assert_eq!(unique.len(), points.len());

        for pt in &points {
            assert!(pt.x == 0 || pt.x == 3 || pt.y == 0 || pt.y == 2, "{pt} is not on the edge");
        }
        assert_eq!(points[0], Point::new(0, 0));
    }

    #[test]
    fn single_pixel_rect() {
        let points: Vec<Point> = iter_rect(Point::new(5, 5), Point::new(5, 5)).collect();
        assert_eq!(points, vec![Point::new(5, 5)]);
    }

    #[test]
    fn flat_rect_is_a_line() {
        let points: Vec<Point> = iter_rect(Point::new(0, 7), Point::new(4, 7)).collect();
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.y == 7));
    }
}
