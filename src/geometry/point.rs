use crate::errors::ParseError;
use crate::geometry::Rect;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops;
use std::str::FromStr;

/// An integer X,Y coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Returns whether the point falls inside the rect.
    ///
    /// Both edges are inclusive: W and H are zero-relative, so a 100x100 box
    /// at 0,0 contains the point 100,100.
    pub fn inside(&self, r: Rect) -> bool {
        r.contains(self.x as i64, self.y as i64)
    }

    /// Translates this point by `other`.
    pub fn add(&mut self, other: Point) {
        self.x += other.x;
        self.y += other.y;
    }

    pub fn subtract(&mut self, other: Point) {
        self.x -= other.x;
        self.y -= other.y;
    }

    /// Returns the delta that would turn this point into `other`.
    ///
    /// Equal points compare to the origin.
    pub fn compare(&self, other: Point) -> Point {
        Point {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }
}

impl ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = ParseError;

    /// Parses the `"X,Y"` text form. Surrounding double quotes are ignored so
    /// that raw JSON string tokens parse too.
    fn from_str(v: &str) -> Result<Self, Self::Err> {
        let trimmed = v.trim_matches('"');
        let (x, y) = trimmed
            .split_once(',')
            .ok_or_else(|| ParseError::Point(v.to_string()))?;

        let x = x.parse::<i32>().map_err(|_| ParseError::Point(v.to_string()))?;
        let y = y.parse::<i32>().map_err(|_| ParseError::Point(v.to_string()))?;

        Ok(Point { x, y })
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
