//! Pixel generators for lines, rectangle outlines and ellipses.
//!
//! Every generator is a plain pull iterator: calling the constructor creates
//! a fresh sequence, and points are produced one at a time as the caller
//! consumes them, so a backend can draw while iterating.

mod ellipse;
mod line;
mod outline;

pub use ellipse::{iter_ellipse, iter_ellipse_bounds, EllipseIter};
pub use line::{iter_line, LineIter};
pub use outline::{iter_rect, RectOutlineIter};
