//! Geometry kernel: the value types every draw call is expressed in.

mod color;
mod point;
mod rect;
mod text;

pub use color::Color;
pub use point::Point;
pub use rect::Rect;
pub use text::{Text, TextPass};

