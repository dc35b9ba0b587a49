//! Backend-agnostic 2D rendering.
//!
//! Applications draw through the [`Engine`] trait and read input from the
//! [`EventState`] it returns on every poll. Two backends implement it: a
//! software framebuffer driven by a polled event source, and a canvas
//! backend that records commands for a browser host and receives events
//! from asynchronous callbacks.
//!
//! ```rust
//! use render2d::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::builder().size(64, 48).target_fps(30).build()?;
//! config.init_logging();
//! let mut timer = FrameTimer::from_config(&config);
//! let mut engine = SoftwareEngine::new(config);
//! engine.setup()?;
//!
//! engine.clear(Color::WHITE);
//! engine.draw_line(Color::BLACK, Point::new(0, 0), Point::new(63, 47));
//! engine.present()?;
//! timer.pace(&engine);
//! # Ok(()) }
//! ```

pub mod clip;
pub mod config;
pub mod errors;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod raster;
pub mod render;
pub mod tick;

pub use errors::{ParseError, RenderError};
pub use event::EventState;
pub use render::Engine;

pub mod prelude {
    pub use crate::clip::trim_box;
    pub use crate::config::EngineConfig;
    pub use crate::errors::RenderError;
    pub use crate::event::{EventState, GameController};
    pub use crate::geometry::{Color, Point, Rect, Text};
    pub use crate::render::backends::software::SoftwareEngine;
    #[cfg(feature = "backend_canvas")]
    pub use crate::render::backends::canvas::CanvasEngine;
    pub use crate::render::{Engine, RgbaImage, Texture, Texturer};
    pub use crate::tick::FrameTimer;
}
