//! Engine configuration.
//!
//! `EngineConfig` has sensible defaults via [`Default`] and a fluent
//! [`EngineConfig::builder()`] that validates on `build()`.
//!
//! ```rust
//! use render2d::config::EngineConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EngineConfig::builder()
//!     .title("Doodle")
//!     .resolution("1024x768")?
//!     .target_fps(30)
//!     .build()?;
//! assert_eq!((cfg.width, cfg.height), (1024, 768));
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `title`: window or document title.
//! - `width`, `height`: initial surface size in pixels (default 800x600).
//! - `target_fps`: frame pacing target (default 60).
//! - `event_queue_capacity`: bound of the callback event queue (default 1024).
//! - `trigger_threshold`: normalized value past which an analog trigger
//!   counts as pressed (default 0.5, valid range `(0.0, 1.0]`).
//! - `default_font`: font used when a text names none.
//! - `chroma_key`: color made transparent when textures are stored on the
//!   software backend (default white, `None` disables keying).
//! - `retain_bitmaps`: keep source bitmaps so freed textures can be
//!   re-uploaded on load.
//! - `debug_events`: input categories traced at debug level.
//! - `log_level`: level passed to [`crate::logging::init`].

use crate::errors::ParseError;
use crate::event::input::DebugEvents;
use crate::event::controller::DEFAULT_TRIGGER_THRESHOLD;
use crate::event::queue::DEFAULT_QUEUE_CAPACITY;
use crate::geometry::Color;
use crate::logging::LogLevel;
use crate::render::font_cache::DEFAULT_FONT_FILENAME;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub target_fps: u32,
    pub event_queue_capacity: usize,
    pub trigger_threshold: f64,
    pub default_font: String,
    pub chroma_key: Option<Color>,
    pub retain_bitmaps: bool,
    pub debug_events: DebugEvents,
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "render2d".to_string(),
            width: 800,
            height: 600,
            target_fps: 60,
            event_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            default_font: DEFAULT_FONT_FILENAME.to_string(),
            chroma_key: Some(Color::WHITE),
            retain_bitmaps: true,
            debug_events: DebugEvents::empty(),
            log_level: LogLevel::Info,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }

    /// Installs the logger at `log_level`. Does nothing if one is already set.
    pub fn init_logging(&self) {
        crate::logging::init(self.log_level);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    inner: EngineConfig,
}

impl EngineConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EngineConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn title<S: Into<String>>(self, title: S) -> Self { self.map(|c| c.title = title.into()) }
    pub fn size(self, width: i32, height: i32) -> Self { self.map(|c| { c.width = width; c.height = height; }) }
    pub fn target_fps(self, fps: u32) -> Self { self.map(|c| c.target_fps = fps) }
    pub fn event_queue_capacity(self, n: usize) -> Self { self.map(|c| c.event_queue_capacity = n) }
    pub fn trigger_threshold(self, t: f64) -> Self { self.map(|c| c.trigger_threshold = t) }
    pub fn default_font<S: Into<String>>(self, filename: S) -> Self { self.map(|c| c.default_font = filename.into()) }
    pub fn chroma_key(self, key: Option<Color>) -> Self { self.map(|c| c.chroma_key = key) }
    pub fn retain_bitmaps(self, on: bool) -> Self { self.map(|c| c.retain_bitmaps = on) }
    pub fn debug_events(self, events: DebugEvents) -> Self { self.map(|c| c.debug_events = events) }
    pub fn log_level(self, level: LogLevel) -> Self { self.map(|c| c.log_level = level) }

    /// Sets the size from a `<width>x<height>` string.
    pub fn resolution(self, res: &str) -> Result<Self, ParseError> {
        let (w, h) = parse_resolution(res)?;
        Ok(self.size(w, h))
    }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut EngineConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("window size {width}x{height} must be positive")]
    InvalidSize { width: i32, height: i32 },

    #[error("target_fps must be at least 1")]
    ZeroFps,

    #[error("event_queue_capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("trigger_threshold {0} is out of range (expected 0.0 exclusive to 1.0 inclusive)")]
    InvalidTriggerThreshold(f64),
}

fn validate(c: &EngineConfig) -> Result<(), ConfigError> {
    if c.width <= 0 || c.height <= 0 {
        return Err(ConfigError::InvalidSize { width: c.width, height: c.height });
    }
    if c.target_fps == 0 {
        return Err(ConfigError::ZeroFps);
    }
    if c.event_queue_capacity == 0 {
        return Err(ConfigError::ZeroQueueCapacity);
    }
    if !(c.trigger_threshold > 0.0 && c.trigger_threshold <= 1.0) {
        return Err(ConfigError::InvalidTriggerThreshold(c.trigger_threshold));
    }
    Ok(())
}

/// Parses a resolution string like `1024x768` into its width and height.
pub fn parse_resolution(res: &str) -> Result<(i32, i32), ParseError> {
    let err = || ParseError::Resolution(res.to_string());

    let (w, h) = res.split_once('x').ok_or_else(err)?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(w) || !digits(h) {
        return Err(err());
    }

    let width = w.parse().map_err(|_| err())?;
    let height = h.parse().map_err(|_| err())?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.target_fps, 60);
        assert_eq!(cfg.event_queue_capacity, 1024);
        assert_eq!(cfg.trigger_threshold, 0.5);
        assert_eq!(cfg.chroma_key, Some(Color::WHITE));
        assert_eq!(cfg.default_font, "DejaVuSans.ttf");
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = EngineConfig::builder()
            .title("Doodle")
            .size(320, 240)
            .chroma_key(None)
            .debug_events(DebugEvents::KEY | DebugEvents::MOUSE)
            .with(|c| c.retain_bitmaps = false)
            .build()
            .unwrap();

        assert_eq!(cfg.title, "Doodle");
        assert_eq!((cfg.width, cfg.height), (320, 240));
        assert_eq!(cfg.chroma_key, None);
        assert!(cfg.debug_events.contains(DebugEvents::KEY));
        assert!(!cfg.retain_bitmaps);
    }

    #[test]
    fn log_level_reaches_the_logger() {
        let cfg = EngineConfig::builder().log_level(LogLevel::Warn).build().unwrap();
        assert_eq!(cfg.log_level, LogLevel::Warn);
        cfg.init_logging();
        cfg.init_logging();
        log::warn!("config logging initialized");
    }

    #[test]
    fn builder_validates() {
        assert_eq!(
            EngineConfig::builder().size(0, 10).build().unwrap_err(),
            ConfigError::InvalidSize { width: 0, height: 10 }
        );
        assert_eq!(EngineConfig::builder().target_fps(0).build().unwrap_err(), ConfigError::ZeroFps);
        assert_eq!(
            EngineConfig::builder().event_queue_capacity(0).build().unwrap_err(),
            ConfigError::ZeroQueueCapacity
        );
        assert!(EngineConfig::builder().trigger_threshold(0.0).build().is_err());
        assert!(EngineConfig::builder().trigger_threshold(1.5).build().is_err());
        assert!(EngineConfig::builder().trigger_threshold(1.0).build().is_ok());
    }

    #[test]
    fn resolutions() {
        assert_eq!(parse_resolution("1024x768"), Ok((1024, 768)));
        assert_eq!(parse_resolution("0x0"), Ok((0, 0)));

        for bad in ["", "1024", "1024x", "x768", "1024 x 768", "-1x5", "10x10x10", "axb"] {
            assert_eq!(parse_resolution(bad), Err(ParseError::Resolution(bad.to_string())), "{}", bad);
        }
    }

    #[test]
    fn resolution_through_the_builder() {
        let cfg = EngineConfig::builder().resolution("640x480").unwrap().build().unwrap();
        assert_eq!((cfg.width, cfg.height), (640, 480));
        assert!(EngineConfig::builder().resolution("big").is_err());
    }
}
