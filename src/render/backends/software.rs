//! Software backend: a CPU framebuffer fed by a polled event source.
//!
//! This is the synchronous delivery model. `poll` drains the
//! [`EventPump`] inline until it runs dry, applying each event as it comes.

mod framebuffer;

pub use framebuffer::Framebuffer;

use crate::config::EngineConfig;
use crate::errors::RenderError;
use crate::event::{EventPump, EventState, ScriptedEvents};
use crate::geometry::{Color, Point, Rect, Text};
use crate::raster::{iter_line, iter_rect};
use crate::render::backend::{BackendKind, Engine, RgbaImage, Texture};
use crate::render::font_cache::{CellGlyphs, FontCache, GlyphRenderer};
use crate::render::texture_cache::TextureCache;
use anyhow::Context;
use std::path::Path;
use std::time::{Duration, Instant};

/// Copies `image`, making every pixel of the key color fully transparent.
pub fn chroma_keyed(image: &RgbaImage, key: Option<Color>) -> RgbaImage {
    let mut out = RgbaImage {
        pixels: image.packed(),
        width: image.width,
        height: image.height,
        stride: image.width * 4,
    };

    if let Some(key) = key {
        for px in out.pixels.chunks_exact_mut(4) {
            if px[0] == key.red && px[1] == key.green && px[2] == key.blue {
                px[3] = 0;
            }
        }
    }
    out
}

pub struct SoftwareEngine<P: EventPump = ScriptedEvents> {
    config: EngineConfig,
    title: String,
    /// Back buffer; `None` until setup.
    frame: Option<Framebuffer>,
    /// Last presented frame.
    front: Option<RgbaImage>,
    frames_presented: u64,
    started: Option<Instant>,
    events: EventState,
    pump: P,
    textures: TextureCache<RgbaImage>,
    fonts: FontCache,
    glyphs: Box<dyn GlyphRenderer>,
}

impl SoftwareEngine<ScriptedEvents> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_pump(config, ScriptedEvents::new())
    }
}

impl<P: EventPump> SoftwareEngine<P> {
    pub fn with_pump(config: EngineConfig, pump: P) -> Self {
        let events = EventState::new()
            .with_trigger_threshold(config.trigger_threshold)
            .with_debug(config.debug_events);

        Self {
            title: config.title.clone(),
            textures: TextureCache::new(BackendKind::Software, config.retain_bitmaps),
            fonts: FontCache::new(&config.default_font),
            config,
            frame: None,
            front: None,
            frames_presented: 0,
            started: None,
            events,
            pump,
            glyphs: Box::new(CellGlyphs),
        }
    }

    /// Replaces the built-in cell glyphs with a real text rasterizer.
    pub fn with_glyphs(mut self, glyphs: Box<dyn GlyphRenderer>) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn pump_mut(&mut self) -> &mut P {
        &mut self.pump
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The back buffer as drawn so far.
    pub fn framebuffer(&self) -> Option<&Framebuffer> {
        self.frame.as_ref()
    }

    /// The last presented frame.
    pub fn snapshot(&self) -> Result<RgbaImage, RenderError> {
        self.front.clone().ok_or(RenderError::NotInitialized)
    }

    /// Writes the last presented frame to `path` as PNG.
    pub fn write_png(&self, path: &Path) -> Result<(), RenderError> {
        let bytes = self.snapshot()?.to_png()?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote frame {} to {}", self.frames_presented, path.display());
        Ok(())
    }

    fn upload(&self) -> impl Fn(&RgbaImage) -> anyhow::Result<RgbaImage> {
        let key = self.config.chroma_key;
        move |image: &RgbaImage| Ok(chroma_keyed(image, key))
    }
}

impl<P: EventPump> Engine for SoftwareEngine<P> {
    fn backend(&self) -> BackendKind {
        BackendKind::Software
    }

    fn setup(&mut self) -> Result<(), RenderError> {
        let (w, h) = (self.config.width, self.config.height);
        if w <= 0 || h <= 0 {
            return Err(RenderError::Setup(format!("invalid window size {}x{}", w, h)));
        }

        let frame = Framebuffer::new(w as u32, h as u32);
        self.front = Some(frame.image().clone());
        self.frame = Some(frame);
        self.started = Some(Instant::now());
        self.events.window_size = (w, h);

        log::info!("software engine ready: {}x{} '{}'", w, h, self.title);
        Ok(())
    }

    fn teardown(&mut self) {
        let freed = self.textures.free_all().len();
        self.textures.clear();
        self.fonts.clear();
        self.frame = None;
        self.front = None;
        self.started = None;
        log::debug!("software engine torn down, {} textures freed", freed);
    }

    fn poll(&mut self) -> Result<&EventState, RenderError> {
        if self.frame.is_none() {
            return Err(RenderError::NotInitialized);
        }

        // Resizes are one-shot per poll on this backend.
        self.events.window_resized = false;
        self.events.pump(&mut self.pump)?;

        if self.events.window_resized {
            let (w, h) = self.events.window_size;
            if let Some(frame) = self.frame.as_mut() {
                if w > 0 && h > 0 {
                    frame.resize(w as u32, h as u32);
                }
            }
        }

        Ok(&self.events)
    }

    fn events(&self) -> &EventState {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventState {
        &mut self.events
    }

    fn get_ticks(&self) -> u32 {
        self.started.map(|t| t.elapsed().as_millis() as u32).unwrap_or(0)
    }

    fn window_size(&self) -> (i32, i32) {
        match &self.frame {
            Some(frame) => (frame.width() as i32, frame.height() as i32),
            None => (self.config.width, self.config.height),
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let frame = self.frame.as_ref().ok_or(RenderError::NotInitialized)?;
        self.front = Some(frame.image().clone());
        self.frames_presented += 1;
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        if let Some(frame) = self.frame.as_mut() {
            frame.clear(color);
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn draw_point(&mut self, color: Color, p: Point) {
        if let Some(frame) = self.frame.as_mut() {
            frame.blend(p.x, p.y, color);
        }
    }

    fn draw_line(&mut self, color: Color, a: Point, b: Point) {
        if let Some(frame) = self.frame.as_mut() {
            for p in iter_line(a, b) {
                frame.blend(p.x, p.y, color);
            }
        }
    }

    fn draw_rect(&mut self, color: Color, rect: Rect) {
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }
        if let Some(frame) = self.frame.as_mut() {
            let bottom_right = Point::new(rect.x + rect.w - 1, rect.y + rect.h - 1);
            for p in iter_rect(rect.point(), bottom_right) {
                frame.blend(p.x, p.y, color);
            }
        }
    }

    fn draw_box(&mut self, color: Color, rect: Rect) {
        if let Some(frame) = self.frame.as_mut() {
            frame.fill_rect(rect, color);
        }
    }

    fn draw_text(&mut self, text: &Text, p: Point) -> Result<(), RenderError> {
        let face = self.fonts.face(&text.font_filename, text.size)?;
        let Some(frame) = self.frame.as_mut() else {
            return Ok(());
        };

        for pass in text.passes() {
            let (ox, oy) = (p.x + pass.dx, p.y + pass.dy);
            self.glyphs.render(&face, &text.text, &mut |x: i32, y: i32| frame.blend(ox + x, oy + y, pass.color));
        }
        Ok(())
    }

    fn compute_text_rect(&self, text: &Text) -> Result<Rect, RenderError> {
        let face = self.fonts.face(&text.font_filename, text.size)?;
        Ok(Rect::new(self.glyphs.text_width(&face, &text.text), face.size))
    }

    fn store_texture(&mut self, name: &str, image: &RgbaImage) -> Result<Texture, RenderError> {
        let upload = self.upload();
        self.textures.store(name, image, upload)
    }

    fn load_texture(&mut self, name: &str) -> Result<Texture, RenderError> {
        let upload = self.upload();
        self.textures.load(name, upload)
    }

    fn copy(&mut self, texture: &Texture, src: Rect, dst: Rect) {
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        let Some(image) = self.textures.handle(texture) else {
            log::debug!("copy with unknown or freed texture {:?}", texture.id);
            return;
        };
        if src.w <= 0 || src.h <= 0 || dst.w <= 0 || dst.h <= 0 {
            return;
        }

        // Nearest-neighbour scale of src onto dst.
        for dy in 0..dst.h {
            let sy = src.y + dy * src.h / dst.h;
            for dx in 0..dst.w {
                let sx = src.x + dx * src.w / dst.w;
                if sx < 0 || sy < 0 {
                    continue;
                }
                if let Some(color) = image.pixel(sx as u32, sy as u32) {
                    frame.blend(dst.x + dx, dst.y + dy, color);
                }
            }
        }
    }

    fn free_textures(&mut self) -> usize {
        self.textures.free_all().len()
    }

    fn delay(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}
