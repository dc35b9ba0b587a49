//! Canvas backend for browser hosts.
//!
//! This is the asynchronous delivery model. DOM callbacks run outside the
//! frame loop, so they only push events through an [`EventSink`]; `poll`
//! drains the queue and applies the events in arrival order. Drawing is
//! recorded into a display list the host replays after each present.

mod display_list;

pub use display_list::{css_rgba, DisplayItem, DisplayList};

use crate::config::EngineConfig;
use crate::errors::RenderError;
use crate::event::{EventQueue, EventSink, EventState};
use crate::geometry::{Color, Point, Rect, Text};
use crate::raster::iter_line;
use crate::render::backend::{BackendKind, Engine, RgbaImage, Texture};
use crate::render::font_cache::{CellGlyphs, FontCache, GlyphMetrics};
use crate::render::texture_cache::TextureCache;
use std::time::{Duration, Instant};

pub struct CanvasEngine {
    config: EngineConfig,
    width: i32,
    height: i32,
    ready: bool,
    started: Option<Instant>,
    events: EventState,
    queue: EventQueue,
    sink: EventSink,
    /// PNG bytes per texture.
    textures: TextureCache<Vec<u8>>,
    fonts: FontCache,
    metrics: Box<dyn GlyphMetrics>,
    list: DisplayList,
    frame: Vec<DisplayItem>,
    frame_id: u64,
}

impl CanvasEngine {
    pub fn new(config: EngineConfig) -> Self {
        let (sink, queue) = EventQueue::bounded(config.event_queue_capacity);
        let events = EventState::new()
            .with_trigger_threshold(config.trigger_threshold)
            .with_debug(config.debug_events);

        Self {
            width: config.width,
            height: config.height,
            textures: TextureCache::new(BackendKind::Canvas, config.retain_bitmaps),
            fonts: FontCache::new(&config.default_font),
            config,
            ready: false,
            started: None,
            events,
            queue,
            sink,
            metrics: Box::new(CellGlyphs),
            list: DisplayList::new(),
            frame: Vec::new(),
            frame_id: 0,
        }
    }

    /// Uses the host's text measurement instead of the built-in cells.
    pub fn with_metrics(mut self, metrics: Box<dyn GlyphMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// A producer handle for host callbacks. Cheap to clone.
    pub fn event_sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Commands recorded since the last present.
    pub fn pending(&self) -> &[DisplayItem] {
        self.list.items()
    }

    /// The last presented frame.
    pub fn frame(&self) -> &[DisplayItem] {
        &self.frame
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// The last presented frame as a JSON array for the host.
    pub fn frame_json(&self) -> Result<String, RenderError> {
        serde_json::to_string(&self.frame).map_err(|e| RenderError::Backend(e.into()))
    }

    /// PNG bytes the host builds the image element for `texture` from.
    pub fn image_data(&self, texture: &Texture) -> Option<&[u8]> {
        self.textures.handle(texture).map(|png| png.as_slice())
    }

    fn record(&mut self, item: DisplayItem) {
        if self.ready {
            self.list.add_command(item);
        }
    }

    fn load_item(texture: &Texture) -> DisplayItem {
        DisplayItem::LoadImage { texture: texture.id, width: texture.width, height: texture.height }
    }
}

fn encode(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    image.to_png()
}

impl Engine for CanvasEngine {
    fn backend(&self) -> BackendKind {
        BackendKind::Canvas
    }

    fn setup(&mut self) -> Result<(), RenderError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(RenderError::Setup(format!("canvas has no size ({}x{})", self.width, self.height)));
        }
        if self.sink.is_closed() {
            return Err(RenderError::Setup("event queue is closed".into()));
        }

        self.ready = true;
        self.started = Some(Instant::now());
        self.events.window_size = (self.width, self.height);
        self.record(DisplayItem::SetTitle { title: self.config.title.clone() });

        log::info!("canvas engine ready: {}x{}", self.width, self.height);
        Ok(())
    }

    fn teardown(&mut self) {
        // Undrawn commands are dropped; the releases go out as a final frame
        // so nothing leaks into the next setup.
        self.list.clear();
        let released: Vec<DisplayItem> = self
            .textures
            .free_all()
            .into_iter()
            .map(|texture| DisplayItem::ReleaseImage { texture })
            .collect();
        if self.ready {
            self.frame = released;
            self.frame_id = self.frame_id.wrapping_add(1);
        }
        self.textures.clear();
        self.fonts.clear();
        self.ready = false;
        self.started = None;
        log::debug!("canvas engine torn down");
    }

    fn poll(&mut self) -> Result<&EventState, RenderError> {
        if !self.ready {
            return Err(RenderError::NotInitialized);
        }
        // The resize flag is not reset here; the caller clears it once the
        // new size has been handled.
        self.events.pump(&mut self.queue)?;

        if self.events.window_resized {
            let (w, h) = self.events.window_size;
            if w > 0 && h > 0 {
                self.width = w;
                self.height = h;
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
        (self.width, self.height)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if !self.ready {
            return Err(RenderError::NotInitialized);
        }
        self.frame = self.list.take();
        self.frame_id = self.frame_id.wrapping_add(1);
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        let (width, height) = (self.width, self.height);
        self.record(DisplayItem::Clear { style: css_rgba(color), width, height });
    }

    fn set_title(&mut self, title: &str) {
        self.config.title = title.to_string();
        self.record(DisplayItem::SetTitle { title: title.to_string() });
    }

    fn draw_point(&mut self, color: Color, p: Point) {
        self.record(DisplayItem::FillRect { rect: Rect::at(p.x, p.y, 1, 1), style: css_rgba(color) });
    }

    fn draw_line(&mut self, color: Color, a: Point, b: Point) {
        let style = css_rgba(color);
        for p in iter_line(a, b) {
            self.record(DisplayItem::FillRect { rect: Rect::at(p.x, p.y, 1, 1), style: style.clone() });
        }
    }

    fn draw_rect(&mut self, color: Color, rect: Rect) {
        self.record(DisplayItem::StrokeRect { rect, style: css_rgba(color) });
    }

    fn draw_box(&mut self, color: Color, rect: Rect) {
        self.record(DisplayItem::FillRect { rect, style: css_rgba(color) });
    }

    fn draw_text(&mut self, text: &Text, p: Point) -> Result<(), RenderError> {
        let face = self.fonts.face(&text.font_filename, text.size)?;
        let font = face.css();

        for pass in text.passes() {
            self.record(DisplayItem::FillText {
                text: text.text.clone(),
                x: p.x + pass.dx,
                y: p.y + pass.dy,
                font: font.clone(),
                style: css_rgba(pass.color),
            });
        }
        Ok(())
    }

    fn compute_text_rect(&self, text: &Text) -> Result<Rect, RenderError> {
        let face = self.fonts.face(&text.font_filename, text.size)?;
        // Browsers only report a width; the height is the font size.
        Ok(Rect::new(self.metrics.text_width(&face, &text.text), text.size))
    }

    fn store_texture(&mut self, name: &str, image: &RgbaImage) -> Result<Texture, RenderError> {
        let texture = self.textures.store(name, image, encode)?;
        self.record(Self::load_item(&texture));
        Ok(texture)
    }

    fn load_texture(&mut self, name: &str) -> Result<Texture, RenderError> {
        let mut uploaded = false;
        let texture = self.textures.load(name, |image| {
            uploaded = true;
            encode(image)
        })?;

        if uploaded {
            self.record(Self::load_item(&texture));
        }
        Ok(texture)
    }

    fn copy(&mut self, texture: &Texture, src: Rect, dst: Rect) {
        if self.textures.handle(texture).is_none() {
            log::debug!("copy with unknown or freed texture {:?}", texture.id);
            return;
        }
        self.record(DisplayItem::DrawImage { texture: texture.id, src, dst });
    }

    fn free_textures(&mut self) -> usize {
        let freed = self.textures.free_all();
        for texture in &freed {
            self.record(DisplayItem::ReleaseImage { texture: *texture });
        }
        freed.len()
    }

    fn delay(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}
