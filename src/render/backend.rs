use crate::errors::RenderError;
use crate::event::EventState;
use crate::geometry::{Color, Point, Rect, Text};
use crate::raster::iter_ellipse_bounds;
use anyhow::{bail, ensure, Context};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which backend produced a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// CPU framebuffer, polled event source.
    Software,
    /// Browser canvas, callback event source.
    Canvas,
}

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique texture identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TextureId(u64);

impl TextureId {
    pub fn new() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for TextureId {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored image texture, seen from the application side.
pub trait Texturer {
    fn size(&self) -> Rect;
}

/// Handle returned by [`Engine::store_texture`] and [`Engine::load_texture`].
///
/// The handle only names a texture cache entry. Handing it to an engine of a
/// different backend, or after that engine dropped the entry, draws nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture {
    pub id: TextureId,
    pub backend: BackendKind,
    pub width: i32,
    pub height: i32,
}

impl Texturer for Texture {
    fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }
}

/// Owned RGBA8 bitmap, the input format for textures.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
}

impl RgbaImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::INVISIBLE)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let px = [color.red, color.green, color.blue, color.alpha];
        let pixels = px.repeat((width as usize) * (height as usize));
        Self { pixels, width, height, stride: width * 4 }
    }

    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32, stride: u32) -> anyhow::Result<Self> {
        ensure!(stride >= width * 4, "stride {} too small for width {}", stride, width);
        ensure!(
            pixels.len() >= (height as usize) * (stride as usize),
            "pixel buffer too small for {}x{} image",
            width,
            height
        );

        Ok(Self { pixels, width, height, stride })
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width as i32, self.height as i32)
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.stride as usize) + (x as usize) * 4)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let at = self.offset(x, y)?;
        let px = &self.pixels[at..at + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Overwrites one pixel. Out of range coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(at) = self.offset(x, y) {
            self.pixels[at..at + 4].copy_from_slice(&[color.red, color.green, color.blue, color.alpha]);
        }
    }

    /// Tightly packed rows, dropping any stride padding.
    pub fn packed(&self) -> Vec<u8> {
        let row = (self.width as usize) * 4;
        if self.stride as usize == row {
            return self.pixels[..row * self.height as usize].to_vec();
        }
        let mut out = Vec::with_capacity(row * self.height as usize);
        for y in 0..self.height as usize {
            let start = y * self.stride as usize;
            out.extend_from_slice(&self.pixels[start..start + row]);
        }
        out
    }

    /// Encodes the image as an 8-bit RGBA PNG.
    pub fn to_png(&self) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header().context("writing png header")?;
            writer.write_image_data(&self.packed()).context("writing png data")?;
            writer.finish().context("finishing png")?;
        }
        Ok(out)
    }

    /// Decodes a PNG of any color type into RGBA8.
    pub fn from_png(bytes: &[u8]) -> anyhow::Result<Self> {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info().context("reading png header")?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).context("decoding png")?;
        buf.truncate(info.buffer_size());

        let (width, height) = (info.width, info.height);
        let pixels: Vec<u8> = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
            png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect(),
            png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
            other => bail!("unsupported png color type {:?}", other),
        };

        Self::from_raw(pixels, width, height, width * 4)
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// The drawing and input contract every backend implements.
///
/// Application code written against this trait runs unchanged on any
/// backend. Calls occur on the engine's owning thread.
pub trait Engine {
    fn backend(&self) -> BackendKind;

    /// Prepares the drawing surface. Failures here are terminal.
    fn setup(&mut self) -> Result<(), RenderError>;

    /// Releases textures and fonts. The engine may be set up again.
    fn teardown(&mut self);

    /// Applies all pending input and returns the updated state.
    ///
    /// A quit request comes back as [`RenderError::Quit`].
    fn poll(&mut self) -> Result<&EventState, RenderError>;

    /// Input state as of the last poll.
    fn events(&self) -> &EventState;

    /// Mutable access, e.g. to clear the resize flag once handled.
    fn events_mut(&mut self) -> &mut EventState;

    /// Milliseconds since setup.
    fn get_ticks(&self) -> u32;

    fn window_size(&self) -> (i32, i32);

    /// Makes everything drawn since the last present visible.
    fn present(&mut self) -> Result<(), RenderError>;

    fn clear(&mut self, color: Color);
    fn set_title(&mut self, title: &str);
    fn draw_point(&mut self, color: Color, p: Point);
    fn draw_line(&mut self, color: Color, a: Point, b: Point);
    /// Rectangle outline.
    fn draw_rect(&mut self, color: Color, rect: Rect);
    /// Filled rectangle.
    fn draw_box(&mut self, color: Color, rect: Rect);
    fn draw_text(&mut self, text: &Text, p: Point) -> Result<(), RenderError>;
    /// Size the text would occupy when drawn.
    fn compute_text_rect(&self, text: &Text) -> Result<Rect, RenderError>;

    /// Uploads `image` under `name`, replacing any texture of that name.
    fn store_texture(&mut self, name: &str, image: &RgbaImage) -> Result<Texture, RenderError>;

    /// Looks up a stored texture, re-uploading it if its handle was freed.
    fn load_texture(&mut self, name: &str) -> Result<Texture, RenderError>;

    /// Blits `src` of the texture onto `dst` of the surface.
    fn copy(&mut self, texture: &Texture, src: Rect, dst: Rect);

    /// Releases all backend texture handles. Returns how many were freed.
    fn free_textures(&mut self) -> usize;

    /// Sleeps the calling thread.
    fn delay(&self, ms: u32);

    /// Outlines the ellipse inscribed in the box spanned by `a` and `b`.
    fn draw_ellipse(&mut self, color: Color, a: Point, b: Point) {
        for p in iter_ellipse_bounds(a, b) {
            self.draw_point(color, p);
        }
    }
}
