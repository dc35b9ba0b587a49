use crate::geometry::{Color, Rect};
use crate::render::backend::RgbaImage;

/// CPU-side RGBA8 drawing surface with source-over alpha blending.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    image: RgbaImage,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::filled(width, height, Color::BLACK) }
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Reallocates at a new size. Contents are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.image.width, self.image.height) {
            self.image = RgbaImage::filled(width, height, Color::BLACK);
        }
    }

    pub fn clear(&mut self, color: Color) {
        for px in self.image.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.red, color.green, color.blue, color.alpha]);
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        self.image.pixel(x as u32, y as u32)
    }

    /// Paints `color` over the pixel at `(x, y)`. Off-surface coordinates
    /// are ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        if color.alpha == 0 || x < 0 || y < 0 {
            return;
        }
        if color.alpha == 255 {
            self.image.put_pixel(x as u32, y as u32, color);
            return;
        }
        if let Some(dst) = self.image.pixel(x as u32, y as u32) {
            self.image.put_pixel(x as u32, y as u32, over(color, dst));
        }
    }

    /// Fills `rect`, clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.w).min(self.image.width as i32);
        let y1 = (rect.y + rect.h).min(self.image.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Source-over compositing of `src` onto `dst`.
fn over(src: Color, dst: Color) -> Color {
    let a = src.alpha as u32;
    let inv = 255 - a;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
    let alpha = a + (dst.alpha as u32 * inv + 127) / 255;

    Color::rgba(
        mix(src.red, dst.red),
        mix(src.green, dst.green),
        mix(src.blue, dst.blue),
        alpha.min(255) as u8,
    )
}
