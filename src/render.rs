//! The engine contract, the caches behind it and the backends.

pub mod backend;
pub mod backends;
pub mod font_cache;
pub mod texture_cache;

pub use backend::{BackendKind, Engine, RgbaImage, Texture, TextureId, Texturer};
pub use font_cache::{CellGlyphs, FontCache, FontFace, GlyphMetrics, GlyphRenderer};
pub use texture_cache::TextureCache;
