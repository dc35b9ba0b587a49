use crate::errors::RenderError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

pub const DEFAULT_FONT_FILENAME: &str = "DejaVuSans.ttf";

/// A font resolved at a particular pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub filename: String,
    /// Family name derived from the filename, e.g. `DejaVuSans`.
    pub family: String,
    pub size: i32,
}

impl FontFace {
    /// CSS `font` shorthand for this face.
    pub fn css(&self) -> String {
        format!("{}px {},serif", self.size, self.family)
    }
}

/// Converts a font filename to its family name: the file stem, so
/// `fonts/DejaVuSans.ttf` becomes `DejaVuSans`.
pub fn family_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

/// Cache of resolved faces keyed by `filename@size`.
///
/// Lookups can come from any thread holding the engine's cache, so the map
/// sits behind a read/write lock.
pub struct FontCache {
    default_font: String,
    faces: RwLock<HashMap<String, Arc<FontFace>>>,
}

impl FontCache {
    pub fn new(default_font: &str) -> Self {
        Self {
            default_font: default_font.to_string(),
            faces: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    /// Returns the face for `filename` at `size`. An empty filename selects
    /// the default font.
    pub fn face(&self, filename: &str, size: i32) -> Result<Arc<FontFace>, RenderError> {
        let filename = if filename.is_empty() { self.default_font.as_str() } else { filename };
        if size <= 0 {
            return Err(RenderError::Font(format!("{}: invalid font size {}", filename, size)));
        }

        let key = format!("{}@{}", filename, size);
        {
            let faces = self.faces.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(face) = faces.get(&key) {
                return Ok(face.clone());
            }
        }

        let mut faces = self.faces.write().unwrap_or_else(PoisonError::into_inner);
        let face = faces
            .entry(key)
            .or_insert_with(|| {
                log::debug!("caching font {} at {}px", filename, size);
                Arc::new(FontFace {
                    filename: filename.to_string(),
                    family: family_name(filename),
                    size,
                })
            })
            .clone();

        Ok(face)
    }

    pub fn len(&self) -> usize {
        self.faces.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.faces.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FILENAME)
    }
}

/// Measures text. The canvas backend only gets a width from the host, so
/// the height of a text rect is always the font size.
pub trait GlyphMetrics: Send + Sync {
    fn text_width(&self, face: &FontFace, text: &str) -> i32;
}

/// Rasterizes text into coverage masks.
pub trait GlyphRenderer: GlyphMetrics {
    /// Calls `plot(x, y)` for every covered pixel of `text` drawn with its
    /// top-left corner at the origin.
    fn render(&self, face: &FontFace, text: &str, plot: &mut dyn FnMut(i32, i32));
}

/// Built-in fallback glyphs that need no font files: every character is a
/// hollow cell `size/2` wide and `size` tall, whitespace is left blank.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellGlyphs;

impl CellGlyphs {
    fn advance(face: &FontFace) -> i32 {
        (face.size / 2).max(1)
    }
}

impl GlyphMetrics for CellGlyphs {
    fn text_width(&self, face: &FontFace, text: &str) -> i32 {
        Self::advance(face) * text.chars().count() as i32
    }
}

impl GlyphRenderer for CellGlyphs {
    fn render(&self, face: &FontFace, text: &str, plot: &mut dyn FnMut(i32, i32)) {
        let advance = Self::advance(face);
        // Leave a one pixel gap between cells.
        let w = (advance - 1).max(1);
        let h = face.size;

        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x0 = i as i32 * advance;
            for x in x0..x0 + w {
                plot(x, 0);
                plot(x, h - 1);
            }
            for y in 1..h - 1 {
                plot(x0, y);
                plot(x0 + w - 1, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn faces_are_cached_per_size() {
        let cache = FontCache::default();
        let a = cache.face("fonts/Azulejo.ttf", 12).unwrap();
        let b = cache.face("fonts/Azulejo.ttf", 12).unwrap();
        let c = cache.face("fonts/Azulejo.ttf", 16).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(a.family, "Azulejo");
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn empty_filename_uses_the_default() {
        let cache = FontCache::default();
        let face = cache.face("", 14).unwrap();
        assert_eq!(face.filename, DEFAULT_FONT_FILENAME);
        assert_eq!(face.css(), "14px DejaVuSans,serif");
    }

    #[test]
    fn bad_sizes_are_rejected() {
        let cache = FontCache::default();
        assert!(matches!(cache.face("x.ttf", 0), Err(RenderError::Font(_))));
    }

    #[test]
    fn cell_glyphs() {
        let face = FontFace { filename: "x".into(), family: "x".into(), size: 10 };
        assert_eq!(CellGlyphs.text_width(&face, "abc"), 15);

        let mut covered = HashSet::new();
        CellGlyphs.render(&face, "a b", &mut |x: i32, y: i32| {
            covered.insert((x, y));
        });
        assert!(covered.contains(&(0, 0)));
        assert!(covered.contains(&(3, 9)));
        // The space is blank, the third cell starts at x=10.
        assert!(!covered.iter().any(|&(x, _)| (5..10).contains(&x)));
        assert!(covered.contains(&(10, 5)));
        assert!(covered.iter().all(|&(x, y)| x < 15 && (0..10).contains(&y)));
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(FontCache::default());
        let handles: Vec<_> = (1..=4)
            .map(|size| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.face("", size * 8).map(|f| f.size))
            })
            .collect();

        for h in handles {
            assert!(h.join().unwrap().is_ok());
        }
        assert_eq!(cache.len(), 4);
    }
}
