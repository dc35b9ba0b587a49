use crate::geometry::Color;
use std::fmt;

/// Offsets used to fake a one pixel outline around text.
const STROKE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
];

/// Everything a backend needs to draw a string.
///
/// Zero-valued colors disable the stroke and shadow effects. An empty
/// `font_filename` selects the engine's default font.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Text {
    pub text: String,
    pub size: i32,
    pub color: Color,
    pub padding: i32,
    pub pad_x: i32,
    pub pad_y: i32,
    pub stroke: Color,
    pub shadow: Color,
    pub font_filename: String,
}

/// A single draw of the text at an offset in a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextPass {
    pub dx: i32,
    pub dy: i32,
    pub color: Color,
}

impl Text {
    pub fn new(text: impl Into<String>, size: i32, color: Color) -> Self {
        Self {
            text: text.into(),
            size,
            color,
            ..Default::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        self.text.is_empty()
            && self.size == 0
            && self.color.is_zero()
            && self.padding == 0
            && self.pad_x == 0
            && self.pad_y == 0
            && self.stroke.is_zero()
            && self.shadow.is_zero()
    }

    /// Merges `other` into self. Each non-zero field of `other` replaces the
    /// corresponding field here; zero fields leave it alone.
    pub fn update(&mut self, other: &Text) {
        if !other.text.is_empty() {
            self.text = other.text.clone();
        }
        if other.size != 0 {
            self.size = other.size;
        }
        if !other.color.is_zero() {
            self.color = other.color;
        }
        if other.padding != 0 {
            self.padding = other.padding;
        }
        if other.pad_x != 0 {
            self.pad_x = other.pad_x;
        }
        if other.pad_y != 0 {
            self.pad_y = other.pad_y;
        }
        if !other.stroke.is_zero() {
            self.stroke = other.stroke;
        }
        if !other.shadow.is_zero() {
            self.shadow = other.shadow;
        }
        if !other.font_filename.is_empty() {
            self.font_filename = other.font_filename.clone();
        }
    }

    /// The passes a backend paints, in order: the outline (if stroked), the
    /// drop shadow (if any), then the text itself.
    pub fn passes(&self) -> Vec<TextPass> {
        let mut passes = Vec::with_capacity(10);

        if !self.stroke.is_zero() {
            passes.extend(STROKE_OFFSETS.iter().map(|&(dx, dy)| TextPass {
                dx,
                dy,
                color: self.stroke,
            }));
        }
        if !self.shadow.is_zero() {
            passes.push(TextPass { dx: 1, dy: 1, color: self.shadow });
        }
        passes.push(TextPass { dx: 0, dy: 0, color: self.color });

        passes
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text<\"{}\" {}px {}>", self.text, self.size, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_is_a_sparse_override() {
        let mut base = Text {
            text: "Hello".into(),
            size: 12,
            color: Color::BLACK,
            padding: 4,
            font_filename: "fonts/DejaVuSans.ttf".into(),
            ..Default::default()
        };

        base.update(&Text {
            size: 16,
            stroke: Color::WHITE,
            ..Default::default()
        });

        assert_eq!(base.text, "Hello");
        assert_eq!(base.size, 16);
        assert_eq!(base.color, Color::BLACK);
        assert_eq!(base.padding, 4);
        assert_eq!(base.stroke, Color::WHITE);
        assert!(base.shadow.is_zero());
        assert_eq!(base.font_filename, "fonts/DejaVuSans.ttf");
    }

    #[test]
    fn zero_text() {
        assert!(Text::default().is_zero());
        assert!(!Text::new("x", 0, Color::INVISIBLE).is_zero());
    }

    #[test]
    fn passes_follow_enabled_effects() {
        let plain = Text::new("a", 10, Color::RED);
        assert_eq!(plain.passes(), vec![TextPass { dx: 0, dy: 0, color: Color::RED }]);

        let fancy = Text {
            stroke: Color::BLACK,
            shadow: Color::GREY,
            ..plain.clone()
        };
        let passes = fancy.passes();
        assert_eq!(passes.len(), 10);
        assert!(passes[..8].iter().all(|p| p.color == Color::BLACK));
        assert_eq!(passes[8], TextPass { dx: 1, dy: 1, color: Color::GREY });
        assert_eq!(passes[9].color, Color::RED);
    }

    #[test]
    fn display() {
        let t = Text::new("Hi", 14, Color::BLACK);
        assert_eq!(t.to_string(), "Text<\"Hi\" 14px Color<#000000+ff>>");
    }
}
