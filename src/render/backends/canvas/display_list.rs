//! Recorded canvas 2D commands.
//!
//! The canvas backend never touches a real canvas. Each draw call appends a
//! [`DisplayItem`] to a [`DisplayList`]; on present the list is handed over
//! as a frame the host replays against its `CanvasRenderingContext2D`.
//!
//! ```rust
//! use render2d::render::backends::canvas::{DisplayItem, DisplayList, css_rgba};
//! use render2d::geometry::{Color, Rect};
//!
//! let mut list = DisplayList::new();
//! list.add_command(DisplayItem::FillRect {
//!     rect: Rect::at(10, 20, 100, 50),
//!     style: css_rgba(Color::WHITE),
//! });
//! assert_eq!(list.len(), 1);
//! ```

use crate::geometry::{Color, Rect};
use crate::render::backend::TextureId;
use serde::Serialize;

/// CSS `rgba()` value for a color, alpha scaled to `0.0..=1.0`.
pub fn css_rgba(color: Color) -> String {
    format!(
        "rgba({},{},{},{:.6})",
        color.red,
        color.green,
        color.blue,
        color.alpha as f64 / 255.0
    )
}

/// A single canvas command. Serialized with an `op` tag for the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DisplayItem {
    /// Fill the whole canvas.
    Clear { style: String, width: i32, height: i32 },

    /// `fillRect`; points and line pixels are 1x1 fills.
    FillRect { rect: Rect, style: String },

    /// `strokeRect`.
    StrokeRect { rect: Rect, style: String },

    /// `fillText` with a top baseline.
    FillText { text: String, x: i32, y: i32, font: String, style: String },

    /// `drawImage` of the image cached for `texture`.
    DrawImage { texture: TextureId, src: Rect, dst: Rect },

    /// The host should (re)build the image element for `texture` from the
    /// PNG returned by the engine's `image_data`.
    LoadImage { texture: TextureId, width: i32, height: i32 },

    /// The host may drop its image element for `texture`.
    ReleaseImage { texture: TextureId },

    /// Set `document.title`.
    SetTitle { title: String },
}

#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add_command(&mut self, item: DisplayItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Moves the recorded commands out, leaving the list empty.
    pub fn take(&mut self) -> Vec<DisplayItem> {
        std::mem::take(&mut self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_colors() {
        assert_eq!(css_rgba(Color::RED), "rgba(255,0,0,1.000000)");
        assert_eq!(css_rgba(Color::INVISIBLE), "rgba(0,0,0,0.000000)");
    }

    #[test]
    fn take_empties_the_list() {
        let mut list = DisplayList::new();
        list.add_command(DisplayItem::SetTitle { title: "a".into() });
        list.add_command(DisplayItem::SetTitle { title: "b".into() });

        let items = list.take();
        assert_eq!(items.len(), 2);
        assert!(list.is_empty());
    }

    #[test]
    fn items_serialize_with_an_op_tag() {
        let item = DisplayItem::FillRect { rect: Rect::at(1, 2, 3, 4), style: "red".into() };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["op"], "fillRect");
        assert_eq!(json["rect"]["w"], 3);
        assert_eq!(json["style"], "red");
    }
}
