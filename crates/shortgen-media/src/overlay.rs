//! Text overlay planner.
//!
//! Wraps banner text into fixed-width lines and assigns each line a
//! vertical position counted from the bottom of the canvas. Top-anchored
//! overlays sit above the facecam and content bands; bottom-anchored ones
//! (captions) sit below the content box.

use serde::{Deserialize, Serialize};

/// Default wrap width in characters.
pub const DEFAULT_WRAP_WIDTH: usize = 25;
/// Vertical distance between wrapped lines in pixels.
pub const DEFAULT_LINE_SPACING: i64 = 200;
/// Bottom offset of the first top-anchored line.
pub const TOP_BASE_OFFSET: i64 = 3050;
/// Bottom offset of bottom-anchored text (captions band).
pub const BOTTOM_BASE_OFFSET: i64 = 930;

/// Trailing padding appended to every rendered line. The drawtext filter
/// clips the last glyph at the right edge; two non-breaking spaces keep it
/// clear of the boundary.
pub const LINE_PADDING: &str = "\u{a0}\u{a0}";

/// Vertical anchoring of an overlay region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Top,
    Bottom,
}

impl Anchor {
    /// Bottom offset of the region's first line.
    pub fn base_offset(&self) -> i64 {
        match self {
            Self::Top => TOP_BASE_OFFSET,
            Self::Bottom => BOTTOM_BASE_OFFSET,
        }
    }

    /// Downward draw correction applied at render time.
    pub fn y_nudge(&self) -> i64 {
        match self {
            Self::Top => 20,
            Self::Bottom => 0,
        }
    }
}

/// Font and stroke styling for an overlay region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub font_file: String,
    pub font_size: u32,
    pub color: String,
    pub border_width: u32,
    pub border_color: String,
    /// Rightward correction of the centered x position.
    pub x_nudge: i64,
}

impl OverlayStyle {
    /// Style used for top banner text.
    pub fn banner() -> Self {
        Self {
            font_file: "Bangers-Regular.ttf".to_string(),
            font_size: 190,
            color: "white".to_string(),
            border_width: 15,
            border_color: "black".to_string(),
            x_nudge: 12,
        }
    }

    /// Style used for timed captions.
    pub fn caption() -> Self {
        Self {
            font_size: 180,
            ..Self::banner()
        }
    }
}

/// One wrapped line with its vertical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Rendered text, including trailing padding
    pub text: String,
    /// Offset of the line from the bottom of the canvas
    pub bottom_offset: i64,
}

/// A planned text overlay: wrapped lines, placement, and style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOverlay {
    pub lines: Vec<TextLine>,
    pub anchor: Anchor,
    pub style: OverlayStyle,
}

impl TextOverlay {
    /// Whether the overlay produces any draw operations.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Plan a text overlay.
///
/// Text is greedily word-wrapped at `wrap_width` characters; a single word
/// longer than the width occupies its own line unshortened. Line `i` sits
/// `base_y_offset - i * line_spacing` pixels above the canvas bottom.
/// Empty or whitespace-only text yields an overlay with no lines.
pub fn plan_overlay(
    text: &str,
    wrap_width: usize,
    anchor: Anchor,
    line_spacing: i64,
    base_y_offset: i64,
) -> TextOverlay {
    let style = match anchor {
        Anchor::Top => OverlayStyle::banner(),
        Anchor::Bottom => OverlayStyle::caption(),
    };

    let lines = wrap_text(text, wrap_width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| TextLine {
            text: format!("{line}{LINE_PADDING}"),
            bottom_offset: base_y_offset - i as i64 * line_spacing,
        })
        .collect();

    TextOverlay {
        lines,
        anchor,
        style,
    }
}

/// Greedy word wrap at `width` characters. Words are never split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_wrap() {
        let lines = wrap_text("Hello world this is a test", 10);
        assert_eq!(lines, vec!["Hello", "world this", "is a test"]);
    }

    #[test]
    fn test_wrap_width_bound() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 12);
        for line in &lines {
            assert!(line.chars().count() <= 12, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_long_word_kept_whole() {
        let lines = wrap_text("a supercalifragilistic b", 10);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_line_offsets_descend() {
        let overlay = plan_overlay(
            "Hello world this is a test",
            10,
            Anchor::Top,
            DEFAULT_LINE_SPACING,
            TOP_BASE_OFFSET,
        );
        let offsets: Vec<i64> = overlay.lines.iter().map(|l| l.bottom_offset).collect();
        assert_eq!(offsets, vec![3050, 2850, 2650]);
    }

    #[test]
    fn test_lines_carry_padding() {
        let overlay = plan_overlay("Hello", 25, Anchor::Top, DEFAULT_LINE_SPACING, TOP_BASE_OFFSET);
        assert_eq!(overlay.lines[0].text, format!("Hello{LINE_PADDING}"));
        // Padding does not count toward the wrap width.
        let content_len = overlay.lines[0]
            .text
            .trim_end_matches('\u{a0}')
            .chars()
            .count();
        assert!(content_len <= 25);
    }

    #[test]
    fn test_empty_text_yields_no_lines() {
        let overlay = plan_overlay("   ", 25, Anchor::Bottom, DEFAULT_LINE_SPACING, BOTTOM_BASE_OFFSET);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_anchor_base_offsets() {
        assert!(Anchor::Top.base_offset() > Anchor::Bottom.base_offset());
    }
}
