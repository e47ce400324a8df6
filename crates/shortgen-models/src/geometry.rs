//! Pixel geometry primitives.
//!
//! All coordinates are in source-pixel space with the origin at the
//! top-left corner. Rectangles are always derived from a probed
//! [`Resolution`], never supplied by users directly.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a media source or render canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a new resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check that both dimensions are positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A crop rectangle in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    /// Width of the rectangle
    pub w: u32,
    /// Height of the rectangle
    pub h: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Check that the rectangle lies fully inside `source`.
    pub fn contained_in(&self, source: Resolution) -> bool {
        self.w > 0
            && self.h > 0
            && self.x + self.w <= source.width
            && self.y + self.h <= source.height
    }
}

/// Render target dimensions, both components even.
///
/// Hardware H.264 encoders reject odd frame dimensions, so every render
/// target passes through [`TargetDimensions::even`] before use. Odd
/// values are decremented by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDimensions {
    /// Width in pixels (even)
    pub width: u32,
    /// Height in pixels (even)
    pub height: u32,
}

impl TargetDimensions {
    /// Build target dimensions, decrementing odd components.
    pub fn even(width: u32, height: u32) -> Self {
        Self {
            width: width - (width % 2),
            height: height - (height % 2),
        }
    }
}

impl std::fmt::Display for TargetDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
