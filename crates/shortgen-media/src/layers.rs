//! Layer stack builder.
//!
//! Decides presence, z-order, and placement for the visual layers of a
//! composition. The returned order is the compositing order: earlier
//! layers are drawn below later ones.

use shortgen_models::Resolution;

use crate::error::{MediaError, MediaResult};

/// Kind of a visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Blurred full-canvas backdrop
    Background,
    /// Primary content box, horizontally full-bleed
    Content,
    /// Picture-in-picture facecam
    Facecam,
    /// Branding watermark
    Watermark,
    /// Arbitrary static image overlay
    StaticImage,
}

impl LayerKind {
    /// Short name for logging and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Content => "content",
            Self::Facecam => "facecam",
            Self::Watermark => "watermark",
            Self::StaticImage => "static_image",
        }
    }
}

/// One visual layer of a composition.
///
/// `input` is the index of the layer's media file in the compositor's
/// input list. Placement is in canvas coordinates and computed once by
/// [`build_stack`]; it is not revised afterwards.
#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub input: usize,
    pub x: i64,
    pub y: i64,
    pub resolution: Resolution,
    /// Caller-supplied filter label override; generated when `None`.
    pub label: Option<String>,
}

impl Layer {
    /// Create a layer with placement at the origin.
    pub fn new(kind: LayerKind, input: usize, resolution: Resolution) -> Self {
        Self {
            kind,
            input,
            x: 0,
            y: 0,
            resolution,
            label: None,
        }
    }

    /// Set an explicit placement.
    pub fn at(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set an explicit filter label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Build the ordered layer stack for a composition.
///
/// Background and content are mandatory and always occupy the bottom two
/// slots. Optional layers keep their caller-specified order; the builder
/// never reorders them. Placement rules:
///
/// - content: horizontally full-bleed (`x = 0`), vertically centered
/// - facecam: horizontally centered; vertical position is whatever the
///   caller set (0 places it at the top of the canvas)
/// - watermark / static images: caller-specified placement, unchanged
pub fn build_stack(
    canvas: Resolution,
    background: Option<Layer>,
    content: Option<Layer>,
    optional_layers: Vec<Layer>,
) -> MediaResult<Vec<Layer>> {
    let background = background.ok_or(MediaError::MissingRequiredLayer("background"))?;
    let mut content = content.ok_or(MediaError::MissingRequiredLayer("content"))?;

    if !canvas.is_valid() {
        return Err(MediaError::invalid_resolution(
            canvas.width,
            canvas.height,
            "build_stack canvas",
        ));
    }

    content.x = 0;
    content.y = (canvas.height as i64 - content.resolution.height as i64) / 2;

    let mut stack = Vec::with_capacity(2 + optional_layers.len());
    stack.push(background);
    stack.push(content);

    for mut layer in optional_layers {
        if layer.kind == LayerKind::Facecam {
            layer.x = (canvas.width as i64 - layer.resolution.width as i64) / 2;
        }
        stack.push(layer);
    }

    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Resolution {
        Resolution::new(2160, 3840)
    }

    fn background() -> Layer {
        Layer::new(LayerKind::Background, 0, canvas())
    }

    fn content() -> Layer {
        Layer::new(LayerKind::Content, 1, Resolution::new(2160, 1460))
    }

    #[test]
    fn test_required_layers_first() {
        let facecam = Layer::new(LayerKind::Facecam, 2, Resolution::new(700, 840));
        let badge = Layer::new(LayerKind::StaticImage, 3, Resolution::new(300, 300)).at(40, 2400);
        let watermark = Layer::new(LayerKind::Watermark, 4, Resolution::new(500, 100)).at(10, 1720);

        let stack = build_stack(
            canvas(),
            Some(background()),
            Some(content()),
            vec![facecam, badge, watermark],
        )
        .unwrap();

        assert_eq!(stack.len(), 5);
        assert_eq!(stack[0].kind, LayerKind::Background);
        assert_eq!(stack[1].kind, LayerKind::Content);
        assert_eq!(stack[2].kind, LayerKind::Facecam);
        assert_eq!(stack[3].kind, LayerKind::StaticImage);
        assert_eq!(stack[4].kind, LayerKind::Watermark);
        // Caller-specified placement of static overlays is preserved.
        assert_eq!((stack[3].x, stack[3].y), (40, 2400));
    }

    #[test]
    fn test_content_vertically_centered() {
        let stack = build_stack(canvas(), Some(background()), Some(content()), vec![]).unwrap();
        assert_eq!(stack[1].x, 0);
        assert_eq!(stack[1].y, (3840 - 1460) / 2);
    }

    #[test]
    fn test_facecam_horizontally_centered() {
        let facecam = Layer::new(LayerKind::Facecam, 2, Resolution::new(700, 840));
        let stack =
            build_stack(canvas(), Some(background()), Some(content()), vec![facecam]).unwrap();
        assert_eq!(stack[2].x, (2160 - 700) / 2);
        assert_eq!(stack[2].y, 0);
    }

    #[test]
    fn test_facecam_vertical_override_preserved() {
        let facecam = Layer::new(LayerKind::Facecam, 2, Resolution::new(700, 840)).at(0, 120);
        let stack =
            build_stack(canvas(), Some(background()), Some(content()), vec![facecam]).unwrap();
        assert_eq!(stack[2].x, (2160 - 700) / 2);
        assert_eq!(stack[2].y, 120);
    }

    #[test]
    fn test_missing_required_layer() {
        let err = build_stack(canvas(), None, Some(content()), vec![]).unwrap_err();
        assert!(matches!(err, MediaError::MissingRequiredLayer("background")));

        let err = build_stack(canvas(), Some(background()), None, vec![]).unwrap_err();
        assert!(matches!(err, MediaError::MissingRequiredLayer("content")));
    }

    #[test]
    fn test_watermark_placement_untouched() {
        let watermark = Layer::new(LayerKind::Watermark, 2, Resolution::new(500, 100)).at(10, 1720);
        let stack =
            build_stack(canvas(), Some(background()), Some(content()), vec![watermark]).unwrap();
        assert_eq!((stack[2].x, stack[2].y), (10, 1720));
    }
}
