//! Crop geometry calculator.
//!
//! Pure functions computing crop rectangles and render target dimensions
//! from source and target aspect ratios. All offsets use integer division;
//! remainders are discarded rather than rounded.

use shortgen_models::{Rect, Resolution, TargetDimensions};

use crate::error::{MediaError, MediaResult};

/// Compute the largest centered rectangle of aspect `aspect_w:aspect_h`
/// inside `source`.
///
/// The limiting dimension is preserved: for a source wider than the target
/// aspect, height is kept and width derived (`round(height * aw / ah)`);
/// otherwise width is kept and height derived. The remaining dimension's
/// offset is centered with integer division.
pub fn center_crop_rect(source: Resolution, aspect_w: u32, aspect_h: u32) -> MediaResult<Rect> {
    validate_source(source, "center_crop_rect")?;
    if aspect_w == 0 || aspect_h == 0 {
        return Err(MediaError::invalid_resolution(
            aspect_w,
            aspect_h,
            "center_crop_rect aspect ratio",
        ));
    }

    let wider_than_target =
        (source.width as u64) * (aspect_h as u64) > (source.height as u64) * (aspect_w as u64);

    if wider_than_target {
        // Height limits: derive width from the aspect ratio.
        let w = ((source.height as f64) * (aspect_w as f64) / (aspect_h as f64)).round() as u32;
        let w = w.min(source.width);
        Ok(Rect::new((source.width - w) / 2, 0, w, source.height))
    } else {
        // Width limits: derive height from the aspect ratio.
        let h = ((source.width as f64) * (aspect_h as f64) / (aspect_w as f64)).round() as u32;
        let h = h.min(source.height);
        Ok(Rect::new(0, (source.height - h) / 2, source.width, h))
    }
}

/// Compute the centered square crop of `source`, using the smaller
/// dimension as the side.
pub fn square_crop_rect(source: Resolution) -> MediaResult<Rect> {
    validate_source(source, "square_crop_rect")?;

    let side = source.width.min(source.height);
    Ok(Rect::new(
        (source.width - side) / 2,
        (source.height - side) / 2,
        side,
        side,
    ))
}

/// Clamp render target dimensions to even values.
///
/// Must be applied to every render target before it reaches an encoder.
pub fn even_dimensions(width: u32, height: u32) -> TargetDimensions {
    TargetDimensions::even(width, height)
}

fn validate_source(source: Resolution, context: &str) -> MediaResult<()> {
    if !source.is_valid() {
        return Err(MediaError::invalid_resolution(
            source.width,
            source.height,
            context,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_crop_of_landscape_source() {
        // 1920x1080 is wider than 9:16, so height is preserved.
        let rect = center_crop_rect(Resolution::new(1920, 1080), 9, 16).unwrap();
        assert_eq!(rect, Rect::new(656, 0, 608, 1080));
        assert!(rect.contained_in(Resolution::new(1920, 1080)));

        let target = even_dimensions(2160, 3840);
        assert_eq!(target.width, 2160);
        assert_eq!(target.height, 3840);
    }

    #[test]
    fn test_portrait_crop_of_portrait_source() {
        // 1080x3840 is narrower than 9:16, so width is preserved.
        let rect = center_crop_rect(Resolution::new(1080, 3840), 9, 16).unwrap();
        assert_eq!(rect.w, 1080);
        assert_eq!(rect.h, 1920);
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, (3840 - 1920) / 2);
    }

    #[test]
    fn test_crop_aspect_within_rounding_tolerance() {
        for (sw, sh) in [(1920, 1080), (1280, 720), (3840, 2160), (1440, 1080)] {
            let source = Resolution::new(sw, sh);
            let rect = center_crop_rect(source, 9, 16).unwrap();
            assert!(rect.contained_in(source), "{sw}x{sh}");
            let ratio = rect.w as f64 / rect.h as f64;
            assert!((ratio - 9.0 / 16.0).abs() < 1.0 / rect.h as f64, "{sw}x{sh}");
        }
    }

    #[test]
    fn test_square_source_full_frame() {
        let rect = center_crop_rect(Resolution::new(1080, 1080), 1, 1).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 1080, 1080));
    }

    #[test]
    fn test_square_crop_of_landscape_source() {
        let rect = square_crop_rect(Resolution::new(1920, 1080)).unwrap();
        assert_eq!(rect, Rect::new(420, 0, 1080, 1080));
    }

    #[test]
    fn test_square_crop_of_portrait_source() {
        let rect = square_crop_rect(Resolution::new(1080, 1920)).unwrap();
        assert_eq!(rect, Rect::new(0, 420, 1080, 1080));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        assert!(center_crop_rect(Resolution::new(0, 1080), 9, 16).is_err());
        assert!(center_crop_rect(Resolution::new(1920, 1080), 0, 16).is_err());
        assert!(square_crop_rect(Resolution::new(1920, 0)).is_err());
    }

    #[test]
    fn test_even_dimensions() {
        let dims = even_dimensions(607, 1081);
        assert_eq!(dims.width, 606);
        assert_eq!(dims.height, 1080);
        // Already-even values pass through unchanged.
        assert_eq!(even_dimensions(606, 1080), dims);
    }
}
