use crate::foundation::{
    core::{Dimensions, OverlayPlacement},
    error::{PhotomaskError, PhotomaskResult},
    math::floor_u32,
};

/// Size and bottom-center position of the overlay on `canvas`.
///
/// Width is `scale` of the canvas width, height follows the overlay's own aspect ratio. The top
/// edge is clamped to 0, so an overlay taller than the canvas overflows the bottom edge instead of
/// being shrunk. A box with a side above [`Dimensions::MAX_SIDE`] is rejected before any pixels
/// are touched.
pub fn compute_placement(
    canvas: Dimensions,
    overlay: Dimensions,
    scale: f64,
) -> PhotomaskResult<OverlayPlacement> {
    if canvas.is_empty() {
        return Err(PhotomaskError::invalid_format(format!(
            "target dimensions must be positive, got {canvas}"
        )));
    }
    if canvas.exceeds_max_side() {
        return Err(PhotomaskError::invalid_format(format!(
            "target dimensions {canvas} exceed the {} px side limit",
            Dimensions::MAX_SIDE
        )));
    }
    if overlay.is_empty() {
        return Err(PhotomaskError::invalid_format(format!(
            "overlay dimensions must be positive, got {overlay}"
        )));
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(PhotomaskError::invalid_format(format!(
            "overlay scale must be a positive number, got {scale}"
        )));
    }

    let max = f64::from(Dimensions::MAX_SIDE);
    let raw_width = (f64::from(canvas.width) * scale).floor();
    let overlay_aspect = f64::from(overlay.height) / f64::from(overlay.width);
    let raw_height = (raw_width * overlay_aspect).floor();
    if raw_width > max || raw_height > max {
        return Err(PhotomaskError::invalid_format(format!(
            "overlay {overlay} at scale {scale} needs a {raw_width}x{raw_height} box, \
             above the {} px side limit",
            Dimensions::MAX_SIDE
        )));
    }
    let width = floor_u32(raw_width);
    let height = floor_u32(raw_height);
    if width == 0 || height == 0 {
        return Err(PhotomaskError::invalid_format(format!(
            "overlay {overlay} at scale {scale} rounds to an empty {width}x{height} box"
        )));
    }

    let left = (i64::from(canvas.width) - i64::from(width)).div_euclid(2);
    let top = (i64::from(canvas.height) - i64::from(height)).max(0);

    Ok(OverlayPlacement {
        left,
        top,
        width,
        height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/placement.rs"]
mod tests;
