use crate::foundation::{
    core::{CropRect, Dimensions},
    error::{PhotomaskError, PhotomaskResult},
    math::floor_u32,
};

/// Center crop of `source` whose aspect ratio matches `canvas`.
///
/// A relatively wider source keeps its full height and loses columns on both sides; otherwise the
/// full width is kept and rows are trimmed top and bottom. Equal aspect yields the whole source.
pub fn compute_crop(source: Dimensions, canvas: Dimensions) -> PhotomaskResult<CropRect> {
    if canvas.is_empty() {
        return Err(PhotomaskError::invalid_format(format!(
            "target dimensions must be positive, got {canvas}"
        )));
    }
    if source.is_empty() {
        return Err(PhotomaskError::invalid_format(format!(
            "source dimensions must be positive, got {source}"
        )));
    }

    let target_aspect = canvas.aspect();
    let source_aspect = source.aspect();

    let rect = if source_aspect > target_aspect {
        let width = floor_u32(f64::from(source.height) * target_aspect).min(source.width);
        CropRect {
            left: (source.width - width) / 2,
            top: 0,
            width,
            height: source.height,
        }
    } else {
        let height = floor_u32(f64::from(source.width) / target_aspect).min(source.height);
        CropRect {
            left: 0,
            top: (source.height - height) / 2,
            width: source.width,
            height,
        }
    };

    if rect.width == 0 || rect.height == 0 {
        return Err(PhotomaskError::invalid_format(format!(
            "degenerate aspect ratio: {source} cannot be cropped to match {canvas}"
        )));
    }

    Ok(rect)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/crop.rs"]
mod tests;
