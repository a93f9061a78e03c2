use crate::{
    codec::backend::{Raster, RasterCodec},
    foundation::{
        core::{CropRect, Dimensions},
        error::{PhotomaskError, PhotomaskResult},
    },
};

/// Copy the pixels inside `rect` out of `source`.
///
/// The rectangle is re-checked against the decoded raster: geometry may have been computed from
/// fallback dimensions that do not match the real image.
pub fn extract(source: &Raster, rect: &CropRect) -> PhotomaskResult<Raster> {
    if rect.width == 0 || rect.height == 0 {
        return Err(PhotomaskError::invalid_format("crop rectangle is empty"));
    }
    if !rect.fits_within(source.dimensions()) {
        return Err(PhotomaskError::invalid_format(format!(
            "crop {}x{}+{}+{} falls outside source {}",
            rect.width,
            rect.height,
            rect.left,
            rect.top,
            source.dimensions()
        )));
    }

    let src_stride = source.width as usize * 4;
    let row_len = rect.width as usize * 4;
    let mut data = Vec::with_capacity(row_len * rect.height as usize);
    for y in rect.top..rect.top + rect.height {
        let start = y as usize * src_stride + rect.left as usize * 4;
        data.extend_from_slice(&source.data[start..start + row_len]);
    }
    Raster::new(rect.width, rect.height, source.has_alpha, data)
}

/// Extract `rect` and fill-resize it to exactly `canvas`.
pub fn crop_and_fill(
    codec: &dyn RasterCodec,
    source: &Raster,
    rect: &CropRect,
    canvas: Dimensions,
) -> PhotomaskResult<Raster> {
    let cropped = extract(source, rect)?;
    codec.resize(&cropped, canvas.width, canvas.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/crop.rs"]
mod tests;
