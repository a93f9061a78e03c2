use std::io::Cursor;

use crate::{
    codec::backend::Raster,
    foundation::{
        core::Dimensions,
        error::{PhotomaskError, PhotomaskResult},
    },
};

/// Decode encoded image bytes (any format the `image` crate sniffs) into straight RGBA8.
pub fn decode_raster(bytes: &[u8]) -> PhotomaskResult<Raster> {
    if bytes.is_empty() {
        return Err(PhotomaskError::decode("image bytes are empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PhotomaskError::decode(format!("decode image from memory: {e}")))?;
    let has_alpha = dyn_img.color().has_alpha();
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::new(width, height, has_alpha, rgba.into_raw())
}

/// Read dimensions from the image header only.
pub fn probe_dimensions(bytes: &[u8]) -> PhotomaskResult<Dimensions> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PhotomaskError::decode(format!("sniff image format: {e}")))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| PhotomaskError::decode(format!("read image header: {e}")))?;
    Ok(Dimensions::new(width, height))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
