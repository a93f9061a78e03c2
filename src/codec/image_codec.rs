use image::{DynamicImage, RgbaImage, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::{
    assets::decode,
    codec::backend::{Raster, RasterCodec},
    foundation::{
        core::Dimensions,
        error::{PhotomaskError, PhotomaskResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
};

/// [`RasterCodec`] backed by the `image` crate.
///
/// Resizing uses Lanczos3. Rasters with alpha are filtered in premultiplied space so fully
/// transparent pixels cannot bleed their color into visible neighbours. Output is baseline JPEG.
#[derive(Clone, Copy, Debug)]
pub struct ImageCodec {
    filter: FilterType,
}

impl ImageCodec {
    /// Codec with the default Lanczos3 filter.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterCodec for ImageCodec {
    fn probe(&self, bytes: &[u8]) -> PhotomaskResult<Dimensions> {
        decode::probe_dimensions(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> PhotomaskResult<Raster> {
        decode::decode_raster(bytes)
    }

    fn resize(&self, raster: &Raster, width: u32, height: u32) -> PhotomaskResult<Raster> {
        if width == 0 || height == 0 {
            return Err(PhotomaskError::invalid_format(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        let target = Dimensions::new(width, height);
        if target.exceeds_max_side() {
            return Err(PhotomaskError::invalid_format(format!(
                "resize target {target} exceeds the {} px side limit",
                Dimensions::MAX_SIDE
            )));
        }
        if raster.width == width && raster.height == height {
            return Ok(raster.clone());
        }

        let mut data = raster.data.clone();
        if raster.has_alpha {
            premultiply_rgba8_in_place(&mut data);
        }
        let img = to_rgba_image(raster.width, raster.height, data)?;
        let mut out = image::imageops::resize(&img, width, height, self.filter).into_raw();
        if raster.has_alpha {
            unpremultiply_rgba8_in_place(&mut out);
        }
        Raster::new(width, height, raster.has_alpha, out)
    }

    fn encode(&self, raster: &Raster, quality: u8) -> PhotomaskResult<Vec<u8>> {
        if !(1..=100).contains(&quality) {
            return Err(PhotomaskError::encode(format!(
                "jpeg quality must be within 1..=100, got {quality}"
            )));
        }
        let rgba = to_rgba_image(raster.width, raster.height, raster.data.clone())?;
        let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality)
            .encode_image(&rgb)
            .map_err(|e| PhotomaskError::encode(format!("encode jpeg: {e}")))?;
        Ok(buf)
    }
}

fn to_rgba_image(width: u32, height: u32, data: Vec<u8>) -> PhotomaskResult<RgbaImage> {
    RgbaImage::from_raw(width, height, data).ok_or_else(|| {
        PhotomaskError::invalid_format(format!("pixel buffer does not match {width}x{height}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/codec/image_codec.rs"]
mod tests;
