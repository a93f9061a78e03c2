use crate::{
    codec::backend::{Raster, RasterCodec},
    foundation::{core::OverlayPlacement, error::PhotomaskResult},
};

/// Stretch the decoded overlay to the size chosen by the placement.
pub fn resize_overlay(
    codec: &dyn RasterCodec,
    overlay: &Raster,
    placement: &OverlayPlacement,
) -> PhotomaskResult<Raster> {
    codec.resize(overlay, placement.width, placement.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
