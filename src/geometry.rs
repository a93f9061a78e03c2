//! Dimension-only layout: crop rectangle on the source and overlay placement on the canvas.
//!
//! Nothing here touches pixels. Arithmetic is `f64` division followed by `floor`, so results match
//! across runs and platforms.

pub(crate) mod crop;
pub(crate) mod placement;

use crate::foundation::{
    core::{Dimensions, Layout},
    error::PhotomaskResult,
};

/// Compute the crop rectangle and overlay placement for one invocation.
///
/// `scale` is the effective fraction of canvas width the overlay occupies (caller value or the
/// configured default, already resolved).
#[tracing::instrument(level = "debug", ret)]
pub fn compute_layout(
    source: Dimensions,
    canvas: Dimensions,
    overlay: Dimensions,
    scale: f64,
) -> PhotomaskResult<Layout> {
    let crop = crop::compute_crop(source, canvas)?;
    let overlay = placement::compute_placement(canvas, overlay, scale)?;
    Ok(Layout { crop, overlay })
}
