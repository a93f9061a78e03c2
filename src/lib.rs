//! photomask turns an arbitrary photo into a story (9:16) or post (1:1) picture with a branded
//! mask drawn along the bottom edge.
//!
//! # Pipeline overview
//!
//! 1. **Geometry**: source, canvas and overlay sizes -> [`Layout`] (center crop + bottom-center
//!    overlay placement). Pure, dimension-only, deterministic.
//! 2. **Crop/resize**: extract the crop rectangle and stretch it to the exact canvas.
//! 3. **Overlay resize**: stretch the mask to its placement size, alpha preserved.
//! 4. **Composite + encode**: blend the mask onto the canvas and encode JPEG.
//!
//! [`Compositor::process_image`] runs all four stages synchronously and keeps no state between
//! calls. Pixel work goes through the [`RasterCodec`] trait; [`ImageCodec`] is the default
//! backend.
//!
//! The [`session`] module models the surrounding chat flow as a state machine without any I/O.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod codec;
mod foundation;
mod geometry;
mod pipeline;
mod render;

/// Compositor and application configuration.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Conversation state machine.
pub mod session;

pub use assets::decode::{decode_raster, probe_dimensions};
pub use assets::store::{MaskEntry, MaskStore, OverlayAsset};
pub use codec::backend::{CodecKind, Raster, RasterCodec, create_codec};
pub use codec::image_codec::ImageCodec;
pub use config::{AppConfig, CompositorConfig, LoggingConfig};
pub use foundation::core::{
    CropRect, Dimensions, FormatKind, Layout, OverlayPlacement, TargetFormat,
};
pub use foundation::error::{PhotomaskError, PhotomaskResult};
pub use geometry::compute_layout;
pub use geometry::crop::compute_crop;
pub use geometry::placement::compute_placement;
pub use pipeline::{Compositor, ProcessOutput, ProcessReport};
pub use render::composite::{Rgba8, over, over_at};
pub use render::crop::{crop_and_fill, extract};
pub use render::overlay::resize_overlay;
