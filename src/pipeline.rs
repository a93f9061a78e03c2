use crate::{
    assets::store::OverlayAsset,
    codec::backend::{CodecKind, RasterCodec, create_codec},
    config::CompositorConfig,
    foundation::{
        core::{CropRect, Dimensions, Layout, OverlayPlacement, TargetFormat},
        error::{PhotomaskError, PhotomaskResult},
    },
    geometry, render,
};

/// Progress facts for one [`Compositor::process_image`] call, returned as data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessReport {
    /// Source size used for geometry.
    pub source: Dimensions,
    /// `true` when `source` is the configured fallback because the header was unreadable.
    pub used_fallback_dimensions: bool,
    /// Natural overlay size.
    pub overlay: Dimensions,
    /// Canvas the source was fitted to.
    pub target: TargetFormat,
    /// Effective overlay scale.
    pub scale: f64,
    /// Crop rectangle on the source.
    pub crop: CropRect,
    /// Overlay placement on the canvas.
    pub placement: OverlayPlacement,
    /// Whether some overlay pixels fell outside the canvas and were dropped.
    pub overlay_clipped: bool,
    /// JPEG quality used.
    pub quality: u8,
    /// Size of the encoded output.
    pub encoded_len: usize,
}

/// Encoded output plus its report.
#[derive(Clone, Debug)]
pub struct ProcessOutput {
    /// Encoded JPEG bytes.
    pub bytes: Vec<u8>,
    /// What was computed along the way.
    pub report: ProcessReport,
}

/// Stateless crop-resize-overlay-encode pipeline.
///
/// Holds only immutable configuration and a codec, so one instance can serve concurrent callers.
pub struct Compositor {
    config: CompositorConfig,
    codec: Box<dyn RasterCodec>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor using the default `image`-crate codec.
    pub fn new(config: CompositorConfig) -> PhotomaskResult<Self> {
        Self::with_codec(config, create_codec(CodecKind::Image))
    }

    /// Compositor using a caller-supplied codec.
    pub fn with_codec(
        config: CompositorConfig,
        codec: Box<dyn RasterCodec>,
    ) -> PhotomaskResult<Self> {
        config.validate()?;
        Ok(Self { config, codec })
    }

    /// Active configuration.
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Effective overlay scale: the asset's own, else the configured default.
    pub fn effective_scale(&self, overlay: &OverlayAsset) -> f64 {
        overlay.scale.unwrap_or(self.config.default_scale)
    }

    /// Geometry only, without touching pixels.
    pub fn plan(
        &self,
        source: Dimensions,
        overlay: Dimensions,
        target: &TargetFormat,
        scale: Option<f64>,
    ) -> PhotomaskResult<Layout> {
        target.validate()?;
        let scale = scale.unwrap_or(self.config.default_scale);
        geometry::compute_layout(source, target.dimensions(), overlay, scale)
    }

    /// Crop `source_bytes` to `target`, draw `overlay` bottom-center, and encode as JPEG.
    ///
    /// Any stage failure aborts the call; bytes are only returned once encoding fully succeeds.
    #[tracing::instrument(
        skip_all,
        fields(kind = %target.kind, width = target.width, height = target.height, overlay = %overlay.id)
    )]
    pub fn process_image(
        &self,
        source_bytes: &[u8],
        overlay: &OverlayAsset,
        target: &TargetFormat,
    ) -> PhotomaskResult<ProcessOutput> {
        target.validate()?;
        if overlay.bytes.is_empty() {
            return Err(PhotomaskError::asset_not_found(format!(
                "overlay '{}' has no bytes",
                overlay.id
            )));
        }

        let (source_dims, used_fallback) = self.probe_source(source_bytes);
        tracing::debug!(source = %source_dims, used_fallback, "source dimensions");

        let overlay_raster = self.codec.decode(&overlay.bytes)?;
        let scale = self.effective_scale(overlay);
        let layout = geometry::compute_layout(
            source_dims,
            target.dimensions(),
            overlay_raster.dimensions(),
            scale,
        )?;
        tracing::debug!(crop = ?layout.crop, placement = ?layout.overlay, "layout");

        let mut canvas = {
            let source = self.codec.decode(source_bytes)?;
            render::crop::crop_and_fill(
                self.codec.as_ref(),
                &source,
                &layout.crop,
                target.dimensions(),
            )?
        };
        let overlay_resized =
            render::overlay::resize_overlay(self.codec.as_ref(), &overlay_raster, &layout.overlay)?;
        self.codec.composite(
            &mut canvas,
            &overlay_resized,
            layout.overlay.left,
            layout.overlay.top,
        )?;

        let bytes = self.codec.encode(&canvas, self.config.quality)?;

        let report = ProcessReport {
            source: source_dims,
            used_fallback_dimensions: used_fallback,
            overlay: overlay_raster.dimensions(),
            target: *target,
            scale,
            crop: layout.crop,
            placement: layout.overlay,
            overlay_clipped: layout.overlay.overflows(target.dimensions()),
            quality: self.config.quality,
            encoded_len: bytes.len(),
        };
        tracing::info!(
            encoded_len = report.encoded_len,
            overlay_clipped = report.overlay_clipped,
            "composited image"
        );
        Ok(ProcessOutput { bytes, report })
    }

    fn probe_source(&self, bytes: &[u8]) -> (Dimensions, bool) {
        match self.codec.probe(bytes) {
            Ok(dims) if !dims.is_empty() => (dims, false),
            Ok(dims) => {
                let fallback = self.config.fallback_dimensions();
                let patched = Dimensions::new(
                    if dims.width == 0 { fallback.width } else { dims.width },
                    if dims.height == 0 { fallback.height } else { dims.height },
                );
                tracing::warn!(
                    probed = %dims,
                    using = %patched,
                    "source header reports an empty side, using fallback"
                );
                (patched, true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot read source header, using fallback");
                (self.config.fallback_dimensions(), true)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
