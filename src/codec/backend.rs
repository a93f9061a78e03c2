use crate::{
    foundation::{
        core::Dimensions,
        error::{PhotomaskError, PhotomaskResult},
    },
    render::composite,
};

/// A decoded raster as straight (non-premultiplied) RGBA8 pixels.
///
/// Opaque sources are expanded to RGBA with `a = 255`; `has_alpha` records whether the encoded
/// input actually carried a transparency channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether the source carried an alpha channel.
    pub has_alpha: bool,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Raster {
    /// Wrap a pixel buffer, checking that it matches `width * height * 4`.
    pub fn new(width: u32, height: u32, has_alpha: bool, data: Vec<u8>) -> PhotomaskResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhotomaskError::invalid_format(format!(
                "raster dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PhotomaskError::invalid_format("raster size overflow"))?;
        if data.len() != expected {
            return Err(PhotomaskError::invalid_format(format!(
                "raster buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            has_alpha,
            data,
        })
    }

    /// Uniformly filled raster.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> PhotomaskResult<Self> {
        let len = (width as usize) * (height as usize);
        let data = rgba.repeat(len);
        Self::new(width, height, rgba[3] != 255, data)
    }

    /// Raster size.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// RGBA at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Pixel codec capability used by the compositor.
///
/// The geometry and compositing stages only talk to this trait, so a different codec can be
/// plugged in without touching them. Implementations must be shareable across threads.
pub trait RasterCodec: Send + Sync {
    /// Read width and height from the encoded header without decoding pixels.
    fn probe(&self, bytes: &[u8]) -> PhotomaskResult<Dimensions>;

    /// Decode encoded bytes into a straight RGBA8 raster.
    fn decode(&self, bytes: &[u8]) -> PhotomaskResult<Raster>;

    /// Stretch `raster` to exactly `width x height`, keeping transparency intact.
    fn resize(&self, raster: &Raster, width: u32, height: u32) -> PhotomaskResult<Raster>;

    /// Alpha-composite `overlay` onto `base` with its top-left corner at `(left, top)`.
    ///
    /// Overlay pixels outside `base` are dropped.
    fn composite(
        &self,
        base: &mut Raster,
        overlay: &Raster,
        left: i64,
        top: i64,
    ) -> PhotomaskResult<()> {
        composite::over_at(base, overlay, left, top)
    }

    /// Encode `raster` as a lossy image at `quality` (1..=100).
    fn encode(&self, raster: &Raster, quality: u8) -> PhotomaskResult<Vec<u8>>;
}

/// Available codec backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CodecKind {
    /// Pure-Rust codecs from the `image` crate; JPEG output.
    #[default]
    Image,
}

/// Create a codec implementation.
pub fn create_codec(kind: CodecKind) -> Box<dyn RasterCodec> {
    match kind {
        CodecKind::Image => Box::new(crate::codec::image_codec::ImageCodec::new()),
    }
}
