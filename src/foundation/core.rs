use std::{fmt, str::FromStr};

use crate::foundation::error::{PhotomaskError, PhotomaskResult};

/// Width and height of a raster, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Largest side accepted for any canvas or resize target (baseline JPEG encoders cap at 65535;
    /// this matches the common 16383 limit).
    pub const MAX_SIDE: u32 = 16_383;

    /// Construct dimensions without validation.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` when either side is above [`Self::MAX_SIDE`].
    pub fn exceeds_max_side(self) -> bool {
        self.width > Self::MAX_SIDE || self.height > Self::MAX_SIDE
    }

    /// `width / height` as `f64`.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Intended use of an output canvas. Carries no geometry of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// Vertical 9:16 story.
    Stories,
    /// 1:1 feed post.
    Square,
    /// Caller-provided size.
    Custom,
}

impl FormatKind {
    /// Prefix used by format-selection callback payloads (`format_stories`).
    pub const CALLBACK_PREFIX: &'static str = "format_";

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stories => "stories",
            Self::Square => "square",
            Self::Custom => "custom",
        }
    }

    /// Parse a callback payload such as `format_square`; a bare name is accepted too.
    pub fn from_callback_data(data: &str) -> PhotomaskResult<Self> {
        let name = data.strip_prefix(Self::CALLBACK_PREFIX).unwrap_or(data);
        name.parse()
    }

    /// Callback payload for this kind.
    pub fn callback_data(self) -> String {
        format!("{}{}", Self::CALLBACK_PREFIX, self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = PhotomaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stories" => Ok(Self::Stories),
            "square" => Ok(Self::Square),
            "custom" => Ok(Self::Custom),
            other => Err(PhotomaskError::invalid_format(format!(
                "unknown format kind '{other}'"
            ))),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output canvas size plus a label describing its intended use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetFormat {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Usage label.
    pub kind: FormatKind,
}

impl TargetFormat {
    /// 1080x1920 story canvas.
    pub const fn stories() -> Self {
        Self {
            width: 1080,
            height: 1920,
            kind: FormatKind::Stories,
        }
    }

    /// 1080x1080 post canvas.
    pub const fn square() -> Self {
        Self {
            width: 1080,
            height: 1080,
            kind: FormatKind::Square,
        }
    }

    /// Caller-sized canvas. Fails when either side is zero or above [`Dimensions::MAX_SIDE`].
    pub fn custom(width: u32, height: u32) -> PhotomaskResult<Self> {
        let out = Self {
            width,
            height,
            kind: FormatKind::Custom,
        };
        out.validate()?;
        Ok(out)
    }

    /// Preset for a known kind; `Custom` has no preset.
    pub fn preset(kind: FormatKind) -> PhotomaskResult<Self> {
        match kind {
            FormatKind::Stories => Ok(Self::stories()),
            FormatKind::Square => Ok(Self::square()),
            FormatKind::Custom => Err(PhotomaskError::invalid_format(
                "custom formats need explicit dimensions",
            )),
        }
    }

    /// All built-in presets in display order.
    pub fn presets() -> [Self; 2] {
        [Self::stories(), Self::square()]
    }

    /// Canvas dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Reject zero-sized and oversized canvases.
    pub fn validate(&self) -> PhotomaskResult<()> {
        let dims = self.dimensions();
        if dims.is_empty() {
            return Err(PhotomaskError::invalid_format(format!(
                "target format must be positive, got {dims}"
            )));
        }
        if dims.exceeds_max_side() {
            return Err(PhotomaskError::invalid_format(format!(
                "target format {dims} exceeds the {} px side limit",
                Dimensions::MAX_SIDE
            )));
        }
        Ok(())
    }
}

/// Axis-aligned region of the source image, aspect-matched to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    /// Left edge in source pixels.
    pub left: u32,
    /// Top edge in source pixels.
    pub top: u32,
    /// Width in source pixels.
    pub width: u32,
    /// Height in source pixels.
    pub height: u32,
}

impl CropRect {
    /// `true` when the rectangle lies fully inside `bounds`.
    pub fn fits_within(&self, bounds: Dimensions) -> bool {
        u64::from(self.left) + u64::from(self.width) <= u64::from(bounds.width)
            && u64::from(self.top) + u64::from(self.height) <= u64::from(bounds.height)
    }

    /// Rectangle size.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Overlay size and position in canvas coordinates.
///
/// `left` is signed: an overlay wider than the canvas is centered with a negative offset.
/// `top` is never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverlayPlacement {
    /// Left edge in canvas pixels.
    pub left: i64,
    /// Top edge in canvas pixels (`>= 0`).
    pub top: i64,
    /// Resized overlay width.
    pub width: u32,
    /// Resized overlay height.
    pub height: u32,
}

impl OverlayPlacement {
    /// Resized overlay size.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// `true` when part of the overlay falls outside `canvas` and will be dropped.
    pub fn overflows(&self, canvas: Dimensions) -> bool {
        self.left < 0
            || self.top < 0
            || self.left + i64::from(self.width) > i64::from(canvas.width)
            || self.top + i64::from(self.height) > i64::from(canvas.height)
    }
}

/// Geometry for one invocation: where to crop the source and where to draw the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Layout {
    /// Crop rectangle on the source.
    pub crop: CropRect,
    /// Overlay placement on the canvas.
    pub overlay: OverlayPlacement,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
