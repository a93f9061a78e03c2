/// Convenience result type used across photomask.
pub type PhotomaskResult<T> = Result<T, PhotomaskError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Every variant is terminal for the call that produced it; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum PhotomaskError {
    /// Non-positive target/source dimensions, degenerate aspect ratio, or out-of-bounds geometry.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Overlay bytes could not be resolved.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// Source or overlay bytes are not a readable raster.
    #[error("decode error: {0}")]
    Decode(String),

    /// Final compression failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Event delivered to a conversation session in a state that cannot accept it.
    #[error("session error: {0}")]
    Session(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotomaskError {
    /// Build a [`PhotomaskError::InvalidFormat`] value.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Build a [`PhotomaskError::AssetNotFound`] value.
    pub fn asset_not_found(msg: impl Into<String>) -> Self {
        Self::AssetNotFound(msg.into())
    }

    /// Build a [`PhotomaskError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PhotomaskError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PhotomaskError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PhotomaskError::Session`] value.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
