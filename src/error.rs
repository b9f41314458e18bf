//! Error types for encoding, rendering and the request boundary.

use thiserror::Error;

/// Result type alias for the high-level pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// The payload could not be turned into a module matrix.
///
/// Ways to handle this error include:
///
/// - Lower the error correction level if it was above `QrCodeEcc::Low`.
/// - Raise the type number.
/// - Shorten the payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The type number lies outside 1..=40.
    #[error("type number {0} is out of range (1..=40)")]
    VersionOutOfRange(u8),

    /// The byte count does not fit the character-count field of the version.
    #[error("segment too long for the character count field")]
    SegmentTooLong,

    /// The encoded bit stream exceeds the data capacity of the version and ECC level.
    #[error("data length = {needed_bits} bits, max capacity = {capacity_bits} bits")]
    DataOverCapacity {
        needed_bits: usize,
        capacity_bits: usize,
    },
}

/// The logo collaborator could not provide pixel data.
#[derive(Error, Debug)]
pub enum LogoLoadError {
    #[error("failed to load logo '{reference}': {error}")]
    Image {
        reference: String,
        #[source]
        error: image::ImageError,
    },

    #[error("logo '{0}' is unavailable")]
    Unavailable(String),

    #[error("logo '{0}' has zero width or height")]
    Empty(String),
}

/// A render call failed. Every variant is terminal for that call.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The target size rounds to a block size of zero pixels.
    #[error("target size {target_px}px is too small for a {modules}x{modules} matrix")]
    InvalidDimension { target_px: u32, modules: usize },

    /// The canvas side length overflows or could not be allocated.
    #[error("canvas of {0}x{0}px could not be allocated")]
    CanvasTooLarge(u64),

    #[error(transparent)]
    LogoLoad(#[from] LogoLoadError),

    #[error("failed to encode image: {0}")]
    Serialization(#[source] image::ImageError),
}

/// Errors surfaced by [`crate::generate`] and friends.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl Error {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Whether the failure stems from the caller's input rather than an internal fault.
    ///
    /// Transport adapters map `true` to a 400-class response and `false` to a 500-class one.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidRequest(_) | Self::Encoding(_) => true,
            Self::Render(RenderError::InvalidDimension { .. }) => true,
            Self::Render(RenderError::CanvasTooLarge(_))
            | Self::Render(RenderError::LogoLoad(_))
            | Self::Render(RenderError::Serialization(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(Error::invalid_request("x")
            .to_string()
            .contains("invalid request:"));
        assert!(Error::from(EncodingError::SegmentTooLong)
            .to_string()
            .contains("encoding error:"));
        let render = RenderError::InvalidDimension {
            target_px: 3,
            modules: 21,
        };
        assert!(Error::from(render).to_string().contains("render error:"));
    }

    #[test]
    fn capacity_message_reports_both_sizes() {
        let err = EncodingError::DataOverCapacity {
            needed_bits: 100,
            capacity_bits: 72,
        };
        assert_eq!(err.to_string(), "data length = 100 bits, max capacity = 72 bits");
    }

    #[test]
    fn client_errors_are_input_shaped() {
        assert!(Error::from(EncodingError::VersionOutOfRange(41)).is_client_error());
        assert!(Error::from(RenderError::InvalidDimension {
            target_px: 0,
            modules: 21
        })
        .is_client_error());
        let logo = RenderError::LogoLoad(LogoLoadError::Unavailable("logo.png".into()));
        assert!(!Error::from(logo).is_client_error());
    }
}
