//! # qrender
//!
//! A Rust library for rendering QR codes as styled PNG images.
//!
//! `qrender` encodes a text payload into a QR Code Model 2 symbol at a fixed type number
//! (version 1 to 40) and error correction level, then rasterizes the module matrix with
//! configurable styling.
//!
//! ## Features
//!
//! - Byte-mode encoding at any of the four error correction levels: Low, Medium, Quartile, High.
//! - Square, dot or rounded modules. Rounded modules merge into continuous strokes where they
//!   touch.
//! - A separate shape for the three corner position markers.
//! - Solid fills or linear/radial gradients, background color and a border outline.
//! - A centered logo overlay with adjustable size and opacity.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! Render a rounded QR code with a gradient:
//!
//! ```rust
//! use qrender::{generate, QrRequest, ShapeStyle};
//! use qrender::style::{Gradient, GradientKind};
//! use qrender::Color;
//!
//! let mut request = QrRequest::new("https://example.com");
//! request.type_number = 4;
//! request.style.shape_style = ShapeStyle::Rounded;
//! request.style.gradient = Some(Gradient {
//!     kind: GradientKind::Linear,
//!     start_color: Color::rgb(255, 0, 0),
//!     end_color: Color::rgb(0, 0, 255),
//!     angle_degrees: 45.0,
//! });
//!
//! let png = generate(&request).unwrap();
//! assert_eq!(png.mime_type(), "image/png");
//! ```
//!
//! Encode and render in two steps:
//!
//! ```rust
//! use qrender::qrcode::{encode, QrCodeEcc, Version};
//! use qrender::{RenderStyle, Renderer};
//!
//! let matrix = encode("HELLO", Version::new(1), QrCodeEcc::Low).unwrap();
//! let image = Renderer::new().rasterize(&matrix, 100, &RenderStyle::default()).unwrap();
//! assert_eq!(image.dimensions(), (105, 105));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: QR code encoding.
//! - [`matrix`]: The module grid shared by encoder and renderer.
//! - [`style`]: Render configuration.
//! - [`render`]: Rasterization and PNG output.
//! - [`logo`]: Logo loading and compositing.
//! - [`helper`]: SVG and text previews, saving output.

pub mod color;
pub mod error;
pub mod gradient;
pub mod helper;
pub mod logo;
pub mod matrix;
pub mod qrcode;
pub mod render;
pub mod request;
pub mod shape;
pub mod style;

pub use color::Color;
pub use error::{EncodingError, Error, LogoLoadError, RenderError, Result};
pub use logo::{FileLogoLoader, LogoLoader};
pub use matrix::ModuleMatrix;
pub use qrcode::{QrCodeEcc, Version};
pub use render::{CanvasLayout, EncodedImage, Renderer};
pub use request::{Limits, QrRequest};
pub use style::{RenderStyle, ShapeStyle};

/// Validates, encodes and renders `request`, loading logos from the filesystem.
pub fn generate(request: &QrRequest) -> Result<EncodedImage> {
    generate_with(request, &Renderer::new())
}

/// Like [`generate`], with a caller-supplied renderer.
pub fn generate_with<L: LogoLoader>(
    request: &QrRequest,
    renderer: &Renderer<L>,
) -> Result<EncodedImage> {
    request.validate()?;
    let matrix = qrcode::encode(
        &request.payload,
        request.version()?,
        request.error_correction_level,
    )?;
    Ok(renderer.render(&matrix, request.size, &request.style)?)
}
