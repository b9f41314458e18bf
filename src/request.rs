//! Input contract of a transport adapter.
//!
//! A transport layer deserializes a [`QrRequest`], applies its [`Limits`] and hands it to
//! [`crate::generate_with`]. Defaults mirror the HTTP adapter this crate was designed for.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::qrcode::{QrCodeEcc, Version};
use crate::style::RenderStyle;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRequest {
    pub payload: String,
    /// Requested side length in pixels, before rounding to whole modules.
    #[serde(default = "QrRequest::default_size")]
    pub size: u32,
    #[serde(default = "QrRequest::default_type_number")]
    pub type_number: u8,
    #[serde(default)]
    pub error_correction_level: QrCodeEcc,
    #[serde(default)]
    pub style: RenderStyle,
}

impl QrRequest {
    pub const DEFAULT_SIZE: u32 = 256;
    pub const DEFAULT_TYPE_NUMBER: u8 = 1;

    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            size: Self::DEFAULT_SIZE,
            type_number: Self::DEFAULT_TYPE_NUMBER,
            error_correction_level: QrCodeEcc::default(),
            style: RenderStyle::default(),
        }
    }

    fn default_size() -> u32 {
        Self::DEFAULT_SIZE
    }

    fn default_type_number() -> u8 {
        Self::DEFAULT_TYPE_NUMBER
    }

    /// Rejects requests that cannot be rendered whatever the limits.
    pub fn validate(&self) -> Result<()> {
        if self.payload.is_empty() {
            return Err(Error::invalid_request("payload must not be empty"));
        }
        Ok(())
    }

    pub fn version(&self) -> Result<Version> {
        Ok(Version::try_from(self.type_number)?)
    }

    /// Pulls size and type number into the ranges allowed by `limits`.
    pub fn clamp(&mut self, limits: &Limits) {
        let max_type = limits.max_type_number.clamp(Version::MIN.value(), Version::MAX.value());
        self.size = self.size.min(limits.max_size);
        self.type_number = self.type_number.clamp(Version::MIN.value(), max_type);
    }
}

/// Ceilings a transport adapter enforces on untrusted input.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Limits {
    pub max_size: u32,
    pub max_type_number: u8,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_size: 2048,
            max_type_number: Version::MAX.value(),
        }
    }
}
