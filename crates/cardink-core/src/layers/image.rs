//! Image layer for photos and logos.

use super::LayerId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Where the image pixels come from. Decoding and rendering are external;
/// the layer only carries the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// A URI the renderer resolves (file path, http, data URI).
    Uri(String),
    /// Bytes embedded in the document, base64-encoded for JSON transport.
    Embedded {
        format: ImageFormat,
        data_base64: String,
    },
}

/// How the source pixels map into the layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectFit {
    /// Stretch to fill the box.
    #[default]
    Fill,
    /// Scale to fit inside, preserving aspect ratio.
    Contain,
    /// Scale to cover the box, preserving aspect ratio.
    Cover,
    /// Like `Contain` but never upscales.
    ScaleDown,
    /// Natural size, no scaling.
    None,
}

/// An image layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: LayerId,
    /// Top-left corner position.
    pub position: Point,
    /// Rotation in degrees (around center).
    #[serde(default)]
    pub rotation: f64,
    pub opacity: f64,
    pub locked: bool,
    pub visible: bool,
    #[serde(default)]
    pub name: Option<String>,
    pub source: ImageSource,
    /// Natural pixel width of the source, when known.
    #[serde(default)]
    pub natural_width: Option<u32>,
    /// Natural pixel height of the source, when known.
    #[serde(default)]
    pub natural_height: Option<u32>,
    /// Display width; falls back to natural width, then a default square.
    #[serde(default)]
    pub width: Option<f64>,
    /// Display height; same fallback chain as width.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub fit: ObjectFit,
}

impl Image {
    /// Fallback side length when neither display nor natural size is known.
    pub const DEFAULT_SIZE: f64 = 100.0;

    /// Create an image layer referencing a URI.
    pub fn from_uri(position: Point, uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            name: None,
            source: ImageSource::Uri(uri.into()),
            natural_width: None,
            natural_height: None,
            width: None,
            height: None,
            fit: ObjectFit::default(),
        }
    }

    /// Create an image layer embedding raw bytes.
    pub fn from_bytes(
        position: Point,
        data: &[u8],
        natural_width: u32,
        natural_height: u32,
        format: ImageFormat,
    ) -> Self {
        use base64::{engine::general_purpose::STANDARD, Engine};

        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            name: None,
            source: ImageSource::Embedded {
                format,
                data_base64: STANDARD.encode(data),
            },
            natural_width: Some(natural_width),
            natural_height: Some(natural_height),
            width: None,
            height: None,
            fit: ObjectFit::default(),
        }
    }

    /// Set the display size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the object-fit mode.
    pub fn with_fit(mut self, fit: ObjectFit) -> Self {
        self.fit = fit;
        self
    }

    /// Decode embedded bytes, if this layer embeds any.
    pub fn embedded_data(&self) -> Option<Vec<u8>> {
        use base64::{engine::general_purpose::STANDARD, Engine};
        match &self.source {
            ImageSource::Embedded { data_base64, .. } => STANDARD.decode(data_base64).ok(),
            ImageSource::Uri(_) => None,
        }
    }

    /// Bounding box: explicit size, else natural size, else a default square.
    pub fn bounds(&self) -> Rect {
        let width = self
            .width
            .or(self.natural_width.map(f64::from))
            .unwrap_or(Self::DEFAULT_SIZE);
        let height = self
            .height
            .or(self.natural_height.map(f64::from))
            .unwrap_or(Self::DEFAULT_SIZE);
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }
}
