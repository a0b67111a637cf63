//! QR code layer.
//!
//! Carries the encode configuration only; matrix generation and rendering
//! are external.

use super::{LayerId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrErrorCorrection {
    /// ~7% recovery.
    Low,
    /// ~15% recovery (default).
    #[default]
    Medium,
    /// ~25% recovery.
    Quartile,
    /// ~30% recovery.
    High,
}

/// A QR code layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
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
    /// The payload to encode (URL, vCard, ...).
    pub data: String,
    /// Side length in pixels; QR codes are always square.
    #[serde(default)]
    pub size: Option<f64>,
    pub error_correction: QrErrorCorrection,
    pub foreground: SerializableColor,
    pub background: SerializableColor,
}

impl QrCode {
    /// Default side length.
    pub const DEFAULT_SIZE: f64 = 120.0;

    /// Create a new QR layer encoding `data`.
    pub fn new(position: Point, data: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            name: None,
            data,
            size: None,
            error_correction: QrErrorCorrection::default(),
            foreground: SerializableColor::black(),
            background: SerializableColor::white(),
        }
    }

    /// Set the side length.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Square bounding box from the configured size or the default.
    pub fn bounds(&self) -> Rect {
        let side = self.size.unwrap_or(Self::DEFAULT_SIZE);
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + side,
            self.position.y + side,
        )
    }
}
