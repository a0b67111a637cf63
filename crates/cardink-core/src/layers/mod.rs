//! Layer definitions for the card canvas.

mod background;
mod contact;
mod image;
mod qr;
mod text;

pub use background::{Background, BackgroundFill};
pub use contact::{ChipIcon, ContactChip};
pub use image::{Image, ImageFormat, ImageSource, ObjectFit};
pub use qr::{QrCode, QrErrorCorrection};
pub use text::{FontFamily, FontWeight, Text};

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex string.
    /// Returns None for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = if hex.len() == 8 {
                    u8::from_str_radix(&hex[6..8], 16).ok()?
                } else {
                    255
                };
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for layers.
pub type LayerId = Uuid;

/// Layer kind discriminant, mainly for UI display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Background,
    Text,
    Image,
    ContactChip,
    QrCode,
}

impl LayerKind {
    /// Human-readable label for layer lists and derived names.
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Background => "Background",
            LayerKind::Text => "Text",
            LayerKind::Image => "Image",
            LayerKind::ContactChip => "Contact",
            LayerKind::QrCode => "QR Code",
        }
    }
}

/// A partial update applied to a layer by `DocumentStore::update_layer`.
///
/// Fields left as `None` are untouched. `width`/`height` apply to the
/// variants that carry an explicit size (text, image, QR side length) and
/// are ignored elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPatch {
    pub position: Option<Point>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl LayerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when applying this patch cannot change any field.
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.rotation.is_none()
            && self.opacity.is_none()
            && self.locked.is_none()
            && self.visible.is_none()
            && self.name.is_none()
            && self.width.is_none()
            && self.height.is_none()
    }
}

/// Enum wrapper over all layer types.
///
/// Serialized with an inline `type` tag so a persisted layer reads as
/// `{ "type": "text", "id": ..., "position": {...}, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Background(Background),
    Text(Text),
    Image(Image),
    ContactChip(ContactChip),
    QrCode(QrCode),
}

impl Layer {
    pub fn id(&self) -> LayerId {
        match self {
            Layer::Background(l) => l.id,
            Layer::Text(l) => l.id,
            Layer::Image(l) => l.id,
            Layer::ContactChip(l) => l.id,
            Layer::QrCode(l) => l.id,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Background(_) => LayerKind::Background,
            Layer::Text(_) => LayerKind::Text,
            Layer::Image(_) => LayerKind::Image,
            Layer::ContactChip(_) => LayerKind::ContactChip,
            Layer::QrCode(_) => LayerKind::QrCode,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Layer::Background(l) => l.position,
            Layer::Text(l) => l.position,
            Layer::Image(l) => l.position,
            Layer::ContactChip(l) => l.position,
            Layer::QrCode(l) => l.position,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Layer::Background(l) => l.position = position,
            Layer::Text(l) => l.position = position,
            Layer::Image(l) => l.position = position,
            Layer::ContactChip(l) => l.position = position,
            Layer::QrCode(l) => l.position = position,
        }
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        match self {
            Layer::Background(l) => l.rotation,
            Layer::Text(l) => l.rotation,
            Layer::Image(l) => l.rotation,
            Layer::ContactChip(l) => l.rotation,
            Layer::QrCode(l) => l.rotation,
        }
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        match self {
            Layer::Background(l) => l.rotation = degrees,
            Layer::Text(l) => l.rotation = degrees,
            Layer::Image(l) => l.rotation = degrees,
            Layer::ContactChip(l) => l.rotation = degrees,
            Layer::QrCode(l) => l.rotation = degrees,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            Layer::Background(l) => l.opacity,
            Layer::Text(l) => l.opacity,
            Layer::Image(l) => l.opacity,
            Layer::ContactChip(l) => l.opacity,
            Layer::QrCode(l) => l.opacity,
        }
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0);
        match self {
            Layer::Background(l) => l.opacity = opacity,
            Layer::Text(l) => l.opacity = opacity,
            Layer::Image(l) => l.opacity = opacity,
            Layer::ContactChip(l) => l.opacity = opacity,
            Layer::QrCode(l) => l.opacity = opacity,
        }
    }

    pub fn locked(&self) -> bool {
        match self {
            Layer::Background(l) => l.locked,
            Layer::Text(l) => l.locked,
            Layer::Image(l) => l.locked,
            Layer::ContactChip(l) => l.locked,
            Layer::QrCode(l) => l.locked,
        }
    }

    pub fn set_locked(&mut self, locked: bool) {
        match self {
            Layer::Background(l) => l.locked = locked,
            Layer::Text(l) => l.locked = locked,
            Layer::Image(l) => l.locked = locked,
            Layer::ContactChip(l) => l.locked = locked,
            Layer::QrCode(l) => l.locked = locked,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Layer::Background(l) => l.visible,
            Layer::Text(l) => l.visible,
            Layer::Image(l) => l.visible,
            Layer::ContactChip(l) => l.visible,
            Layer::QrCode(l) => l.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Layer::Background(l) => l.visible = visible,
            Layer::Text(l) => l.visible = visible,
            Layer::Image(l) => l.visible = visible,
            Layer::ContactChip(l) => l.visible = visible,
            Layer::QrCode(l) => l.visible = visible,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Layer::Background(l) => l.name.as_deref(),
            Layer::Text(l) => l.name.as_deref(),
            Layer::Image(l) => l.name.as_deref(),
            Layer::ContactChip(l) => l.name.as_deref(),
            Layer::QrCode(l) => l.name.as_deref(),
        }
    }

    pub fn set_name(&mut self, name: Option<String>) {
        match self {
            Layer::Background(l) => l.name = name,
            Layer::Text(l) => l.name = name,
            Layer::Image(l) => l.name = name,
            Layer::ContactChip(l) => l.name = name,
            Layer::QrCode(l) => l.name = name,
        }
    }

    /// The explicit name, or the kind's label when unnamed.
    pub fn display_name(&self) -> String {
        self.name()
            .map(str::to_string)
            .unwrap_or_else(|| self.kind().label().to_string())
    }

    /// Axis-aligned bounding box in canvas coordinates.
    ///
    /// The background reports a zero-sized box; it never participates in
    /// snapping, guides, or hit testing.
    pub fn bounds(&self) -> Rect {
        match self {
            Layer::Background(l) => l.bounds(),
            Layer::Text(l) => l.bounds(),
            Layer::Image(l) => l.bounds(),
            Layer::ContactChip(l) => l.bounds(),
            Layer::QrCode(l) => l.bounds(),
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self, Layer::Background(_))
    }

    /// Check if a point (in canvas coordinates) hits this layer.
    /// The background is never hit.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.is_background() {
            return false;
        }
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Assign a fresh unique id. Used when adding or duplicating layers so
    /// ids are never reused.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Layer::Background(l) => l.id = new_id,
            Layer::Text(l) => l.id = new_id,
            Layer::Image(l) => l.id = new_id,
            Layer::ContactChip(l) => l.id = new_id,
            Layer::QrCode(l) => l.id = new_id,
        }
    }

    /// Merge a partial update into this layer.
    ///
    /// The background layer stays locked no matter what the patch says.
    pub fn apply_patch(&mut self, patch: &LayerPatch) {
        if let Some(position) = patch.position {
            self.set_position(position);
        }
        if let Some(rotation) = patch.rotation {
            self.set_rotation(rotation);
        }
        if let Some(opacity) = patch.opacity {
            self.set_opacity(opacity);
        }
        if let Some(locked) = patch.locked {
            self.set_locked(locked);
        }
        if let Some(visible) = patch.visible {
            self.set_visible(visible);
        }
        if let Some(name) = &patch.name {
            self.set_name(Some(name.clone()));
        }
        if patch.width.is_some() || patch.height.is_some() {
            self.set_explicit_size(patch.width, patch.height);
        }
        if self.is_background() {
            self.set_locked(true);
        }
    }

    fn set_explicit_size(&mut self, width: Option<f64>, height: Option<f64>) {
        match self {
            Layer::Text(t) => {
                if width.is_some() {
                    t.width = width;
                }
                if height.is_some() {
                    t.height = height;
                }
            }
            Layer::Image(i) => {
                if width.is_some() {
                    i.width = width;
                }
                if height.is_some() {
                    i.height = height;
                }
            }
            // QR codes stay square; either dimension sets the side length.
            Layer::QrCode(q) => {
                if let Some(side) = width.or(height) {
                    q.size = Some(side);
                }
            }
            // Chip size is derived from its label; background has no size.
            Layer::ContactChip(_) | Layer::Background(_) => {}
        }
    }
}
