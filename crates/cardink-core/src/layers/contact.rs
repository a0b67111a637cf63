//! Contact chip layer: an icon plus a short label (phone, email, ...).

use super::{LayerId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Icon shown at the left edge of a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipIcon {
    #[default]
    Phone,
    Email,
    Website,
    Location,
    Social,
}

impl ChipIcon {
    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            ChipIcon::Phone => "Phone",
            ChipIcon::Email => "Email",
            ChipIcon::Website => "Website",
            ChipIcon::Location => "Location",
            ChipIcon::Social => "Social",
        }
    }

    /// All available icons.
    pub fn all() -> &'static [ChipIcon] {
        &[
            ChipIcon::Phone,
            ChipIcon::Email,
            ChipIcon::Website,
            ChipIcon::Location,
            ChipIcon::Social,
        ]
    }
}

/// A contact chip layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactChip {
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
    /// The label text, e.g. a phone number.
    pub label: String,
    pub icon: ChipIcon,
    /// Icon side length in pixels.
    pub icon_size: f64,
    /// Label font size in pixels.
    pub font_size: f64,
    pub text_color: SerializableColor,
    pub chip_color: SerializableColor,
}

impl ContactChip {
    /// Default icon side length.
    pub const DEFAULT_ICON_SIZE: f64 = 20.0;
    /// Default label font size.
    pub const DEFAULT_FONT_SIZE: f64 = 14.0;
    /// Inner padding on every side.
    pub const PADDING: f64 = 8.0;
    /// Gap between icon and label.
    pub const GAP: f64 = 6.0;
    /// Average glyph width as a fraction of the font size. An estimate;
    /// exact text measurement happens in the renderer.
    pub const CHAR_WIDTH_FACTOR: f64 = 0.55;

    /// Create a new chip.
    pub fn new(position: Point, icon: ChipIcon, label: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            name: None,
            label,
            icon,
            icon_size: Self::DEFAULT_ICON_SIZE,
            font_size: Self::DEFAULT_FONT_SIZE,
            text_color: SerializableColor::black(),
            chip_color: SerializableColor::new(240, 240, 240, 255),
        }
    }

    /// Estimated label width.
    fn label_width(&self) -> f64 {
        self.label.chars().count() as f64 * self.font_size * Self::CHAR_WIDTH_FACTOR
    }

    /// Bounding box from icon/label/padding heuristics.
    pub fn bounds(&self) -> Rect {
        let width = Self::PADDING * 2.0 + self.icon_size + Self::GAP + self.label_width();
        let height = self.icon_size + Self::PADDING * 2.0;
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }
}
