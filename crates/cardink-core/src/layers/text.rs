//! Text layer.

use super::{LayerId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Clean sans-serif (default).
    #[default]
    Sans,
    /// Serif face for formal cards.
    Serif,
    /// Monospace face.
    Mono,
    /// Handwritten script face.
    Script,
}

impl FontFamily {
    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontFamily::Sans => "Sans",
            FontFamily::Serif => "Serif",
            FontFamily::Mono => "Mono",
            FontFamily::Script => "Script",
        }
    }

    /// All available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Sans,
            FontFamily::Serif,
            FontFamily::Mono,
            FontFamily::Script,
        ]
    }
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontWeight::Light => "Light",
            FontWeight::Regular => "Regular",
            FontWeight::Bold => "Bold",
        }
    }
}

/// A text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: LayerId,
    /// Top-left corner of the text box.
    pub position: Point,
    /// Rotation in degrees (around center).
    #[serde(default)]
    pub rotation: f64,
    pub opacity: f64,
    pub locked: bool,
    pub visible: bool,
    #[serde(default)]
    pub name: Option<String>,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_family: FontFamily,
    pub font_weight: FontWeight,
    pub color: SerializableColor,
    /// Explicit box width; when absent the width is estimated from content.
    #[serde(default)]
    pub width: Option<f64>,
    /// Explicit box height; when absent the height is `font_size * 1.2`
    /// per line.
    #[serde(default)]
    pub height: Option<f64>,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    /// Line height factor applied to the font size.
    pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
    /// Minimum estimated box width so empty text stays grabbable.
    pub const MIN_WIDTH: f64 = 20.0;

    /// Create a new text layer.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            name: None,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            font_weight: FontWeight::default(),
            color: SerializableColor::black(),
            width: None,
            height: None,
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Set an explicit box size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Approximate width from the longest line. Actual width depends on the
    /// font; the factors are empirical per-family averages.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let char_width_factor = match (self.font_family, self.font_weight) {
            (FontFamily::Sans, FontWeight::Light) => 0.50,
            (FontFamily::Sans, FontWeight::Regular) => 0.52,
            (FontFamily::Sans, FontWeight::Bold) => 0.56,
            (FontFamily::Serif, FontWeight::Light) => 0.52,
            (FontFamily::Serif, FontWeight::Regular) => 0.55,
            (FontFamily::Serif, FontWeight::Bold) => 0.58,
            (FontFamily::Mono, _) => 0.60,
            (FontFamily::Script, FontWeight::Light) => 0.48,
            (FontFamily::Script, FontWeight::Regular) => 0.50,
            (FontFamily::Script, FontWeight::Bold) => 0.54,
        };

        max_line_len as f64 * self.font_size * char_width_factor
    }

    /// Approximate height from the line count.
    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * Self::LINE_HEIGHT_FACTOR
    }

    /// Bounding box: explicit size where set, estimated otherwise.
    pub fn bounds(&self) -> Rect {
        let width = self
            .width
            .unwrap_or_else(|| self.approximate_width())
            .max(Self::MIN_WIDTH);
        let height = self.height.unwrap_or_else(|| self.approximate_height());
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }
}
