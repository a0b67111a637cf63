//! Background layer.

use super::{LayerId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fill description for the background.
///
/// This is a description only; turning it into pixels is the renderer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundFill {
    Solid(SerializableColor),
    LinearGradient {
        start: SerializableColor,
        end: SerializableColor,
        angle_degrees: f64,
    },
}

impl Default for BackgroundFill {
    fn default() -> Self {
        BackgroundFill::Solid(SerializableColor::white())
    }
}

/// The canvas background. Every document has exactly one, at index 0,
/// always locked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub(crate) id: LayerId,
    pub position: Point,
    /// Rotation in degrees. Kept for schema uniformity; renderers ignore it.
    #[serde(default)]
    pub rotation: f64,
    pub opacity: f64,
    pub locked: bool,
    pub visible: bool,
    #[serde(default)]
    pub name: Option<String>,
    pub fill: BackgroundFill,
}

impl Background {
    /// Create a new background with the given fill.
    pub fn new(fill: BackgroundFill) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            rotation: 0.0,
            opacity: 1.0,
            locked: true,
            visible: true,
            name: None,
            fill,
        }
    }

    /// The background spans the whole canvas but reports a zero-sized box:
    /// it is never a snap target, guide source, or hit-test subject.
    pub fn bounds(&self) -> Rect {
        Rect::ZERO
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::new(BackgroundFill::default())
    }
}
