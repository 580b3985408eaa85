//! Geometry primitives shared between the view model and the engine.

use serde::{Deserialize, Serialize};

/// A width/height pair in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An origin + size rectangle, mirroring the native layer's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same bounds with a different width.
    pub fn with_width(self, width: f64) -> Self {
        Self { width, ..self }
    }

    /// The same bounds with a different height.
    pub fn with_height(self, height: f64) -> Self {
        Self { height, ..self }
    }
}

/// A length that is either absolute (device-independent pixels), a
/// percentage of a parent extent, or left to layout (`Auto`).
///
/// Percentages are stored as fractions: `Percent(0.5)` is 50%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PercentLength {
    Auto,
    Dip { value: f64 },
    Percent { fraction: f64 },
}

impl PercentLength {
    pub fn dip(value: f64) -> Self {
        Self::Dip { value }
    }

    pub fn percent(fraction: f64) -> Self {
        Self::Percent { fraction }
    }

    /// Resolve to device-independent pixels against a parent extent.
    /// `Auto` has no fixed resolution and yields `None`.
    pub fn to_dips(&self, parent_extent: f64) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Dip { value } => Some(*value),
            Self::Percent { fraction } => Some(fraction * parent_extent),
        }
    }
}

impl Default for PercentLength {
    fn default() -> Self {
        Self::Auto
    }
}

impl From<f64> for PercentLength {
    fn from(value: f64) -> Self {
        Self::Dip { value }
    }
}
