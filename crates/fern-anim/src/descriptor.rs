//! Property animation descriptors.
//!
//! A [`PropertyAnimation`] is the declarative request: animate one property
//! of one view to a target value with a given timing. Groups of descriptors
//! are driven by [`crate::group::Animation`].

use fern_ir::{Color, PercentLength, ValueSource, ViewHandle};
use serde::{Deserialize, Serialize};

use crate::curve::AnimationCurve;

/// The animatable properties the engine understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Property {
    Opacity,
    BackgroundColor,
    Translate,
    Rotate,
    Scale,
    Width,
    Height,
    /// A registered custom scalar property, addressed by name.
    Custom { name: String },
    /// Several affine sub-properties fused into a single matrix animation.
    /// Produced by merging; not normally constructed by callers.
    CombinedTransform,
}

impl Property {
    /// Whether this property participates in affine transform merging.
    pub fn is_affine(&self) -> bool {
        matches!(
            self,
            Self::Translate | Self::Rotate | Self::Scale | Self::CombinedTransform
        )
    }

    /// Display name used in errors and logs.
    pub fn name(&self) -> &str {
        match self {
            Self::Opacity => "opacity",
            Self::BackgroundColor => "backgroundColor",
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
            Self::Width => "width",
            Self::Height => "height",
            Self::Custom { name } => name,
            Self::CombinedTransform => "transform",
        }
    }
}

/// A 2D vector value (translate offsets or scale factors).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 3D vector value (per-axis rotation, degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The sub-values carried by a combined transform animation. Each field is
/// present only if the corresponding sub-property was requested.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformSet {
    pub translate: Option<Vec2>,
    pub rotate: Option<Vec3>,
    pub scale: Option<Vec2>,
}

/// The target value of a descriptor. Which variant fits is dictated by the
/// property; the builder rejects mismatches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationValue {
    Scalar { value: f64 },
    Color { value: Color },
    Vec2 { value: Vec2 },
    Vec3 { value: Vec3 },
    Length { value: PercentLength },
    Transform { value: TransformSet },
}

impl AnimationValue {
    pub fn scalar(value: f64) -> Self {
        Self::Scalar { value }
    }

    pub fn color(value: Color) -> Self {
        Self::Color { value }
    }

    pub fn vec2(x: f64, y: f64) -> Self {
        Self::Vec2 {
            value: Vec2::new(x, y),
        }
    }

    pub fn vec3(x: f64, y: f64, z: f64) -> Self {
        Self::Vec3 {
            value: Vec3::new(x, y, z),
        }
    }

    pub fn length(value: impl Into<PercentLength>) -> Self {
        Self::Length {
            value: value.into(),
        }
    }

    /// Kind name used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Color { .. } => "color",
            Self::Vec2 { .. } => "vec2",
            Self::Vec3 { .. } => "vec3",
            Self::Length { .. } => "length",
            Self::Transform { .. } => "transform",
        }
    }
}

/// How many times an animation repeats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IterationCount {
    Count { count: f32 },
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        Self::Count { count: 1.0 }
    }
}

impl IterationCount {
    /// The repeat count handed to the native layer. Infinite repetition is
    /// expressed as the largest representable count.
    pub fn native_repeat_count(&self) -> f32 {
        match self {
            Self::Count { count } => *count,
            Self::Infinite => f32::MAX,
        }
    }
}

/// One property animation request.
#[derive(Debug, Clone)]
pub struct PropertyAnimation {
    pub target: ViewHandle,
    pub property: Property,
    pub value: AnimationValue,
    /// Duration in milliseconds; the configured default applies when absent.
    pub duration_ms: Option<f64>,
    pub delay_ms: f64,
    pub iterations: IterationCount,
    pub curve: AnimationCurve,
    /// Which declarative slot the animation writes into.
    pub value_source: ValueSource,
}

impl PropertyAnimation {
    pub fn new(target: ViewHandle, property: Property, value: AnimationValue) -> Self {
        Self {
            target,
            property,
            value,
            duration_ms: None,
            delay_ms: 0.0,
            iterations: IterationCount::default(),
            curve: AnimationCurve::default(),
            value_source: ValueSource::default(),
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_iterations(mut self, iterations: IterationCount) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_value_source(mut self, value_source: ValueSource) -> Self {
        self.value_source = value_source;
        self
    }

    /// Timing-and-target equality used to decide whether two descriptors can
    /// fuse into one combined transform animation.
    pub fn same_timing_and_target(&self, other: &Self) -> bool {
        self.target.ptr_eq(&other.target)
            && self.duration_ms == other.duration_ms
            && self.delay_ms == other.delay_ms
            && self.iterations == other.iterations
            && self.curve == other.curve
    }
}
