//! Animation curves and their native timing resolution.

use fern_config::AnimationConfig;
use serde::{Deserialize, Serialize};

/// The timing curve requested on a descriptor.
///
/// `Spring` is not a timing function; it selects a physically simulated
/// native path where the declared duration is a hint rather than a bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationCurve {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring,
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Default for AnimationCurve {
    fn default() -> Self {
        Self::Ease
    }
}

/// Control points of a cubic bezier timing function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingFunction {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl TimingFunction {
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// Parameters of the native spring simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub damping: f64,
    pub initial_velocity: f64,
}

/// A curve resolved into the form the native layer consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeCurve {
    Timing(TimingFunction),
    Spring(SpringParams),
}

/// Resolve a declared curve into its native timing representation.
pub fn resolve(curve: AnimationCurve, config: &AnimationConfig) -> NativeCurve {
    match curve {
        AnimationCurve::Linear => NativeCurve::Timing(TimingFunction::LINEAR),
        AnimationCurve::Ease => NativeCurve::Timing(TimingFunction::EASE),
        AnimationCurve::EaseIn => NativeCurve::Timing(TimingFunction::EASE_IN),
        AnimationCurve::EaseOut => NativeCurve::Timing(TimingFunction::EASE_OUT),
        AnimationCurve::EaseInOut => NativeCurve::Timing(TimingFunction::EASE_IN_OUT),
        AnimationCurve::Spring => NativeCurve::Spring(SpringParams {
            damping: config.spring_damping,
            initial_velocity: config.spring_velocity,
        }),
        AnimationCurve::CubicBezier { x1, y1, x2, y2 } => {
            NativeCurve::Timing(TimingFunction::new(x1, y1, x2, y2))
        }
    }
}
