//! View handles and the declarative style slots the engine animates.
//!
//! Every animatable property is stored in a [`StyleSlot`]: a base value
//! written by direct property assignment, plus an optional keyframe
//! override written by keyframe-driven animation. Which slot a write lands
//! in is selected by [`ValueSource`], so an animation reset can restore
//! exactly the slot it disturbed.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Color;
use crate::geometry::{PercentLength, Size};

/// Which slot of a style property a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Direct property assignment (plain animations).
    Animation,
    /// Keyframe-driven assignment; overrides the base value while present.
    Keyframe,
}

impl Default for ValueSource {
    fn default() -> Self {
        Self::Animation
    }
}

/// A single animatable property with a base value and an optional
/// keyframe override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSlot<T> {
    base: T,
    keyframe: Option<T>,
}

impl<T: Clone> StyleSlot<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            keyframe: None,
        }
    }

    /// Write a value into the slot selected by `source`.
    pub fn set(&mut self, source: ValueSource, value: T) {
        match source {
            ValueSource::Animation => self.base = value,
            ValueSource::Keyframe => self.keyframe = Some(value),
        }
    }

    /// The value the renderer would use: keyframe override if present,
    /// otherwise the base value.
    pub fn effective(&self) -> T {
        self.keyframe.clone().unwrap_or_else(|| self.base.clone())
    }

    pub fn base(&self) -> &T {
        &self.base
    }

    /// Drop the keyframe override, exposing the base value again.
    pub fn clear_keyframe(&mut self) {
        self.keyframe = None;
    }
}

impl<T: Clone + Default> Default for StyleSlot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// The declarative style of one view.
///
/// Rotation values are degrees; translate values are device-independent
/// pixels; scale values are factors (1.0 = unscaled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewStyle {
    pub opacity: StyleSlot<f64>,
    pub background_color: StyleSlot<Color>,
    pub translate_x: StyleSlot<f64>,
    pub translate_y: StyleSlot<f64>,
    /// Rotation about the z axis, degrees.
    pub rotate: StyleSlot<f64>,
    pub rotate_x: StyleSlot<f64>,
    pub rotate_y: StyleSlot<f64>,
    pub scale_x: StyleSlot<f64>,
    pub scale_y: StyleSlot<f64>,
    pub width: StyleSlot<PercentLength>,
    pub height: StyleSlot<PercentLength>,
    custom: HashMap<String, StyleSlot<f64>>,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            opacity: StyleSlot::new(1.0),
            background_color: StyleSlot::default(),
            translate_x: StyleSlot::default(),
            translate_y: StyleSlot::default(),
            rotate: StyleSlot::default(),
            rotate_x: StyleSlot::default(),
            rotate_y: StyleSlot::default(),
            scale_x: StyleSlot::new(1.0),
            scale_y: StyleSlot::new(1.0),
            width: StyleSlot::default(),
            height: StyleSlot::default(),
            custom: HashMap::new(),
        }
    }
}

impl ViewStyle {
    /// Declare a custom scalar property so it can be animated.
    pub fn register_custom(&mut self, name: impl Into<String>, value: f64) {
        self.custom.insert(name.into(), StyleSlot::new(value));
    }

    /// Effective value of a custom property, if declared.
    pub fn custom(&self, name: &str) -> Option<f64> {
        self.custom.get(name).map(|slot| slot.effective())
    }

    /// Iterate over all declared custom properties and their effective values.
    pub fn custom_properties(&self) -> impl Iterator<Item = (&str, f64)> {
        self.custom
            .iter()
            .map(|(name, slot)| (name.as_str(), slot.effective()))
    }

    /// Write a custom property. Returns false (and warns) when the
    /// property was never declared on this view.
    pub fn set_custom(&mut self, name: &str, source: ValueSource, value: f64) -> bool {
        match self.custom.get_mut(name) {
            Some(slot) => {
                slot.set(source, value);
                true
            }
            None => {
                warn!(property = name, "write to undeclared custom property");
                false
            }
        }
    }
}

/// State of one view in the declarative tree.
#[derive(Debug)]
pub struct ViewState {
    pub id: String,
    pub style: ViewStyle,
    /// Perspective distance used for 3D rotation, dips.
    pub perspective: f64,
    /// Size assigned by the most recent layout pass.
    pub measured_size: Size,
    parent: Option<Weak<RefCell<ViewState>>>,
}

impl ViewState {
    /// Default perspective distance when a view does not override it.
    pub const DEFAULT_PERSPECTIVE: f64 = 300.0;
}

/// A shared, non-owning-friendly handle to a view.
///
/// Handles are cheap to clone; identity comparisons use [`ViewHandle::ptr_eq`].
#[derive(Debug, Clone)]
pub struct ViewHandle {
    inner: Rc<RefCell<ViewState>>,
}

impl ViewHandle {
    /// Create a detached root view.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewState {
                id: id.into(),
                style: ViewStyle::default(),
                perspective: ViewState::DEFAULT_PERSPECTIVE,
                measured_size: Size::default(),
                parent: None,
            })),
        }
    }

    /// Create a view parented under `parent`.
    pub fn new_child(id: impl Into<String>, parent: &ViewHandle) -> Self {
        let child = Self::new(id);
        child.inner.borrow_mut().parent = Some(Rc::downgrade(&parent.inner));
        child
    }

    pub fn id(&self) -> String {
        self.inner.borrow().id.clone()
    }

    /// The parent view, if still alive.
    pub fn parent(&self) -> Option<ViewHandle> {
        let state = self.inner.borrow();
        state
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| ViewHandle { inner })
    }

    /// Two handles refer to the same view.
    pub fn ptr_eq(&self, other: &ViewHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn state(&self) -> Ref<'_, ViewState> {
        self.inner.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, ViewState> {
        self.inner.borrow_mut()
    }

    /// Record the size assigned by layout.
    pub fn set_measured_size(&self, width: f64, height: f64) {
        self.inner.borrow_mut().measured_size = Size { width, height };
    }
}
