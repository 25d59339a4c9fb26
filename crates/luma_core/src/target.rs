//! Style targets
//!
//! A target is the visual object a tween writes into. The engine only ever
//! sees it through [`AnimationTarget`], shared as a [`TargetRef`].

use crate::syntax::{function_calls, leading_number};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a target. Tweens reference targets, never own them.
pub type TargetRef = Rc<dyn AnimationTarget>;

/// Read/write access to a style-bearing visual object
pub trait AnimationTarget {
    /// Short name used in diagnostics
    fn label(&self) -> &str {
        "target"
    }

    /// Current numeric value of `property` (0 when unset or non-numeric)
    fn computed_value(&self, property: &str) -> f64;

    /// Current value of one channel of a composite property such as
    /// `transform`. Targets that cannot decompose the composite value may
    /// return a fixed default.
    fn channel_value(&self, bundle: &str, channel: &str) -> f64 {
        let _ = (bundle, channel);
        0.0
    }

    /// Write a formatted value (unit included) to `property`
    fn write_style(&self, property: &str, value: &str);
}

/// Identity check for shared targets
pub fn same_target(a: &TargetRef, b: &TargetRef) -> bool {
    std::ptr::eq(
        Rc::as_ptr(a) as *const (),
        Rc::as_ptr(b) as *const (),
    )
}

/// A single recorded style write
#[derive(Clone, Debug, PartialEq)]
pub struct StyleWrite {
    pub property: String,
    pub value: String,
}

/// Identity value of a composite channel that has never been written
fn channel_identity(channel: &str) -> f64 {
    if channel.contains("scale") {
        1.0
    } else {
        0.0
    }
}

/// In-memory style-bearing element.
///
/// Behaves like a retained DOM node: seeded computed values and inline
/// styles that override them once written. Elements built with
/// [`Element::recording`] also keep a log of every write in order.
#[derive(Debug, Default)]
pub struct Element {
    label: String,
    computed: RefCell<FxHashMap<String, f64>>,
    inline: RefCell<FxHashMap<String, String>>,
    recording: bool,
    writes: RefCell<Vec<StyleWrite>>,
}

impl Element {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// An element that logs every write
    pub fn recording(label: impl Into<String>) -> Self {
        Self {
            recording: true,
            ..Self::new(label)
        }
    }

    /// Builder: seed a computed value
    pub fn with_value(self, property: impl Into<String>, value: f64) -> Self {
        self.computed.borrow_mut().insert(property.into(), value);
        self
    }

    /// Builder: seed an inline style string
    pub fn with_style(self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let property = property.into();
        let value = value.into();
        self.computed
            .borrow_mut()
            .insert(property.clone(), leading_number(&value));
        self.inline.borrow_mut().insert(property, value);
        self
    }

    /// Overwrite a computed value without recording a write
    pub fn set_computed(&self, property: impl Into<String>, value: f64) {
        self.computed.borrow_mut().insert(property.into(), value);
    }

    /// Inline style string last written to `property`
    pub fn style(&self, property: &str) -> Option<String> {
        self.inline.borrow().get(property).cloned()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Every logged write in the order it happened
    pub fn writes(&self) -> Vec<StyleWrite> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl AnimationTarget for Element {
    fn label(&self) -> &str {
        &self.label
    }

    fn computed_value(&self, property: &str) -> f64 {
        match self.computed.borrow().get(property) {
            Some(value) if !value.is_nan() => *value,
            _ => 0.0,
        }
    }

    fn channel_value(&self, bundle: &str, channel: &str) -> f64 {
        let inline = self.inline.borrow();
        let value = inline.get(bundle).and_then(|composite| {
            function_calls(composite)
                .into_iter()
                .rev()
                .find(|call| call.name == channel)
                .map(|call| leading_number(call.args))
        });

        match value {
            Some(value) if !value.is_nan() => value,
            _ => channel_identity(channel),
        }
    }

    fn write_style(&self, property: &str, value: &str) {
        self.computed
            .borrow_mut()
            .insert(property.to_string(), leading_number(value));
        self.inline
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        if self.recording {
            self.writes.borrow_mut().push(StyleWrite {
                property: property.to_string(),
                value: value.to_string(),
            });
        }
    }
}
