//! Property goals and value resolution
//!
//! A tween is described by a [`Properties`] map from property name to goal.
//! Goals are absolute numbers, strings (`"100px"`, relative `"+=10"` /
//! `"-=10"`), or for composite properties a function-call list such as
//! `"translateX(100px) rotate(45deg)"`.

use indexmap::IndexMap;
use luma_core::syntax::{function_calls, leading_number};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Goal value for one property
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
    /// Explicit channel goals for a composite property
    Channels(IndexMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Build a channel map for a composite property
    pub fn channels<K, V, I>(channels: I) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        PropertyValue::Channels(
            channels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Channels(channels) => {
                for (i, (name, goal)) in channels.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{name}({goal})")?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered map of property goals
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: IndexMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add or replace a goal
    pub fn with(mut self, property: impl Into<String>, goal: impl Into<PropertyValue>) -> Self {
        self.insert(property, goal);
        self
    }

    pub fn insert(&mut self, property: impl Into<String>, goal: impl Into<PropertyValue>) {
        self.entries.insert(property.into(), goal.into());
    }

    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.entries.get(property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolve a goal against the property's current value.
///
/// Non-numeric goals resolve to `NaN`, which then flows through
/// interpolation into the written style.
pub fn resolve_goal(goal: &PropertyValue, current: f64) -> f64 {
    match goal {
        PropertyValue::Number(n) => *n,
        PropertyValue::Text(text) => {
            if let Some(delta) = text.strip_prefix("+=") {
                current + leading_number(delta)
            } else if let Some(delta) = text.strip_prefix("-=") {
                current - leading_number(delta)
            } else {
                leading_number(text)
            }
        }
        PropertyValue::Channels(_) => f64::NAN,
    }
}

/// Split a composite goal into per-channel goals.
///
/// Malformed function-call syntax yields no channels. A later channel with
/// the same name replaces the goal of an earlier one.
pub fn composite_channels(goal: &PropertyValue) -> IndexMap<String, PropertyValue> {
    match goal {
        PropertyValue::Text(text) => function_calls(text)
            .into_iter()
            .map(|call| (call.name.to_string(), PropertyValue::from(call.args)))
            .collect(),
        PropertyValue::Channels(channels) => channels.clone(),
        PropertyValue::Number(_) => IndexMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_goals() {
        assert_eq!(resolve_goal(&PropertyValue::from(42.0), 5.0), 42.0);
        assert_eq!(resolve_goal(&PropertyValue::from("100px"), 5.0), 100.0);
        assert_eq!(resolve_goal(&PropertyValue::from("-3"), 5.0), -3.0);
    }

    #[test]
    fn test_relative_goals() {
        assert_eq!(resolve_goal(&PropertyValue::from("+=10"), 5.0), 15.0);
        assert_eq!(resolve_goal(&PropertyValue::from("-=10"), 5.0), -5.0);
        assert_eq!(resolve_goal(&PropertyValue::from("+=100px"), 0.0), 100.0);
    }

    #[test]
    fn test_non_numeric_goal_is_nan() {
        assert!(resolve_goal(&PropertyValue::from("auto"), 5.0).is_nan());
        assert!(resolve_goal(&PropertyValue::from("+=wide"), 5.0).is_nan());
    }

    #[test]
    fn test_composite_channels_from_text() {
        let channels = composite_channels(&PropertyValue::from("translateX(+=100px) scale(2)"));
        let names: Vec<&str> = channels.keys().map(String::as_str).collect();

        assert_eq!(names, vec!["translateX", "scale"]);
        assert_eq!(channels["translateX"], PropertyValue::from("+=100px"));
    }

    #[test]
    fn test_composite_duplicate_channel_keeps_first_position() {
        let channels =
            composite_channels(&PropertyValue::from("rotate(10deg) scale(2) rotate(20deg)"));
        let names: Vec<&str> = channels.keys().map(String::as_str).collect();

        assert_eq!(names, vec!["rotate", "scale"]);
        assert_eq!(channels["rotate"], PropertyValue::from("20deg"));
    }

    #[test]
    fn test_malformed_composite_has_no_channels() {
        assert!(composite_channels(&PropertyValue::from("translateX 10px")).is_empty());
        assert!(composite_channels(&PropertyValue::from(3.0)).is_empty());
    }

    #[test]
    fn test_explicit_channels() {
        let goal = PropertyValue::channels([("translateY", 20.0), ("rotate", 90.0)]);
        assert_eq!(composite_channels(&goal).len(), 2);
        assert_eq!(goal.to_string(), "translateY(20) rotate(90)");
    }

    #[test]
    fn test_properties_keep_insertion_order() {
        let props = Properties::new()
            .with("width", 100.0)
            .with("opacity", 1.0)
            .with("left", "+=5");
        let keys: Vec<&str> = props.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(keys, vec!["width", "opacity", "left"]);
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_properties_from_iter() {
        let props: Properties = [("opacity", 1.0), ("top", 10.0)].into_iter().collect();
        assert_eq!(props.get("top"), Some(&PropertyValue::Number(10.0)));
    }
}
