//! Tagged runtime values and typed extraction.

use animbp_animation_core::{AssetRegistry, PoseSource};
use log::warn;

use crate::types::PinCategory;

/// Result of pulling a pin. Exactly one kind is active; a `Pose(None)` is a valid, empty
/// pose reference.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    Pose(Option<PoseSource>),
}

impl Value {
    /// Zero value for `category`. Exec pins carry no data and map to `Bool(false)`.
    pub fn zero(category: PinCategory) -> Self {
        match category {
            PinCategory::Int => Value::Int(0),
            PinCategory::Float => Value::Float(0.0),
            PinCategory::Bool | PinCategory::Exec => Value::Bool(false),
            PinCategory::Pose => Value::Pose(None),
        }
    }

    pub fn category(&self) -> PinCategory {
        match self {
            Value::Int(_) => PinCategory::Int,
            Value::Float(_) => PinCategory::Float,
            Value::Bool(_) => PinCategory::Bool,
            Value::Pose(_) => PinCategory::Pose,
        }
    }

    /// Parse a pin's textual default into a value of `category`.
    pub fn parse(category: PinCategory, text: &str, assets: &dyn AssetRegistry) -> Self {
        match category {
            PinCategory::Int => Value::Int(i32::parse_default(text, assets)),
            PinCategory::Float => Value::Float(f32::parse_default(text, assets)),
            PinCategory::Bool | PinCategory::Exec => Value::Bool(bool::parse_default(text, assets)),
            PinCategory::Pose => Value::Pose(Option::<PoseSource>::parse_default(text, assets)),
        }
    }

    pub fn as_int(&self) -> i32 {
        i32::from_value(self.clone())
    }

    pub fn as_float(&self) -> f32 {
        f32::from_value(self.clone())
    }

    pub fn as_bool(&self) -> bool {
        bool::from_value(self.clone())
    }

    pub fn into_pose(self) -> Option<PoseSource> {
        Option::<PoseSource>::from_value(self)
    }
}

fn mismatch(expected: PinCategory, got: &Value) {
    debug_assert!(
        false,
        "value type mismatch: expected {expected:?}, got {:?}",
        got.category()
    );
}

/// Types a pin can be read as.
///
/// Reading the wrong kind trips a debug assertion and yields the zero value in release builds.
pub trait FromValue: Sized + Default {
    const CATEGORY: PinCategory;

    fn from_value(value: Value) -> Self;

    /// Interpret an unlinked pin's textual default.
    fn parse_default(text: &str, assets: &dyn AssetRegistry) -> Self;
}

impl FromValue for i32 {
    const CATEGORY: PinCategory = PinCategory::Int;

    fn from_value(value: Value) -> Self {
        match value {
            Value::Int(v) => v,
            other => {
                mismatch(Self::CATEGORY, &other);
                0
            }
        }
    }

    fn parse_default(text: &str, _assets: &dyn AssetRegistry) -> Self {
        text.trim().parse().unwrap_or(0)
    }
}

impl FromValue for f32 {
    const CATEGORY: PinCategory = PinCategory::Float;

    fn from_value(value: Value) -> Self {
        match value {
            Value::Float(v) => v,
            other => {
                mismatch(Self::CATEGORY, &other);
                0.0
            }
        }
    }

    fn parse_default(text: &str, _assets: &dyn AssetRegistry) -> Self {
        text.trim().parse().unwrap_or(0.0)
    }
}

impl FromValue for bool {
    const CATEGORY: PinCategory = PinCategory::Bool;

    fn from_value(value: Value) -> Self {
        match value {
            Value::Bool(v) => v,
            other => {
                mismatch(Self::CATEGORY, &other);
                false
            }
        }
    }

    fn parse_default(text: &str, _assets: &dyn AssetRegistry) -> Self {
        text == "true"
    }
}

impl FromValue for Option<PoseSource> {
    const CATEGORY: PinCategory = PinCategory::Pose;

    fn from_value(value: Value) -> Self {
        match value {
            Value::Pose(v) => v,
            other => {
                mismatch(Self::CATEGORY, &other);
                None
            }
        }
    }

    /// The default text of a pose pin is a clip asset path.
    fn parse_default(text: &str, assets: &dyn AssetRegistry) -> Self {
        if text.is_empty() {
            return None;
        }
        match assets.clip(text) {
            Some(clip) => Some(PoseSource::Sequence(clip)),
            None => {
                warn!("pose default '{text}' does not name a registered clip");
                None
            }
        }
    }
}
