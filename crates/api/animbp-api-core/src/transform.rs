//! Bone-local transforms and poses.

use serde::{Deserialize, Serialize};

/// Translation, rotation (quaternion `[x, y, z, w]`) and scale of a single bone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Identity transform moved to `translation`.
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Identity transform rotated by `rotation`.
    pub fn from_rotation(rotation: [f32; 4]) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Local-space pose: one transform per bone track, indexed by track order.
pub type Pose = Vec<Transform>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_identity() {
        let t: Transform = serde_json::from_str(r#"{ "translation": [1.0, 2.0, 3.0] }"#)
            .expect("transform should parse");
        assert_eq!(t.translation, [1.0, 2.0, 3.0]);
        assert_eq!(t.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(t.scale, [1.0, 1.0, 1.0]);
    }
}
