//! Core configuration for animbp-animation-core.

use serde::{Deserialize, Serialize};

/// Sizing hints and authoring defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity hint for pose scratch buffers (bones).
    pub pose_capacity: usize,

    /// Defaults applied to freshly created blend-space nodes.
    pub blend_space: BlendSpaceDefaults,
}

/// Authoring defaults for a new 1D blend space.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlendSpaceDefaults {
    pub min_range: f32,
    pub max_range: f32,
    /// Positions of the empty sample slots a new node starts with.
    pub sample_positions: Vec<f32>,
}

impl Default for BlendSpaceDefaults {
    fn default() -> Self {
        Self {
            min_range: 0.0,
            max_range: 200.0,
            sample_positions: vec![0.0, 100.0, 200.0],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pose_capacity: 64,
            blend_space: BlendSpaceDefaults::default(),
        }
    }
}
