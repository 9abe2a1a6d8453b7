//! Keyed clip asset model.
//!
//! A clip stores one track per bone; every track holds keys at normalized stamps in
//! `[0, 1]` over the clip duration. This is the concrete asset the importers hand over;
//! the runtime only talks to it through [`AnimationClip`](crate::clip::AnimationClip).

use animbp_api_core::Transform;
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

fn default_frame_rate() -> f32 {
    30.0
}

/// A single key in normalized time `[0, 1]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneKey {
    pub stamp: f32,
    pub transform: Transform,
}

/// Keys for one bone, in bone-index order within the clip.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneTrack {
    pub name: String,
    pub keys: Vec<BoneKey>,
}

/// Stored clip: name, asset path, duration and bone tracks.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationData {
    pub name: String,
    /// Asset path the registry resolves this clip by.
    #[serde(default)]
    pub path: String,
    /// Duration in milliseconds (authoritative for mapping normalized stamps to seconds).
    #[serde(rename = "duration")]
    pub duration_ms: u32,
    #[serde(default = "default_frame_rate", rename = "frameRate")]
    pub frame_rate: f32,
    pub tracks: Vec<BoneTrack>,
}

impl AnimationData {
    /// Parse a clip from JSON and validate it.
    pub fn from_json(text: &str) -> Result<Self, AnimationError> {
        let data: AnimationData = serde_json::from_str(text)?;
        data.validate_basic()?;
        Ok(data)
    }

    /// Clip length in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.duration_ms as f32 / 1000.0
    }

    /// Validate basic invariants (monotonic stamps in [0,1], non-zero duration).
    pub fn validate_basic(&self) -> Result<(), AnimationError> {
        if self.duration_ms == 0 {
            return Err(AnimationError::EmptyDuration {
                name: self.name.clone(),
            });
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(AnimationError::InvalidFrameRate {
                name: self.name.clone(),
                frame_rate: self.frame_rate,
            });
        }
        for track in &self.tracks {
            let mut last = -f32::INFINITY;
            for key in &track.keys {
                if !key.stamp.is_finite() || key.stamp < 0.0 || key.stamp > 1.0 {
                    return Err(AnimationError::StampOutOfRange {
                        bone: track.name.clone(),
                        stamp: key.stamp,
                    });
                }
                if key.stamp < last {
                    return Err(AnimationError::UnsortedKeys {
                        bone: track.name.clone(),
                    });
                }
                last = key.stamp;
            }
        }
        Ok(())
    }
}
