//! Error types for clip assets.

/// Validation and loading failures for [`AnimationData`](crate::data::AnimationData).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    /// Clip duration is zero.
    #[error("Animation '{name}' must have a duration > 0 ms")]
    EmptyDuration { name: String },

    /// Key stamp outside [0, 1] or not finite.
    #[error("Key stamp {stamp} out of range for bone '{bone}'")]
    StampOutOfRange { bone: String, stamp: f32 },

    /// Key stamps going backwards.
    #[error("Key stamps must be non-decreasing for bone '{bone}'")]
    UnsortedKeys { bone: String },

    /// Frame rate that cannot describe playback.
    #[error("Invalid frame rate {frame_rate} for animation '{name}'")]
    InvalidFrameRate { name: String, frame_rate: f32 },

    /// JSON payload that does not match the clip schema.
    #[error("Failed to parse animation: {reason}")]
    Parse { reason: String },
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        AnimationError::Parse {
            reason: err.to_string(),
        }
    }
}
