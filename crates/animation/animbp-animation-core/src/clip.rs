//! The opaque clip contract consumed by blend spaces and players.

use std::fmt::Debug;
use std::sync::Arc;

use animbp_api_core::Pose;

use crate::data::AnimationData;
use crate::sampling::sample_pose;

/// A playable animation clip as handed over by the asset importers.
pub trait AnimationClip: Debug {
    fn name(&self) -> &str;
    /// Asset path the clip is registered under.
    fn path(&self) -> &str;
    /// Length in seconds.
    fn play_length(&self) -> f32;
    fn frame_rate(&self) -> f32;
    fn num_bone_tracks(&self) -> usize;
    /// Write the local-space pose at `time` seconds into `out`.
    fn sample_pose(&self, time: f32, out: &mut Pose);
}

/// Shared, immutable clip handle.
pub type ClipRef = Arc<dyn AnimationClip>;

/// Identity comparison for clip handles.
pub fn same_clip(a: &ClipRef, b: &ClipRef) -> bool {
    Arc::ptr_eq(a, b)
}

impl AnimationClip for AnimationData {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn play_length(&self) -> f32 {
        self.duration_seconds()
    }

    fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    fn num_bone_tracks(&self) -> usize {
        self.tracks.len()
    }

    fn sample_pose(&self, time: f32, out: &mut Pose) {
        sample_pose(self, time, out);
    }
}
