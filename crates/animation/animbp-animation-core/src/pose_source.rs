//! Anything a state can play: a single clip or a blend space.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use animbp_api_core::Pose;
use log::warn;

use crate::blend_space::BlendSpace;
use crate::clip::ClipRef;

/// Blend space shared between the graph node that drives it and the player that samples it.
pub type SharedBlendSpace = Rc<RefCell<BlendSpace>>;

#[derive(Clone, Debug)]
pub enum PoseSource {
    Sequence(ClipRef),
    BlendSpace(SharedBlendSpace),
}

impl PoseSource {
    pub fn play_length(&self) -> f32 {
        match self {
            PoseSource::Sequence(clip) => clip.play_length(),
            PoseSource::BlendSpace(space) => space
                .try_borrow()
                .map(|s| s.play_length())
                .unwrap_or(0.0),
        }
    }

    pub fn num_bone_tracks(&self) -> usize {
        match self {
            PoseSource::Sequence(clip) => clip.num_bone_tracks(),
            PoseSource::BlendSpace(space) => space
                .try_borrow()
                .map(|s| s.num_bone_tracks())
                .unwrap_or(0),
        }
    }

    /// The clip behind a sequence source.
    pub fn as_clip(&self) -> Option<&ClipRef> {
        match self {
            PoseSource::Sequence(clip) => Some(clip),
            PoseSource::BlendSpace(_) => None,
        }
    }

    /// Write the pose at `time` into `out`.
    ///
    /// Sequences sample at `time`; blend spaces run their own synchronized clock and
    /// advance it by `dt` using the parameter last pushed into them.
    pub fn evaluate(&self, time: f32, dt: f32, out: &mut Pose) {
        match self {
            PoseSource::Sequence(clip) => clip.sample_pose(time, out),
            PoseSource::BlendSpace(space) => match space.try_borrow_mut() {
                Ok(mut space) => space.evaluate_pose(dt, out),
                Err(_) => warn!("pose source: blend space already borrowed, skipping evaluation"),
            },
        }
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &PoseSource) -> bool {
        match (self, other) {
            (PoseSource::Sequence(a), PoseSource::Sequence(b)) => Arc::ptr_eq(a, b),
            (PoseSource::BlendSpace(a), PoseSource::BlendSpace(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<ClipRef> for PoseSource {
    fn from(clip: ClipRef) -> Self {
        PoseSource::Sequence(clip)
    }
}

impl From<SharedBlendSpace> for PoseSource {
    fn from(space: SharedBlendSpace) -> Self {
        PoseSource::BlendSpace(space)
    }
}
