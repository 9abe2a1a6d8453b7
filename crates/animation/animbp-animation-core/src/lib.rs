//! Animation Blueprint Animation Core
//!
//! Clip assets and their registry, one-dimensional blend spaces, pose sources, and a
//! reference player implementing the playback callbacks a compiled state machine issues.

pub mod assets;
pub mod blend_space;
pub mod clip;
pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod player;
pub mod pose_source;
pub mod sampling;

// Re-exports for consumers (graph runtime, hosts)
pub use animbp_api_core::{Pose, Transform};
pub use assets::{AssetRegistry, ClipLibrary};
pub use blend_space::{BlendSample, BlendSpace};
pub use clip::{same_clip, AnimationClip, ClipRef};
pub use config::{BlendSpaceDefaults, Config};
pub use data::{AnimationData, BoneKey, BoneTrack};
pub use driver::AnimationDriver;
pub use error::AnimationError;
pub use player::{BlendTarget, PlayState, PosePlayer};
pub use pose_source::{PoseSource, SharedBlendSpace};
pub use sampling::{sample_bone_track, wrap_time};
