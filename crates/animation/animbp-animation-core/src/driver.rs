//! Playback callbacks a state machine issues on state entry and transitions.

use crate::clip::ClipRef;
use crate::pose_source::PoseSource;

/// The owning animation instance as seen by a state machine.
///
/// `None` sources are passed through; implementations decide whether that stops playback.
pub trait AnimationDriver {
    fn play_sequence(&mut self, clip: Option<ClipRef>, looping: bool, play_rate: f32);

    fn blend_to(&mut self, clip: Option<ClipRef>, looping: bool, play_rate: f32, blend_time: f32);

    fn play_pose_provider(&mut self, source: Option<PoseSource>, looping: bool, play_rate: f32);

    fn blend_to_pose_provider(
        &mut self,
        source: Option<PoseSource>,
        looping: bool,
        play_rate: f32,
        blend_time: f32,
    );
}
