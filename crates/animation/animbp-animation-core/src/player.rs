//! Reference animation player.
//!
//! Holds one active play state plus an optional blend target and cross-fades between the
//! two while a blend is running. Hosts without their own skinning pipeline use this as the
//! [`AnimationDriver`] behind a state machine.

use animbp_api_core::{blend_poses, Pose};
use log::debug;

use crate::clip::ClipRef;
use crate::driver::AnimationDriver;
use crate::pose_source::PoseSource;
use crate::sampling::wrap_time;

/// Playback state for one pose source.
#[derive(Clone, Debug)]
pub struct PlayState {
    pub source: Option<PoseSource>,
    pub time: f32,
    pub play_rate: f32,
    pub looping: bool,
    pub playing: bool,
}

impl Default for PlayState {
    fn default() -> Self {
        Self {
            source: None,
            time: 0.0,
            play_rate: 1.0,
            looping: false,
            playing: false,
        }
    }
}

impl PlayState {
    fn start(source: Option<PoseSource>, looping: bool, play_rate: f32) -> Self {
        let playing = source.is_some();
        Self {
            source,
            time: 0.0,
            play_rate,
            looping,
            playing,
        }
    }

    /// Sample into `out`; returns false when there is nothing to sample.
    fn evaluate(&self, dt: f32, out: &mut Pose) -> bool {
        match &self.source {
            Some(source) => {
                let step = if self.playing { dt * self.play_rate } else { 0.0 };
                source.evaluate(self.time, step, out);
                true
            }
            None => false,
        }
    }

    fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(source) = &self.source else {
            return;
        };
        let length = source.play_length();
        let next = self.time + dt * self.play_rate;
        if self.looping {
            self.time = wrap_time(next, length);
        } else if length > 0.0 && next >= length {
            self.time = length;
            self.playing = false;
        } else if next < 0.0 {
            self.time = 0.0;
            self.playing = false;
        } else {
            self.time = next;
        }
    }
}

/// A running cross-fade towards `state`.
#[derive(Clone, Debug)]
pub struct BlendTarget {
    pub state: PlayState,
    pub remaining: f32,
    pub total: f32,
}

impl BlendTarget {
    /// Weight of the target in `[0, 1]`.
    pub fn weight(&self) -> f32 {
        if self.total <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.total).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct PosePlayer {
    current: PlayState,
    target: Option<BlendTarget>,
    /// Pose an interrupted cross-fade was showing; stands in for `current` until the
    /// new blend finishes.
    frozen: Option<Pose>,
    last: Pose,
    scratch_a: Pose,
    scratch_b: Pose,
}

impl PosePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bones: usize) -> Self {
        Self {
            last: Vec::with_capacity(bones),
            scratch_a: Vec::with_capacity(bones),
            scratch_b: Vec::with_capacity(bones),
            ..Self::default()
        }
    }

    pub fn current(&self) -> &PlayState {
        &self.current
    }

    pub fn blend_target(&self) -> Option<&BlendTarget> {
        self.target.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.current.playing
    }

    pub fn is_blending(&self) -> bool {
        self.target.is_some()
    }

    pub fn stop(&mut self) {
        self.current.playing = false;
        self.target = None;
        self.frozen = None;
    }

    /// Write this frame's pose into `out` and advance playback by `dt` seconds.
    pub fn update(&mut self, dt: f32, out: &mut Pose) {
        let has_current = match &self.frozen {
            Some(pose) => {
                self.scratch_a.clone_from(pose);
                !pose.is_empty()
            }
            None => self.current.evaluate(dt, &mut self.scratch_a),
        };

        match self.target.as_mut() {
            Some(target) => {
                // A blend space runs one clock; sampling it twice would advance it twice.
                let shared = self.frozen.is_none()
                    && has_current
                    && shares_clock(&self.current.source, &target.state.source);
                let has_target = if shared {
                    self.scratch_b.clone_from(&self.scratch_a);
                    true
                } else {
                    target.state.evaluate(dt, &mut self.scratch_b)
                };
                let weight = target.weight();
                match (has_current, has_target) {
                    (true, true) => blend_poses(&self.scratch_a, &self.scratch_b, weight, out),
                    (false, true) => out.clone_from(&self.scratch_b),
                    (true, false) => out.clone_from(&self.scratch_a),
                    (false, false) => out.clear(),
                }
                target.state.advance(dt);
                target.remaining -= dt;
            }
            None => {
                if has_current {
                    out.clone_from(&self.scratch_a);
                } else {
                    out.clear();
                }
            }
        }
        self.current.advance(dt);

        if self.target.as_ref().is_some_and(|t| t.remaining <= 0.0) {
            if let Some(target) = self.target.take() {
                debug!("pose player: blend finished");
                self.current = target.state;
                self.frozen = None;
            }
        }
        self.last.clone_from(out);
    }

    fn play(&mut self, source: Option<PoseSource>, looping: bool, play_rate: f32) {
        self.current = PlayState::start(source, looping, play_rate);
        self.target = None;
        self.frozen = None;
    }

    fn blend(
        &mut self,
        source: Option<PoseSource>,
        looping: bool,
        play_rate: f32,
        blend_time: f32,
    ) {
        if blend_time <= 0.0 || self.current.source.is_none() {
            self.play(source, looping, play_rate);
            return;
        }
        if let Some(running) = self.target.take() {
            debug!("pose player: blend interrupted, fading out from the last pose");
            self.current = running.state;
            self.frozen = Some(self.last.clone());
        }
        self.target = Some(BlendTarget {
            state: PlayState::start(source, looping, play_rate),
            remaining: blend_time,
            total: blend_time,
        });
    }
}

fn shares_clock(a: &Option<PoseSource>, b: &Option<PoseSource>) -> bool {
    match (a, b) {
        (Some(a @ PoseSource::BlendSpace(_)), Some(b)) => a.same_as(b),
        _ => false,
    }
}

impl AnimationDriver for PosePlayer {
    fn play_sequence(&mut self, clip: Option<ClipRef>, looping: bool, play_rate: f32) {
        self.play(clip.map(PoseSource::Sequence), looping, play_rate);
    }

    fn blend_to(&mut self, clip: Option<ClipRef>, looping: bool, play_rate: f32, blend_time: f32) {
        self.blend(clip.map(PoseSource::Sequence), looping, play_rate, blend_time);
    }

    fn play_pose_provider(&mut self, source: Option<PoseSource>, looping: bool, play_rate: f32) {
        self.play(source, looping, play_rate);
    }

    fn blend_to_pose_provider(
        &mut self,
        source: Option<PoseSource>,
        looping: bool,
        play_rate: f32,
        blend_time: f32,
    ) {
        self.blend(source, looping, play_rate, blend_time);
    }
}
