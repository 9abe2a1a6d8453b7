//! One-dimensional blend space.
//!
//! Samples are `(clip, position)` pairs kept sorted ascending by position. `update` brackets
//! the parameter between two neighbouring samples, samples both clips at one shared play
//! time and blends bone by bone. The shared clock wraps by the shorter of the two active
//! clips so differently sized cycles stay in phase.

use animbp_api_core::{blend_poses, Pose};
use log::{trace, warn};

use crate::clip::ClipRef;
use crate::sampling::wrap_time;

/// A clip placed on the parameter axis.
#[derive(Clone, Debug)]
pub struct BlendSample {
    pub clip: ClipRef,
    pub position: f32,
}

#[derive(Debug, Default)]
pub struct BlendSpace {
    samples: Vec<BlendSample>,
    min_range: f32,
    max_range: f32,
    current_parameter: f32,
    current_time: f32,
    previous_time: f32,
    last_alpha: f32,
    dominant: Option<ClipRef>,
    scratch_a: Pose,
    scratch_b: Pose,
}

impl BlendSpace {
    pub fn new() -> Self {
        Self::with_range(0.0, 100.0)
    }

    pub fn with_range(min: f32, max: f32) -> Self {
        let mut space = Self::default();
        space.set_parameter_range(min, max);
        space
    }

    /// Add a sample; `None` clips are rejected.
    pub fn add_sample(&mut self, clip: Option<ClipRef>, position: f32) -> bool {
        let Some(clip) = clip else {
            warn!("blend space: ignoring sample without a clip at position {position}");
            return false;
        };
        self.samples.push(BlendSample { clip, position });
        self.sort_samples();
        true
    }

    pub fn remove_sample(&mut self, index: usize) -> bool {
        if index >= self.samples.len() {
            return false;
        }
        self.samples.remove(index);
        if self.samples.is_empty() {
            self.dominant = None;
        }
        true
    }

    pub fn set_sample_position(&mut self, index: usize, position: f32) -> bool {
        match self.samples.get_mut(index) {
            Some(sample) => {
                sample.position = position;
                self.sort_samples();
                true
            }
            None => false,
        }
    }

    pub fn set_sample_animation(&mut self, index: usize, clip: ClipRef) -> bool {
        match self.samples.get_mut(index) {
            Some(sample) => {
                sample.clip = clip;
                self.sort_samples();
                true
            }
            None => false,
        }
    }

    pub fn clear_samples(&mut self) {
        self.samples.clear();
        self.dominant = None;
    }

    pub fn samples(&self) -> &[BlendSample] {
        &self.samples
    }

    pub fn sample(&self, index: usize) -> Option<&BlendSample> {
        self.samples.get(index)
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Set the authored parameter range; a reversed range is swapped.
    pub fn set_parameter_range(&mut self, min: f32, max: f32) {
        if min > max {
            self.min_range = max;
            self.max_range = min;
        } else {
            self.min_range = min;
            self.max_range = max;
        }
    }

    pub fn min_range(&self) -> f32 {
        self.min_range
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    pub fn set_parameter(&mut self, parameter: f32) {
        self.current_parameter = parameter;
    }

    pub fn current_parameter(&self) -> f32 {
        self.current_parameter
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn previous_time(&self) -> f32 {
        self.previous_time
    }

    /// Blend weight towards the upper sample from the last `update`.
    pub fn last_alpha(&self) -> f32 {
        self.last_alpha
    }

    /// The sample with the larger weight in the last `update`.
    pub fn dominant_clip(&self) -> Option<&ClipRef> {
        self.dominant.as_ref()
    }

    /// Restart the shared clock.
    pub fn reset_time(&mut self) {
        self.current_time = 0.0;
        self.previous_time = 0.0;
    }

    /// Play length of the first sample, 0 when empty.
    pub fn play_length(&self) -> f32 {
        self.samples
            .first()
            .map(|s| s.clip.play_length())
            .unwrap_or(0.0)
    }

    /// Bone count of the first sample, 0 when empty.
    pub fn num_bone_tracks(&self) -> usize {
        self.samples
            .first()
            .map(|s| s.clip.num_bone_tracks())
            .unwrap_or(0)
    }

    /// Bracketing sample indices and blend alpha for `parameter`.
    ///
    /// Outside the sampled range both indices point at the extreme sample with alpha 0.
    pub fn bracket(&self, parameter: f32) -> Option<(usize, usize, f32)> {
        let n = self.samples.len();
        if n == 0 {
            return None;
        }
        if n == 1 || parameter <= self.samples[0].position {
            return Some((0, 0, 0.0));
        }
        if parameter >= self.samples[n - 1].position {
            return Some((n - 1, n - 1, 0.0));
        }
        for i in 0..(n - 1) {
            let a = self.samples[i].position;
            let b = self.samples[i + 1].position;
            if parameter >= a && parameter <= b {
                let range = b - a;
                let alpha = if range > 0.0 {
                    (parameter - a) / range
                } else {
                    0.0
                };
                return Some((i, i + 1, alpha));
            }
        }
        Some((n - 1, n - 1, 0.0))
    }

    /// Store `parameter`, write the blended pose for the shared clock into `out`, then
    /// advance the clock by `dt`.
    ///
    /// With no samples `out` is left untouched.
    pub fn update(&mut self, parameter: f32, dt: f32, out: &mut Pose) {
        self.current_parameter = parameter;
        let Some((ia, ib, alpha)) = self.bracket(parameter) else {
            return;
        };

        if self.samples.len() == 1 {
            let clip = self.samples[0].clip.clone();
            clip.sample_pose(self.current_time, out);
            self.last_alpha = 0.0;
            self.dominant = Some(clip.clone());
            self.advance(dt, clip.play_length());
            return;
        }

        let clip_a = self.samples[ia].clip.clone();
        let clip_b = self.samples[ib].clip.clone();
        clip_a.sample_pose(self.current_time, &mut self.scratch_a);
        clip_b.sample_pose(self.current_time, &mut self.scratch_b);
        blend_poses(&self.scratch_a, &self.scratch_b, alpha, out);

        trace!(
            "blend space: parameter={parameter} samples=({ia},{ib}) alpha={alpha} time={}",
            self.current_time
        );

        self.last_alpha = alpha;
        self.dominant = Some(if alpha <= 0.5 {
            clip_a.clone()
        } else {
            clip_b.clone()
        });
        let wrap = clip_a.play_length().min(clip_b.play_length());
        self.advance(dt, wrap);
    }

    /// Pose-provider entry point: update with the stored parameter.
    pub fn evaluate_pose(&mut self, dt: f32, out: &mut Pose) {
        let parameter = self.current_parameter;
        self.update(parameter, dt, out);
    }

    fn advance(&mut self, dt: f32, wrap_length: f32) {
        self.previous_time = self.current_time;
        let next = self.current_time + dt;
        self.current_time = if wrap_length > 0.0 {
            wrap_time(next, wrap_length)
        } else {
            next
        };
    }

    fn sort_samples(&mut self) {
        self.samples.sort_by(|a, b| a.position.total_cmp(&b.position));
    }
}
