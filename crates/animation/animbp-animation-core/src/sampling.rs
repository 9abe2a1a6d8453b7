//! Bone-track sampling for keyed clips.
//!
//! Model:
//! - Each track has ordered keys with normalized stamps in [0,1].
//! - Between two keys, translation and scale lerp and rotation slerps.
//! - Before the first key / after the last key the boundary key is held.

use animbp_api_core::{blend_transforms, Pose, Transform};

use crate::data::{AnimationData, BoneKey, BoneTrack};

/// Find the segment [i, i+1] that contains normalized time u, and return (i, i+1, local_t),
/// where local_t is normalized to [0, 1] between keys[i].stamp .. keys[i+1].stamp.
/// Edge cases:
/// - If u <= first.stamp, returns (0, 0, 0) and caller should pick keys[0].
/// - If u >= last.stamp, returns (last, last, 0) and caller should pick keys[last].
fn find_segment(keys: &[BoneKey], u: f32) -> (usize, usize, f32) {
    let n = keys.len();
    if n == 0 {
        return (0, 0, 0.0);
    }
    if n == 1 || u <= keys[0].stamp {
        return (0, 0, 0.0);
    }
    if u >= keys[n - 1].stamp {
        return (n - 1, n - 1, 0.0);
    }
    for i in 0..(n - 1) {
        let t0 = keys[i].stamp;
        let t1 = keys[i + 1].stamp;
        if u >= t0 && u <= t1 {
            let denom = (t1 - t0).max(f32::EPSILON);
            let lt = (u - t0) / denom;
            return (i, i + 1, lt.clamp(0.0, 1.0));
        }
    }
    (n - 1, n - 1, 0.0)
}

/// Sample a single bone track at normalized time u in [0,1].
pub fn sample_bone_track(track: &BoneTrack, u: f32) -> Transform {
    let keys = &track.keys;
    match keys.len() {
        // No keys: bind pose (fail-soft).
        0 => Transform::IDENTITY,
        1 => keys[0].transform,
        _ => {
            let (i0, i1, lt) = find_segment(keys, u.clamp(0.0, 1.0));
            if i0 == i1 {
                return keys[i0].transform;
            }
            blend_transforms(&keys[i0].transform, &keys[i1].transform, lt)
        }
    }
}

/// Wrap `time` into `[0, length)`; non-positive lengths map to 0.
pub fn wrap_time(time: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let m = time % length;
    if m < 0.0 {
        m + length
    } else {
        m
    }
}

/// Sample every bone of `clip` at `time` seconds into `out`.
///
/// Times outside `[0, length]` wrap into `[0, length)`; exactly `length` samples the last key.
pub fn sample_pose(clip: &AnimationData, time: f32, out: &mut Pose) {
    out.clear();
    let length = clip.duration_seconds();
    if length <= 0.0 {
        out.resize(clip.tracks.len(), Transform::IDENTITY);
        return;
    }
    let time = if (0.0..=length).contains(&time) {
        time
    } else {
        wrap_time(time, length)
    };
    let u = time / length;
    out.extend(clip.tracks.iter().map(|track| sample_bone_track(track, u)));
}
