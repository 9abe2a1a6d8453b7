//! Blending utilities for bone transforms and poses.
//! - f32 linear interpolation for translation and scale components
//! - quaternion slerp (shortest-arc)
//! - transform TRS blending (pos/scale lerp, rot slerp)
//! - per-bone pose blending over the common bone count

use crate::transform::{Pose, Transform};

/// Linear interpolation for f32
#[inline]
pub fn lerp_f(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Lerp for fixed-size arrays
fn lerp_array<const N: usize>(a: &[f32; N], b: &[f32; N], t: f32) -> [f32; N] {
    let mut out = [0.0f32; N];
    for i in 0..N {
        out[i] = lerp_f(a[i], b[i], t);
    }
    out
}

/// Normalize a quaternion represented as [x,y,z,w]
fn normalize_quat(q: [f32; 4]) -> [f32; 4] {
    let mag = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if mag == 0.0 {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        [q[0] / mag, q[1] / mag, q[2] / mag, q[3] / mag]
    }
}

/// Slerp between two unit quaternions q1, q2
pub fn slerp(q1: [f32; 4], q2: [f32; 4], t: f32) -> [f32; 4] {
    let qa = normalize_quat(q1);
    let mut qb = normalize_quat(q2);

    let mut dot = qa[0] * qb[0] + qa[1] * qb[1] + qa[2] * qb[2] + qa[3] * qb[3];

    // Negative dot: flip one side so the blend takes the short arc.
    if dot < 0.0 {
        qb = [-qb[0], -qb[1], -qb[2], -qb[3]];
        dot = -dot;
    }

    // Nearly parallel: nlerp is stable and indistinguishable.
    const DOT_THRESHOLD: f32 = 0.9995;
    if dot > DOT_THRESHOLD {
        return normalize_quat(lerp_array(&qa, &qb, t));
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();

    let s0 = (theta_0 - theta).sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;

    [
        s0 * qa[0] + s1 * qb[0],
        s0 * qa[1] + s1 * qb[1],
        s0 * qa[2] + s1 * qb[2],
        s0 * qa[3] + s1 * qb[3],
    ]
}

/// Blend two bone transforms: translation and scale lerp, rotation slerp.
pub fn blend_transforms(a: &Transform, b: &Transform, t: f32) -> Transform {
    Transform {
        translation: lerp_array(&a.translation, &b.translation, t),
        rotation: slerp(a.rotation, b.rotation, t),
        scale: lerp_array(&a.scale, &b.scale, t),
    }
}

/// Blend `a` towards `b` by `alpha`, bone by bone, into `out`.
///
/// The output holds `min(a.len(), b.len())` bones; extra bones on either side are dropped.
pub fn blend_poses(a: &[Transform], b: &[Transform], alpha: f32, out: &mut Pose) {
    let bones = a.len().min(b.len());
    out.clear();
    out.extend(
        a.iter()
            .zip(b.iter())
            .take(bones)
            .map(|(ta, tb)| blend_transforms(ta, tb, alpha)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
    }

    #[test]
    fn blend_translation_quarter() {
        let a = Transform::from_translation([0.0, 0.0, 0.0]);
        let b = Transform::from_translation([4.0, 0.0, 0.0]);
        let r = blend_transforms(&a, &b, 0.25);
        assert_eq!(r.translation, [1.0, 0.0, 0.0]);
        assert_eq!(r.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn slerp_halfway_about_z() {
        // 0 and 90 degrees about Z; halfway is 45 degrees.
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let q = slerp([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, h, h], 0.5);
        let expected = (std::f32::consts::PI / 8.0).sin();
        approx(q[2], expected);
        approx(q[3], (std::f32::consts::PI / 8.0).cos());
    }

    #[test]
    fn slerp_takes_short_arc() {
        let q = slerp([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0, -1.0], 0.5);
        approx(q[3].abs(), 1.0);
    }

    #[test]
    fn blend_poses_truncates_to_common_bones() {
        let a = vec![Transform::IDENTITY; 3];
        let b = vec![Transform::from_translation([2.0, 2.0, 2.0]); 2];
        let mut out = Pose::new();
        blend_poses(&a, &b, 0.5, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].translation, [1.0, 1.0, 1.0]);
    }
}
