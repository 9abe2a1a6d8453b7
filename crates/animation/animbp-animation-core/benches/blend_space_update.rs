use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use animbp_animation_core::{
    AnimationData, BlendSpace, BoneKey, BoneTrack, ClipRef, Pose, Transform,
};

fn mk_clip(name: &str, seconds: f32, bones: usize, offset: f32) -> ClipRef {
    let tracks = (0..bones)
        .map(|b| BoneTrack {
            name: format!("bone_{b}"),
            keys: (0..=8)
                .map(|k| {
                    let stamp = k as f32 / 8.0;
                    BoneKey {
                        stamp,
                        transform: Transform::from_translation([offset + stamp, b as f32, 0.0]),
                    }
                })
                .collect(),
        })
        .collect();
    Arc::new(AnimationData {
        name: name.to_string(),
        path: format!("clips/{name}"),
        duration_ms: (seconds * 1000.0) as u32,
        frame_rate: 30.0,
        tracks,
    })
}

fn blend_space_update(c: &mut Criterion) {
    let mut space = BlendSpace::with_range(0.0, 200.0);
    space.add_sample(Some(mk_clip("idle", 2.0, 64, 0.0)), 0.0);
    space.add_sample(Some(mk_clip("walk", 1.2, 64, 1.0)), 100.0);
    space.add_sample(Some(mk_clip("run", 0.8, 64, 2.0)), 200.0);
    let mut pose = Pose::with_capacity(64);
    let mut parameter = 0.0f32;

    c.bench_function("blend_space_update_64_bones", |b| {
        b.iter(|| {
            parameter = (parameter + 7.0) % 200.0;
            space.update(black_box(parameter), black_box(1.0 / 60.0), &mut pose);
            black_box(&pose);
        })
    });
}

criterion_group!(benches, blend_space_update);
criterion_main!(benches);
