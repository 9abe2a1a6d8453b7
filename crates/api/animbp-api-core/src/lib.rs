//! animbp-api-core: pose vocabulary shared by the animation and node-graph crates.
//!
//! A [`Pose`] is a per-bone array of local-space [`Transform`]s. The [`blend`] module holds
//! the interpolation primitives every pose consumer uses.

pub mod blend;
pub mod transform;

pub use blend::{blend_poses, blend_transforms, lerp_f, slerp};
pub use transform::{Pose, Transform};
