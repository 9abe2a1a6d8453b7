//! Editable 1D blend space node.
//!
//! The node owns sample slots (clip or empty, position) and the [`BlendSpace`] built from
//! them. Pulling its `Output` pin pushes the `Parameter` input into that blend space, so the
//! node is stateful: it is meant to be pulled once per frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use animbp_animation_core::{AssetRegistry, BlendSpace, BlendSpaceDefaults, ClipRef, SharedBlendSpace};
use log::warn;
use serde::{Deserialize, Serialize};

/// One authored sample position; slots without a clip are skipped by `rebuild`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendSlot {
    #[serde(default)]
    pub clip_path: String,
    pub position: f32,
    #[serde(skip)]
    pub clip: Option<ClipRef>,
}

impl BlendSlot {
    pub fn empty(position: f32) -> Self {
        Self {
            clip_path: String::new(),
            position,
            clip: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlendSpaceNode {
    pub min_range: f32,
    pub max_range: f32,
    slots: Vec<BlendSlot>,
    #[serde(skip)]
    space: SharedBlendSpace,
    /// (frame, pulls in that frame)
    #[serde(skip)]
    pulls: Cell<(u64, u32)>,
}

impl Default for BlendSpaceNode {
    fn default() -> Self {
        Self::new(&BlendSpaceDefaults::default())
    }
}

impl Clone for BlendSpaceNode {
    /// Copies the authored slots into a fresh, independent blend space.
    fn clone(&self) -> Self {
        let mut node = Self {
            min_range: self.min_range,
            max_range: self.max_range,
            slots: self.slots.clone(),
            space: Rc::new(RefCell::new(BlendSpace::new())),
            pulls: Cell::new((0, 0)),
        };
        node.rebuild();
        node
    }
}

impl BlendSpaceNode {
    pub fn new(defaults: &BlendSpaceDefaults) -> Self {
        let mut node = Self {
            min_range: defaults.min_range,
            max_range: defaults.max_range.max(defaults.min_range),
            slots: defaults
                .sample_positions
                .iter()
                .map(|p| BlendSlot::empty(*p))
                .collect(),
            space: Rc::new(RefCell::new(BlendSpace::new())),
            pulls: Cell::new((0, 0)),
        };
        node.rebuild();
        node
    }

    pub fn slots(&self) -> &[BlendSlot] {
        &self.slots
    }

    /// The runtime blend space shared with every pose reference this node hands out.
    pub fn blend_space(&self) -> &SharedBlendSpace {
        &self.space
    }

    /// Add an empty slot at the middle of the range; returns its index.
    pub fn add_slot(&mut self) -> usize {
        let mid = (self.min_range + self.max_range) * 0.5;
        self.slots.push(BlendSlot::empty(mid));
        self.slots.len() - 1
    }

    /// Remove a slot; the last remaining slot cannot be removed.
    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.slots.len() <= 1 || index >= self.slots.len() {
            return false;
        }
        self.slots.remove(index);
        self.rebuild();
        true
    }

    pub fn set_slot_clip(&mut self, index: usize, clip: Option<ClipRef>) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        slot.clip_path = clip
            .as_ref()
            .map(|c| c.path().to_string())
            .unwrap_or_default();
        slot.clip = clip;
        self.rebuild();
        true
    }

    /// Move a slot; the position is clamped into the node's range.
    pub fn set_slot_position(&mut self, index: usize, position: f32) -> bool {
        let (min, max) = (self.min_range, self.max_range);
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        slot.position = position.clamp(min, max);
        self.rebuild();
        true
    }

    /// Set the range; `max` is raised to `min` when given below it.
    pub fn set_range(&mut self, min: f32, max: f32) {
        self.min_range = min;
        self.max_range = max.max(min);
        self.rebuild();
    }

    /// Re-resolve slot clips from their paths and rebuild.
    pub fn resolve_assets(&mut self, assets: &dyn AssetRegistry) {
        for slot in &mut self.slots {
            if slot.clip_path.is_empty() {
                slot.clip = None;
                continue;
            }
            slot.clip = assets.clip(&slot.clip_path);
            if slot.clip.is_none() {
                warn!("blend space node: clip '{}' is not registered", slot.clip_path);
            }
        }
        self.rebuild();
    }

    /// Clear the owned blend space and re-add every slot that has a clip.
    pub fn rebuild(&mut self) {
        let Ok(mut space) = self.space.try_borrow_mut() else {
            warn!("blend space node: blend space busy, rebuild skipped");
            return;
        };
        space.clear_samples();
        space.set_parameter_range(self.min_range, self.max_range);
        for slot in &self.slots {
            if slot.clip.is_some() {
                space.add_sample(slot.clip.clone(), slot.position);
            }
        }
    }

    /// Push a new parameter into the blend space.
    pub fn drive(&self, parameter: f32) {
        match self.space.try_borrow_mut() {
            Ok(mut space) => space.set_parameter(parameter),
            Err(_) => warn!("blend space node: blend space busy, parameter dropped"),
        }
    }

    /// Count a pull made during `frame`; returns how many pulls that frame has seen.
    pub(crate) fn note_pull(&self, frame: u64) -> u32 {
        let (last, count) = self.pulls.get();
        let count = if last == frame { count + 1 } else { 1 };
        self.pulls.set((frame, count));
        count
    }
}
