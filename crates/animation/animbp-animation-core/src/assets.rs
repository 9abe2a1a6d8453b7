//! Path-keyed clip lookup.

use std::sync::Arc;

use hashbrown::HashMap;
use log::debug;

use crate::clip::ClipRef;
use crate::data::AnimationData;
use crate::error::AnimationError;

/// Resolves asset paths to clips. Passed explicitly to whoever needs lookups.
pub trait AssetRegistry {
    fn clip(&self, path: &str) -> Option<ClipRef>;
    /// Every registered clip, in no particular order.
    fn clips(&self) -> Vec<ClipRef>;
}

/// In-memory registry.
#[derive(Debug, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, ClipRef>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `clip` under its own path, replacing any previous entry.
    pub fn insert(&mut self, clip: ClipRef) -> Option<ClipRef> {
        let path = clip.path().to_string();
        debug!("registering clip '{}' at '{}'", clip.name(), path);
        self.clips.insert(path, clip)
    }

    /// Validate and register keyed clip data; returns the shared handle.
    pub fn insert_data(&mut self, data: AnimationData) -> Result<ClipRef, AnimationError> {
        data.validate_basic()?;
        let clip: ClipRef = Arc::new(data);
        self.insert(clip.clone());
        Ok(clip)
    }

    /// Parse a clip from JSON and register it.
    pub fn load_json(&mut self, text: &str) -> Result<ClipRef, AnimationError> {
        let data = AnimationData::from_json(text)?;
        self.insert_data(data)
    }

    pub fn remove(&mut self, path: &str) -> Option<ClipRef> {
        self.clips.remove(path)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl AssetRegistry for ClipLibrary {
    fn clip(&self, path: &str) -> Option<ClipRef> {
        self.clips.get(path).cloned()
    }

    fn clips(&self) -> Vec<ClipRef> {
        self.clips.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BoneTrack;

    fn data(path: &str) -> AnimationData {
        AnimationData {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            duration_ms: 1000,
            frame_rate: 30.0,
            tracks: vec![BoneTrack {
                name: "root".into(),
                keys: Vec::new(),
            }],
        }
    }

    #[test]
    fn resolves_by_path() {
        let mut lib = ClipLibrary::new();
        let idle = lib.insert_data(data("clips/idle")).expect("valid clip");
        let found = lib.clip("clips/idle").expect("registered");
        assert!(crate::clip::same_clip(&idle, &found));
        assert!(lib.clip("clips/missing").is_none());
        assert_eq!(lib.clips().len(), 1);
    }

    #[test]
    fn rejects_invalid_data() {
        let mut lib = ClipLibrary::new();
        let mut bad = data("clips/bad");
        bad.duration_ms = 0;
        assert!(lib.insert_data(bad).is_err());
        assert!(lib.is_empty());
    }
}
