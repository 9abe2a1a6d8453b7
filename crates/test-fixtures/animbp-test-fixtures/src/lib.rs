use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: HashMap<String, String>,
    #[serde(rename = "node-graphs")]
    node_graphs: HashMap<String, NodeGraphEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeGraphEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        clips: Vec<String>,
    },
}

impl NodeGraphEntry {
    fn as_path(&self) -> &str {
        match self {
            NodeGraphEntry::Path(path) => path,
            NodeGraphEntry::Detailed { path, .. } => path,
        }
    }

    fn clips(&self) -> &[String] {
        match self {
            NodeGraphEntry::Path(_) => &[],
            NodeGraphEntry::Detailed { clips, .. } => clips,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Keyed clip fixtures (`AnimationData` JSON).
pub mod animations {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.animations.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        Ok(resolve_path(rel))
    }
}

/// Blueprint graph documents and the clip fixtures they reference.
pub mod node_graphs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.node_graphs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.node_graphs, "node graph", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.node_graphs, "node graph", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.node_graphs, "node graph", name)?;
        Ok(resolve_path(entry.as_path()))
    }

    /// Animation fixture names the graph expects to find in its asset registry.
    pub fn clip_keys(name: &str) -> Result<Vec<String>> {
        let entry = lookup(&MANIFEST.node_graphs, "node graph", name)?;
        Ok(entry.clips().to_vec())
    }
}
