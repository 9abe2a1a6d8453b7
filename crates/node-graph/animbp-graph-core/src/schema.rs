use animbp_animation_core::Config;
use serde::Serialize;

use crate::nodes::NodeKind;
use crate::types::{PinCategory, PinDirection};

#[derive(Debug, Clone, Serialize)]
pub struct PinSpec {
    pub name: String,
    pub direction: PinDirection,
    pub category: PinCategory,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSignature {
    pub type_id: &'static str,
    pub title: String,
    pub category: &'static str,
    /// The kind's default payload, as it would be serialized in a graph document.
    pub params: serde_json::Value,
    pub pins: Vec<PinSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    pub version: &'static str,
    pub nodes: Vec<NodeSignature>,
}

impl Registry {
    /// Signatures for one `type_id` (several for kinds parameterized by type or op).
    pub fn by_type<'a>(
        &'a self,
        type_id: &'a str,
    ) -> impl Iterator<Item = &'a NodeSignature> + 'a {
        self.nodes.iter().filter(move |n| n.type_id == type_id)
    }
}

fn signature(kind: &NodeKind) -> NodeSignature {
    NodeSignature {
        type_id: kind.type_name(),
        title: kind.title(),
        category: kind.menu_category(),
        params: serde_json::to_value(kind).unwrap_or(serde_json::Value::Null),
        pins: kind
            .default_pins()
            .into_iter()
            .map(|p| PinSpec {
                name: p.name,
                direction: p.direction,
                category: p.category,
                default: p.default_value,
            })
            .collect(),
    }
}

/// Every spawnable node kind with its palette entry and pin layout.
pub fn registry() -> Registry {
    registry_with(&Config::default())
}

pub fn registry_with(config: &Config) -> Registry {
    Registry {
        version: env!("CARGO_PKG_VERSION"),
        nodes: NodeKind::catalogue(config).iter().map(signature).collect(),
    }
}
