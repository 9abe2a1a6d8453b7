//! Graph documents: the serialized form of a blueprint graph.
//!
//! Nodes keep their stable ids and kind payloads; pin defaults are stored by pin name and
//! links as `(from_node, from_pin) -> (to_node, to_pin)` name pairs, since pin indices are
//! not guaranteed stable across versions. Clip references are stored as asset paths.

use animbp_animation_core::AssetRegistry;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::graph::BlueprintGraph;
use crate::nodes::NodeKind;
use crate::types::{NodeId, PinDirection, PinRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Input pin defaults that differ from the kind's defaults, by pin name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub defaults: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkDocument {
    pub from_node: NodeId,
    pub from_pin: String,
    pub to_node: NodeId,
    pub to_pin: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub links: Vec<LinkDocument>,
}

impl GraphDocument {
    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot `graph`. Links are listed once, from the output side.
    pub fn from_graph(graph: &BlueprintGraph) -> Self {
        let mut doc = GraphDocument::default();
        for (_, node) in graph.nodes() {
            let stock = node.kind.default_pins();
            let defaults = node
                .pins
                .iter()
                .filter(|p| p.direction == PinDirection::Input)
                .filter(|p| {
                    stock
                        .iter()
                        .find(|s| s.name == p.name && s.direction == p.direction)
                        .map_or(true, |s| s.default_value != p.default_value)
                })
                .map(|p| (p.name.clone(), p.default_value.clone()))
                .collect();
            doc.nodes.push(NodeDocument {
                id: node.id,
                kind: node.kind.clone(),
                defaults,
            });

            for pin in node.pins.iter().filter(|p| p.direction == PinDirection::Output) {
                for link in pin.links() {
                    let Some(target) = graph.node(link.node) else {
                        continue;
                    };
                    let Some(to_pin) = target.pin(link.pin) else {
                        continue;
                    };
                    doc.links.push(LinkDocument {
                        from_node: node.id,
                        from_pin: pin.name.clone(),
                        to_node: target.id,
                        to_pin: to_pin.name.clone(),
                    });
                }
            }
        }
        doc
    }

    /// Build a graph, resolving clip paths through `assets`.
    pub fn to_graph(
        &self,
        assets: &dyn AssetRegistry,
        config: GraphConfig,
    ) -> Result<BlueprintGraph, GraphError> {
        let mut graph = BlueprintGraph::with_config(config);
        for doc in &self.nodes {
            let mut kind = doc.kind.clone();
            kind.resolve_assets(assets);
            let handle = graph.add_node_with_id(doc.id, kind)?;
            for (name, value) in &doc.defaults {
                let pin =
                    graph
                        .input_pin(handle, name)
                        .ok_or_else(|| GraphError::UnknownPinName {
                            node: doc.id,
                            pin: name.clone(),
                            direction: PinDirection::Input,
                        })?;
                graph.set_pin_default(pin, value)?;
            }
        }
        for link in &self.links {
            let from = lookup_pin(&graph, link.from_node, &link.from_pin, PinDirection::Output)?;
            let to = lookup_pin(&graph, link.to_node, &link.to_pin, PinDirection::Input)?;
            graph.link(from, to)?;
        }
        Ok(graph)
    }
}

fn lookup_pin(
    graph: &BlueprintGraph,
    node: NodeId,
    pin: &str,
    direction: PinDirection,
) -> Result<PinRef, GraphError> {
    let handle = graph
        .handle_of(node)
        .ok_or(GraphError::UnknownNodeId(node))?;
    graph
        .find_pin(handle, pin, direction)
        .ok_or_else(|| GraphError::UnknownPinName {
            node,
            pin: pin.to_string(),
            direction,
        })
}
