//! Blueprint graph storage.
//!
//! Nodes live in a slot arena addressed by generation-checked [`NodeHandle`]s. Every node
//! also gets a stable [`NodeId`] used for persistence. Structural edits bump a revision
//! counter so compiled state machines can tell when they are out of date.

use hashbrown::HashMap;
use log::debug;

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::eval::{EvalContext, Evaluator};
use crate::nodes::NodeKind;
use crate::types::{NodeHandle, NodeId, Pin, PinDirection, PinRef};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub pins: Vec<Pin>,
}

impl Node {
    /// Index of the pin called `name` with the given direction.
    pub fn pin_index(&self, name: &str, direction: PinDirection) -> Option<usize> {
        self.pins
            .iter()
            .position(|p| p.name == name && p.direction == direction)
    }

    pub fn pin(&self, index: usize) -> Option<&Pin> {
        self.pins.get(index)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
pub struct BlueprintGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    ids: HashMap<NodeId, NodeHandle>,
    next_id: NodeId,
    revision: u64,
    config: GraphConfig,
}

impl BlueprintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Structural revision; bumped by every add, remove, link, unlink and node edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Spawn a node with its default pins and a fresh id.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeHandle {
        let id = self.next_id;
        self.insert(id, kind)
    }

    /// Spawn a node under a caller-chosen id (used when loading documents).
    pub fn add_node_with_id(
        &mut self,
        id: NodeId,
        kind: NodeKind,
    ) -> Result<NodeHandle, GraphError> {
        if self.ids.contains_key(&id) {
            return Err(GraphError::DuplicateNodeId(id));
        }
        Ok(self.insert(id, kind))
    }

    fn insert(&mut self, id: NodeId, kind: NodeKind) -> NodeHandle {
        let node = Node {
            id,
            pins: kind.default_pins(),
            kind,
        };
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.ids.insert(id, handle);
        self.next_id = self.next_id.max(id.saturating_add(1));
        self.revision += 1;
        debug!("graph: added node {id} at {handle:?}");
        handle
    }

    /// Remove a node, unlinking every partner pin first.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<Node, GraphError> {
        let links: Vec<(usize, PinRef)> = {
            let node = self.node(handle).ok_or(GraphError::StaleNode(handle))?;
            node.pins
                .iter()
                .enumerate()
                .flat_map(|(i, p)| p.links.iter().map(move |l| (i, *l)))
                .collect()
        };
        for (pin, partner) in links {
            self.detach(partner, PinRef::new(handle, pin));
        }
        let slot = &mut self.slots[handle.index as usize];
        let mut node = slot.node.take().ok_or(GraphError::StaleNode(handle))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.ids.remove(&node.id);
        for pin in &mut node.pins {
            pin.links.clear();
        }
        self.revision += 1;
        debug!("graph: removed node {}", node.id);
        Ok(node)
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.node(handle).is_some()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.node.as_ref())
    }

    /// Mutable access for editing node payloads; counts as a structural edit.
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)?;
        let node = slot.node.as_mut()?;
        self.revision += 1;
        Some(node)
    }

    pub fn kind_mut(&mut self, handle: NodeHandle) -> Option<&mut NodeKind> {
        self.node_mut(handle).map(|n| &mut n.kind)
    }

    pub fn handle_of(&self, id: NodeId) -> Option<NodeHandle> {
        self.ids.get(&id).copied()
    }

    /// Live nodes ordered by id, which is creation order for nodes spawned via `add_node`.
    pub fn nodes(&self) -> Vec<(NodeHandle, &Node)> {
        let mut out: Vec<(NodeHandle, &Node)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                s.node.as_ref().map(|n| {
                    (
                        NodeHandle {
                            index: i as u32,
                            generation: s.generation,
                        },
                        n,
                    )
                })
            })
            .collect();
        out.sort_by_key(|(_, n)| n.id);
        out
    }

    pub fn pin(&self, pin: PinRef) -> Option<&Pin> {
        self.node(pin.node).and_then(|n| n.pins.get(pin.pin))
    }

    pub fn find_pin(
        &self,
        node: NodeHandle,
        name: &str,
        direction: PinDirection,
    ) -> Option<PinRef> {
        self.node(node)
            .and_then(|n| n.pin_index(name, direction))
            .map(|i| PinRef::new(node, i))
    }

    pub fn input_pin(&self, node: NodeHandle, name: &str) -> Option<PinRef> {
        self.find_pin(node, name, PinDirection::Input)
    }

    pub fn output_pin(&self, node: NodeHandle, name: &str) -> Option<PinRef> {
        self.find_pin(node, name, PinDirection::Output)
    }

    /// Replace an input pin's textual default.
    pub fn set_pin_default(&mut self, pin: PinRef, value: &str) -> Result<(), GraphError> {
        let target = self
            .node_mut(pin.node)
            .ok_or(GraphError::StaleNode(pin.node))?
            .pins
            .get_mut(pin.pin)
            .ok_or(GraphError::UnknownPin {
                node: pin.node,
                pin: pin.pin,
            })?;
        target.default_value = value.to_string();
        Ok(())
    }

    /// Link two pins in either order.
    ///
    /// Rejects self links, equal directions and differing categories. Linking into a data
    /// input first severs its previous link; exec pins keep every link.
    pub fn link(&mut self, a: PinRef, b: PinRef) -> Result<(), GraphError> {
        let pa = self.checked_pin(a)?;
        let pb = self.checked_pin(b)?;
        if a.node == b.node {
            return Err(GraphError::SelfLink);
        }
        if pa.direction == pb.direction {
            return Err(GraphError::SameDirection(pa.direction));
        }
        if pa.category != pb.category {
            return Err(GraphError::CategoryMismatch {
                from: pa.category,
                to: pb.category,
            });
        }
        let (from, to) = if pa.direction == PinDirection::Output {
            (a, b)
        } else {
            (b, a)
        };
        let (to_is_exec, already) = {
            let to_pin = self.checked_pin(to)?;
            (to_pin.category.is_exec(), to_pin.links.contains(&from))
        };
        if already {
            return Ok(());
        }
        if !to_is_exec {
            self.break_pin_links(to)?;
        }
        if let Some(p) = self.pin_slot_mut(from) {
            p.links.push(to);
        }
        if let Some(p) = self.pin_slot_mut(to) {
            p.links.push(from);
        }
        self.revision += 1;
        Ok(())
    }

    /// Remove the link between `a` and `b`; returns whether one existed.
    pub fn unlink(&mut self, a: PinRef, b: PinRef) -> bool {
        let linked = self.pin(a).is_some_and(|p| p.links.contains(&b));
        if linked {
            self.detach(a, b);
            self.detach(b, a);
            self.revision += 1;
        }
        linked
    }

    /// Sever every link on `pin`.
    pub fn break_pin_links(&mut self, pin: PinRef) -> Result<(), GraphError> {
        let partners = self.checked_pin(pin)?.links.clone();
        for partner in partners {
            self.unlink(pin, partner);
        }
        Ok(())
    }

    /// The pin feeding a data input.
    pub fn linked_source(&self, input: PinRef) -> Option<PinRef> {
        self.pin(input).and_then(Pin::first_link)
    }

    /// The first destination of an exec output. Further destinations are ignored by
    /// consumers.
    pub fn first_linked_destination(&self, output: PinRef) -> Option<PinRef> {
        self.pin(output).and_then(Pin::first_link)
    }

    /// Pull the input of a `Watch` node.
    pub fn watch(&self, node: NodeHandle, ctx: &EvalContext<'_>) -> Option<Value> {
        let n = self.node(node)?;
        if !matches!(n.kind, NodeKind::Watch { .. }) {
            return None;
        }
        let pin = self.input_pin(node, "Value")?;
        Evaluator::new(self, ctx).input_value(pin)
    }

    /// Re-resolve every clip reference through `assets`.
    pub fn resolve_assets(&mut self, assets: &dyn animbp_animation_core::AssetRegistry) {
        for slot in &mut self.slots {
            if let Some(node) = slot.node.as_mut() {
                node.kind.resolve_assets(assets);
            }
        }
        self.revision += 1;
    }

    fn checked_pin(&self, pin: PinRef) -> Result<&Pin, GraphError> {
        self.node(pin.node)
            .ok_or(GraphError::StaleNode(pin.node))?
            .pins
            .get(pin.pin)
            .ok_or(GraphError::UnknownPin {
                node: pin.node,
                pin: pin.pin,
            })
    }

    fn pin_slot_mut(&mut self, pin: PinRef) -> Option<&mut Pin> {
        self.slots
            .get_mut(pin.node.index as usize)
            .filter(|s| s.generation == pin.node.generation)
            .and_then(|s| s.node.as_mut())
            .and_then(|n| n.pins.get_mut(pin.pin))
    }

    /// Drop `partner` from `pin`'s link list.
    fn detach(&mut self, pin: PinRef, partner: PinRef) {
        if let Some(p) = self.pin_slot_mut(pin) {
            p.links.retain(|l| *l != partner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{ArithmeticOp, NumericType};
    use crate::types::PinCategory;

    fn add_float(graph: &mut BlueprintGraph) -> NodeHandle {
        graph.add_node(NodeKind::Arithmetic {
            op: ArithmeticOp::Add,
            ty: NumericType::Float,
        })
    }

    #[test]
    fn it_should_invalidate_handles_after_removal() {
        let mut graph = BlueprintGraph::new();
        let a = graph.add_node(NodeKind::FloatLiteral { value: 1.0 });
        graph.remove_node(a).expect("remove");
        let b = graph.add_node(NodeKind::FloatLiteral { value: 2.0 });
        assert_eq!(a.index(), b.index());
        assert!(graph.node(a).is_none());
        assert!(graph.node(b).is_some());
        assert!(matches!(graph.remove_node(a), Err(GraphError::StaleNode(_))));
        assert_ne!(graph.node(b).map(|n| n.id), Some(0));
    }

    #[test]
    fn it_should_replace_the_link_on_a_data_input() {
        let mut graph = BlueprintGraph::new();
        let one = graph.add_node(NodeKind::FloatLiteral { value: 1.0 });
        let two = graph.add_node(NodeKind::FloatLiteral { value: 2.0 });
        let add = add_float(&mut graph);
        let a_in = graph.input_pin(add, "A").expect("A");
        let one_out = graph.output_pin(one, "Value").expect("out");
        let two_out = graph.output_pin(two, "Value").expect("out");

        graph.link(one_out, a_in).expect("link");
        graph.link(a_in, two_out).expect("link reversed");

        assert_eq!(graph.linked_source(a_in), Some(two_out));
        assert!(graph.pin(one_out).is_some_and(|p| !p.is_linked()));
    }

    #[test]
    fn it_should_reject_invalid_links() {
        let mut graph = BlueprintGraph::new();
        let int = graph.add_node(NodeKind::IntLiteral { value: 1 });
        let add = add_float(&mut graph);
        let other = add_float(&mut graph);
        let int_out = graph.output_pin(int, "Value").expect("out");
        let a_in = graph.input_pin(add, "A").expect("A");
        let b_in = graph.input_pin(add, "B").expect("B");
        let result = graph.output_pin(add, "Result").expect("Result");
        let other_a = graph.input_pin(other, "A").expect("A");

        assert!(matches!(
            graph.link(int_out, a_in),
            Err(GraphError::CategoryMismatch {
                from: PinCategory::Int,
                to: PinCategory::Float
            })
        ));
        assert_eq!(graph.link(result, a_in), Err(GraphError::SelfLink));
        assert!(matches!(
            graph.link(a_in, other_a),
            Err(GraphError::SameDirection(PinDirection::Input))
        ));
        assert!(graph.link(result, other_a).is_ok());
        assert!(graph.link(result, b_in).is_err());
    }

    #[test]
    fn it_should_keep_multiple_exec_links_and_unlink_on_removal() {
        let mut graph = BlueprintGraph::new();
        let entry = graph.add_node(NodeKind::StateEntry);
        let s1 = graph.add_node(NodeKind::State {
            state_name: "A".into(),
        });
        let s2 = graph.add_node(NodeKind::State {
            state_name: "B".into(),
        });
        let out = graph.output_pin(entry, "Entry").expect("Entry");
        let e1 = graph.input_pin(s1, "Enter").expect("Enter");
        let e2 = graph.input_pin(s2, "Enter").expect("Enter");
        graph.link(out, e1).expect("link");
        graph.link(out, e2).expect("link");
        assert_eq!(graph.pin(out).map(|p| p.links().len()), Some(2));
        assert_eq!(graph.first_linked_destination(out), Some(e1));

        graph.remove_node(s1).expect("remove");
        assert_eq!(graph.first_linked_destination(out), Some(e2));
    }

    #[test]
    fn it_should_bump_revision_on_structural_edits() {
        let mut graph = BlueprintGraph::new();
        let r0 = graph.revision();
        let a = graph.add_node(NodeKind::FloatLiteral { value: 1.0 });
        let b = add_float(&mut graph);
        let r1 = graph.revision();
        assert!(r1 > r0);
        let out = graph.output_pin(a, "Value").expect("out");
        let inp = graph.input_pin(b, "A").expect("A");
        graph.link(out, inp).expect("link");
        assert!(graph.revision() > r1);
        let r2 = graph.revision();
        assert!(graph.unlink(inp, out));
        assert!(graph.revision() > r2);
        assert!(!graph.unlink(inp, out));
    }
}
