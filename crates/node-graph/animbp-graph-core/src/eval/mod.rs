//! Pull evaluation for blueprint graphs.
//!
//! Values are computed on demand: pulling an output pin evaluates its node, which in turn
//! pulls whatever feeds its inputs. Unlinked inputs parse their textual default.
//!
//! - [`eval_node`] houses per-kind dispatch.
//! - [`numeric`] holds the operator helpers.
//!
//! The evaluator tracks the pins it is currently pulling so cycles and runaway depth end
//! with the category default instead of overflowing the stack. Handles that no longer
//! resolve also yield defaults, with a warning.

use animbp_animation_core::AssetRegistry;
use log::{error, warn};

use crate::graph::BlueprintGraph;
use crate::subject::AnimSubject;
use crate::types::{NodeHandle, PinDirection, PinRef};
use crate::value::{FromValue, Value};

pub mod eval_node;
pub mod numeric;

#[cfg(test)]
mod tests;

/// Who a pull is made for. Cheap to copy; built fresh for each top-level pull.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub subject: &'a dyn AnimSubject,
    pub assets: &'a dyn AssetRegistry,
    /// Frame counter of the owning instance; stateful nodes use it to spot repeated pulls.
    pub frame: u64,
}

impl<'a> EvalContext<'a> {
    pub fn new(subject: &'a dyn AnimSubject, assets: &'a dyn AssetRegistry) -> Self {
        Self {
            subject,
            assets,
            frame: 0,
        }
    }

    pub fn with_frame(mut self, frame: u64) -> Self {
        self.frame = frame;
        self
    }
}

/// One top-level pull and everything it recursively touches.
pub struct Evaluator<'g, 'c> {
    graph: &'g BlueprintGraph,
    ctx: EvalContext<'c>,
    stack: Vec<PinRef>,
}

impl<'g, 'c> Evaluator<'g, 'c> {
    pub fn new(graph: &'g BlueprintGraph, ctx: &EvalContext<'c>) -> Self {
        Self {
            graph,
            ctx: *ctx,
            stack: Vec::new(),
        }
    }

    pub fn graph(&self) -> &'g BlueprintGraph {
        self.graph
    }

    pub fn context(&self) -> &EvalContext<'c> {
        &self.ctx
    }

    /// Evaluate the node owning `pin` for that pin. Input pins are read like
    /// [`input_value`](Self::input_value). `None` when the pin does not resolve.
    pub fn pull(&mut self, pin: PinRef) -> Option<Value> {
        let graph = self.graph;
        let Some(node) = graph.node(pin.node) else {
            warn!("eval: pull through stale node handle {:?}", pin.node);
            return None;
        };
        let Some(target) = node.pins.get(pin.pin) else {
            warn!("eval: node {} has no pin {}", node.id, pin.pin);
            return None;
        };
        if target.direction == PinDirection::Input {
            return self.input_value(pin);
        }
        if self.stack.contains(&pin) {
            error!(
                "eval: cycle through node {} pin '{}'; using default",
                node.id, target.name
            );
            return Some(Value::zero(target.category));
        }
        if self.stack.len() >= graph.config().max_pull_depth {
            error!(
                "eval: pull depth limit {} reached at node {}; using default",
                graph.config().max_pull_depth,
                node.id
            );
            return Some(Value::zero(target.category));
        }
        self.stack.push(pin);
        let value = eval_node::evaluate_pin(self, pin.node, node, pin.pin);
        self.stack.pop();
        Some(value)
    }

    /// Value of an input pin: its linked source, or its parsed default when unlinked.
    pub fn input_value(&mut self, input: PinRef) -> Option<Value> {
        let graph = self.graph;
        let Some(pin) = graph.pin(input) else {
            warn!("eval: input pin {input:?} does not resolve");
            return None;
        };
        match pin.first_link() {
            Some(source) => Some(
                self.pull(source)
                    .unwrap_or_else(|| Value::zero(pin.category)),
            ),
            None => Some(Value::parse(
                pin.category,
                &pin.default_value,
                self.ctx.assets,
            )),
        }
    }

    /// Typed input read. A missing pin yields `T::default()`; an output pin is pulled.
    pub fn evaluate_input<T: FromValue>(&mut self, input: Option<PinRef>) -> T {
        let Some(input) = input else {
            return T::default();
        };
        let graph = self.graph;
        let Some(pin) = graph.pin(input) else {
            warn!("eval: input pin {input:?} does not resolve");
            return T::default();
        };
        if pin.direction == PinDirection::Output {
            return T::from_value(
                self.pull(input)
                    .unwrap_or_else(|| Value::zero(T::CATEGORY)),
            );
        }
        match pin.first_link() {
            Some(source) => T::from_value(
                self.pull(source)
                    .unwrap_or_else(|| Value::zero(T::CATEGORY)),
            ),
            None => T::parse_default(&pin.default_value, self.ctx.assets),
        }
    }

    /// Typed read of the input called `name` on `node`.
    pub fn input<T: FromValue>(&mut self, node: NodeHandle, name: &str) -> T {
        let pin = self.graph.input_pin(node, name);
        if pin.is_none() {
            warn!("eval: node {node:?} has no input '{name}'");
        }
        self.evaluate_input(pin)
    }

    /// Untyped read of the input called `name` on `node`.
    pub fn input_named(&mut self, node: NodeHandle, name: &str) -> Option<Value> {
        let pin = self.graph.input_pin(node, name)?;
        self.input_value(pin)
    }
}

/// Pull `pin` once for `ctx`.
pub fn evaluate_pin(
    graph: &BlueprintGraph,
    pin: PinRef,
    ctx: &EvalContext<'_>,
) -> Option<Value> {
    Evaluator::new(graph, ctx).pull(pin)
}

/// Read an input pin as `T` once for `ctx`.
pub fn evaluate_input<T: FromValue>(
    graph: &BlueprintGraph,
    input: Option<PinRef>,
    ctx: &EvalContext<'_>,
) -> T {
    Evaluator::new(graph, ctx).evaluate_input(input)
}
