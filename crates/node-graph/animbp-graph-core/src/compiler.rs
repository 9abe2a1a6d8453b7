//! Graph to state machine compilation.
//!
//! One pass over the graph in node-id order:
//! 1. every `State` node becomes a named state; a linked `Animation` input is pulled once
//!    for the initial pose and kept as a per-frame update hook,
//! 2. the `Entry` node's first destination becomes the entry state,
//! 3. every `Transition` node between two known states becomes a guarded transition.
//!
//! Hooks and guards capture pin handles, not nodes; they resolve through the graph they
//! are handed each frame, so a removed node degrades to defaults instead of dangling.
//! Structural problems are skipped, logged and listed in the returned [`CompileReport`].

use animbp_animation_core::PoseSource;
use hashbrown::HashMap;
use log::{debug, warn};

use crate::eval::{evaluate_input, evaluate_pin, EvalContext};
use crate::graph::BlueprintGraph;
use crate::nodes::NodeKind;
use crate::state_machine::{CompiledState, CompiledTransition, GuardFn, StateMachine, UpdateHook};
use crate::types::NodeHandle;
use crate::value::Value;

/// What a compile produced and what it had to leave out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileReport {
    pub states: Vec<String>,
    /// `(from, to)` pairs in registration order.
    pub transitions: Vec<(String, String)>,
    pub entry_state: Option<String>,
    pub skipped: Vec<String>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, reason: String) {
        warn!("compile: {reason}");
        self.skipped.push(reason);
    }
}

/// Rebuild `machine` from `graph`. The machine is cleared first.
pub fn compile(
    graph: &BlueprintGraph,
    ctx: &EvalContext<'_>,
    machine: &mut StateMachine,
) -> CompileReport {
    machine.clear();
    let mut report = CompileReport::default();
    let mut state_names: HashMap<NodeHandle, String> = HashMap::new();
    let nodes = graph.nodes();

    for (handle, node) in &nodes {
        let NodeKind::State { state_name } = &node.kind else {
            continue;
        };
        if state_name.is_empty() {
            report.skip(format!("state node {} has no name", node.id));
            continue;
        }
        if machine.state(state_name).is_some() {
            report.skip(format!(
                "state node {} reuses the name '{state_name}'",
                node.id
            ));
            continue;
        }

        let animation = graph.input_pin(*handle, "Animation");
        let source = animation.and_then(|pin| graph.linked_source(pin));
        let (pose, update) = match source {
            Some(source) => {
                let pose = evaluate_pin(graph, source, ctx).and_then(Value::into_pose);
                let hook: UpdateHook =
                    Box::new(move |graph: &BlueprintGraph, ctx: &EvalContext<'_>| {
                        let _ = evaluate_pin(graph, source, ctx);
                    });
                (pose, Some(hook))
            }
            None => (
                evaluate_input::<Option<PoseSource>>(graph, animation, ctx),
                None,
            ),
        };
        if pose.is_none() {
            debug!("compile: state '{state_name}' has no animation");
        }
        let looping: bool = evaluate_input(graph, graph.input_pin(*handle, "Looping"), ctx);
        let play_rate: f32 = evaluate_input(graph, graph.input_pin(*handle, "PlayRate"), ctx);

        let mut state = CompiledState::new(state_name.clone(), pose, looping, play_rate);
        if let Some(hook) = update {
            state = state.with_update(hook);
        }
        machine.add_state(state);
        state_names.insert(*handle, state_name.clone());
        report.states.push(state_name.clone());
    }

    let entries: Vec<NodeHandle> = nodes
        .iter()
        .filter(|(_, n)| matches!(n.kind, NodeKind::StateEntry))
        .map(|(h, _)| *h)
        .collect();
    match entries.as_slice() {
        [] => report.skip("graph has no entry node".into()),
        [entry, rest @ ..] => {
            if !rest.is_empty() {
                report.skip(format!(
                    "graph has {} entry nodes; using the first",
                    entries.len()
                ));
            }
            let target = graph
                .output_pin(*entry, "Entry")
                .and_then(|pin| graph.first_linked_destination(pin))
                .and_then(|pin| state_names.get(&pin.node));
            match target {
                Some(name) => {
                    machine.set_entry_state(Some(name.clone()));
                    report.entry_state = Some(name.clone());
                }
                None => report.skip("entry node is not connected to a state".into()),
            }
        }
    }

    for (handle, node) in &nodes {
        if !matches!(node.kind, NodeKind::Transition) {
            continue;
        }
        let from = graph
            .input_pin(*handle, "Execute")
            .and_then(|pin| graph.linked_source(pin))
            .and_then(|pin| state_names.get(&pin.node));
        let to = graph
            .output_pin(*handle, "Transition To")
            .and_then(|pin| graph.first_linked_destination(pin))
            .and_then(|pin| state_names.get(&pin.node));
        let (Some(from), Some(to)) = (from, to) else {
            report.skip(format!(
                "transition node {} does not connect two states",
                node.id
            ));
            continue;
        };

        let blend_time: f32 = evaluate_input(graph, graph.input_pin(*handle, "Blend Time"), ctx);
        let condition = graph.input_pin(*handle, "Can Transition");
        let guard: GuardFn = Box::new(move |graph: &BlueprintGraph, ctx: &EvalContext<'_>| {
            evaluate_input::<bool>(graph, condition, ctx)
        });
        machine.add_transition(CompiledTransition::new(
            from.clone(),
            to.clone(),
            guard,
            blend_time,
        ));
        report.transitions.push((from.clone(), to.clone()));
    }

    machine.set_compiled_revision(graph.revision());
    debug!(
        "compile: {} states, {} transitions, entry {:?}, {} skipped",
        report.states.len(),
        report.transitions.len(),
        report.entry_state,
        report.skipped.len()
    );
    report
}
