//! A graph together with its compiled state machine and a pose player.

use std::rc::Rc;

use animbp_animation_core::{AssetRegistry, Config, Pose, PosePlayer};
use log::debug;

use crate::compiler::{compile, CompileReport};
use crate::eval::EvalContext;
use crate::graph::BlueprintGraph;
use crate::state_machine::StateMachine;
use crate::subject::AnimSubject;

pub struct AnimGraphInstance {
    graph: BlueprintGraph,
    machine: StateMachine,
    player: PosePlayer,
    assets: Rc<dyn AssetRegistry>,
    frame: u64,
}

impl AnimGraphInstance {
    pub fn new(graph: BlueprintGraph, assets: Rc<dyn AssetRegistry>) -> Self {
        Self::with_config(graph, assets, &Config::default())
    }

    pub fn with_config(
        graph: BlueprintGraph,
        assets: Rc<dyn AssetRegistry>,
        config: &Config,
    ) -> Self {
        Self {
            graph,
            machine: StateMachine::new(),
            player: PosePlayer::with_capacity(config.pose_capacity),
            assets,
            frame: 0,
        }
    }

    pub fn graph(&self) -> &BlueprintGraph {
        &self.graph
    }

    /// Editing access; edits mark the compiled machine stale until `compile` runs again.
    pub fn graph_mut(&mut self) -> &mut BlueprintGraph {
        &mut self.graph
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn player(&self) -> &PosePlayer {
        &self.player
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn current_state(&self) -> Option<&str> {
        self.machine.current_state()
    }

    /// Compile the graph and enter its entry state, if one was found.
    pub fn compile(&mut self, subject: &dyn AnimSubject) -> CompileReport {
        let ctx = EvalContext::new(subject, self.assets.as_ref()).with_frame(self.frame);
        let report = compile(&self.graph, &ctx, &mut self.machine);
        if let Some(entry) = report.entry_state.clone() {
            self.machine.set_initial_state(&entry, &mut self.player);
        } else {
            debug!("instance: no entry state; playback idle until one is set");
        }
        report
    }

    /// Run one frame: state machine first, then sample the player into `out`.
    pub fn update(&mut self, dt: f32, subject: &dyn AnimSubject, out: &mut Pose) {
        self.frame += 1;
        let ctx = EvalContext::new(subject, self.assets.as_ref()).with_frame(self.frame);
        self.machine
            .process_state(dt, &self.graph, &ctx, &mut self.player);
        self.player.update(dt, out);
    }
}
