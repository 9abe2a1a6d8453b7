//! Runtime state machine.
//!
//! Holds named states and guarded transitions in registration order plus the current state.
//! Every frame `process_state` runs the current state's update hook, then fires the first
//! transition out of the current state whose guard holds.

use animbp_animation_core::{AnimationDriver, PoseSource};
use log::{debug, trace, warn};

use crate::eval::EvalContext;
use crate::graph::BlueprintGraph;

/// Re-pulls a state's pose subgraph for its side effects.
pub type UpdateHook = Box<dyn Fn(&BlueprintGraph, &EvalContext<'_>)>;

/// Re-evaluates a transition condition.
pub type GuardFn = Box<dyn Fn(&BlueprintGraph, &EvalContext<'_>) -> bool>;

pub struct CompiledState {
    pub name: String,
    pub pose: Option<PoseSource>,
    pub looping: bool,
    pub play_rate: f32,
    update: Option<UpdateHook>,
}

impl CompiledState {
    pub fn new(
        name: impl Into<String>,
        pose: Option<PoseSource>,
        looping: bool,
        play_rate: f32,
    ) -> Self {
        Self {
            name: name.into(),
            pose,
            looping,
            play_rate,
            update: None,
        }
    }

    pub fn with_update(mut self, hook: UpdateHook) -> Self {
        self.update = Some(hook);
        self
    }

    pub fn has_update_hook(&self) -> bool {
        self.update.is_some()
    }

    /// Start playing this state on `driver`, cross-fading when `blend_time > 0`.
    fn enter(&self, driver: &mut dyn AnimationDriver, blend_time: f32) {
        let blend = blend_time > 0.0;
        match (&self.pose, blend) {
            (Some(PoseSource::Sequence(clip)), false) => {
                driver.play_sequence(Some(clip.clone()), self.looping, self.play_rate)
            }
            (Some(PoseSource::Sequence(clip)), true) => {
                driver.blend_to(Some(clip.clone()), self.looping, self.play_rate, blend_time)
            }
            (Some(source @ PoseSource::BlendSpace(_)), false) => {
                driver.play_pose_provider(Some(source.clone()), self.looping, self.play_rate)
            }
            (Some(source @ PoseSource::BlendSpace(_)), true) => driver.blend_to_pose_provider(
                Some(source.clone()),
                self.looping,
                self.play_rate,
                blend_time,
            ),
            (None, false) => driver.play_sequence(None, self.looping, self.play_rate),
            (None, true) => driver.blend_to(None, self.looping, self.play_rate, blend_time),
        }
    }
}

impl std::fmt::Debug for CompiledState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledState")
            .field("name", &self.name)
            .field("pose", &self.pose)
            .field("looping", &self.looping)
            .field("play_rate", &self.play_rate)
            .field("has_update", &self.update.is_some())
            .finish()
    }
}

pub struct CompiledTransition {
    pub from: String,
    pub to: String,
    pub blend_time: f32,
    guard: GuardFn,
}

impl CompiledTransition {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        guard: GuardFn,
        blend_time: f32,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            blend_time,
            guard,
        }
    }

    pub fn can_transition(&self, graph: &BlueprintGraph, ctx: &EvalContext<'_>) -> bool {
        (self.guard)(graph, ctx)
    }
}

impl std::fmt::Debug for CompiledTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTransition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("blend_time", &self.blend_time)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct StateMachine {
    states: Vec<CompiledState>,
    transitions: Vec<CompiledTransition>,
    current: Option<usize>,
    entry_state: Option<String>,
    compiled_revision: Option<u64>,
    stale_warned: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every state and transition and return to the uninitialized state.
    pub fn clear(&mut self) {
        self.states.clear();
        self.transitions.clear();
        self.current = None;
        self.entry_state = None;
        self.compiled_revision = None;
        self.stale_warned = false;
    }

    /// Register a state; a name already in use is rejected.
    pub fn add_state(&mut self, state: CompiledState) -> bool {
        if self.state_index(&state.name).is_some() {
            warn!("state machine: duplicate state '{}' ignored", state.name);
            return false;
        }
        self.states.push(state);
        true
    }

    pub fn add_transition(&mut self, transition: CompiledTransition) {
        self.transitions.push(transition);
    }

    pub fn states(&self) -> &[CompiledState] {
        &self.states
    }

    pub fn transitions(&self) -> &[CompiledTransition] {
        &self.transitions
    }

    pub fn state(&self, name: &str) -> Option<&CompiledState> {
        self.state_index(name).map(|i| &self.states[i])
    }

    pub fn entry_state(&self) -> Option<&str> {
        self.entry_state.as_deref()
    }

    pub fn set_entry_state(&mut self, name: Option<String>) {
        self.entry_state = name;
    }

    /// Name of the current state; `None` until initialized.
    pub fn current_state(&self) -> Option<&str> {
        self.current.map(|i| self.states[i].name.as_str())
    }

    pub fn compiled_revision(&self) -> Option<u64> {
        self.compiled_revision
    }

    pub fn set_compiled_revision(&mut self, revision: u64) {
        self.compiled_revision = Some(revision);
        self.stale_warned = false;
    }

    /// Whether `graph` changed structurally since this machine was compiled from it.
    pub fn is_stale(&self, graph: &BlueprintGraph) -> bool {
        self.compiled_revision
            .is_some_and(|rev| rev != graph.revision())
    }

    /// Enter `name` without blending. Unknown names leave the machine untouched.
    pub fn set_initial_state(&mut self, name: &str, driver: &mut dyn AnimationDriver) -> bool {
        let Some(index) = self.state_index(name) else {
            warn!("state machine: initial state '{name}' not found");
            return false;
        };
        self.states[index].enter(driver, 0.0);
        self.current = Some(index);
        debug!("state machine: initial state '{name}'");
        true
    }

    /// Advance one frame: run the current state's update hook, then fire the first
    /// transition out of it whose guard holds.
    pub fn process_state(
        &mut self,
        dt: f32,
        graph: &BlueprintGraph,
        ctx: &EvalContext<'_>,
        driver: &mut dyn AnimationDriver,
    ) {
        if !self.stale_warned && self.is_stale(graph) {
            warn!("state machine: graph changed since compile; recompile to pick up edits");
            self.stale_warned = true;
        }
        let Some(current) = self.current else {
            return;
        };
        let state = &self.states[current];
        trace!("state machine: tick dt={dt} state='{}'", state.name);
        if let Some(hook) = &state.update {
            hook(graph, ctx);
        }

        let fired = self
            .transitions
            .iter()
            .find(|t| t.from == state.name && t.can_transition(graph, ctx))
            .map(|t| (t.to.clone(), t.blend_time));
        if let Some((to, blend_time)) = fired {
            self.change_state(&to, blend_time, driver);
        }
    }

    fn change_state(
        &mut self,
        name: &str,
        blend_time: f32,
        driver: &mut dyn AnimationDriver,
    ) -> bool {
        let Some(index) = self.state_index(name) else {
            warn!("state machine: transition target '{name}' not found");
            return false;
        };
        debug!(
            "state machine: {} -> {name} (blend {blend_time})",
            self.current_state().unwrap_or("<none>")
        );
        self.states[index].enter(driver, blend_time);
        self.current = Some(index);
        true
    }

    fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animbp_animation_core::{ClipLibrary, ClipRef};
    use crate::subject::NoSubject;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl AnimationDriver for Calls {
        fn play_sequence(&mut self, _: Option<ClipRef>, _: bool, _: f32) {
            self.0.push("play".into());
        }
        fn blend_to(&mut self, _: Option<ClipRef>, _: bool, _: f32, t: f32) {
            self.0.push(format!("blend {t}"));
        }
        fn play_pose_provider(&mut self, _: Option<PoseSource>, _: bool, _: f32) {
            self.0.push("play provider".into());
        }
        fn blend_to_pose_provider(&mut self, _: Option<PoseSource>, _: bool, _: f32, t: f32) {
            self.0.push(format!("blend provider {t}"));
        }
    }

    fn always(result: bool) -> GuardFn {
        Box::new(move |_, _| result)
    }

    #[test]
    fn it_should_fire_the_first_registered_transition() {
        let mut sm = StateMachine::new();
        sm.add_state(CompiledState::new("A", None, true, 1.0));
        sm.add_state(CompiledState::new("B", None, true, 1.0));
        sm.add_state(CompiledState::new("C", None, true, 1.0));
        sm.add_transition(CompiledTransition::new("A", "C", always(true), 0.0));
        sm.add_transition(CompiledTransition::new("A", "B", always(true), 0.2));

        let graph = BlueprintGraph::new();
        let assets = ClipLibrary::new();
        let ctx = EvalContext::new(&NoSubject, &assets);
        let mut calls = Calls::default();

        sm.process_state(0.1, &graph, &ctx, &mut calls);
        assert_eq!(sm.current_state(), None);
        assert!(calls.0.is_empty());

        assert!(sm.set_initial_state("A", &mut calls));
        sm.process_state(0.1, &graph, &ctx, &mut calls);
        assert_eq!(sm.current_state(), Some("C"));
        assert_eq!(calls.0, ["play", "play"]);
    }

    #[test]
    fn it_should_ignore_unknown_states() {
        let mut sm = StateMachine::new();
        sm.add_state(CompiledState::new("A", None, true, 1.0));
        sm.add_transition(CompiledTransition::new("A", "Missing", always(true), 0.5));
        let mut calls = Calls::default();
        assert!(!sm.set_initial_state("Nope", &mut calls));
        assert_eq!(sm.current_state(), None);

        assert!(sm.set_initial_state("A", &mut calls));
        let graph = BlueprintGraph::new();
        let assets = ClipLibrary::new();
        let ctx = EvalContext::new(&NoSubject, &assets);
        sm.process_state(0.1, &graph, &ctx, &mut calls);
        assert_eq!(sm.current_state(), Some("A"));
        assert!(!sm.add_state(CompiledState::new("A", None, false, 2.0)));
    }

    #[test]
    fn it_should_use_blend_calls_when_blend_time_is_positive() {
        let mut sm = StateMachine::new();
        sm.add_state(CompiledState::new("A", None, true, 1.0));
        sm.add_state(CompiledState::new("B", None, true, 1.0));
        sm.add_transition(CompiledTransition::new("A", "B", always(true), 0.25));
        let graph = BlueprintGraph::new();
        let assets = ClipLibrary::new();
        let ctx = EvalContext::new(&NoSubject, &assets);
        let mut calls = Calls::default();
        sm.set_initial_state("A", &mut calls);
        sm.process_state(0.1, &graph, &ctx, &mut calls);
        assert_eq!(calls.0, ["play", "blend 0.25"]);
    }
}
