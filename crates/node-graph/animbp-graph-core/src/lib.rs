//! Animation blueprint graphs.
//!
//! A [`BlueprintGraph`] of typed pins is evaluated by pulling: reading a pin evaluates
//! whatever feeds it. [`compile`] turns the state nodes of a graph into a [`StateMachine`]
//! that re-pulls guards and pose subgraphs every frame and drives an
//! [`AnimationDriver`](animbp_animation_core::AnimationDriver).

pub mod compiler;
pub mod config;
pub mod error;
pub mod eval;
pub mod graph;
pub mod instance;
pub mod nodes;
pub mod persist;
pub mod schema;
pub mod state_machine;
pub mod subject;
pub mod types;
pub mod value;

pub use compiler::{compile, CompileReport};
pub use config::GraphConfig;
pub use error::GraphError;
pub use eval::{evaluate_input, evaluate_pin, EvalContext, Evaluator};
pub use graph::{BlueprintGraph, Node};
pub use instance::AnimGraphInstance;
pub use nodes::{
    ArithmeticOp, BlendSlot, BlendSpaceNode, CompareOp, LogicOp, NodeKind, NumericType,
    SequenceNode,
};
pub use persist::{GraphDocument, LinkDocument, NodeDocument};
pub use schema::registry;
pub use state_machine::{CompiledState, CompiledTransition, GuardFn, StateMachine, UpdateHook};
pub use subject::{AnimSubject, InputSource, KeyCode, MovementSource, NoSubject};
pub use types::{NodeHandle, NodeId, Pin, PinCategory, PinDirection, PinRef};
pub use value::{FromValue, Value};
