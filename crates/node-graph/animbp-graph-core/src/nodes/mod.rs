//! Node kinds and their pin layouts.
//!
//! Each kind allocates its default pins here; evaluation lives in
//! [`eval::eval_node`](crate::eval::eval_node). Kinds serialize with a `type` tag and carry
//! clip references as asset paths, re-resolved through an [`AssetRegistry`] after loading.

mod blend_space_node;

pub use blend_space_node::{BlendSlot, BlendSpaceNode};

use animbp_animation_core::{AssetRegistry, ClipRef, Config};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::types::{Pin, PinCategory};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NumericType {
    Int,
    Float,
}

impl NumericType {
    pub fn category(&self) -> PinCategory {
        match self {
            NumericType::Int => PinCategory::Int,
            NumericType::Float => PinCategory::Float,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Greater,
    Equal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogicOp {
    And,
    Or,
    Xor,
}

/// A clip literal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceNode {
    #[serde(default)]
    pub clip_path: String,
    #[serde(skip)]
    pub clip: Option<ClipRef>,
}

impl SequenceNode {
    pub fn new(clip: Option<ClipRef>) -> Self {
        Self {
            clip_path: clip
                .as_ref()
                .map(|c| c.path().to_string())
                .unwrap_or_default(),
            clip,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    IntLiteral { value: i32 },
    FloatLiteral { value: f32 },
    BoolLiteral { value: bool },
    Arithmetic { op: ArithmeticOp, ty: NumericType },
    Compare { op: CompareOp, ty: NumericType },
    Logic { op: LogicOp },
    Not,
    /// Ternary over `category`; only the chosen branch is pulled.
    Select { category: PinCategory },
    IsKeyDown { key_name: String },
    IsKeyPressed { key_name: String },
    GetMousePosition,
    GetVelocity,
    GetSpeed,
    IsFalling,
    /// Debug sink exposing whatever is wired into its `Value` input.
    Watch { category: PinCategory },
    Sequence(SequenceNode),
    BlendSpace(BlendSpaceNode),
    StateEntry,
    State { state_name: String },
    Transition,
}

impl NodeKind {
    /// Pins a freshly spawned node of this kind carries, in pin-index order.
    pub fn default_pins(&self) -> Vec<Pin> {
        use PinCategory::*;
        match self {
            NodeKind::IntLiteral { .. } => vec![Pin::output("Value", Int)],
            NodeKind::FloatLiteral { .. } => vec![Pin::output("Value", Float)],
            NodeKind::BoolLiteral { .. } => vec![Pin::output("Value", Bool)],
            NodeKind::Arithmetic { ty, .. } => {
                let c = ty.category();
                vec![
                    Pin::input("A", c, ""),
                    Pin::input("B", c, ""),
                    Pin::output("Result", c),
                ]
            }
            NodeKind::Compare { ty, .. } => {
                let c = ty.category();
                vec![
                    Pin::input("A", c, ""),
                    Pin::input("B", c, ""),
                    Pin::output("Result", Bool),
                ]
            }
            NodeKind::Logic { .. } => vec![
                Pin::input("A", Bool, ""),
                Pin::input("B", Bool, ""),
                Pin::output("Result", Bool),
            ],
            NodeKind::Not => vec![Pin::input("A", Bool, ""), Pin::output("Result", Bool)],
            NodeKind::Select { category } => vec![
                Pin::input("Condition", Bool, "false"),
                Pin::input("TrueValue", *category, category.default_text()),
                Pin::input("FalseValue", *category, category.default_text()),
                Pin::output("Result", *category),
            ],
            NodeKind::IsKeyDown { .. } | NodeKind::IsKeyPressed { .. } => {
                vec![Pin::output("Result", Bool)]
            }
            NodeKind::GetMousePosition => vec![Pin::output("X", Float), Pin::output("Y", Float)],
            NodeKind::GetVelocity => vec![
                Pin::output("X", Float),
                Pin::output("Y", Float),
                Pin::output("Z", Float),
            ],
            NodeKind::GetSpeed => vec![Pin::output("Speed", Float)],
            NodeKind::IsFalling => vec![Pin::output("Result", Bool)],
            NodeKind::Watch { category } => {
                vec![Pin::input("Value", *category, category.default_text())]
            }
            NodeKind::Sequence(_) => vec![Pin::output("Value", Pose)],
            NodeKind::BlendSpace(_) => vec![
                Pin::input("Parameter", Float, "0.0"),
                Pin::output("Output", Pose),
            ],
            NodeKind::StateEntry => vec![Pin::output("Entry", Exec)],
            NodeKind::State { .. } => vec![
                Pin::input("Enter", Exec, ""),
                Pin::output("Exit", Exec),
                Pin::input("Animation", Pose, ""),
                Pin::input("Looping", Bool, "false"),
                Pin::input("PlayRate", Float, "1.0"),
            ],
            NodeKind::Transition => vec![
                Pin::input("Execute", Exec, ""),
                Pin::output("Transition To", Exec),
                Pin::input("Can Transition", Bool, ""),
                Pin::input("Blend Time", Float, ""),
            ],
        }
    }

    /// Serialized tag of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::IntLiteral { .. } => "int_literal",
            NodeKind::FloatLiteral { .. } => "float_literal",
            NodeKind::BoolLiteral { .. } => "bool_literal",
            NodeKind::Arithmetic { .. } => "arithmetic",
            NodeKind::Compare { .. } => "compare",
            NodeKind::Logic { .. } => "logic",
            NodeKind::Not => "not",
            NodeKind::Select { .. } => "select",
            NodeKind::IsKeyDown { .. } => "is_key_down",
            NodeKind::IsKeyPressed { .. } => "is_key_pressed",
            NodeKind::GetMousePosition => "get_mouse_position",
            NodeKind::GetVelocity => "get_velocity",
            NodeKind::GetSpeed => "get_speed",
            NodeKind::IsFalling => "is_falling",
            NodeKind::Watch { .. } => "watch",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::BlendSpace(_) => "blend_space",
            NodeKind::StateEntry => "state_entry",
            NodeKind::State { .. } => "state",
            NodeKind::Transition => "transition",
        }
    }

    pub fn title(&self) -> String {
        match self {
            NodeKind::IntLiteral { .. } => "Int".into(),
            NodeKind::FloatLiteral { .. } => "Float".into(),
            NodeKind::BoolLiteral { .. } => "Bool".into(),
            NodeKind::Arithmetic { op, ty } => {
                let sym = match op {
                    ArithmeticOp::Add => "+",
                    ArithmeticOp::Subtract => "-",
                    ArithmeticOp::Multiply => "*",
                    ArithmeticOp::Divide => "/",
                };
                format!("{sym} ({})", type_label(*ty))
            }
            NodeKind::Compare { op, ty } => {
                let sym = match op {
                    CompareOp::Greater => ">",
                    CompareOp::Equal => "==",
                };
                format!("{sym} ({})", type_label(*ty))
            }
            NodeKind::Logic { op } => match op {
                LogicOp::And => "AND".into(),
                LogicOp::Or => "OR".into(),
                LogicOp::Xor => "XOR".into(),
            },
            NodeKind::Not => "NOT".into(),
            NodeKind::Select { category } => format!("Select ({category:?})"),
            NodeKind::IsKeyDown { .. } => "Is Key Down".into(),
            NodeKind::IsKeyPressed { .. } => "Is Key Pressed".into(),
            NodeKind::GetMousePosition => "Get Mouse Position".into(),
            NodeKind::GetVelocity => "Get Velocity".into(),
            NodeKind::GetSpeed => "Get Speed".into(),
            NodeKind::IsFalling => "Is Falling".into(),
            NodeKind::Watch { category } => format!("Watch ({category:?})"),
            NodeKind::Sequence(_) => "Animation Sequence".into(),
            NodeKind::BlendSpace(_) => "Blend Space 1D".into(),
            NodeKind::StateEntry => "Entry".into(),
            NodeKind::State { state_name } => format!("State: {state_name}"),
            NodeKind::Transition => "Transition".into(),
        }
    }

    /// Menu category in the node palette.
    pub fn menu_category(&self) -> &'static str {
        match self {
            NodeKind::IntLiteral { .. }
            | NodeKind::FloatLiteral { .. }
            | NodeKind::BoolLiteral { .. } => "Literals",
            NodeKind::Arithmetic { .. } | NodeKind::Compare { .. } => "Math",
            NodeKind::Logic { .. } | NodeKind::Not | NodeKind::Select { .. } => "Logic",
            NodeKind::IsKeyDown { .. }
            | NodeKind::IsKeyPressed { .. }
            | NodeKind::GetMousePosition => "Input",
            NodeKind::GetVelocity | NodeKind::GetSpeed | NodeKind::IsFalling => "Movement",
            NodeKind::Watch { .. } => "Debug",
            NodeKind::Sequence(_) | NodeKind::BlendSpace(_) => "Animation",
            NodeKind::StateEntry | NodeKind::State { .. } | NodeKind::Transition => {
                "State Machine"
            }
        }
    }

    /// Kinds whose pulls have side effects.
    pub fn is_stateful(&self) -> bool {
        matches!(self, NodeKind::BlendSpace(_))
    }

    /// Re-resolve clip references from their stored paths.
    pub fn resolve_assets(&mut self, assets: &dyn AssetRegistry) {
        match self {
            NodeKind::Sequence(seq) => {
                seq.clip = if seq.clip_path.is_empty() {
                    None
                } else {
                    assets.clip(&seq.clip_path)
                };
                if seq.clip.is_none() && !seq.clip_path.is_empty() {
                    warn!("sequence node: clip '{}' is not registered", seq.clip_path);
                }
            }
            NodeKind::BlendSpace(bs) => bs.resolve_assets(assets),
            _ => {}
        }
    }

    /// One default instance of every spawnable kind.
    pub fn catalogue(config: &Config) -> Vec<NodeKind> {
        let mut kinds = vec![
            NodeKind::IntLiteral { value: 0 },
            NodeKind::FloatLiteral { value: 0.0 },
            NodeKind::BoolLiteral { value: false },
        ];
        for ty in [NumericType::Int, NumericType::Float] {
            for op in [
                ArithmeticOp::Add,
                ArithmeticOp::Subtract,
                ArithmeticOp::Multiply,
                ArithmeticOp::Divide,
            ] {
                kinds.push(NodeKind::Arithmetic { op, ty });
            }
            for op in [CompareOp::Greater, CompareOp::Equal] {
                kinds.push(NodeKind::Compare { op, ty });
            }
        }
        for op in [LogicOp::And, LogicOp::Or, LogicOp::Xor] {
            kinds.push(NodeKind::Logic { op });
        }
        kinds.push(NodeKind::Not);
        for category in [
            PinCategory::Int,
            PinCategory::Float,
            PinCategory::Bool,
            PinCategory::Pose,
        ] {
            kinds.push(NodeKind::Select { category });
        }
        kinds.extend([
            NodeKind::IsKeyDown {
                key_name: String::new(),
            },
            NodeKind::IsKeyPressed {
                key_name: String::new(),
            },
            NodeKind::GetMousePosition,
            NodeKind::GetVelocity,
            NodeKind::GetSpeed,
            NodeKind::IsFalling,
        ]);
        for category in [PinCategory::Int, PinCategory::Float, PinCategory::Bool] {
            kinds.push(NodeKind::Watch { category });
        }
        kinds.extend([
            NodeKind::Sequence(SequenceNode::default()),
            NodeKind::BlendSpace(BlendSpaceNode::new(&config.blend_space)),
            NodeKind::StateEntry,
            NodeKind::State {
                state_name: "NewState".into(),
            },
            NodeKind::Transition,
        ]);
        kinds
    }
}

fn type_label(ty: NumericType) -> &'static str {
    match ty {
        NumericType::Int => "Int",
        NumericType::Float => "Float",
    }
}
