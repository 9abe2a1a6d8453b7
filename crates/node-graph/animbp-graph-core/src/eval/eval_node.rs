//! Per-kind evaluation.
//!
//! Pure kinds read all of their inputs; `Select` reads its condition and then only the
//! chosen branch. `BlendSpace` pushes its parameter into the owned blend space as a side
//! effect of being pulled. State machine kinds are read by the compiler, never pulled.

use animbp_animation_core::PoseSource;
use log::{trace, warn};

use crate::graph::Node;
use crate::nodes::{NodeKind, NumericType};
use crate::subject::KeyCode;
use crate::types::{NodeHandle, PinCategory};
use crate::value::Value;

use super::numeric::{compare, float_arithmetic, int_arithmetic, length3, logic};
use super::Evaluator;

/// Evaluate output pin `pin_index` of `node`.
pub fn evaluate_pin(
    ev: &mut Evaluator<'_, '_>,
    handle: NodeHandle,
    node: &Node,
    pin_index: usize,
) -> Value {
    let Some(pin) = node.pins.get(pin_index) else {
        return Value::Bool(false);
    };
    let category = pin.category;
    let name = pin.name.as_str();

    match &node.kind {
        NodeKind::IntLiteral { value } => literal(name, Value::Int(*value), category),
        NodeKind::FloatLiteral { value } => literal(name, Value::Float(*value), category),
        NodeKind::BoolLiteral { value } => literal(name, Value::Bool(*value), category),
        NodeKind::Arithmetic { op, ty } => {
            if name != "Result" {
                return Value::zero(category);
            }
            match ty {
                NumericType::Int => {
                    let a: i32 = ev.input(handle, "A");
                    let b: i32 = ev.input(handle, "B");
                    Value::Int(int_arithmetic(*op, a, b))
                }
                NumericType::Float => {
                    let a: f32 = ev.input(handle, "A");
                    let b: f32 = ev.input(handle, "B");
                    Value::Float(float_arithmetic(*op, a, b))
                }
            }
        }
        NodeKind::Compare { op, ty } => {
            if name != "Result" {
                return Value::zero(category);
            }
            let result = match ty {
                NumericType::Int => {
                    let a: i32 = ev.input(handle, "A");
                    let b: i32 = ev.input(handle, "B");
                    compare(*op, a, b)
                }
                NumericType::Float => {
                    let a: f32 = ev.input(handle, "A");
                    let b: f32 = ev.input(handle, "B");
                    compare(*op, a, b)
                }
            };
            Value::Bool(result)
        }
        NodeKind::Logic { op } => {
            if name != "Result" {
                return Value::zero(category);
            }
            let a: bool = ev.input(handle, "A");
            let b: bool = ev.input(handle, "B");
            Value::Bool(logic(*op, a, b))
        }
        NodeKind::Not => {
            if name != "Result" {
                return Value::zero(category);
            }
            let a: bool = ev.input(handle, "A");
            Value::Bool(!a)
        }
        NodeKind::Select { category: branch_category } => {
            if name != "Result" {
                return Value::zero(category);
            }
            let condition: bool = ev.input(handle, "Condition");
            let branch = if condition { "TrueValue" } else { "FalseValue" };
            ev.input_named(handle, branch)
                .unwrap_or_else(|| Value::zero(*branch_category))
        }
        NodeKind::IsKeyDown { key_name } => {
            let down = KeyCode::from_name(key_name)
                .zip(ev.context().subject.input())
                .is_some_and(|(key, input)| input.is_key_down(key));
            Value::Bool(down)
        }
        NodeKind::IsKeyPressed { key_name } => {
            let pressed = KeyCode::from_name(key_name)
                .zip(ev.context().subject.input())
                .is_some_and(|(key, input)| input.is_key_pressed(key));
            Value::Bool(pressed)
        }
        NodeKind::GetMousePosition => {
            let pos = ev
                .context()
                .subject
                .input()
                .map(|i| i.mouse_position())
                .unwrap_or([0.0, 0.0]);
            match name {
                "X" => Value::Float(pos[0]),
                "Y" => Value::Float(pos[1]),
                _ => Value::zero(category),
            }
        }
        NodeKind::GetVelocity => {
            let v = velocity(ev);
            match name {
                "X" => Value::Float(v[0]),
                "Y" => Value::Float(v[1]),
                "Z" => Value::Float(v[2]),
                _ => Value::zero(category),
            }
        }
        NodeKind::GetSpeed => Value::Float(length3(velocity(ev))),
        NodeKind::IsFalling => Value::Bool(
            ev.context()
                .subject
                .movement()
                .is_some_and(|m| m.is_falling()),
        ),
        NodeKind::Watch { category: watched } => ev
            .input_named(handle, "Value")
            .unwrap_or_else(|| Value::zero(*watched)),
        NodeKind::Sequence(seq) => {
            if name != "Value" {
                return Value::zero(category);
            }
            Value::Pose(seq.clip.clone().map(PoseSource::Sequence))
        }
        NodeKind::BlendSpace(bs) => {
            if name != "Output" {
                return Value::zero(category);
            }
            let parameter: f32 = ev.input(handle, "Parameter");
            let frame = ev.context().frame;
            let pulls = bs.note_pull(frame);
            let report = cfg!(debug_assertions) && ev.graph().config().report_repeated_pulls;
            if pulls > 1 && report {
                warn!(
                    "blend space node {} pulled {pulls} times in frame {frame}; expected once",
                    node.id
                );
            }
            trace!("blend space node {}: parameter={parameter}", node.id);
            bs.drive(parameter);
            Value::Pose(Some(PoseSource::BlendSpace(bs.blend_space().clone())))
        }
        NodeKind::StateEntry | NodeKind::State { .. } | NodeKind::Transition => {
            trace!("eval: state machine node {} is not pullable", node.id);
            Value::zero(category)
        }
    }
}

fn literal(pin_name: &str, value: Value, category: PinCategory) -> Value {
    if pin_name == "Value" {
        value
    } else {
        Value::zero(category)
    }
}

fn velocity(ev: &Evaluator<'_, '_>) -> [f32; 3] {
    ev.context()
        .subject
        .movement()
        .map(|m| m.velocity())
        .unwrap_or([0.0; 3])
}
