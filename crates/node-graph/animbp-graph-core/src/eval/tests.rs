use std::sync::Arc;

use animbp_animation_core::{AnimationData, BoneKey, BoneTrack, ClipLibrary, ClipRef, Transform};

use super::*;
use crate::config::GraphConfig;
use crate::nodes::{ArithmeticOp, BlendSpaceNode, CompareOp, NodeKind, NumericType};
use crate::subject::{InputSource, KeyCode, MovementSource, NoSubject};
use crate::types::PinCategory;

fn approx(a: f32, b: f32) {
    assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
}

fn float(graph: &mut BlueprintGraph, value: f32) -> PinRef {
    let node = graph.add_node(NodeKind::FloatLiteral { value });
    graph.output_pin(node, "Value").expect("literal output")
}

fn binary(graph: &mut BlueprintGraph, op: ArithmeticOp, ty: NumericType) -> NodeHandle {
    graph.add_node(NodeKind::Arithmetic { op, ty })
}

fn input(graph: &BlueprintGraph, node: NodeHandle, name: &str) -> PinRef {
    graph.input_pin(node, name).expect("input pin")
}

fn output(graph: &BlueprintGraph, node: NodeHandle, name: &str) -> PinRef {
    graph.output_pin(node, name).expect("output pin")
}

fn clip(path: &str) -> ClipRef {
    Arc::new(AnimationData {
        name: path.to_string(),
        path: path.to_string(),
        duration_ms: 1000,
        frame_rate: 30.0,
        tracks: vec![BoneTrack {
            name: "root".into(),
            keys: vec![BoneKey {
                stamp: 0.0,
                transform: Transform::IDENTITY,
            }],
        }],
    })
}

#[derive(Default)]
struct TestSubject {
    down: Vec<KeyCode>,
    pressed: Vec<KeyCode>,
    mouse: [f32; 2],
    velocity: [f32; 3],
    falling: bool,
}

impl InputSource for TestSubject {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn mouse_position(&self) -> [f32; 2] {
        self.mouse
    }
}

impl MovementSource for TestSubject {
    fn velocity(&self) -> [f32; 3] {
        self.velocity
    }

    fn is_falling(&self) -> bool {
        self.falling
    }
}

impl AnimSubject for TestSubject {
    fn input(&self) -> Option<&dyn InputSource> {
        Some(self)
    }

    fn movement(&self) -> Option<&dyn MovementSource> {
        Some(self)
    }
}

#[test]
fn it_should_pull_linked_and_default_inputs() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let a = float(&mut graph, 1.5);
    let mul = binary(&mut graph, ArithmeticOp::Multiply, NumericType::Float);
    graph.link(a, input(&graph, mul, "A")).expect("link A");
    graph
        .set_pin_default(input(&graph, mul, "B"), "4")
        .expect("default B");

    let result = evaluate_pin(&graph, output(&graph, mul, "Result"), &ctx).expect("result");
    approx(result.as_float(), 6.0);

    // Unparseable defaults read as zero.
    graph
        .set_pin_default(input(&graph, mul, "B"), "four")
        .expect("default B");
    let result = evaluate_pin(&graph, output(&graph, mul, "Result"), &ctx).expect("result");
    approx(result.as_float(), 0.0);
}

#[test]
fn it_should_yield_zero_for_integer_division_by_zero() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let div = binary(&mut graph, ArithmeticOp::Divide, NumericType::Int);
    graph.set_pin_default(input(&graph, div, "A"), "7").expect("A");
    graph.set_pin_default(input(&graph, div, "B"), "0").expect("B");
    let result = evaluate_pin(&graph, output(&graph, div, "Result"), &ctx).expect("result");
    assert_eq!(result.as_int(), 0);

    graph.set_pin_default(input(&graph, div, "B"), "2").expect("B");
    let result = evaluate_pin(&graph, output(&graph, div, "Result"), &ctx).expect("result");
    assert_eq!(result.as_int(), 3);
}

#[test]
fn it_should_compare_floats() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let cmp = graph.add_node(NodeKind::Compare {
        op: CompareOp::Greater,
        ty: NumericType::Float,
    });
    let a = float(&mut graph, 10.0);
    graph.link(input(&graph, cmp, "A"), a).expect("link in either order");
    graph.set_pin_default(input(&graph, cmp, "B"), "5").expect("B");

    let result: bool = evaluate_input(&graph, Some(output(&graph, cmp, "Result")), &ctx);
    assert!(result);
}

#[test]
fn it_should_pull_output_pins_read_as_inputs() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let lit = float(&mut graph, 2.5);
    let value: f32 = evaluate_input(&graph, Some(lit), &ctx);
    approx(value, 2.5);

    let sub = binary(&mut graph, ArithmeticOp::Subtract, NumericType::Int);
    graph.set_pin_default(input(&graph, sub, "A"), "3").expect("A");
    graph.set_pin_default(input(&graph, sub, "B"), "8").expect("B");
    let mut ev = Evaluator::new(&graph, &ctx);
    let value: i32 = ev.evaluate_input(Some(output(&graph, sub, "Result")));
    assert_eq!(value, -5);
}

#[test]
fn it_should_only_pull_the_selected_branch() {
    let mut graph = BlueprintGraph::new();
    let mut assets = ClipLibrary::new();
    assets.insert(clip("clips/walk"));
    let ctx = EvalContext::new(&NoSubject, &assets);

    let mut node = BlendSpaceNode::default();
    node.set_slot_clip(0, assets.clip("clips/walk"));
    let space_handle = graph.add_node(NodeKind::BlendSpace(node));
    let param = float(&mut graph, 50.0);
    graph
        .link(param, input(&graph, space_handle, "Parameter"))
        .expect("link parameter");

    let select = graph.add_node(NodeKind::Select {
        category: PinCategory::Pose,
    });
    graph
        .link(output(&graph, space_handle, "Output"), input(&graph, select, "TrueValue"))
        .expect("link true branch");

    let space = match &graph.node(space_handle).expect("node").kind {
        NodeKind::BlendSpace(bs) => bs.blend_space().clone(),
        _ => unreachable!(),
    };

    let result = evaluate_pin(&graph, output(&graph, select, "Result"), &ctx).expect("result");
    assert!(result.into_pose().is_none());
    approx(space.borrow().current_parameter(), 0.0);

    graph
        .set_pin_default(input(&graph, select, "Condition"), "true")
        .expect("condition");
    let result = evaluate_pin(&graph, output(&graph, select, "Result"), &ctx).expect("result");
    assert!(result.into_pose().is_some());
    approx(space.borrow().current_parameter(), 50.0);
}

#[test]
fn it_should_break_cycles_with_defaults() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let x = binary(&mut graph, ArithmeticOp::Add, NumericType::Float);
    let y = binary(&mut graph, ArithmeticOp::Add, NumericType::Float);
    graph.set_pin_default(input(&graph, x, "B"), "1").expect("B");
    graph.set_pin_default(input(&graph, y, "B"), "1").expect("B");
    graph
        .link(output(&graph, x, "Result"), input(&graph, y, "A"))
        .expect("x -> y");
    graph
        .link(output(&graph, y, "Result"), input(&graph, x, "A"))
        .expect("y -> x");

    // x pulls y, y meets x on the stack and reads 0: y = 1, x = 2.
    let result = evaluate_pin(&graph, output(&graph, x, "Result"), &ctx).expect("result");
    approx(result.as_float(), 2.0);
}

#[test]
fn it_should_stop_at_the_depth_limit() {
    let mut graph = BlueprintGraph::with_config(GraphConfig {
        max_pull_depth: 3,
        ..GraphConfig::default()
    });
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let mut prev: Option<NodeHandle> = None;
    for _ in 0..5 {
        let node = binary(&mut graph, ArithmeticOp::Add, NumericType::Float);
        graph.set_pin_default(input(&graph, node, "B"), "1").expect("B");
        match prev {
            Some(p) => graph
                .link(output(&graph, p, "Result"), input(&graph, node, "A"))
                .expect("chain"),
            None => graph.set_pin_default(input(&graph, node, "A"), "1").expect("A"),
        }
        prev = Some(node);
    }
    let last = prev.expect("chain built");

    // Unbounded this would be 6; the fourth nested pull is cut off at 0.
    let result = evaluate_pin(&graph, output(&graph, last, "Result"), &ctx).expect("result");
    approx(result.as_float(), 3.0);
}

#[test]
fn it_should_treat_stale_handles_as_defaults() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let lit = float(&mut graph, 3.0);
    graph.remove_node(lit.node).expect("remove");
    assert!(evaluate_pin(&graph, lit, &ctx).is_none());

    // Slot reuse must not revive the old handle.
    let reused = float(&mut graph, 9.0);
    assert_eq!(reused.node.index(), lit.node.index());
    assert!(evaluate_pin(&graph, lit, &ctx).is_none());
    let value: f32 = evaluate_input(&graph, Some(lit), &ctx);
    approx(value, 0.0);
    let value: f32 = evaluate_input(&graph, None, &ctx);
    approx(value, 0.0);
}

#[test]
fn it_should_read_the_subject() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let subject = TestSubject {
        down: vec![KeyCode::Char('W')],
        pressed: vec![KeyCode::Space],
        mouse: [12.0, 34.0],
        velocity: [3.0, 4.0, 0.0],
        falling: true,
    };
    let ctx = EvalContext::new(&subject, &assets);

    let w_down = graph.add_node(NodeKind::IsKeyDown {
        key_name: "w".into(),
    });
    let space_pressed = graph.add_node(NodeKind::IsKeyPressed {
        key_name: "Space".into(),
    });
    let bogus = graph.add_node(NodeKind::IsKeyDown {
        key_name: "NotAKey".into(),
    });
    let mouse = graph.add_node(NodeKind::GetMousePosition);
    let velocity = graph.add_node(NodeKind::GetVelocity);
    let speed = graph.add_node(NodeKind::GetSpeed);
    let falling = graph.add_node(NodeKind::IsFalling);

    let pull = |node: NodeHandle, pin: &str| {
        evaluate_pin(&graph, output(&graph, node, pin), &ctx).expect("value")
    };
    assert!(pull(w_down, "Result").as_bool());
    assert!(pull(space_pressed, "Result").as_bool());
    assert!(!pull(bogus, "Result").as_bool());
    approx(pull(mouse, "Y").as_float(), 34.0);
    approx(pull(velocity, "X").as_float(), 3.0);
    approx(pull(speed, "Speed").as_float(), 5.0);
    assert!(pull(falling, "Result").as_bool());

    let empty = EvalContext::new(&NoSubject, &assets);
    let speed_pin = output(&graph, speed, "Speed");
    approx(evaluate_pin(&graph, speed_pin, &empty).expect("speed").as_float(), 0.0);
    let falling_pin = output(&graph, falling, "Result");
    assert!(!evaluate_pin(&graph, falling_pin, &empty).expect("falling").as_bool());
}

#[test]
fn it_should_watch_inputs() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let ctx = EvalContext::new(&NoSubject, &assets);

    let watch = graph.add_node(NodeKind::Watch {
        category: PinCategory::Float,
    });
    let value = graph.watch(watch, &ctx).expect("watch value");
    approx(value.as_float(), 0.0);

    let lit = float(&mut graph, 2.5);
    graph.link(lit, input(&graph, watch, "Value")).expect("link");
    approx(graph.watch(watch, &ctx).expect("watch value").as_float(), 2.5);

    assert!(graph.watch(lit.node, &ctx).is_none());
}

#[test]
fn it_should_count_blend_space_pulls_per_frame() {
    let mut graph = BlueprintGraph::new();
    let assets = ClipLibrary::new();
    let node = graph.add_node(NodeKind::BlendSpace(BlendSpaceNode::default()));
    let out = output(&graph, node, "Output");
    let bs = match &graph.node(node).expect("node").kind {
        NodeKind::BlendSpace(bs) => bs,
        _ => unreachable!(),
    };

    let frame_one = EvalContext::new(&NoSubject, &assets).with_frame(1);
    evaluate_pin(&graph, out, &frame_one);
    evaluate_pin(&graph, out, &frame_one);
    assert_eq!(bs.note_pull(1), 3);
    assert_eq!(bs.note_pull(2), 1);
}
