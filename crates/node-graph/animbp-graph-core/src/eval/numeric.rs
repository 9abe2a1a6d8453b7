//! Operator helpers shared by the math and logic nodes.

use log::warn;

use crate::nodes::{ArithmeticOp, CompareOp, LogicOp};

/// Integer arithmetic with wrapping overflow. Division by zero (and `MIN / -1`) yields 0.
pub fn int_arithmetic(op: ArithmeticOp, a: i32, b: i32) -> i32 {
    match op {
        ArithmeticOp::Add => a.wrapping_add(b),
        ArithmeticOp::Subtract => a.wrapping_sub(b),
        ArithmeticOp::Multiply => a.wrapping_mul(b),
        ArithmeticOp::Divide => a.checked_div(b).unwrap_or_else(|| {
            warn!("eval: integer division {a} / {b} is undefined; using 0");
            0
        }),
    }
}

/// IEEE float arithmetic; division by zero gives infinity or NaN.
pub fn float_arithmetic(op: ArithmeticOp, a: f32, b: f32) -> f32 {
    match op {
        ArithmeticOp::Add => a + b,
        ArithmeticOp::Subtract => a - b,
        ArithmeticOp::Multiply => a * b,
        ArithmeticOp::Divide => a / b,
    }
}

pub fn compare<T: PartialOrd>(op: CompareOp, a: T, b: T) -> bool {
    match op {
        CompareOp::Greater => a > b,
        CompareOp::Equal => a == b,
    }
}

pub fn logic(op: LogicOp, a: bool, b: bool) -> bool {
    match op {
        LogicOp::And => a && b,
        LogicOp::Or => a || b,
        LogicOp::Xor => a ^ b,
    }
}

/// Length of a 3-vector.
pub fn length3(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
