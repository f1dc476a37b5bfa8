//! Expression evaluation for the broken calculator.
//!
//! The algorithm is deliberately non-standard and is part of the game:
//! only *unlocked* `*`/`/` get real precedence, and locked operators
//! silently swallow their right operand instead of failing. Division by
//! zero is signalled with NaN, never an error type; it is the only
//! failure the domain knows about.

use crate::types::{Op, Unlocks};

/// Evaluate a left-to-right expression string under the current unlock
/// state.
///
/// Returns NaN on division by zero. Degenerate token streams (no
/// operands, or at least as many operators as operands) evaluate to 0.
pub fn evaluate(expression: &str, unlocks: &Unlocks) -> f64 {
    let numbers: Vec<f64> = expression
        .split(['+', '-', '*', '/'])
        .filter_map(|piece| piece.parse::<f64>().ok())
        .collect();
    let ops: Vec<char> = expression
        .chars()
        .filter(|c| matches!(c, '+' | '-' | '*' | '/'))
        .collect();

    if numbers.is_empty() || ops.len() >= numbers.len() {
        return 0.0;
    }

    // Pass 1: fold unlocked multiplication and division immediately.
    // Locked high-precedence operators are carried forward untouched.
    let mut folded_ops: Vec<char> = Vec::new();
    let mut folded_numbers: Vec<f64> = vec![numbers[0]];

    for (i, &op) in ops.iter().enumerate() {
        let right = numbers[i + 1];
        let unlocked_mul = op == '*' && unlocks.is_unlocked(Op::Mul);
        let unlocked_div = op == '/' && unlocks.is_unlocked(Op::Div);
        if unlocked_mul || unlocked_div {
            let left = folded_numbers.pop().unwrap_or(0.0);
            let value = if op == '*' {
                left * right
            } else {
                if right == 0.0 {
                    return f64::NAN;
                }
                left / right
            };
            folded_numbers.push(value);
        } else {
            folded_ops.push(op);
            folded_numbers.push(right);
        }
    }

    // Pass 2: left-to-right fold of whatever survived. Locked `-` and
    // any leftover `*`/`/` drop their right operand.
    let mut result = folded_numbers[0];
    for (i, &op) in folded_ops.iter().enumerate() {
        let right = folded_numbers[i + 1];
        result = match op {
            '+' => result + right,
            '-' if unlocks.is_unlocked(Op::Sub) => result - right,
            _ => result,
        };
    }

    result
}

/// Format a final result: whole values render as integers, everything
/// else in the natural decimal form.
pub fn format_result(value: f64) -> String {
    if value % 1.0 == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Format a live preview: like [`format_result`] but fractional values
/// are trimmed to at most four decimal places.
pub fn format_preview(value: f64) -> String {
    if value % 1.0 == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.4}", value)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
