//! The in-game hint table: one entry per cheat, each carrying the
//! literal trigger snippet that doubles as the hint text.

use crate::calculator::Calculator;
use crate::types::Op;

pub struct Hint {
    pub description: &'static str,
    /// The cheat condition, shown verbatim to the player.
    pub code: &'static str,
    predicate: fn(&Calculator) -> bool,
}

impl Hint {
    pub fn is_unlocked(&self, calc: &Calculator) -> bool {
        (self.predicate)(calc)
    }
}

pub const HINTS: &[Hint] = &[
    Hint {
        description: "Subtraction (-)",
        code: "if expression == \"2+2\" { unlock(\"-\") }",
        predicate: |c| c.is_unlocked(Op::Sub),
    },
    Hint {
        description: "Division (/)",
        code: "if expression == \"5-1\" { unlock(\"/\") }",
        predicate: |c| c.is_unlocked(Op::Div),
    },
    Hint {
        description: "Multiplication (*)",
        code: "if result.is_nan() { unlock(\"*\") }",
        predicate: |c| c.is_unlocked(Op::Mul),
    },
    Hint {
        description: "Square Root (√)",
        code: "if expression == \"9*9\" { unlock(\"√\") }",
        predicate: |c| c.is_unlocked(Op::Sqrt),
    },
    Hint {
        description: "Percentage (%)",
        code: "if expression == \"100/10\" { unlock(\"%\") }",
        predicate: |c| c.is_unlocked(Op::Percent),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    #[test]
    fn test_hint_state_follows_unlocks() {
        let mut calc = Calculator::new();
        assert!(HINTS.iter().all(|h| !h.is_unlocked(&calc)));

        for key in ["2", "+", "2", "="] {
            calc.dispatch(Action::from_key(key).unwrap());
        }
        let unlocked: Vec<&str> = HINTS
            .iter()
            .filter(|h| h.is_unlocked(&calc))
            .map(|h| h.description)
            .collect();
        assert_eq!(unlocked, vec!["Subtraction (-)"]);
    }
}
