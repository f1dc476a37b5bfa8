//! Achievement table.
//!
//! Achievements are pure predicates over the engine state, evaluated on
//! demand. Nothing here is stored; the sticky flags that feed the
//! predicates live in [`crate::calculator::Calculator`].

use crate::calculator::Calculator;
use crate::types::Op;

pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    predicate: fn(&Calculator) -> bool,
}

impl Achievement {
    pub fn is_unlocked(&self, calc: &Calculator) -> bool {
        (self.predicate)(calc)
    }
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_step",
        title: "The First Step",
        description: "Unlock the subtraction operation.",
        predicate: |c| c.is_unlocked(Op::Sub),
    },
    Achievement {
        id: "second_step",
        title: "The Second Step",
        description: "Unlock the division operation.",
        predicate: |c| c.is_unlocked(Op::Div),
    },
    Achievement {
        id: "third_step",
        title: "The Third Step",
        description: "Unlock the multiplication operation.",
        predicate: |c| c.is_unlocked(Op::Mul),
    },
    Achievement {
        id: "whole_calculator",
        title: "The Whole Calculator",
        description: "Unlock all operations.",
        predicate: |c| c.all_operations_already_unlocked(),
    },
    Achievement {
        id: "the_answer",
        title: "The Answer",
        description: "Calculate the answer to the ultimate question of life, \
                      the universe, and everything.",
        predicate: |c| c.answer_achievement_unlocked(),
    },
    Achievement {
        id: "root_of_the_problem",
        title: "Root of the Problem",
        description: "Unlock the square root operation.",
        predicate: |c| c.is_unlocked(Op::Sqrt),
    },
    Achievement {
        id: "small_percentage",
        title: "A Small Percentage",
        description: "Unlock the percentage operation.",
        predicate: |c| c.is_unlocked(Op::Percent),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, SavedFlags};

    fn by_id(id: &str) -> &'static Achievement {
        ACHIEVEMENTS.iter().find(|a| a.id == id).unwrap()
    }

    #[test]
    fn test_fresh_engine_has_no_achievements() {
        let calc = Calculator::new();
        for a in ACHIEVEMENTS {
            assert!(!a.is_unlocked(&calc), "{} should start locked", a.id);
        }
    }

    #[test]
    fn test_first_step_tracks_subtraction() {
        let mut calc = Calculator::new();
        for key in ["2", "+", "2", "="] {
            calc.dispatch(Action::from_key(key).unwrap());
        }
        assert!(by_id("first_step").is_unlocked(&calc));
        assert!(!by_id("second_step").is_unlocked(&calc));
    }

    #[test]
    fn test_whole_calculator_needs_dismissed_celebration() {
        let calc = Calculator::from_flags(&SavedFlags {
            subtraction_unlocked: true,
            division_unlocked: true,
            multiplication_unlocked: true,
            sqrt_unlocked: true,
            percent_unlocked: true,
            ..SavedFlags::default()
        });
        // All ops are on, but the sticky flag is what counts.
        assert!(!by_id("whole_calculator").is_unlocked(&calc));
    }

    #[test]
    fn test_the_answer() {
        let mut calc = Calculator::new();
        for key in ["4", "0", "+", "2", "="] {
            calc.dispatch(Action::from_key(key).unwrap());
        }
        assert!(by_id("the_answer").is_unlocked(&calc));
    }
}
