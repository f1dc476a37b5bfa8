//! Script runner – execute scripted key sequences from YAML files.
//!
//! A script presses keypad keys one at a time and can assert on the
//! display, the live preview, and the unlock map after each press.
//! Used by `calcctl script` and by tests.

use crate::calculator::Calculator;
use crate::types::{new_run_id, Action, Op, ScriptResult, Status, StepResult};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to parse script YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    /// A single keypad key: a digit, `.`, `+ - * /`, `√`, `%`, `=`,
    /// `C`, or `<`.
    pub press: String,
    /// Expected display after the press.
    #[serde(default)]
    pub expect_display: Option<String>,
    /// Expected preview after the press; the empty string asserts that
    /// no preview is shown.
    #[serde(default)]
    pub expect_preview: Option<String>,
    /// Operations that must be unlocked after the press.
    #[serde(default)]
    pub expect_unlocked: Vec<Op>,
}

/// Load a script from a YAML string.
pub fn load_script(yaml: &str) -> Result<Script, ScriptError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Execute a script against an engine and return the overall result.
pub fn run_script(script: &Script, calc: &mut Calculator) -> ScriptResult {
    let run_id = new_run_id();
    let mut steps = Vec::new();
    let mut overall = Status::Pass;

    for (index, step) in script.steps.iter().enumerate() {
        let mut mismatches: Vec<String> = Vec::new();

        match Action::from_key(&step.press) {
            Some(action) => {
                calc.dispatch(action);

                if let Some(ref expected) = step.expect_display {
                    if calc.display() != expected {
                        mismatches.push(format!(
                            "display mismatch: expected {:?}, got {:?}",
                            expected,
                            calc.display()
                        ));
                    }
                }
                if let Some(ref expected) = step.expect_preview {
                    let actual = calc.preview().unwrap_or("");
                    if actual != expected {
                        mismatches.push(format!(
                            "preview mismatch: expected {:?}, got {:?}",
                            expected, actual
                        ));
                    }
                }
                for op in &step.expect_unlocked {
                    if !calc.is_unlocked(*op) {
                        mismatches.push(format!("expected {} to be unlocked", op));
                    }
                }
            }
            None => {
                mismatches.push(format!("unknown key: {:?}", step.press));
            }
        }

        let status = if mismatches.is_empty() {
            Status::Pass
        } else {
            Status::Fail
        };
        let message = if mismatches.is_empty() {
            None
        } else {
            Some(mismatches.join("; "))
        };

        if status == Status::Fail {
            tracing::warn!(
                step = index,
                key = %step.press,
                detail = message.as_deref().unwrap_or(""),
                "script step failed"
            );
            overall = Status::Fail;
        }

        steps.push(StepResult {
            index,
            key: step.press.clone(),
            status,
            display: calc.display().to_string(),
            preview: calc.preview().map(String::from),
            message,
        });
    }

    ScriptResult {
        run_id,
        name: script.name.clone(),
        overall_status: overall,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let yaml = r#"
name: unlock subtraction
steps:
  - press: "2"
  - press: "+"
  - press: "2"
    expect_preview: "4"
  - press: "="
    expect_display: "4"
    expect_unlocked: ["-"]
"#;
        let s = load_script(yaml).expect("should parse");
        assert_eq!(s.name, Some("unlock subtraction".into()));
        assert_eq!(s.steps.len(), 4);
        assert_eq!(s.steps[3].expect_unlocked, vec![Op::Sub]);
    }

    #[test]
    fn test_run_script_passes() {
        let yaml = r#"
steps:
  - press: "2"
    expect_display: "2"
  - press: "+"
  - press: "2"
  - press: "="
    expect_display: "4"
    expect_unlocked: ["-"]
"#;
        let script = load_script(yaml).unwrap();
        let mut calc = Calculator::new();
        let result = run_script(&script, &mut calc);
        assert_eq!(result.overall_status, Status::Pass);
        assert_eq!(result.steps.len(), 4);
    }

    #[test]
    fn test_run_script_reports_mismatch() {
        let yaml = r#"
steps:
  - press: "2"
    expect_display: "3"
"#;
        let script = load_script(yaml).unwrap();
        let mut calc = Calculator::new();
        let result = run_script(&script, &mut calc);
        assert_eq!(result.overall_status, Status::Fail);
        assert!(result.steps[0].message.as_ref().unwrap().contains("display"));
    }

    #[test]
    fn test_all_mismatches_are_reported() {
        let yaml = r#"
steps:
  - press: "2"
    expect_display: "3"
    expect_unlocked: ["-", "/"]
"#;
        let script = load_script(yaml).unwrap();
        let mut calc = Calculator::new();
        let result = run_script(&script, &mut calc);
        assert_eq!(result.overall_status, Status::Fail);
        let message = result.steps[0].message.as_ref().unwrap();
        assert!(message.contains("display mismatch"));
        assert!(message.contains("- to be unlocked"));
        assert!(message.contains("/ to be unlocked"));
    }

    #[test]
    fn test_run_script_unknown_key() {
        let yaml = r#"
steps:
  - press: "q"
"#;
        let script = load_script(yaml).unwrap();
        let mut calc = Calculator::new();
        let result = run_script(&script, &mut calc);
        assert_eq!(result.overall_status, Status::Fail);
    }

    #[test]
    fn test_empty_preview_expectation() {
        let yaml = r#"
steps:
  - press: "5"
    expect_preview: ""
"#;
        let script = load_script(yaml).unwrap();
        let mut calc = Calculator::new();
        let result = run_script(&script, &mut calc);
        assert_eq!(result.overall_status, Status::Pass);
    }
}
