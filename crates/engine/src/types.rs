use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// One of the six calculator operations. Only `Add` starts unlocked;
/// the rest are earned through cheat expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "√")]
    Sqrt,
    #[serde(rename = "%")]
    Percent,
}

impl Op {
    pub const ALL: [Op; 6] = [Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Sqrt, Op::Percent];

    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Sqrt => '√',
            Op::Percent => '%',
        }
    }

    pub fn from_symbol(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            '√' => Some(Op::Sqrt),
            '%' => Some(Op::Percent),
            _ => None,
        }
    }

    /// The four operators that can appear inside an expression string.
    pub fn is_binary(self) -> bool {
        matches!(self, Op::Add | Op::Sub | Op::Mul | Op::Div)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Unlock state
// ---------------------------------------------------------------------------

/// Per-operation unlock map. `+` is always unlocked; every other entry
/// flips to true at most once and stays true until an explicit reset.
#[derive(Debug, Clone)]
pub struct Unlocks {
    map: HashMap<Op, bool>,
}

impl Unlocks {
    pub fn new() -> Self {
        Self::from_flags(&SavedFlags::default())
    }

    pub fn from_flags(flags: &SavedFlags) -> Self {
        let mut map = HashMap::new();
        map.insert(Op::Add, true);
        map.insert(Op::Sub, flags.subtraction_unlocked);
        map.insert(Op::Mul, flags.multiplication_unlocked);
        map.insert(Op::Div, flags.division_unlocked);
        map.insert(Op::Sqrt, flags.sqrt_unlocked);
        map.insert(Op::Percent, flags.percent_unlocked);
        Self { map }
    }

    pub fn is_unlocked(&self, op: Op) -> bool {
        self.map.get(&op).copied().unwrap_or(false)
    }

    pub fn unlock(&mut self, op: Op) {
        self.map.insert(op, true);
    }

    pub fn all_unlocked(&self) -> bool {
        Op::ALL.iter().all(|op| self.is_unlocked(*op))
    }

    /// Back to the factory state: everything locked except `+`.
    pub fn reset(&mut self) {
        for op in Op::ALL {
            self.map.insert(op, op == Op::Add);
        }
    }

    /// Stable-ordered view keyed by operator symbol, for snapshots.
    pub fn as_symbol_map(&self) -> BTreeMap<String, bool> {
        Op::ALL
            .iter()
            .map(|op| (op.symbol().to_string(), self.is_unlocked(*op)))
            .collect()
    }
}

impl Default for Unlocks {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Actions – the engine's entire inbound contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "arg", rename_all = "snake_case")]
pub enum Action {
    Number(String),
    Operation(Op),
    UnaryOperation(Op),
    Clear,
    Backspace,
    Equals,
    Reset,
    ShowHints,
    HideHints,
    ShowAchievements,
    HideAchievements,
    DismissUnlockMessage,
    DismissCelebration,
}

impl Action {
    /// Map a single keypad key to an action. Shared by the REPL, the
    /// `keys` subcommand, and script files.
    ///
    /// Digits and `.` become `Number`; `+ - * /` become `Operation`;
    /// `√` and `%` are the unary keys; `=` evaluates; `C`/`c` clears;
    /// `<` or `⌫` is backspace.
    pub fn from_key(key: &str) -> Option<Action> {
        let mut chars = key.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c {
            '0'..='9' | '.' => Some(Action::Number(c.to_string())),
            '=' => Some(Action::Equals),
            'C' | 'c' => Some(Action::Clear),
            '<' | '⌫' => Some(Action::Backspace),
            '√' => Some(Action::UnaryOperation(Op::Sqrt)),
            '%' => Some(Action::UnaryOperation(Op::Percent)),
            _ => Op::from_symbol(c)
                .filter(|op| op.is_binary())
                .map(Action::Operation),
        }
    }
}

// ---------------------------------------------------------------------------
// Observable outputs
// ---------------------------------------------------------------------------

/// Serializable view of everything a frontend renders after an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub unlocked: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_unlock_message: Option<String>,
    pub show_celebration: bool,
    pub answer_achievement_unlocked: bool,
    pub calculations: u64,
}

// ---------------------------------------------------------------------------
// Persisted settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// The flag set read once at startup and written back piecemeal as the
/// player unlocks things.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SavedFlags {
    pub subtraction_unlocked: bool,
    pub division_unlocked: bool,
    pub multiplication_unlocked: bool,
    pub sqrt_unlocked: bool,
    pub percent_unlocked: bool,
    pub all_operations_unlocked_already: bool,
    pub answer_achievement_unlocked: bool,
    pub theme: Theme,
}

// ---------------------------------------------------------------------------
// Script results – the stable output contract of scripted runs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub index: usize,
    pub key: String,
    pub status: Status,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Mismatch detail when the step failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptResult {
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub overall_status: Status,
    pub steps: Vec<StepResult>,
}

// ---------------------------------------------------------------------------
// Serve / daemon protocol
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    pub id: String,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a new run ID (UUIDv4).
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
