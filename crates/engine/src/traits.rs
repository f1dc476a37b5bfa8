use crate::types::{Op, SavedFlags, Theme};

/// Result type for settings-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Settings persistence
// ---------------------------------------------------------------------------

/// Asynchronous key-value store for unlock flags and the theme setting.
///
/// The engine reads the whole flag set once at startup and writes
/// individual flags as side effects of actions. Writes are
/// last-write-wins and idempotent; callers never block on them.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current flag snapshot; defaults when nothing was ever saved.
    async fn load(&self) -> StoreResult<SavedFlags>;

    async fn set_operation_unlocked(&self, op: Op, unlocked: bool) -> StoreResult<()>;

    async fn set_all_operations_already_unlocked(&self, unlocked: bool) -> StoreResult<()>;

    async fn set_answer_achievement_unlocked(&self, unlocked: bool) -> StoreResult<()>;

    async fn set_theme(&self, theme: Theme) -> StoreResult<()>;

    /// Clear every boolean flag at once (the explicit player reset).
    async fn reset_operations(&self) -> StoreResult<()>;
}
