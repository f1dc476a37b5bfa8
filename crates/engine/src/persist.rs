//! Fire-and-forget persistence worker.
//!
//! Engine actions never wait on the settings store: they push a
//! [`PersistCommand`] into an unbounded channel and move on. A single
//! spawned task drains the channel in order and applies each command.
//! Failures are logged and dropped; completion ordering relative to
//! later engine actions is explicitly not guaranteed.

use crate::traits::SettingsStore;
use crate::types::{Op, Theme};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PersistCommand {
    SetOperationUnlocked(Op, bool),
    SetAllOperationsAlreadyUnlocked(bool),
    SetAnswerAchievementUnlocked(bool),
    SetTheme(Theme),
    ResetOperations,
}

/// Spawn the write-behind worker for a store.
///
/// The returned handle completes once every sender is dropped and the
/// queue is drained, which is how tests wait for writes
/// deterministically.
pub fn spawn_persist_worker(
    store: Arc<dyn SettingsStore>,
) -> (UnboundedSender<PersistCommand>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<PersistCommand>();

    let handle = tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            let result = match cmd {
                PersistCommand::SetOperationUnlocked(op, v) => {
                    store.set_operation_unlocked(op, v).await
                }
                PersistCommand::SetAllOperationsAlreadyUnlocked(v) => {
                    store.set_all_operations_already_unlocked(v).await
                }
                PersistCommand::SetAnswerAchievementUnlocked(v) => {
                    store.set_answer_achievement_unlocked(v).await
                }
                PersistCommand::SetTheme(theme) => store.set_theme(theme).await,
                PersistCommand::ResetOperations => store.reset_operations().await,
            };
            if let Err(e) = result {
                tracing::warn!(?cmd, error = %e, "settings write failed");
            }
        }
    });

    (tx, handle)
}
