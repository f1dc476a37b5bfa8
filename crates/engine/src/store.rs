//! Settings-store implementations.
//!
//! - [`JsonFileStore`]: flags as a JSON document on disk
//! - [`MemoryStore`]: in-memory store for tests and ephemeral runs

use crate::traits::{SettingsStore, StoreResult};
use crate::types::{Op, SavedFlags, Theme};
use std::path::PathBuf;
use std::sync::Mutex;

fn clear_booleans(flags: &mut SavedFlags) {
    // Theme survives a reset; only the game progress is wiped.
    flags.subtraction_unlocked = false;
    flags.division_unlocked = false;
    flags.multiplication_unlocked = false;
    flags.sqrt_unlocked = false;
    flags.percent_unlocked = false;
    flags.all_operations_unlocked_already = false;
    flags.answer_achievement_unlocked = false;
}

fn set_operation(flags: &mut SavedFlags, op: Op, unlocked: bool) {
    match op {
        Op::Sub => flags.subtraction_unlocked = unlocked,
        Op::Div => flags.division_unlocked = unlocked,
        Op::Mul => flags.multiplication_unlocked = unlocked,
        Op::Sqrt => flags.sqrt_unlocked = unlocked,
        Op::Percent => flags.percent_unlocked = unlocked,
        // "+" has no persisted flag; it is always unlocked.
        Op::Add => {}
    }
}

// ===========================================================================
// JSON file store
// ===========================================================================

/// Flag storage as a single pretty-printed JSON file. A missing file
/// reads as defaults. Writers are drained sequentially by the persist
/// worker, so read-modify-write here needs no file locking.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_flags(&self) -> StoreResult<SavedFlags> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SavedFlags::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_flags(&self, flags: &SavedFlags) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(flags)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn update(&self, apply: impl FnOnce(&mut SavedFlags) + Send) -> StoreResult<()> {
        let mut flags = self.read_flags().await?;
        apply(&mut flags);
        self.write_flags(&flags).await
    }
}

#[async_trait::async_trait]
impl SettingsStore for JsonFileStore {
    async fn load(&self) -> StoreResult<SavedFlags> {
        self.read_flags().await
    }

    async fn set_operation_unlocked(&self, op: Op, unlocked: bool) -> StoreResult<()> {
        self.update(|f| set_operation(f, op, unlocked)).await
    }

    async fn set_all_operations_already_unlocked(&self, unlocked: bool) -> StoreResult<()> {
        self.update(|f| f.all_operations_unlocked_already = unlocked)
            .await
    }

    async fn set_answer_achievement_unlocked(&self, unlocked: bool) -> StoreResult<()> {
        self.update(|f| f.answer_achievement_unlocked = unlocked)
            .await
    }

    async fn set_theme(&self, theme: Theme) -> StoreResult<()> {
        self.update(|f| f.theme = theme).await
    }

    async fn reset_operations(&self) -> StoreResult<()> {
        self.update(clear_booleans).await
    }
}

// ===========================================================================
// Memory store – tests and `--ephemeral` runs
// ===========================================================================

pub struct MemoryStore {
    flags: Mutex<SavedFlags>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_flags(SavedFlags::default())
    }

    pub fn with_flags(flags: SavedFlags) -> Self {
        Self {
            flags: Mutex::new(flags),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SavedFlags)) {
        let mut guard = self.flags.lock().expect("settings lock poisoned");
        apply(&mut guard);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> StoreResult<SavedFlags> {
        Ok(self.flags.lock().expect("settings lock poisoned").clone())
    }

    async fn set_operation_unlocked(&self, op: Op, unlocked: bool) -> StoreResult<()> {
        self.update(|f| set_operation(f, op, unlocked));
        Ok(())
    }

    async fn set_all_operations_already_unlocked(&self, unlocked: bool) -> StoreResult<()> {
        self.update(|f| f.all_operations_unlocked_already = unlocked);
        Ok(())
    }

    async fn set_answer_achievement_unlocked(&self, unlocked: bool) -> StoreResult<()> {
        self.update(|f| f.answer_achievement_unlocked = unlocked);
        Ok(())
    }

    async fn set_theme(&self, theme: Theme) -> StoreResult<()> {
        self.update(|f| f.theme = theme);
        Ok(())
    }

    async fn reset_operations(&self) -> StoreResult<()> {
        self.update(clear_booleans);
        Ok(())
    }
}
