// ABOUTME: Persistence boundary for the food log, user profile, and daily goals snapshots
// ABOUTME: JSON file repository with whole-file replacement and an in-memory repository
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use calai_core::constants::storage_keys;
use calai_core::models::{DailyGoals, FoodLogEntry, UserProfile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Load and save the three persisted snapshots
///
/// Missing snapshots load as an empty log, an absent profile, and absent
/// goals. Each save replaces the whole snapshot.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Stored log entries in insertion order
    async fn load_logs(&self) -> AppResult<Vec<FoodLogEntry>>;

    /// Replace the stored log
    async fn save_logs(&self, entries: &[FoodLogEntry]) -> AppResult<()>;

    /// Stored profile, if onboarding completed
    async fn load_profile(&self) -> AppResult<Option<UserProfile>>;

    /// Replace the stored profile
    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()>;

    /// Stored goals
    async fn load_goals(&self) -> AppResult<Option<DailyGoals>>;

    /// Replace the stored goals
    async fn save_goals(&self, goals: &DailyGoals) -> AppResult<()>;
}

/// One JSON file per storage key inside a data directory
#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    /// Repository rooted at `dir`; the directory is created on first save
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Data directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "No snapshot stored yet");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                ))
                .with_source(e))
            }
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::serialization(format!("Corrupt snapshot {}: {e}", path.display()))
                .with_source(e)
        })?;
        debug!(key, bytes = bytes.len(), "Loaded snapshot");
        Ok(Some(value))
    }

    async fn write<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(value)?;
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &path).await?;
        debug!(key, bytes = json.len(), "Saved snapshot");
        Ok(())
    }
}

#[async_trait]
impl StateRepository for FileRepository {
    async fn load_logs(&self) -> AppResult<Vec<FoodLogEntry>> {
        Ok(self.read(storage_keys::LOGS).await?.unwrap_or_default())
    }

    async fn save_logs(&self, entries: &[FoodLogEntry]) -> AppResult<()> {
        self.write(storage_keys::LOGS, entries).await
    }

    async fn load_profile(&self) -> AppResult<Option<UserProfile>> {
        self.read(storage_keys::PROFILE).await
    }

    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.write(storage_keys::PROFILE, profile).await
    }

    async fn load_goals(&self) -> AppResult<Option<DailyGoals>> {
        self.read(storage_keys::GOALS).await
    }

    async fn save_goals(&self, goals: &DailyGoals) -> AppResult<()> {
        self.write(storage_keys::GOALS, goals).await
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    logs: Vec<FoodLogEntry>,
    profile: Option<UserProfile>,
    goals: Option<DailyGoals>,
}

/// Repository held in memory, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
    fail_saves: AtomicBool,
}

impl MemoryRepository {
    /// Empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail with a storage error
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::storage("Memory repository is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl StateRepository for MemoryRepository {
    async fn load_logs(&self) -> AppResult<Vec<FoodLogEntry>> {
        Ok(self.state.read().await.logs.clone())
    }

    async fn save_logs(&self, entries: &[FoodLogEntry]) -> AppResult<()> {
        self.check_writable()?;
        self.state.write().await.logs = entries.to_vec();
        Ok(())
    }

    async fn load_profile(&self) -> AppResult<Option<UserProfile>> {
        Ok(self.state.read().await.profile.clone())
    }

    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.check_writable()?;
        self.state.write().await.profile = Some(profile.clone());
        Ok(())
    }

    async fn load_goals(&self) -> AppResult<Option<DailyGoals>> {
        Ok(self.state.read().await.goals.clone())
    }

    async fn save_goals(&self, goals: &DailyGoals) -> AppResult<()> {
        self.check_writable()?;
        self.state.write().await.goals = Some(goals.clone());
        Ok(())
    }
}
