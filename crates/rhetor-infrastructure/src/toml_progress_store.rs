//! TOML-file-backed progress store.
//!
//! One small TOML file holds the whole progress record. Writes go through a
//! tmp file, fsync, and an atomic rename; read-modify-write cycles take an
//! advisory `fs2` lock so two processes cannot interleave updates. The
//! record is small enough that blocking I/O inside the async trait methods
//! is not worth a thread hop.

use async_trait::async_trait;
use fs2::FileExt;
use rhetor_core::error::{Result, RhetorError};
use rhetor_core::progress::{ProgressRecord, ProgressStore};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::paths::RhetorPaths;

/// Progress store persisting to a single TOML file.
pub struct TomlProgressStore {
    path: PathBuf,
}

impl TomlProgressStore {
    /// Creates a store at the default location
    /// (`~/.config/rhetor/progress.toml`).
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(RhetorPaths::progress_file()?))
    }

    /// Creates a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_record(&self) -> Result<ProgressRecord> {
        if !self.path.exists() {
            return Ok(ProgressRecord::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ProgressRecord::default());
        }
        Ok(toml::from_str(&content)?)
    }

    fn write_record(&self, record: &ProgressRecord) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| RhetorError::data_access("progress path has no parent directory"))?;
        fs::create_dir_all(parent)?;

        let serialized = toml::to_string_pretty(record)?;
        let tmp_path = self.path.with_extension("toml.tmp");
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(serialized.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under an advisory lock.
    fn update<F>(&self, apply: F) -> Result<ProgressRecord>
    where
        F: FnOnce(&mut ProgressRecord),
    {
        let _lock = StoreLock::acquire(&self.path)?;
        let mut record = self.read_record()?;
        apply(&mut record);
        self.write_record(&record)?;
        Ok(record)
    }
}

#[async_trait]
impl ProgressStore for TomlProgressStore {
    async fn load(&self) -> Result<ProgressRecord> {
        self.read_record()
    }

    async fn add_points(&self, amount: u64) -> Result<ProgressRecord> {
        let record = self.update(|record| record.add_points(amount))?;
        tracing::debug!(amount, total = record.points, "points persisted");
        Ok(record)
    }

    async fn add_badge(&self, badge: &str) -> Result<()> {
        self.update(|record| record.add_badge(badge))?;
        Ok(())
    }

    async fn mark_completed(&self, id: &str) -> Result<()> {
        self.update(|record| record.mark_completed(id))?;
        Ok(())
    }

    async fn is_completed(&self, id: &str) -> Result<bool> {
        Ok(self.read_record()?.is_completed(id))
    }

    async fn reset(&self) -> Result<()> {
        self.update(|record| *record = ProgressRecord::default())?;
        Ok(())
    }
}

/// Advisory lock guard; the lock file is removed best-effort on drop.
struct StoreLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl StoreLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()
            .map_err(|e| RhetorError::data_access(format!("Failed to acquire lock: {e}")))?;
        Ok(Self { file, lock_path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
