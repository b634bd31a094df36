//! # Settings Stores
//!
//! The narrow contract this crate needs from the host: load the settings
//! record, persist it.

use crate::error::{MipsError, MipsResult};
use crate::settings::MipsSettings;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Read/persist contract for the settings record.
///
/// The host framework owns the record; implementations adapt whatever
/// storage it uses.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> MipsResult<MipsSettings>;

    async fn save(&self, settings: &MipsSettings) -> MipsResult<()>;
}

/// Type alias for a shared settings store (dynamic dispatch)
pub type SharedSettingsStore = Arc<dyn SettingsStore>;

/// Settings kept in memory, for tests and ephemeral deployments
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<MipsSettings>,
    saves: AtomicUsize,
}

impl InMemorySettingsStore {
    pub fn new(settings: MipsSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> MipsResult<MipsSettings> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &MipsSettings) -> MipsResult<()> {
        *self.settings.write().await = settings.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Settings persisted as a TOML file
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> MipsResult<MipsSettings> {
        let _guard = self.lock.read().await;

        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                MipsError::Serialization(format!(
                    "Failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", self.path.display());
                Ok(MipsSettings::default())
            }
            Err(e) => Err(MipsError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, settings: &MipsSettings) -> MipsResult<()> {
        let _guard = self.lock.write().await;

        let content = toml::to_string_pretty(settings)
            .map_err(|e| MipsError::Serialization(e.to_string()))?;

        // Write-then-rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("toml.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| MipsError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            MipsError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        info!("Saved MIPS settings to {}", self.path.display());
        Ok(())
    }
}
