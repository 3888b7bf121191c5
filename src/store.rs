//! Persistência do handle do job ativo.
//!
//! O [`HandleStore`] é o único lugar onde o identificador do job sobrevive a
//! um reinício do processo. [`FileHandleStore`] grava um arquivo JSON sob a
//! chave `pdf_task_id`; [`MemoryHandleStore`] serve para testes.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::poller::JobHandle;

/// Well-known key the active handle is stored under.
pub const HANDLE_KEY: &str = "pdf_task_id";

/// Accessor for the single persisted job handle.
pub trait HandleStore: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<Option<JobHandle>, StoreError>> + Send;

    fn save(&self, handle: &JobHandle) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removing an absent handle is not an error.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: HandleStore> HandleStore for Arc<T> {
    fn load(&self) -> impl Future<Output = Result<Option<JobHandle>, StoreError>> + Send {
        (**self).load()
    }

    fn save(&self, handle: &JobHandle) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save(handle)
    }

    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).clear()
    }
}

/// Stores the handle as `<dir>/pdf_task_id.json`.
#[derive(Debug, Clone)]
pub struct FileHandleStore {
    path: PathBuf,
}

impl FileHandleStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{HANDLE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HandleStore for FileHandleStore {
    async fn load(&self) -> Result<Option<JobHandle>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, handle: &JobHandle) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Write-then-rename so a crash never leaves a half-written handle.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(handle)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, mostly useful in tests.
#[derive(Debug, Default)]
pub struct MemoryHandleStore {
    slot: Mutex<Option<JobHandle>>,
}

impl MemoryHandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(handle: JobHandle) -> Self {
        Self {
            slot: Mutex::new(Some(handle)),
        }
    }

    pub fn current(&self) -> Option<JobHandle> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl HandleStore for MemoryHandleStore {
    async fn load(&self) -> Result<Option<JobHandle>, StoreError> {
        Ok(self.current())
    }

    async fn save(&self, handle: &JobHandle) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        Ok(())
    }
}
