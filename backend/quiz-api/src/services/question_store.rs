use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Question;

/// Slot holding the extracted document text.
pub const TEXT_SLOT: &str = "extracted_text.txt";
/// Slot holding the current serialized question set.
pub const QUESTIONS_SLOT: &str = "questions.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No extracted text available. Upload a document first")]
    NoText,
    #[error("No question set available. Generate questions first")]
    NoQuestions,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence backend for named single-value slots. Each write replaces
/// the slot's previous content wholesale; no history is kept.
#[async_trait]
pub trait SlotBackend: Send + Sync {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>>;
    async fn write(&self, slot: &str, bytes: &[u8]) -> Result<()>;
    async fn exists(&self, slot: &str) -> Result<bool>;
}

/// Durable file-per-slot backend under a data directory.
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.data_dir.join(slot)
    }
}

#[async_trait]
impl SlotBackend for FileBackend {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(slot);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!("Failed to read slot {}", slot)),
        }
    }

    async fn write(&self, slot: &str, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .context("Failed to create data directory")?;
        // Write to a unique temp file, then rename: readers never observe a
        // half-written slot even if the process dies mid-write.
        let tmp_path = self.slot_path(&format!("{}.{}.tmp", slot, Uuid::new_v4()));
        tokio::fs::write(&tmp_path, bytes)
            .await
            .context(format!("Failed to write slot {}", slot))?;
        tokio::fs::rename(&tmp_path, self.slot_path(slot))
            .await
            .context(format!("Failed to replace slot {}", slot))?;
        Ok(())
    }

    async fn exists(&self, slot: &str) -> Result<bool> {
        tokio::fs::try_exists(self.slot_path(slot))
            .await
            .context(format!("Failed to probe slot {}", slot))
    }
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl SlotBackend for MemoryBackend {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.read().await.get(slot).cloned())
    }

    async fn write(&self, slot: &str, bytes: &[u8]) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(slot.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn exists(&self, slot: &str) -> Result<bool> {
        Ok(self.slots.read().await.contains_key(slot))
    }
}

/// Owner of the two persisted slots: the extracted document text and the
/// current question set. One writer at a time; readers always see a
/// complete value.
pub struct QuestionStore {
    backend: Arc<dyn SlotBackend>,
    lock: RwLock<()>,
}

impl QuestionStore {
    pub fn new(backend: Arc<dyn SlotBackend>) -> Self {
        Self {
            backend,
            lock: RwLock::new(()),
        }
    }

    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(data_dir)))
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::default()))
    }

    pub async fn save_text(&self, text: &str) -> Result<(), StoreError> {
        let _guard = self.lock.write().await;
        self.backend.write(TEXT_SLOT, text.as_bytes()).await?;
        Ok(())
    }

    pub async fn load_text(&self) -> Result<String, StoreError> {
        let _guard = self.lock.read().await;
        let bytes = self
            .backend
            .read(TEXT_SLOT)
            .await?
            .ok_or(StoreError::NoText)?;
        let text = String::from_utf8(bytes).context("Stored text is not valid UTF-8")?;
        Ok(text)
    }

    pub async fn has_text(&self) -> Result<bool, StoreError> {
        let _guard = self.lock.read().await;
        Ok(self.backend.exists(TEXT_SLOT).await?)
    }

    pub async fn save_questions(&self, questions: &[Question]) -> Result<(), StoreError> {
        let json =
            serde_json::to_vec_pretty(questions).context("Failed to serialize question set")?;
        let _guard = self.lock.write().await;
        self.backend.write(QUESTIONS_SLOT, &json).await?;
        Ok(())
    }

    pub async fn load_questions(&self) -> Result<Vec<Question>, StoreError> {
        let _guard = self.lock.read().await;
        let bytes = self
            .backend
            .read(QUESTIONS_SLOT)
            .await?
            .ok_or(StoreError::NoQuestions)?;
        let questions =
            serde_json::from_slice(&bytes).context("Stored question set is not valid JSON")?;
        Ok(questions)
    }

    pub async fn has_questions(&self) -> Result<bool, StoreError> {
        let _guard = self.lock.read().await;
        Ok(self.backend.exists(QUESTIONS_SLOT).await?)
    }
}
