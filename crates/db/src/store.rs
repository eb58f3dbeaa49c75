//! Storage backends for saved forms.
//!
//! The API holds an `Arc<dyn FormStore>` and never knows which backend is
//! behind it. [`PgFormStore`] is the production store; [`JsonFileStore`]
//! keeps every form in one JSON document on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use formsmith_core::form::{FormRecord, FormSummary};
use formsmith_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::form::{FormChanges, NewForm};
use crate::repositories::FormRepo;
use crate::DbPool;

/// Errors from any storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Form file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Form file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CRUD over saved forms.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), StoreError>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FormSummary>, StoreError>;

    async fn get(&self, id: DbId) -> Result<Option<FormRecord>, StoreError>;

    async fn create(&self, form: &NewForm) -> Result<FormRecord, StoreError>;

    /// Returns `None` if no form has this id.
    async fn update(
        &self,
        id: DbId,
        changes: &FormChanges,
    ) -> Result<Option<FormRecord>, StoreError>;

    /// Returns `true` if a form was deleted.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    /// Release held resources during shutdown.
    async fn close(&self) {}
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

pub struct PgFormStore {
    pool: DbPool,
}

impl PgFormStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl FormStore for PgFormStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FormSummary>, StoreError> {
        let rows = FormRepo::list(&self.pool, limit, offset).await?;
        Ok(rows.into_iter().map(FormSummary::from).collect())
    }

    async fn get(&self, id: DbId) -> Result<Option<FormRecord>, StoreError> {
        Ok(FormRepo::find_by_id(&self.pool, id)
            .await?
            .map(FormRecord::from))
    }

    async fn create(&self, form: &NewForm) -> Result<FormRecord, StoreError> {
        Ok(FormRepo::create(&self.pool, form).await?.into())
    }

    async fn update(
        &self,
        id: DbId,
        changes: &FormChanges,
    ) -> Result<Option<FormRecord>, StoreError> {
        Ok(FormRepo::update(&self.pool, id, changes)
            .await?
            .map(FormRecord::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(FormRepo::delete(&self.pool, id).await?)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// On-disk layout of the forms file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FormsFile {
    #[serde(default)]
    next_id: DbId,
    #[serde(default)]
    forms: Vec<FormRecord>,
}

impl FormsFile {
    /// Ids are never reused, even after the highest one is deleted.
    fn allocate_id(&mut self) -> DbId {
        let after_existing = self.forms.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        let id = self.next_id.max(after_existing);
        self.next_id = id + 1;
        id
    }

    fn find_mut(&mut self, id: DbId) -> Option<&mut FormRecord> {
        self.forms.iter_mut().find(|f| f.id == id)
    }
}

/// Stores all forms in a single JSON file.
///
/// Every operation holds one lock across read-modify-write, and writes go
/// to a sibling temp file that is then renamed over the live one.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty store.
    async fn load(&self) -> Result<FormsFile, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FormsFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, contents: &FormsFile) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(contents)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl FormStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await.map(|_| ())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FormSummary>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut forms = self.load().await?.forms;
        forms.sort_by_key(|f| f.id);
        Ok(forms
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|f| FormSummary {
                id: f.id,
                name: f.name,
                field_count: f.fields.len() as i64,
                created_at: f.created_at,
                updated_at: f.updated_at,
            })
            .collect())
    }

    async fn get(&self, id: DbId) -> Result<Option<FormRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.forms.into_iter().find(|f| f.id == id))
    }

    async fn create(&self, form: &NewForm) -> Result<FormRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let mut contents = self.load().await?;
        let now = chrono::Utc::now();
        let record = FormRecord {
            id: contents.allocate_id(),
            name: form.name.clone(),
            fields: form.fields.clone(),
            created_at: now,
            updated_at: now,
        };
        contents.forms.push(record.clone());
        self.persist(&contents).await?;
        tracing::debug!(form_id = record.id, path = %self.path.display(), "Form written to file");
        Ok(record)
    }

    async fn update(
        &self,
        id: DbId,
        changes: &FormChanges,
    ) -> Result<Option<FormRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut contents = self.load().await?;
        let Some(record) = contents.find_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            record.name = name.clone();
        }
        if let Some(fields) = &changes.fields {
            record.fields = fields.clone();
        }
        record.updated_at = chrono::Utc::now();
        let updated = record.clone();
        self.persist(&contents).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut contents = self.load().await?;
        let before = contents.forms.len();
        contents.forms.retain(|f| f.id != id);
        if contents.forms.len() == before {
            return Ok(false);
        }
        self.persist(&contents).await?;
        Ok(true)
    }
}
