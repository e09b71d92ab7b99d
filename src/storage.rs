//! Storage contracts: saved sketches and the local draft backup.
//!
//! DESIGN
//! ======
//! The editor core never performs I/O. A `SketchRepository` is the durable
//! record store the surrounding application provides; a `DraftStore` holds
//! at most one ephemeral draft blob. Both are synchronous traits so the
//! engine can stay `&mut self`; the autosave task moves draft writes onto a
//! blocking thread.
//!
//! Saved scenes are kept as their serialized JSON text. Decoding happens at
//! the session boundary so a corrupt payload surfaces as an error there
//! instead of poisoning the store.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scene::Scene;

/// Identifier of a saved sketch.
pub type SketchId = i64;

/// Identifier of the external entity (e.g. an event) a sketch is linked to.
pub type EntityId = i64;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sketch {0} not found")]
    NotFound(SketchId),
    #[error("malformed payload: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// SKETCH RECORDS
// =============================================================================

/// Fields written on save and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchInput {
    pub name: String,
    pub description: Option<String>,
    /// Serialized scene (JSON array of elements).
    pub elements: String,
    pub linked_entity_id: Option<EntityId>,
}

/// A stored sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchRecord {
    pub id: SketchId,
    pub name: String,
    pub description: Option<String>,
    pub elements: String,
    pub linked_entity_id: Option<EntityId>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Listing row without the scene payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchSummary {
    pub id: SketchId,
    pub name: String,
    pub description: Option<String>,
    pub linked_entity_id: Option<EntityId>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&SketchRecord> for SketchSummary {
    fn from(record: &SketchRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            linked_entity_id: record.linked_entity_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Which sketches `list` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    /// Only sketches linked to this entity.
    Entity(EntityId),
    /// Only sketches linked to nothing.
    Unassigned,
}

impl ListFilter {
    fn accepts(self, linked: Option<EntityId>) -> bool {
        match self {
            Self::All => true,
            Self::Entity(id) => linked == Some(id),
            Self::Unassigned => linked.is_none(),
        }
    }
}

/// Durable sketch storage.
pub trait SketchRepository {
    /// Store a new sketch and return its id.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn save(&self, input: SketchInput) -> Result<SketchId, StorageError>;

    /// Overwrite an existing sketch.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] for an unknown id, or backend failures.
    fn update(&self, id: SketchId, input: SketchInput) -> Result<(), StorageError>;

    /// Fetch one sketch with its payload.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] for an unknown id, or backend failures.
    fn load(&self, id: SketchId) -> Result<SketchRecord, StorageError>;

    /// Summaries matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn list(&self, filter: ListFilter) -> Result<Vec<SketchSummary>, StorageError>;

    /// Remove a sketch.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] for an unknown id, or backend failures.
    fn delete(&self, id: SketchId) -> Result<(), StorageError>;

    /// Link a sketch to `entity`, or unlink it with `None`.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] for an unknown id, or backend failures.
    fn assign_entity(&self, id: SketchId, entity: Option<EntityId>) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: SketchId,
    records: BTreeMap<SketchId, SketchRecord>,
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: Mutex<MemoryInner>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut MemoryInner) -> Result<T, StorageError>) -> Result<T, StorageError> {
        let mut inner = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        f(&mut inner)
    }
}

impl SketchRepository for MemoryRepository {
    fn save(&self, input: SketchInput) -> Result<SketchId, StorageError> {
        self.with_inner(|inner| {
            inner.next_id += 1;
            let id = inner.next_id;
            let now = now_ms();
            let record = SketchRecord {
                id,
                name: input.name,
                description: input.description,
                elements: input.elements,
                linked_entity_id: input.linked_entity_id,
                created_at: now,
                updated_at: now,
            };
            inner.records.insert(id, record);
            debug!(id, "sketch stored");
            Ok(id)
        })
    }

    fn update(&self, id: SketchId, input: SketchInput) -> Result<(), StorageError> {
        self.with_inner(|inner| {
            let record = inner.records.get_mut(&id).ok_or(StorageError::NotFound(id))?;
            record.name = input.name;
            record.description = input.description;
            record.elements = input.elements;
            record.linked_entity_id = input.linked_entity_id;
            record.updated_at = now_ms();
            debug!(id, "sketch overwritten");
            Ok(())
        })
    }

    fn load(&self, id: SketchId) -> Result<SketchRecord, StorageError> {
        self.with_inner(|inner| inner.records.get(&id).cloned().ok_or(StorageError::NotFound(id)))
    }

    fn list(&self, filter: ListFilter) -> Result<Vec<SketchSummary>, StorageError> {
        self.with_inner(|inner| {
            let mut rows: Vec<SketchSummary> = inner
                .records
                .values()
                .filter(|r| filter.accepts(r.linked_entity_id))
                .map(SketchSummary::from)
                .collect();
            rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            Ok(rows)
        })
    }

    fn delete(&self, id: SketchId) -> Result<(), StorageError> {
        self.with_inner(|inner| {
            inner.records.remove(&id).ok_or(StorageError::NotFound(id))?;
            debug!(id, "sketch removed");
            Ok(())
        })
    }

    fn assign_entity(&self, id: SketchId, entity: Option<EntityId>) -> Result<(), StorageError> {
        self.with_inner(|inner| {
            let record = inner.records.get_mut(&id).ok_or(StorageError::NotFound(id))?;
            record.linked_entity_id = entity;
            record.updated_at = now_ms();
            Ok(())
        })
    }
}

// =============================================================================
// DRAFTS
// =============================================================================

/// Local, ephemeral backup of the sketch being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftBlob {
    pub elements: Scene,
    #[serde(default)]
    pub sketch_name: String,
    #[serde(default)]
    pub sketch_description: String,
    #[serde(default)]
    pub current_sketch_id: Option<SketchId>,
    #[serde(default)]
    pub linked_entity_id: Option<EntityId>,
    /// Milliseconds since the Unix epoch when the draft was taken.
    #[serde(default)]
    pub timestamp: i64,
}

/// Single-slot draft storage.
pub trait DraftStore {
    /// Replace the stored draft.
    ///
    /// # Errors
    ///
    /// Encoding or backend failures.
    fn save(&self, draft: &DraftBlob) -> Result<(), StorageError>;

    /// The stored draft, if any.
    ///
    /// # Errors
    ///
    /// [`StorageError::Serde`] when the stored text is not a draft, or
    /// backend failures.
    fn load(&self) -> Result<Option<DraftBlob>, StorageError>;

    /// Forget the stored draft. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Draft store held in memory as encoded text.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    raw: Mutex<Option<String>>,
}

impl MemoryDraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with arbitrary text, which need not be a valid draft.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { raw: Mutex::new(Some(raw.into())) }
    }

    /// The stored text, as written.
    ///
    /// # Errors
    ///
    /// [`StorageError::Poisoned`] if a writer panicked.
    pub fn raw(&self) -> Result<Option<String>, StorageError> {
        Ok(self.raw.lock().map_err(|_| StorageError::Poisoned)?.clone())
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, draft: &DraftBlob) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(draft)?;
        *self.raw.lock().map_err(|_| StorageError::Poisoned)? = Some(encoded);
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftBlob>, StorageError> {
        let guard = self.raw.lock().map_err(|_| StorageError::Poisoned)?;
        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.raw.lock().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }
}

/// Draft store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, draft: &DraftBlob) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec(draft)?;
        std::fs::write(&self.path, encoded)?;
        debug!(path = %self.path.display(), "draft written");
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftBlob>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
