//! Sketch session: one engine plus the metadata and storage around it.
//!
//! DESIGN
//! ======
//! `SketchSession` is the only place that talks to storage. The engine stays
//! pure; the session serializes its scene on explicit save/update, decodes
//! payloads on load and draft restore, and produces draft snapshots for the
//! autosave task. Persistence calls happen only on explicit user actions.
//!
//! ERROR HANDLING
//! ==============
//! Validation (blank names) fails before storage is touched. A corrupt saved
//! payload still leaves the editor usable: the scene falls back to empty and
//! the error is returned for the host to show. A corrupt draft is cleared and
//! treated as absent. Failing to clear a draft after a successful save is
//! logged, not returned, since the save itself went through.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::autosave::{self, SharedDraftStore};
use crate::engine::{Action, Engine};
use crate::scene::Scene;
use crate::storage::{
    DraftBlob, DraftStore, EntityId, ListFilter, SketchId, SketchInput, SketchRepository, SketchSummary, StorageError,
    now_ms,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("sketch name is required")]
    MissingName,
    #[error("sketch {id} has a corrupt payload: {source}")]
    Corrupt {
        id: SketchId,
        #[source]
        source: serde_json::Error,
    },
    #[error("scene could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Shared handle to the sketch repository.
pub type SharedRepository = Arc<dyn SketchRepository + Send + Sync>;

/// Descriptive fields of the sketch being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SketchMeta {
    pub name: String,
    pub description: String,
    /// Id of the stored record this session writes to, if it was saved.
    pub current_id: Option<SketchId>,
    pub linked_entity_id: Option<EntityId>,
}

/// Editor session for one sketch.
pub struct SketchSession {
    engine: Engine,
    meta: SketchMeta,
    repo: SharedRepository,
    drafts: SharedDraftStore,
}

impl SketchSession {
    #[must_use]
    pub fn new(repo: SharedRepository, drafts: SharedDraftStore) -> Self {
        Self { engine: Engine::new(), meta: SketchMeta::default(), repo, drafts }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    #[must_use]
    pub fn meta(&self) -> &SketchMeta {
        &self.meta
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.meta.description = description.into();
    }

    pub fn set_linked_entity(&mut self, entity: Option<EntityId>) {
        self.meta.linked_entity_id = entity;
    }

    // --- Persistence ---

    /// Save as a new record, or overwrite the current one.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingName`] for a blank name; encoding or storage
    /// failures otherwise.
    pub fn save(&mut self) -> Result<SketchId, SessionError> {
        let name = self.meta.name.trim();
        if name.is_empty() {
            warn!("save rejected: blank sketch name");
            return Err(SessionError::MissingName);
        }
        let description = self.meta.description.trim();
        let input = SketchInput {
            name: name.to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
            elements: self.engine.scene().to_json()?,
            linked_entity_id: self.meta.linked_entity_id,
        };

        let id = match self.meta.current_id {
            Some(id) => {
                self.repo.update(id, input)?;
                info!(id, elements = self.engine.scene().len(), "sketch updated");
                id
            }
            None => {
                let id = self.repo.save(input)?;
                info!(id, elements = self.engine.scene().len(), "sketch saved");
                id
            }
        };
        self.meta.current_id = Some(id);
        self.clear_draft_after_commit();
        Ok(id)
    }

    /// Open a stored sketch. History, selection and view start fresh.
    ///
    /// # Errors
    ///
    /// Storage failures leave the session untouched. A corrupt payload
    /// yields [`SessionError::Corrupt`] after the editor has been reset to
    /// an empty scene with the record's metadata.
    pub fn load(&mut self, id: SketchId) -> Result<Vec<Action>, SessionError> {
        let record = self.repo.load(id)?;
        self.meta = SketchMeta {
            name: record.name,
            description: record.description.unwrap_or_default(),
            current_id: Some(record.id),
            linked_entity_id: record.linked_entity_id,
        };
        self.clear_draft_after_commit();

        match Scene::from_json(&record.elements) {
            Ok(scene) => {
                info!(id, elements = scene.len(), "sketch loaded");
                Ok(self.engine.load_scene(scene))
            }
            Err(e) => {
                warn!(id, error = %e, "sketch payload corrupt; opening empty scene");
                self.engine.load_scene(Scene::new());
                Err(SessionError::Corrupt { id, source: e })
            }
        }
    }

    /// Summaries of stored sketches, newest first.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn list(&self, filter: ListFilter) -> Result<Vec<SketchSummary>, SessionError> {
        Ok(self.repo.list(filter)?)
    }

    /// Delete a stored sketch. Deleting the open sketch keeps its contents
    /// on screen as unsaved work.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn delete(&mut self, id: SketchId) -> Result<(), SessionError> {
        self.repo.delete(id)?;
        if self.meta.current_id == Some(id) {
            self.meta.current_id = None;
        }
        info!(id, "sketch deleted");
        Ok(())
    }

    /// Link a stored sketch to `entity`, or unlink it.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn assign_entity(&mut self, id: SketchId, entity: Option<EntityId>) -> Result<(), SessionError> {
        self.repo.assign_entity(id, entity)?;
        if self.meta.current_id == Some(id) {
            self.meta.linked_entity_id = entity;
        }
        info!(id, entity = ?entity, "sketch relinked");
        Ok(())
    }

    /// Start over with an empty, unsaved sketch.
    pub fn new_sketch(&mut self) -> Vec<Action> {
        self.meta = SketchMeta::default();
        self.clear_draft_after_commit();
        self.engine.load_scene(Scene::new())
    }

    // --- Drafts ---

    /// Draft of the current state, or `None` while the scene is empty.
    #[must_use]
    pub fn draft_snapshot(&self) -> Option<DraftBlob> {
        let scene = self.engine.scene();
        if scene.is_empty() {
            return None;
        }
        Some(DraftBlob {
            elements: scene.clone(),
            sketch_name: self.meta.name.clone(),
            sketch_description: self.meta.description.clone(),
            current_sketch_id: self.meta.current_id,
            linked_entity_id: self.meta.linked_entity_id,
            timestamp: now_ms(),
        })
    }

    /// Hand the current state to the autosave task. Returns whether a
    /// snapshot was queued.
    pub fn notify_autosave(&self, tx: &mpsc::Sender<DraftBlob>) -> bool {
        match self.draft_snapshot() {
            Some(draft) => autosave::enqueue_draft(tx, draft),
            None => false,
        }
    }

    /// A draft worth offering for restoration, if one exists. Empty drafts
    /// are ignored and corrupt ones are removed.
    ///
    /// # Errors
    ///
    /// Storage failures other than a corrupt draft.
    pub fn offer_draft(&self) -> Result<Option<DraftBlob>, SessionError> {
        match self.drafts.load() {
            Ok(Some(draft)) if !draft.elements.is_empty() => Ok(Some(draft)),
            Ok(_) => Ok(None),
            Err(StorageError::Serde(e)) => {
                warn!(error = %e, "stored draft corrupt; discarding");
                self.drafts.clear()?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Adopt a draft's scene and metadata. History starts fresh.
    pub fn restore_draft(&mut self, draft: DraftBlob) -> Vec<Action> {
        info!(elements = draft.elements.len(), timestamp = draft.timestamp, "draft restored");
        self.meta = SketchMeta {
            name: draft.sketch_name,
            description: draft.sketch_description,
            current_id: draft.current_sketch_id,
            linked_entity_id: draft.linked_entity_id,
        };
        self.engine.load_scene(draft.elements)
    }

    /// Throw the stored draft away.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn discard_draft(&self) -> Result<(), SessionError> {
        self.drafts.clear()?;
        info!("draft discarded");
        Ok(())
    }

    fn clear_draft_after_commit(&self) {
        if let Err(e) = self.drafts.clear() {
            warn!(error = %e, "failed to clear draft");
        }
    }
}
