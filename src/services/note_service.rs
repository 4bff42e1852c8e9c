// src/services/note_service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NoteStore,
    middleware::tenancy::TenantScope,
    models::notes::{Note, NotePayload},
};

// Leitura, edição e remoção. A criação passa pelo PlanService (cota).
// Nota de outro tenant responde igual a nota inexistente: NoteNotFound.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    pub async fn list_notes(&self, scope: &TenantScope) -> Result<Vec<Note>, AppError> {
        self.notes.list(scope).await
    }

    pub async fn get_note(&self, scope: &TenantScope, note_id: Uuid) -> Result<Note, AppError> {
        self.notes
            .find(scope, note_id)
            .await?
            .ok_or(AppError::NoteNotFound)
    }

    pub async fn update_note(
        &self,
        scope: &TenantScope,
        note_id: Uuid,
        payload: NotePayload,
    ) -> Result<Note, AppError> {
        let fields = payload.into_fields()?;

        self.notes
            .update(scope, note_id, fields)
            .await?
            .ok_or(AppError::NoteNotFound)
    }

    pub async fn delete_note(&self, scope: &TenantScope, note_id: Uuid) -> Result<(), AppError> {
        if self.notes.delete(scope, note_id).await? {
            Ok(())
        } else {
            Err(AppError::NoteNotFound)
        }
    }
}
