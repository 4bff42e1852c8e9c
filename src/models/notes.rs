// src/models/notes.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// Uma nota pertence a exatamente um tenant. O autor (user_id) é só informativo:
// qualquer membro do tenant pode ler, editar ou apagar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Nota ainda não persistida. O tenant vem sempre do escopo, nunca daqui.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

// Payload de criação/edição. Campos ausentes viram `None` para
// respondermos "Title is required" em vez de um erro de desserialização.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NotePayload {
    #[serde(default)]
    #[schema(example = "Reunião de planejamento")]
    pub title: Option<String>,

    #[serde(default)]
    #[schema(example = "Tópicos para discutir...")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
}

impl NotePayload {
    /// Título vazio ou só com espaços é rejeitado; conteúdo ausente vira "".
    pub fn into_fields(self) -> Result<NoteFields, AppError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AppError::TitleRequired)?;

        Ok(NoteFields {
            title,
            content: self.content.unwrap_or_default(),
        })
    }
}
