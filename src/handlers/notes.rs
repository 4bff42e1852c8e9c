// src/handlers/notes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantScope},
    models::notes::{Note, NotePayload},
};

// Um id que nem é UUID também "não existe"
fn parse_note_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NoteNotFound)
}

// POST /api/v1/notes
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    tag = "Notes",
    request_body = NotePayload,
    responses(
        (status = 201, description = "Nota criada", body = Note),
        (status = 400, description = "Título ausente"),
        (status = 401, description = "Token ausente, inválido ou expirado"),
        (status = 409, description = "Limite do plano gratuito atingido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_note(
    State(app_state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<NotePayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let note = app_state.plan_service.create_note(&claims, payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(note))))
}

// GET /api/v1/notes
#[utoipa::path(
    get,
    path = "/api/v1/notes",
    tag = "Notes",
    responses(
        (status = 200, description = "Notas do tenant, mais recentes primeiro", body = Vec<Note>),
        (status = 401, description = "Token ausente, inválido ou expirado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notes(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let notes = app_state.note_service.list_notes(&scope).await?;
    Ok(Json(ApiResponse::ok(notes)))
}

// GET /api/v1/notes/{id}
#[utoipa::path(
    get,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "ID da nota")),
    responses(
        (status = 200, description = "Nota", body = Note),
        (status = 404, description = "Nota inexistente ou de outro tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_note(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let note = app_state.note_service.get_note(&scope, parse_note_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(note)))
}

// PUT /api/v1/notes/{id}
#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "ID da nota")),
    request_body = NotePayload,
    responses(
        (status = 200, description = "Nota atualizada", body = Note),
        (status = 400, description = "Título ausente"),
        (status = 404, description = "Nota inexistente ou de outro tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_note(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<NotePayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let note = app_state
        .note_service
        .update_note(&scope, parse_note_id(&id)?, payload)
        .await?;

    Ok(Json(ApiResponse::ok(note)))
}

// DELETE /api/v1/notes/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "ID da nota")),
    responses(
        (status = 200, description = "Nota removida"),
        (status = 404, description = "Nota inexistente ou de outro tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_note(
    State(app_state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .note_service
        .delete_note(&scope, parse_note_id(&id)?)
        .await?;

    Ok(Json(ApiResponse::message("Note deleted successfully")))
}
