use axum::Json;
use serde_json::{json, Value};

use crate::common::{error::AppError, response::ApiResponse};

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses((status = 200, description = "Serviço no ar"))
)]
pub async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({ "status": "ok" })))
}

// Qualquer rota desconhecida responde no mesmo envelope
pub async fn fallback() -> AppError {
    AppError::RouteNotFound
}

// Rota existe, mas não com esse método
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
