// src/handlers/tenancy.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        rbac::{AdministerTenant, RequireCapability},
        tenancy::TenantScope,
    },
    models::tenancy::{TenantUsage, UpgradeResponse},
};

// POST /api/v1/tenants/{slug}/upgrade
#[utoipa::path(
    post,
    path = "/api/v1/tenants/{slug}/upgrade",
    tag = "Tenancy",
    params(("slug" = String, Path, description = "Slug do tenant do chamador")),
    responses(
        (status = 200, description = "Tenant migrado para Pro", body = UpgradeResponse),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Slug não é o tenant do chamador"),
        (status = 409, description = "Tenant já está no plano Pro")
    ),
    security(("api_jwt" = []))
)]
pub async fn upgrade_tenant(
    State(app_state): State<AppState>,
    // O guardião roda antes: membro comum recebe 403 sem tocar no store
    _guard: RequireCapability<AdministerTenant>,
    scope: TenantScope,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.plan_service.upgrade(&scope, &slug).await?;

    Ok(Json(ApiResponse::ok_with_message(
        UpgradeResponse { tenant: tenant.summary() },
        "Tenant upgraded to Pro plan successfully",
    )))
}

// GET /api/v1/tenants/current
#[utoipa::path(
    get,
    path = "/api/v1/tenants/current",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Plano e uso de notas do tenant", body = TenantUsage),
        (status = 401, description = "Token ausente, inválido ou expirado")
    ),
    security(("api_jwt" = []))
)]
pub async fn current_tenant(
    State(app_state): State<AppState>,
    scope: TenantScope,
) -> Result<impl IntoResponse, AppError> {
    let usage = app_state.plan_service.usage(&scope).await?;
    Ok(Json(ApiResponse::ok(usage)))
}
