// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Claims};

// O escopo de tenant de uma requisição.
// Só pode ser construído a partir de claims verificadas: o tenant de
// qualquer caminho ou corpo da requisição é ignorado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    tenant_id: Uuid,
}

impl TenantScope {
    pub fn from_claims(claims: &Claims) -> Self {
        Self { tenant_id: claims.tenant_id }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // As claims foram colocadas nos "extensions" pelo auth_guard
        parts
            .extensions
            .get::<Claims>()
            .map(TenantScope::from_claims)
            .ok_or(AppError::Unauthenticated)
    }
}
