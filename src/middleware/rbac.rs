// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Capability, Claims},
};

/// Predicado puro do Role Guard.
pub fn require_capability(claims: &Claims, capability: Capability) -> Result<(), AppError> {
    if claims.role.has_capability(capability) {
        Ok(())
    } else {
        Err(AppError::Forbidden(capability.as_str()))
    }
}

/// 1. O Trait que define uma Capacidade exigida por uma rota
pub trait CapabilityDef: Send + Sync + 'static {
    const CAPABILITY: Capability;
}

/// 2. O Extractor (Guardião)
pub struct RequireCapability<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or(AppError::Unauthenticated)?;

        require_capability(claims, T::CAPABILITY)?;

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct AdministerTenant;
impl CapabilityDef for AdministerTenant {
    const CAPABILITY: Capability = Capability::AdministerTenant;
}
