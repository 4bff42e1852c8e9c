// src/services/plan_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{NoteStore, TenantStore},
    middleware::tenancy::TenantScope,
    models::{
        auth::Claims,
        notes::{NewNote, Note, NotePayload},
        tenancy::{QuotaPolicy, Tenant, TenantUsage},
    },
};

/// O Plan/Quota Engine: estado da assinatura por tenant, o upgrade
/// free -> pro e a criação de notas limitada pela cota.
#[derive(Clone)]
pub struct PlanService {
    tenants: Arc<dyn TenantStore>,
    notes: Arc<dyn NoteStore>,
    policy: QuotaPolicy,
}

impl PlanService {
    pub fn new(
        tenants: Arc<dyn TenantStore>,
        notes: Arc<dyn NoteStore>,
        policy: QuotaPolicy,
    ) -> Self {
        Self { tenants, notes, policy }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Cria uma nota se o plano permitir. A recontagem e a inserção são uma
    /// única operação do store; quem perde a corrida recebe `QuotaExceeded`.
    pub async fn create_note(
        &self,
        claims: &Claims,
        payload: NotePayload,
    ) -> Result<Note, AppError> {
        let fields = payload.into_fields()?;
        let scope = TenantScope::from_claims(claims);

        let new_note = NewNote {
            user_id: claims.user_id,
            title: fields.title,
            content: fields.content,
        };

        match self.notes.insert_within_quota(&scope, new_note, &self.policy).await {
            Err(AppError::QuotaExceeded { limit }) => {
                tracing::warn!(tenant_id = %scope.tenant_id(), limit, "Cota do plano gratuito atingida");
                Err(AppError::QuotaExceeded { limit })
            }
            other => other,
        }
    }

    /// free -> pro. O slug precisa apontar para o próprio tenant do chamador.
    /// A checagem de capacidade (admin) acontece antes, no Role Guard.
    pub async fn upgrade(&self, scope: &TenantScope, slug: &str) -> Result<Tenant, AppError> {
        let tenant = self
            .tenants
            .find_in_scope_by_slug(scope, slug)
            .await?
            .ok_or(AppError::TenantNotFound)?;

        // Valida a transição antes de escrever (pro -> AlreadyUpgraded)
        tenant.plan.upgrade()?;

        // Quem perder um upgrade concorrente não encontra mais `plan = free`
        let upgraded = self
            .tenants
            .promote_if_free(scope, slug)
            .await?
            .ok_or(AppError::AlreadyUpgraded)?;

        tracing::info!(tenant = %upgraded.slug, "Tenant migrado para o plano Pro");
        Ok(upgraded)
    }

    /// Uso atual do plano (contagem de notas e limite).
    pub async fn usage(&self, scope: &TenantScope) -> Result<TenantUsage, AppError> {
        let tenant = self
            .tenants
            .find_in_scope(scope)
            .await?
            .ok_or_else(|| anyhow::anyhow!("tenant {} do token não existe", scope.tenant_id()))?;

        let note_count = self.notes.count(scope).await?;

        Ok(TenantUsage {
            id: tenant.id,
            slug: tenant.slug,
            name: tenant.name,
            plan: tenant.plan,
            note_count,
            max_notes: self.policy.max_notes(tenant.plan),
        })
    }
}
