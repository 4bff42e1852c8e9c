// src/models/tenancy.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

/// Limite fixo de notas para tenants no plano gratuito.
pub const FREE_PLAN_NOTE_LIMIT: i64 = 3;

// ---
// 1. Plan (A "Assinatura")
// ---
// Máquina de estados de mão única: free -> pro. Não existe downgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tenant_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    /// A única transição. Repetir o upgrade é um conflito, não um sucesso silencioso.
    pub fn upgrade(self) -> Result<Plan, AppError> {
        match self {
            Plan::Free => Ok(Plan::Pro),
            Plan::Pro => Err(AppError::AlreadyUpgraded),
        }
    }
}

// ---
// 2. Tenant (O "Workspace")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Slugs aceitos: minúsculas e dígitos, separados por hífens simples.
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    pub fn summary(&self) -> TenantSummary {
        TenantSummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            plan: self.plan,
        }
    }
}

/// Visão pública do tenant (login e upgrade).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TenantSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub plan: Plan,
}

/// Uso atual do plano, consumido pelos banners de upgrade do cliente.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantUsage {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub plan: Plan,
    pub note_count: i64,
    /// `null` para tenants pro (ilimitado).
    pub max_notes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpgradeResponse {
    pub tenant: TenantSummary,
}

// ---
// 3. QuotaPolicy
// ---
#[derive(Debug, Clone, Copy)]
pub struct QuotaPolicy {
    pub free_limit: i64,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self { free_limit: FREE_PLAN_NOTE_LIMIT }
    }
}

impl QuotaPolicy {
    /// Tenants pro pulam a verificação por completo.
    pub fn admits(&self, plan: Plan, current_count: i64) -> bool {
        match plan {
            Plan::Pro => true,
            Plan::Free => current_count < self.free_limit,
        }
    }

    pub fn max_notes(&self, plan: Plan) -> Option<i64> {
        match plan {
            Plan::Pro => None,
            Plan::Free => Some(self.free_limit),
        }
    }

    pub fn exceeded(&self) -> AppError {
        AppError::QuotaExceeded { limit: self.free_limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_upgrades_to_pro_once() {
        assert_eq!(Plan::Free.upgrade().unwrap(), Plan::Pro);
        assert!(matches!(Plan::Pro.upgrade(), Err(AppError::AlreadyUpgraded)));
    }

    #[test]
    fn free_plan_admits_up_to_the_limit() {
        let policy = QuotaPolicy::default();
        assert!(policy.admits(Plan::Free, 0));
        assert!(policy.admits(Plan::Free, 2));
        assert!(!policy.admits(Plan::Free, 3));
        assert!(!policy.admits(Plan::Free, 7));
        assert!(policy.admits(Plan::Pro, 10_000));
        assert_eq!(policy.max_notes(Plan::Free), Some(3));
        assert_eq!(policy.max_notes(Plan::Pro), None);
    }

    #[test]
    fn slug_must_be_url_safe() {
        assert!(Tenant::is_valid_slug("acme"));
        assert!(Tenant::is_valid_slug("globex-2"));
        assert!(!Tenant::is_valid_slug(""));
        assert!(!Tenant::is_valid_slug("Acme"));
        assert!(!Tenant::is_valid_slug("acme corp"));
        assert!(!Tenant::is_valid_slug("-acme"));
        assert!(!Tenant::is_valid_slug("acme--corp"));
    }
}
