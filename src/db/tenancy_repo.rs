// src/db/tenancy_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantStore,
    middleware::tenancy::TenantScope,
    models::tenancy::{Plan, Tenant},
};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for TenantRepository {
    async fn find_by_id(&self, tenant_id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    /// Cria um novo tenant (Workspace) na base de dados.
    async fn create_tenant(&self, slug: &str, name: &str, plan: Plan) -> Result<Tenant, AppError> {
        if !Tenant::is_valid_slug(slug) {
            return Err(AppError::InvalidSlug(slug.to_string()));
        }

        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (slug, name, plan)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(plan)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SlugAlreadyExists(slug.to_string());
                }
            }
            e.into()
        })
    }

    async fn find_in_scope(&self, scope: &TenantScope) -> Result<Option<Tenant>, AppError> {
        self.find_by_id(scope.tenant_id()).await
    }

    async fn find_in_scope_by_slug(
        &self,
        scope: &TenantScope,
        slug: &str,
    ) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE id = $1 AND slug = $2",
        )
        .bind(scope.tenant_id())
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }

    // A condição `plan = 'free'` no próprio UPDATE garante que, entre dois
    // upgrades concorrentes, só um encontra a linha.
    async fn promote_if_free(
        &self,
        scope: &TenantScope,
        slug: &str,
    ) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET plan = 'pro', updated_at = now()
            WHERE id = $1 AND slug = $2 AND plan = 'free'
            RETURNING *
            "#,
        )
        .bind(scope.tenant_id())
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }
}
