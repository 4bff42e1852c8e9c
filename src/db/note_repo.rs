// src/db/note_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NoteStore,
    middleware::tenancy::TenantScope,
    models::{
        notes::{NewNote, Note, NoteFields},
        tenancy::{Plan, QuotaPolicy},
    },
};

#[derive(Clone)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn insert_within_quota(
        &self,
        scope: &TenantScope,
        new_note: NewNote,
        policy: &QuotaPolicy,
    ) -> Result<Note, AppError> {
        let tenant_id = scope.tenant_id();

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 1. Trava a linha do tenant. Todas as criações do mesmo tenant (em
        //    qualquer processo) passam por aqui em fila, e o upgrade também
        //    espera por ela.
        let plan = sqlx::query_scalar::<_, Plan>(
            "SELECT plan FROM tenants WHERE id = $1 FOR UPDATE",
        )
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            anyhow::anyhow!("tenant {} do token não existe no banco", tenant_id)
        })?;

        // 2. Recontagem em um novo statement: em READ COMMITTED ele enxerga
        //    as notas confirmadas por quem segurava a trava antes de nós.
        if plan == Plan::Free {
            let current = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM notes WHERE tenant_id = $1",
            )
            .bind(tenant_id)
            .fetch_one(&mut *tx)
            .await?;

            if !policy.admits(plan, current) {
                // O drop do `tx` faz o rollback e libera a trava
                return Err(policy.exceeded());
            }
        }

        // 3. Insere
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (tenant_id, user_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(new_note.user_id)
        .bind(&new_note.title)
        .bind(&new_note.content)
        .fetch_one(&mut *tx)
        .await?;

        // 4. Commit
        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        Ok(note)
    }

    async fn list(&self, scope: &TenantScope) -> Result<Vec<Note>, AppError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE tenant_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(scope.tenant_id())
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn find(&self, scope: &TenantScope, note_id: Uuid) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE id = $1 AND tenant_id = $2",
        )
        .bind(note_id)
        .bind(scope.tenant_id())
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        note_id: Uuid,
        fields: NoteFields,
    ) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = $3, content = $4, updated_at = now()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(note_id)
        .bind(scope.tenant_id())
        .bind(&fields.title)
        .bind(&fields.content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn delete(&self, scope: &TenantScope, note_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND tenant_id = $2")
            .bind(note_id)
            .bind(scope.tenant_id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, scope: &TenantScope) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notes WHERE tenant_id = $1")
            .bind(scope.tenant_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
