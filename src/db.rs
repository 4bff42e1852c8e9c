// src/db.rs
//
// Contratos de persistência. Toda operação sobre notas (e toda mutação de
// tenant) exige um `TenantScope`, que só nasce de claims verificadas: o
// filtro `tenant_id = claims.tenant_id` é estrutural, não uma convenção.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::tenancy::TenantScope,
    models::{
        auth::{NewUser, User},
        notes::{NewNote, Note, NoteFields},
        tenancy::{Plan, QuotaPolicy, Tenant},
    },
};

pub mod memory;
pub mod note_repo;
pub mod tenancy_repo;
pub mod user_repo;

pub use memory::InMemoryStore;
pub use note_repo::NoteRepository;
pub use tenancy_repo::TenantRepository;
pub use user_repo::UserRepository;

/// O Credential Store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Busca exata (sensível a maiúsculas/minúsculas).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Usado apenas no login, antes de existir um escopo.
    async fn find_by_id(&self, tenant_id: Uuid) -> Result<Option<Tenant>, AppError>;

    /// Provisionamento (seed).
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;

    async fn create_tenant(&self, slug: &str, name: &str, plan: Plan) -> Result<Tenant, AppError>;

    async fn find_in_scope(&self, scope: &TenantScope) -> Result<Option<Tenant>, AppError>;

    /// Tenant do escopo, desde que o slug também bata.
    async fn find_in_scope_by_slug(
        &self,
        scope: &TenantScope,
        slug: &str,
    ) -> Result<Option<Tenant>, AppError>;

    /// Escrita condicional `free -> pro`. `None` se o tenant não estava
    /// (mais) no plano gratuito.
    async fn promote_if_free(
        &self,
        scope: &TenantScope,
        slug: &str,
    ) -> Result<Option<Tenant>, AppError>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Verificação de cota e inserção como uma única unidade atômica.
    /// Falha com `QuotaExceeded` quando o plano gratuito já está no limite.
    async fn insert_within_quota(
        &self,
        scope: &TenantScope,
        new_note: NewNote,
        policy: &QuotaPolicy,
    ) -> Result<Note, AppError>;

    /// Mais recentes primeiro.
    async fn list(&self, scope: &TenantScope) -> Result<Vec<Note>, AppError>;

    async fn find(&self, scope: &TenantScope, note_id: Uuid) -> Result<Option<Note>, AppError>;

    async fn update(
        &self,
        scope: &TenantScope,
        note_id: Uuid,
        fields: NoteFields,
    ) -> Result<Option<Note>, AppError>;

    /// `false` se a nota não existe neste tenant.
    async fn delete(&self, scope: &TenantScope, note_id: Uuid) -> Result<bool, AppError>;

    async fn count(&self, scope: &TenantScope) -> Result<i64, AppError>;
}
