// src/db/memory.rs
//
// Store em memória para testes e desenvolvimento local (STORE_BACKEND=memory).
// Não é durável e não coordena múltiplos processos: a atomicidade da cota vem
// de fazer verificação + inserção sob a mesma trava de escrita.

use async_trait::async_trait;
use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{NoteStore, TenantStore, UserStore},
    middleware::tenancy::TenantScope,
    models::{
        auth::{NewUser, User},
        notes::{NewNote, Note, NoteFields},
        tenancy::{Plan, QuotaPolicy, Tenant},
    },
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    tenants: HashMap<Uuid, Tenant>,
    // Em ordem de inserção
    notes: Vec<Note>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        if !state.tenants.contains_key(&new_user.tenant_id) {
            return Err(AppError::TenantNotFound);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            tenant_id: new_user.tenant_id,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TenantStore for InMemoryStore {
    async fn find_by_id(&self, tenant_id: Uuid) -> Result<Option<Tenant>, AppError> {
        Ok(self.state.read().await.tenants.get(&tenant_id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        let state = self.state.read().await;
        Ok(state.tenants.values().find(|t| t.slug == slug).cloned())
    }

    async fn create_tenant(&self, slug: &str, name: &str, plan: Plan) -> Result<Tenant, AppError> {
        if !Tenant::is_valid_slug(slug) {
            return Err(AppError::InvalidSlug(slug.to_string()));
        }

        let mut state = self.state.write().await;
        if state.tenants.values().any(|t| t.slug == slug) {
            return Err(AppError::SlugAlreadyExists(slug.to_string()));
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: name.to_string(),
            plan,
            created_at: now,
            updated_at: now,
        };
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn find_in_scope(&self, scope: &TenantScope) -> Result<Option<Tenant>, AppError> {
        self.find_by_id(scope.tenant_id()).await
    }

    async fn find_in_scope_by_slug(
        &self,
        scope: &TenantScope,
        slug: &str,
    ) -> Result<Option<Tenant>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tenants
            .get(&scope.tenant_id())
            .filter(|t| t.slug == slug)
            .cloned())
    }

    async fn promote_if_free(
        &self,
        scope: &TenantScope,
        slug: &str,
    ) -> Result<Option<Tenant>, AppError> {
        let mut state = self.state.write().await;
        let promoted = state
            .tenants
            .get_mut(&scope.tenant_id())
            .filter(|t| t.slug == slug && t.plan == Plan::Free)
            .map(|t| {
                t.plan = Plan::Pro;
                t.updated_at = Utc::now();
                t.clone()
            });
        Ok(promoted)
    }
}

#[async_trait]
impl NoteStore for InMemoryStore {
    async fn insert_within_quota(
        &self,
        scope: &TenantScope,
        new_note: NewNote,
        policy: &QuotaPolicy,
    ) -> Result<Note, AppError> {
        let tenant_id = scope.tenant_id();
        // Uma única trava de escrita cobre a leitura do plano, a contagem e a inserção
        let mut state = self.state.write().await;

        let plan = state
            .tenants
            .get(&tenant_id)
            .map(|t| t.plan)
            .ok_or_else(|| anyhow::anyhow!("tenant {} do token não existe no store", tenant_id))?;

        let current = state.notes.iter().filter(|n| n.tenant_id == tenant_id).count() as i64;
        if !policy.admits(plan, current) {
            return Err(policy.exceeded());
        }

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            tenant_id,
            user_id: new_note.user_id,
            title: new_note.title,
            content: new_note.content,
            created_at: now,
            updated_at: now,
        };
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn list(&self, scope: &TenantScope) -> Result<Vec<Note>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .notes
            .iter()
            .rev()
            .filter(|n| n.tenant_id == scope.tenant_id())
            .cloned()
            .collect())
    }

    async fn find(&self, scope: &TenantScope, note_id: Uuid) -> Result<Option<Note>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .notes
            .iter()
            .find(|n| n.id == note_id && n.tenant_id == scope.tenant_id())
            .cloned())
    }

    async fn update(
        &self,
        scope: &TenantScope,
        note_id: Uuid,
        fields: NoteFields,
    ) -> Result<Option<Note>, AppError> {
        let mut state = self.state.write().await;
        let updated = state
            .notes
            .iter_mut()
            .find(|n| n.id == note_id && n.tenant_id == scope.tenant_id())
            .map(|n| {
                n.title = fields.title;
                n.content = fields.content;
                n.updated_at = Utc::now();
                n.clone()
            });
        Ok(updated)
    }

    async fn delete(&self, scope: &TenantScope, note_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let before = state.notes.len();
        state
            .notes
            .retain(|n| !(n.id == note_id && n.tenant_id == scope.tenant_id()));
        Ok(state.notes.len() < before)
    }

    async fn count(&self, scope: &TenantScope) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state.notes.iter().filter(|n| n.tenant_id == scope.tenant_id()).count() as i64)
    }
}
