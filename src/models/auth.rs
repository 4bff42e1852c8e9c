// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::tenancy::TenantSummary;

// ---
// Cargos e Capacidades
// ---
// Conjunto fechado: um cargo desconhecido falha na desserialização
// em vez de desligar silenciosamente uma verificação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

/// Permissões nomeadas verificadas pelo Role Guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AdministerTenant,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AdministerTenant => "administer-tenant",
        }
    }
}

impl Role {
    pub fn has_capability(self, capability: Capability) -> bool {
        match (self, capability) {
            (Role::Admin, Capability::AdministerTenant) => true,
            (Role::Member, Capability::AdministerTenant) => false,
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados para provisionar um usuário (seed / provisionamento externo).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: Uuid,
}

/// Os fatos de identidade no momento do login, antes dos timestamps do token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub tenant_id: Uuid,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            tenant_id: user.tenant_id,
        }
    }
}

// Estrutura de dados ("claims") dentro do JWT.
// Confiada literalmente até expirar: não é revalidada contra o banco.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub tenant_id: Uuid,
    pub iat: i64, // Issued At (segundos desde a época)
    pub exp: i64, // Expiration time
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            email: self.email.clone(),
            role: self.role,
            tenant_id: self.tenant_id,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "admin@acme.test")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "password")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub tenant: TenantSummary,
}

// Resposta de autenticação com o token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}
