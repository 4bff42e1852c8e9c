// src/services/auth.rs

use bcrypt::{hash, verify};
use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{TenantStore, UserStore},
    models::auth::{Identity, LoginResponse, UserSummary},
    services::token::TokenService,
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tenants: Arc<dyn TenantStore>,
    token_service: TokenService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tenants: Arc<dyn TenantStore>,
        token_service: TokenService,
    ) -> Self {
        Self { users, tenants, token_service }
    }

    /// A única porta de entrada não autenticada. O e-mail é comparado
    /// exatamente como armazenado.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login recusado: usuário desconhecido");
                return Err(AppError::InvalidCredentials);
            }
        };

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            tracing::warn!(user_id = %user.id, "Login recusado: senha incorreta");
            return Err(AppError::InvalidCredentials);
        }

        // Usuário sem tenant é uma quebra de invariante do provisionamento
        let tenant = self
            .tenants
            .find_by_id(user.tenant_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("usuário {} sem tenant {}", user.id, user.tenant_id))?;

        let token = self.token_service.issue(&Identity::from(&user))?;

        tracing::info!(user_id = %user.id, tenant = %tenant.slug, "Token emitido");

        Ok(LoginResponse {
            token,
            user: UserSummary {
                id: user.id,
                email: user.email,
                role: user.role,
                tenant: tenant.summary(),
            },
        })
    }
}

/// Gera o hash bcrypt fora do runtime assíncrono.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
        ?;
    Ok(hashed)
}
