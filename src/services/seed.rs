// src/services/seed.rs

use crate::{
    common::error::AppError,
    db::{TenantStore, UserStore},
    models::{
        auth::{NewUser, Role},
        tenancy::Plan,
    },
    services::auth::hash_password,
};

const DEMO_PASSWORD: &str = "password";

const DEMO_TENANTS: [(&str, &str); 2] = [("acme", "Acme Corp"), ("globex", "Globex Corporation")];

/// Dados de demonstração: dois tenants gratuitos com um admin e um membro cada.
/// Idempotente: registros existentes são mantidos como estão.
pub async fn seed_demo_data(
    tenants: &dyn TenantStore,
    users: &dyn UserStore,
    bcrypt_cost: u32,
) -> Result<(), AppError> {
    tracing::info!("🌱 Populando dados de demonstração...");

    let password_hash = hash_password(DEMO_PASSWORD, bcrypt_cost).await?;

    for (slug, name) in DEMO_TENANTS {
        let tenant = match tenants.find_by_slug(slug).await? {
            Some(existing) => existing,
            None => tenants.create_tenant(slug, name, Plan::Free).await?,
        };

        for (prefix, role) in [("admin", Role::Admin), ("user", Role::Member)] {
            let email = format!("{prefix}@{slug}.test");
            if users.find_by_email(&email).await?.is_some() {
                continue;
            }

            users
                .create_user(NewUser {
                    email: email.clone(),
                    password_hash: password_hash.clone(),
                    role,
                    tenant_id: tenant.id,
                })
                .await?;
            tracing::info!("✅ Usuário criado: {} ({:?})", email, role);
        }
    }

    Ok(())
}
