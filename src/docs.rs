// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::login,

        // --- Notes ---
        handlers::notes::create_note,
        handlers::notes::list_notes,
        handlers::notes::get_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,

        // --- Tenancy ---
        handlers::tenancy::upgrade_tenant,
        handlers::tenancy::current_tenant,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::LoginUserPayload,
            models::auth::LoginResponse,
            models::auth::UserSummary,

            // --- Notes ---
            models::notes::Note,
            models::notes::NotePayload,

            // --- Tenancy ---
            models::tenancy::Plan,
            models::tenancy::Tenant,
            models::tenancy::TenantSummary,
            models::tenancy::TenantUsage,
            models::tenancy::UpgradeResponse,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Auth", description = "Login e emissão de tokens"),
        (name = "Notes", description = "Notas do tenant (limitadas pelo plano)"),
        (name = "Tenancy", description = "Plano e uso do tenant")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/login",
            "/api/v1/notes",
            "/api/v1/notes/{id}",
            "/api/v1/tenants/{slug}/upgrade",
            "/api/v1/tenants/current",
            "/api/v1/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {path}");
        }
    }
}
