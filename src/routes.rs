// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, rate_limit::throttle_requests},
};

pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas de notas (protegidas pelo middleware).
    // `route_layer` só protege rotas existentes: o resto cai no 404 em JSON.
    let note_routes = Router::new()
        .route(
            "/",
            post(handlers::notes::create_note).get(handlers::notes::list_notes),
        )
        .route(
            "/{id}",
            get(handlers::notes::get_note)
                .put(handlers::notes::update_note)
                .delete(handlers::notes::delete_note),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let tenancy_routes = Router::new()
        .route("/current", get(handlers::tenancy::current_tenant))
        .route("/{slug}/upgrade", post(handlers::tenancy::upgrade_tenant))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/v1/health", get(handlers::health::health))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/notes", note_routes)
        .nest("/api/v1/tenants", tenancy_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .method_not_allowed_fallback(handlers::health::method_not_allowed)
        .fallback(handlers::health::fallback)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            throttle_requests,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        // Cabeçalhos de segurança em toda resposta
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
