#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use notes_backend::{
    config::AppState,
    db::{InMemoryStore, TenantStore, UserStore},
    middleware::rate_limit::RequestThrottle,
    models::{
        auth::{Identity, Role},
        tenancy::{Plan, QuotaPolicy},
    },
    routes::build_router,
    services::{seed::seed_demo_data, TokenService},
};

pub const PASSWORD: &str = "password";
pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub tokens: TokenService,
}

/// App completo sobre o store em memória, com acme e globex semeados
/// (admin@<slug>.test e user@<slug>.test, senha "password").
pub async fn spawn_app() -> TestApp {
    spawn_app_with_throttle(RequestThrottle::default()).await
}

pub async fn spawn_app_with_throttle(throttle: RequestThrottle) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    seed_demo_data(store.as_ref(), store.as_ref(), 4)
        .await
        .expect("seed");

    let tokens = TokenService::new(JWT_SECRET, chrono::Duration::hours(1));
    let state = AppState::from_stores(
        store.clone(),
        store.clone(),
        store.clone(),
        tokens.clone(),
        QuotaPolicy::default(),
    )
    .with_throttle(throttle);

    TestApp { router: build_router(state), store, tokens }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("response")
    }

    pub async fn login(&self, email: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                serde_json::json!({ "email": email, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login de {email}");
        let body = read_json(response).await;
        body["data"]["token"].as_str().expect("token").to_string()
    }

    /// Token assinado com o segredo do app, emitido em um instante arbitrário.
    pub async fn token_issued_at(
        &self,
        email: &str,
        role: Role,
        slug: &str,
        issued_at: chrono::DateTime<chrono::Utc>,
    ) -> String {
        let tenant = self.store.find_by_slug(slug).await.unwrap().expect("tenant");
        let user = self.store.find_by_email(email).await.unwrap().expect("user");
        let identity = Identity { user_id: user.id, email: user.email, role, tenant_id: tenant.id };
        self.tokens.issue_at(&identity, issued_at).expect("token")
    }

    pub async fn create_note(&self, token: &str, title: &str) -> Response {
        self.send(json_request(
            "POST",
            "/api/v1/notes",
            Some(token),
            serde_json::json!({ "title": title, "content": "conteúdo" }),
        ))
        .await
    }

    pub async fn plan_of(&self, slug: &str) -> Plan {
        self.store.find_by_slug(slug).await.unwrap().expect("tenant").plan
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
