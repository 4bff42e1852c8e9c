mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{empty_request, read_json, spawn_app};
use notes_backend::models::{auth::Role, tenancy::Plan};

#[tokio::test]
async fn members_cannot_upgrade() {
    let app = spawn_app().await;
    let member = app.login("user@acme.test").await;

    let response = app
        .send(empty_request("POST", "/api/v1/tenants/acme/upgrade", Some(&member)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["success"], false);
    assert_eq!(app.plan_of("acme").await, Plan::Free);
}

#[tokio::test]
async fn admin_upgrades_exactly_once() {
    let app = spawn_app().await;
    let admin = app.login("admin@acme.test").await;

    let response = app
        .send(empty_request("POST", "/api/v1/tenants/acme/upgrade", Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["message"], "Tenant upgraded to Pro plan successfully");
    assert_eq!(payload["data"]["tenant"]["slug"], "acme");
    assert_eq!(payload["data"]["tenant"]["plan"], "pro");

    let response = app
        .send(empty_request("POST", "/api/v1/tenants/acme/upgrade", Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(read_json(response).await["message"], "Tenant is already on Pro plan");
    assert_eq!(app.plan_of("acme").await, Plan::Pro);

    // O outro tenant não é afetado
    assert_eq!(app.plan_of("globex").await, Plan::Free);
}

#[tokio::test]
async fn admin_cannot_upgrade_another_tenant() {
    let app = spawn_app().await;
    let acme_admin = app.login("admin@acme.test").await;

    for slug in ["globex", "does-not-exist"] {
        let response = app
            .send(empty_request(
                "POST",
                &format!("/api/v1/tenants/{slug}/upgrade"),
                Some(&acme_admin),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "slug {slug}");
        assert_eq!(read_json(response).await["message"], "Tenant not found");
    }
    assert_eq!(app.plan_of("globex").await, Plan::Free);
}

// Claims valem até expirar: um token antigo de admin mantém o privilégio
#[tokio::test]
async fn claims_are_trusted_until_expiry() {
    let app = spawn_app().await;
    let stale_admin = app
        .token_issued_at("user@acme.test", Role::Admin, "acme", Utc::now())
        .await;

    let response = app
        .send(empty_request("POST", "/api/v1/tenants/acme/upgrade", Some(&stale_admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn current_tenant_reports_usage() {
    let app = spawn_app().await;
    let token = app.login("user@globex.test").await;
    app.create_note(&token, "primeira").await;

    let response = app
        .send(empty_request("GET", "/api/v1/tenants/current", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["data"]["slug"], "globex");
    assert_eq!(payload["data"]["plan"], "free");
    assert_eq!(payload["data"]["noteCount"], 1);
    assert_eq!(payload["data"]["maxNotes"], 3);
}
