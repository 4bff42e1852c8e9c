mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{empty_request, json_request, read_json, spawn_app};
use notes_backend::{
    db::{NoteStore, TenantStore},
    models::auth::Role,
};
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_never_exceed_the_free_limit() {
    let app = spawn_app().await;
    let token = app.login("user@acme.test").await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let router = app.router.clone();
        let request = json_request(
            "POST",
            "/api/v1/notes",
            Some(&token),
            json!({ "title": format!("nota {i}") }),
        );
        handles.push(tokio::spawn(async move {
            use tower::ServiceExt;
            router.oneshot(request).await.unwrap().status()
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => rejected += 1,
            other => panic!("status inesperado: {other}"),
        }
    }
    assert_eq!(created, 3);
    assert_eq!(rejected, 7);

    let response = app.send(empty_request("GET", "/api/v1/notes", Some(&token))).await;
    let payload = read_json(response).await;
    assert_eq!(payload["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn fourth_note_is_rejected_with_an_upgrade_hint() {
    let app = spawn_app().await;
    let token = app.login("user@globex.test").await;

    for i in 0..3 {
        let response = app.create_note(&token, &format!("nota {i}")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = read_json(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["data"]["title"], format!("nota {i}"));
    }

    let response = app.create_note(&token, "nota 3").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert_eq!(payload["success"], false);
    assert_eq!(
        payload["message"],
        "Free plan allows maximum 3 notes. Please upgrade to Pro plan."
    );

    // Apagar uma nota libera espaço de novo
    let listed = read_json(app.send(empty_request("GET", "/api/v1/notes", Some(&token))).await).await;
    let id = listed["data"][0]["id"].as_str().unwrap().to_string();
    let response = app
        .send(empty_request("DELETE", &format!("/api/v1/notes/{id}"), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.create_note(&token, "nota 3").await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn pro_tenant_creates_without_limit() {
    let app = spawn_app().await;
    let admin = app.login("admin@acme.test").await;

    let response = app
        .send(empty_request("POST", "/api/v1/tenants/acme/upgrade", Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    for i in 0..6 {
        assert_eq!(
            app.create_note(&admin, &format!("nota {i}")).await.status(),
            StatusCode::CREATED
        );
    }

    let response = app
        .send(empty_request("GET", "/api/v1/tenants/current", Some(&admin)))
        .await;
    let payload = read_json(response).await;
    assert_eq!(payload["data"]["plan"], "pro");
    assert_eq!(payload["data"]["noteCount"], 6);
    assert!(payload["data"]["maxNotes"].is_null());
}

#[tokio::test]
async fn title_is_required_on_create_and_update() {
    let app = spawn_app().await;
    let token = app.login("user@acme.test").await;

    for body in [json!({ "content": "sem título" }), json!({ "title": "   " })] {
        let response = app
            .send(json_request("POST", "/api/v1/notes", Some(&token), body))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["message"], "Title is required");
    }

    let created = read_json(app.create_note(&token, "original").await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .send(json_request(
            "PUT",
            &format!("/api/v1/notes/{id}"),
            Some(&token),
            json!({ "title": "" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(json_request(
            "PUT",
            &format!("/api/v1/notes/{id}"),
            Some(&token),
            json!({ "title": "editada", "content": "novo" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["data"]["title"], "editada");
    assert_eq!(payload["data"]["content"], "novo");
}

#[tokio::test]
async fn any_member_of_the_tenant_can_edit_any_note() {
    let app = spawn_app().await;
    let member = app.login("user@acme.test").await;
    let admin = app.login("admin@acme.test").await;

    let created = read_json(app.create_note(&member, "do membro").await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .send(json_request(
            "PUT",
            &format!("/api/v1/notes/{id}"),
            Some(&admin),
            json!({ "title": "editada pelo admin" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["data"]["content"], "");
    assert_eq!(payload["data"]["userId"], created["data"]["userId"]);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = spawn_app().await;

    let response = app.send(empty_request("GET", "/api/v1/notes", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["success"], false);

    let response = app.send(empty_request("GET", "/api/v1/notes", Some("not.a.jwt"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = app.login("user@acme.test").await;
    let tampered = format!("{}x", token);
    let response = app.send(empty_request("GET", "/api/v1/notes", Some(&tampered))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected_everywhere() {
    let app = spawn_app().await;
    let expired = app
        .token_issued_at("admin@acme.test", Role::Admin, "acme", Utc::now() - Duration::hours(2))
        .await;

    // Uma nota real, criada com token válido, para as rotas por id
    let valid = app.login("admin@acme.test").await;
    let created = read_json(app.create_note(&valid, "existente").await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let note_uri = format!("/api/v1/notes/{id}");

    let requests = vec![
        json_request("POST", "/api/v1/notes", Some(&expired), json!({ "title": "ok" })),
        empty_request("GET", "/api/v1/notes", Some(&expired)),
        empty_request("GET", &note_uri, Some(&expired)),
        json_request("PUT", &note_uri, Some(&expired), json!({ "title": "alterada" })),
        empty_request("DELETE", &note_uri, Some(&expired)),
        empty_request("GET", "/api/v1/tenants/current", Some(&expired)),
        empty_request("POST", "/api/v1/tenants/acme/upgrade", Some(&expired)),
    ];
    for request in requests {
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["message"], "Token expired");
    }

    // Nada foi escrito
    let acme = app.store.find_by_slug("acme").await.unwrap().unwrap();
    assert_eq!(acme.plan, notes_backend::models::tenancy::Plan::Free);
    let claims = app.tokens.verify(&valid).unwrap();
    let scope = notes_backend::middleware::tenancy::TenantScope::from_claims(&claims);
    assert_eq!(app.store.count(&scope).await.unwrap(), 1);

    let response = app.send(empty_request("GET", &note_uri, Some(&valid))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["data"]["title"], "existente");
}
