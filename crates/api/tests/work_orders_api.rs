//! HTTP-level integration tests for the work order endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, build_test_app, create_test_user, delete_auth, get, get_auth,
    post_json_auth, put_json_auth,
};
use parc_core::roles::Role;
use sqlx::PgPool;

async fn staff_token(pool: &PgPool) -> String {
    auth_token(pool, "staff@parc.test", Role::Maintenance).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_sets_created_by_and_defaults(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/work-orders",
        serde_json::json!({ "titre": "Inspection genset" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["titre"], "Inspection genset");
    assert_eq!(json["statut"], "ouverte", "status defaults to open");
    assert_eq!(json["priorite"], "normale");
    assert!(json["created_by"].is_number(), "creator comes from the token");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_with_site_and_assignee_labels(pool: PgPool) {
    let token = staff_token(&pool).await;
    let assignee = create_test_user(&pool, "assignee@parc.test", Role::Maintenance).await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({ "id": "T1", "nom": "Site principal" }),
        &token,
    )
    .await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/work-orders",
        serde_json::json!({
            "titre": "Remplacer batteries",
            "tdl_id": "T1",
            "assigned_to": assignee.id,
            "priorite": "haute",
            "date_echeance": "2026-09-01",
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["tdl_nom"], "Site principal");
    assert_eq!(json["assigned_to_name"], "Test User");
    assert_eq!(json["date_echeance"], "2026-09-01");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_requires_auth(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/work-orders").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_filters_and_pagination(pool: PgPool) {
    let token = staff_token(&pool).await;

    for (titre, statut) in [
        ("A", "ouverte"),
        ("B", "ouverte"),
        ("C", "terminee"),
    ] {
        let app = build_test_app(pool.clone());
        post_json_auth(
            app,
            "/api/work-orders",
            serde_json::json!({ "titre": titre, "statut": statut }),
            &token,
        )
        .await;
    }

    let app = build_test_app(pool.clone());
    let json = body_json(
        get_auth(app, "/api/work-orders?statut=ouverte&page=1&limit=1", &token).await,
    )
    .await;
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["pagination"]["total"], 2);
    assert_eq!(json["pagination"]["pages"], 2);

    let app = build_test_app(pool);
    let json = body_json(get_auth(app, "/api/work-orders", &token).await).await;
    assert_eq!(json["pagination"]["total"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_statut_filter_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/work-orders?statut=broken", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_missing_404(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/work-orders/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Work order record not found"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_status_transition(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/work-orders",
            serde_json::json!({ "titre": "Avancer" }),
            &token,
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let app = build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/work-orders/{id}"),
        serde_json::json!({ "statut": "en_cours" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["statut"], "en_cours");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_viewer_reads_but_cannot_create(pool: PgPool) {
    let staff = staff_token(&pool).await;
    let viewer = auth_token(&pool, "viewer@parc.test", Role::Viewer).await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/work-orders",
        serde_json::json!({ "titre": "Lisible" }),
        &staff,
    )
    .await;

    let app = build_test_app(pool.clone());
    let response = get_auth(app, "/api/work-orders", &viewer).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/work-orders",
        serde_json::json!({ "titre": "Interdit" }),
        &viewer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_is_admin_only_and_hard(pool: PgPool) {
    let staff = staff_token(&pool).await;
    let admin = auth_token(&pool, "admin@parc.test", Role::Admin).await;

    let app = build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/work-orders",
            serde_json::json!({ "titre": "A supprimer" }),
            &staff,
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Staff cannot delete.
    let app = build_test_app(pool.clone());
    assert_eq!(
        delete_auth(app, &format!("/api/work-orders/{id}"), &staff)
            .await
            .status(),
        StatusCode::FORBIDDEN
    );

    // Admin can; the row is gone afterwards (hard delete).
    let app = build_test_app(pool.clone());
    assert_eq!(
        delete_auth(app, &format!("/api/work-orders/{id}"), &admin)
            .await
            .status(),
        StatusCode::NO_CONTENT
    );

    let app = build_test_app(pool.clone());
    assert_eq!(
        get_auth(app, &format!("/api/work-orders/{id}"), &admin)
            .await
            .status(),
        StatusCode::NOT_FOUND
    );

    let app = build_test_app(pool);
    assert_eq!(
        delete_auth(app, &format!("/api/work-orders/{id}"), &admin)
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
}
