//! HTTP-level integration tests for the schema-driven entity endpoints.
//!
//! One generic router serves every catalog entity, so these tests spread
//! coverage across several of them: client-keyed sites (tdl), auto-keyed
//! vendors (fabricant, fournisseurs), and equipment with joined vendor
//! labels (ac, besoin).

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, build_test_app, delete_auth, get, post_json, post_json_auth,
    put_json_auth,
};
use parc_core::roles::Role;
use sqlx::PgPool;

async fn staff_token(pool: &PgPool) -> String {
    auth_token(pool, "staff@parc.test", Role::Engineering).await
}

// ---------------------------------------------------------------------------
// Create / read round trips
// ---------------------------------------------------------------------------

/// The legacy-client scenario: mixed-case `Contact` key, integral `num`.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_fabricant_round_trip(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/fabricant",
        serde_json::json!({
            "num": 12,
            "nom": "Acme",
            "Contact": "J. Doe",
            "courriel": "j@acme.com",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().expect("created id must be a number");

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/fabricant/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["num"], 12, "integral numbers must read back as integers");
    assert_eq!(json["nom"], "Acme");
    assert_eq!(json["contact"], "J. Doe", "mixed-case key lands on the canonical field");
    assert_eq!(json["courriel"], "j@acme.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_tdl_with_client_key(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({
            "id": "T1",
            "nom": "Site principal",
            "ville": "Montreal",
            "region": "Sud",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["id"], "T1");

    let app = build_test_app(pool);
    let response = get(app, "/api/tdl/T1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["nom"], "Site principal");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tdl_requires_client_key(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({ "nom": "Sans code" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["field"] == "id"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_client_key_conflicts(pool: PgPool) {
    let token = staff_token(&pool).await;
    let payload = serde_json::json!({ "id": "T1", "nom": "Site principal" });

    let app = build_test_app(pool.clone());
    let first = post_json_auth(app, "/api/tdl", payload.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = build_test_app(pool);
    let second = post_json_auth(app, "/api/tdl", payload, &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// Equipment referencing vendors gets joined display labels.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ac_round_trip_with_vendor_labels(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({ "id": "T2", "nom": "Site nord" }),
        &token,
    )
    .await;

    let app = build_test_app(pool.clone());
    let fabricant = body_json(
        post_json_auth(
            app,
            "/api/fabricant",
            serde_json::json!({ "nom": "Generac" }),
            &token,
        )
        .await,
    )
    .await;
    let fabricant_id = fabricant["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let fournisseur = body_json(
        post_json_auth(
            app,
            "/api/fournisseurs",
            serde_json::json!({ "nom": "Distribution Lavoie" }),
            &token,
        )
        .await,
    )
    .await;
    let fournisseur_id = fournisseur["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/ac",
        serde_json::json!({
            "tdl_id": "T2",
            "modele": "AC-4500",
            "fabricant_id": fabricant_id,
            "fournisseur_id": fournisseur_id,
            "capacite": 48.5,
            "date_installation": "2024-03-15",
            "statut": "en_service",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["fabricant_nom"], "Generac");
    assert_eq!(created["fournisseur_nom"], "Distribution Lavoie");

    let app = build_test_app(pool);
    let json = body_json(get(app, &format!("/api/ac/{id}")).await).await;
    assert_eq!(json["tdl_id"], "T2");
    assert_eq!(json["capacite"], 48.5);
    assert_eq!(json["date_installation"], "2024-03-15");
    assert_eq!(json["statut"], "en_service");
    assert_eq!(json["fabricant_nom"], "Generac");
    assert!(json["created_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_besoin_boolean_round_trip(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({ "id": "T3", "nom": "Site est" }),
        &token,
    )
    .await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/besoin",
        serde_json::json!({
            "tdl_id": "T3",
            "description": "Remplacement redresseur",
            "priorite": "haute",
            "urgent": true,
            "statut": "ouvert",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let app = build_test_app(pool);
    let json = body_json(get(app, &format!("/api/besoin/{id}")).await).await;
    assert_eq!(json["urgent"], true);
    assert_eq!(json["priorite"], "haute");
}

// ---------------------------------------------------------------------------
// Not-found outcomes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_missing_tdl_message(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool);
    let response = delete_auth(app, "/api/tdl/T9", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "TDL record not found");
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_ids_are_404_never_500(pool: PgPool) {
    let token = staff_token(&pool).await;

    // Numeric id with no row.
    let app = build_test_app(pool.clone());
    assert_eq!(
        get(app, "/api/ac/999999").await.status(),
        StatusCode::NOT_FOUND
    );

    // Non-numeric id on an auto-keyed entity cannot exist.
    let app = build_test_app(pool.clone());
    assert_eq!(
        get(app, "/api/ac/abc").await.status(),
        StatusCode::NOT_FOUND
    );

    // Update and delete behave the same.
    let app = build_test_app(pool.clone());
    assert_eq!(
        put_json_auth(
            app,
            "/api/fabricant/999999",
            serde_json::json!({ "nom": "X" }),
            &token
        )
        .await
        .status(),
        StatusCode::NOT_FOUND
    );
    let app = build_test_app(pool);
    assert_eq!(
        delete_auth(app, "/api/fabricant/999999", &token).await.status(),
        StatusCode::NOT_FOUND
    );
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_required_field_details(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/fournisseurs",
        serde_json::json!({ "contact": "M. Roy" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let details = json["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "nom"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_field_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/fournisseurs",
        serde_json::json!({ "nom": "X", "no_serie": "123" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_enum_membership_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({ "id": "T4", "nom": "Site" }),
        &token,
    )
    .await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/ac",
        serde_json::json!({ "tdl_id": "T4", "statut": "broken" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let details = json["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "statut"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_site_reference_conflicts(pool: PgPool) {
    let token = staff_token(&pool).await;

    // FK violation must surface as a 409, not a raw 500.
    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/ac",
        serde_json::json!({ "tdl_id": "ZZ" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Update semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_is_idempotent(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/fournisseurs",
            serde_json::json!({ "nom": "Original", "ville": "Quebec" }),
            &token,
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let update = serde_json::json!({ "nom": "Renomme", "contact": "M. Cote" });

    let app = build_test_app(pool.clone());
    let first = body_json(
        put_json_auth(app, &format!("/api/fournisseurs/{id}"), update.clone(), &token).await,
    )
    .await;

    let app = build_test_app(pool);
    let second = body_json(
        put_json_auth(app, &format!("/api/fournisseurs/{id}"), update, &token).await,
    )
    .await;

    // Same stored state both times, modulo the update timestamp.
    let strip = |mut v: serde_json::Value| {
        v.as_object_mut().unwrap().remove("updated_at");
        v
    };
    assert_eq!(strip(first), strip(second));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_cannot_change_id(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({ "id": "T5", "nom": "Site" }),
        &token,
    )
    .await;

    let app = build_test_app(pool);
    let response = put_json_auth(
        app,
        "/api/tdl/T5",
        serde_json::json!({ "id": "T6" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reads_are_public(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/tdl").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_mutation_without_token_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/fabricant", serde_json::json!({ "nom": "X" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "NO_TOKEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_viewer_cannot_mutate(pool: PgPool) {
    let token = auth_token(&pool, "viewer@parc.test", Role::Viewer).await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/fabricant",
        serde_json::json!({ "nom": "X" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// List shape
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_returns_display_fields(pool: PgPool) {
    let token = staff_token(&pool).await;

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/tdl",
        serde_json::json!({
            "id": "T7",
            "nom": "Site ouest",
            "ville": "Gatineau",
            "telephone": "819-555-0000",
        }),
        &token,
    )
    .await;

    let app = build_test_app(pool);
    let json = body_json(get(app, "/api/tdl").await).await;
    let rows = json.as_array().unwrap();
    let row = rows.iter().find(|r| r["id"] == "T7").expect("row listed");

    assert_eq!(row["nom"], "Site ouest");
    assert_eq!(row["ville"], "Gatineau");
    // `telephone` is not a display field; the list view omits it.
    assert!(row.get("telephone").is_none());
}
