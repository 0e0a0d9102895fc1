use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use personnel_backend::middleware::auth::{require_hr_or_admin, Claims};
use personnel_backend::{routes, AppState};

const REVIEWER_ID: &str = "7f9c6a52-1f6e-4ce8-9347-0d2b8c5a9e11";

async fn setup() -> (Router, PgPool, String) {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    let _ = personnel_backend::config::init_config();

    let pool = personnel_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let reviewer = Uuid::parse_str(REVIEWER_ID).unwrap();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, 'not-a-real-hash', 'hr')
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(reviewer)
    .bind(format!("hr_{}@example.com", reviewer))
    .execute(&pool)
    .await
    .expect("seed reviewer");

    let state = AppState::new(pool.clone());
    let app = Router::new()
        .route("/api/trabajador", post(routes::worker::create_worker))
        .route(
            "/api/ficha-empresa/trabajador/:worker_id",
            get(routes::employment::get_record),
        )
        .route(
            "/api/ficha-empresa/trabajador/:worker_id/cambio",
            post(routes::employment::apply_labor_change),
        )
        .route("/api/licencia-permiso", post(routes::leave::create_leave))
        .route(
            "/api/licencia-permiso/:id/review",
            post(routes::leave::review_leave),
        )
        .route(
            "/api/licencia-permiso/expirar",
            post(routes::leave::run_expiry_sweep),
        )
        .layer(axum::middleware::from_fn(require_hr_or_admin))
        .with_state(state);

    let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
    let token = encode(
        &Header::default(),
        &Claims {
            sub: REVIEWER_ID.to_string(),
            exp,
            role: Some("hr".to_string()),
        },
        &EncodingKey::from_secret(
            personnel_backend::config::get_config().jwt_secret.as_bytes(),
        ),
    )
    .expect("sign token");

    (app, pool, format!("Bearer {}", token))
}

/// Random eight-digit national id with a valid mod-11 check digit.
fn fresh_national_id() -> String {
    let digits = format!("{:08}", Uuid::new_v4().as_u128() % 100_000_000);
    let mut factor = 2u32;
    let mut sum = 0u32;
    for b in digits.bytes().rev() {
        sum += (b - b'0') as u32 * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    let check = match 11 - (sum % 11) {
        11 => "0".to_string(),
        10 => "k".to_string(),
        v => v.to_string(),
    };
    format!("{}-{}", digits, check)
}

async fn post_json(
    app: &Router,
    auth: &str,
    uri: &str,
    body: JsonValue,
) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", auth)
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_worker(app: &Router, auth: &str, contract_start: &str) -> Uuid {
    let nid = fresh_national_id();
    let body = json!({
        "national_id": nid,
        "first_name": "Marta",
        "last_name": "Rojas",
        "email": format!("{}@example.com", nid.replace('-', "")),
        "hire_date": contract_start,
        "position": "Operator",
        "department": "Plant",
        "contract_type": "indefinite",
        "base_salary": 1_000_000,
        "contract_start": contract_start
    });
    let (status, created) = post_json(app, auth, "/api/trabajador", body).await;
    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(created["data"]["worker"]["id"].as_str().unwrap()).unwrap()
}

async fn fetch_record(app: &Router, auth: &str, worker_id: Uuid) -> JsonValue {
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/ficha-empresa/trabajador/{}", worker_id))
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    body["data"].clone()
}

async fn approve_leave(app: &Router, auth: &str, worker_id: Uuid, start: &str, end: &str) -> Uuid {
    let (status, body) = post_json(
        app,
        auth,
        "/api/licencia-permiso",
        json!({
            "worker_id": worker_id,
            "leave_type": "administrative_permit",
            "start_date": start,
            "end_date": end,
            "justification": "family matter"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = Uuid::parse_str(body["data"]["id"].as_str().unwrap()).unwrap();

    let (status, _) = post_json(
        app,
        auth,
        &format!("/api/licencia-permiso/{}/review", request_id),
        json!({"decision": "approve"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    request_id
}

async fn open_entries(pool: &PgPool, worker_id: Uuid) -> Vec<(Uuid, NaiveDate)> {
    sqlx::query_as(
        r#"SELECT id, start_date FROM employment_history
           WHERE worker_id = $1 AND end_date IS NULL"#,
    )
    .bind(worker_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn termination_closes_ledger_and_removes_worker_from_system() {
    let (app, pool, auth) = setup().await;
    let worker_id = create_worker(&app, &auth, "2023-01-01").await;

    let cambio_uri = format!("/api/ficha-empresa/trabajador/{}/cambio", worker_id);
    let (status, _) = post_json(
        &app,
        &auth,
        &cambio_uri,
        json!({
            "change_type": "termination",
            "effective_date": "2024-06-30",
            "reason": "restructuring"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let record = fetch_record(&app, &auth, worker_id).await;
    assert_eq!(record["status"], "terminated");
    assert_eq!(record["contract_end"], "2024-06-30");
    assert_eq!(record["termination_reason"], "restructuring");

    let (in_system,): (bool,) = sqlx::query_as("SELECT in_system FROM workers WHERE id = $1")
        .bind(worker_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!in_system);

    assert!(open_entries(&pool, worker_id).await.is_empty());
    let (end_date, reason): (Option<NaiveDate>, Option<String>) = sqlx::query_as(
        "SELECT end_date, termination_reason FROM employment_history WHERE worker_id = $1",
    )
    .bind(worker_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(end_date, NaiveDate::from_ymd_opt(2024, 6, 30));
    assert_eq!(reason.as_deref(), Some("restructuring"));

    // Terminated is absorbing.
    let (status, _) = post_json(
        &app,
        &auth,
        &cambio_uri,
        json!({"change_type": "salary_change", "new_salary": 2_000_000}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approved_leave_moves_record_and_reopens_ledger_at_leave_start() {
    let (app, pool, auth) = setup().await;
    let worker_id = create_worker(&app, &auth, "2023-01-01").await;

    let start = (Utc::now() + Duration::days(5)).date_naive();
    let end = start + Duration::days(10);
    let request_id =
        approve_leave(&app, &auth, worker_id, &start.to_string(), &end.to_string()).await;

    let record = fetch_record(&app, &auth, worker_id).await;
    assert_eq!(record["status"], "administrative_permit");
    assert_eq!(record["leave_start"], start.to_string());
    assert_eq!(record["leave_end"], end.to_string());

    let open = open_entries(&pool, worker_id).await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].1, start);

    // A second review conflicts instead of double-applying the ledger.
    let (status, _) = post_json(
        &app,
        &auth,
        &format!("/api/licencia-permiso/{}/review", request_id),
        json!({"decision": "reject"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn rejected_leave_leaves_the_record_untouched() {
    let (app, pool, auth) = setup().await;
    let worker_id = create_worker(&app, &auth, "2023-01-01").await;

    let start = (Utc::now() + Duration::days(5)).date_naive();
    let end = start + Duration::days(3);
    let (status, body) = post_json(
        &app,
        &auth,
        "/api/licencia-permiso",
        json!({
            "worker_id": worker_id,
            "leave_type": "administrative_permit",
            "start_date": start.to_string(),
            "end_date": end.to_string(),
            "justification": "errand"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = Uuid::parse_str(body["data"]["id"].as_str().unwrap()).unwrap();

    let (status, body) = post_json(
        &app,
        &auth,
        &format!("/api/licencia-permiso/{}/review", request_id),
        json!({"decision": "reject", "comment": "not enough notice"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "rejected");

    let record = fetch_record(&app, &auth, worker_id).await;
    assert_eq!(record["status"], "active");
    assert!(record["leave_start"].is_null());
    assert!(record["leave_end"].is_null());

    // The initial ledger entry is still the only one, still open.
    let open = open_entries(&pool, worker_id).await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].1, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
}

#[tokio::test]
async fn expiry_sweep_reverts_only_elapsed_leaves_and_is_idempotent() {
    let (app, pool, auth) = setup().await;
    let elapsed_worker = create_worker(&app, &auth, "2023-01-01").await;
    let ongoing_worker = create_worker(&app, &auth, "2023-01-01").await;

    approve_leave(&app, &auth, elapsed_worker, "2024-01-10", "2024-01-20").await;

    let start = (Utc::now() - Duration::days(1)).date_naive();
    let end = (Utc::now() + Duration::days(15)).date_naive();
    approve_leave(&app, &auth, ongoing_worker, &start.to_string(), &end.to_string()).await;

    let (status, _) = post_json(&app, &auth, "/api/licencia-permiso/expirar", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let elapsed = fetch_record(&app, &auth, elapsed_worker).await;
    assert_eq!(elapsed["status"], "active");
    assert!(elapsed["leave_start"].is_null());
    assert!(elapsed["leave_end"].is_null());

    let open = open_entries(&pool, elapsed_worker).await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].1, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
    let reopened_id = open[0].0;

    // The still-running leave is untouched.
    let ongoing = fetch_record(&app, &auth, ongoing_worker).await;
    assert_eq!(ongoing["status"], "administrative_permit");

    // Rerunning the sweep changes nothing.
    let (status, _) = post_json(&app, &auth, "/api/licencia-permiso/expirar", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let open = open_entries(&pool, elapsed_worker).await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].0, reopened_id);
    let ongoing = fetch_record(&app, &auth, ongoing_worker).await;
    assert_eq!(ongoing["status"], "administrative_permit");
}

#[tokio::test]
async fn unique_violation_surfaces_as_conflict() {
    let (_app, pool, _auth) = setup().await;
    let nid = fresh_national_id();

    let insert = r#"
        INSERT INTO workers (national_id, first_name, last_name, email, hire_date)
        VALUES ($1, 'Dup', 'Worker', 'dup@example.com', '2024-01-01')
    "#;
    sqlx::query(insert).bind(&nid).execute(&pool).await.unwrap();
    let raw = sqlx::query(insert).bind(&nid).execute(&pool).await.unwrap_err();

    let err: personnel_backend::error::Error = raw.into();
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}
