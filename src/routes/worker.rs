use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::worker_dto::{CreateWorkerPayload, UpdateWorkerPayload, WorkerListQuery},
    dto::ApiResponse,
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/trabajador",
    request_body = CreateWorkerPayload,
    responses(
        (status = 201, description = "Worker created with its employment record"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Duplicate national id")
    )
)]
#[axum::debug_handler]
pub async fn create_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateWorkerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created = state
        .worker_service
        .create(payload, claims.user_id())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Worker created", created)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/trabajador",
    params(
        ("include_inactive" = Option<bool>, Query, description = "Include workers flagged out of the system")
    ),
    responses((status = 200, description = "List of workers"))
)]
#[axum::debug_handler]
pub async fn list_workers(
    State(state): State<AppState>,
    Query(query): Query<WorkerListQuery>,
) -> Result<impl IntoResponse> {
    let workers = state.worker_service.list(query.include_inactive).await?;
    Ok(Json(ApiResponse::ok("Workers", workers)))
}

#[utoipa::path(
    get,
    path = "/api/trabajador/{id}",
    params(("id" = Uuid, Path, description = "Worker ID")),
    responses(
        (status = 200, description = "Worker found"),
        (status = 404, description = "Worker not found")
    )
)]
#[axum::debug_handler]
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let worker = state.worker_service.get(id).await?;
    Ok(Json(ApiResponse::ok("Worker", worker)))
}

#[utoipa::path(
    put,
    path = "/api/trabajador/{id}",
    params(("id" = Uuid, Path, description = "Worker ID")),
    request_body = UpdateWorkerPayload,
    responses(
        (status = 200, description = "Worker updated"),
        (status = 404, description = "Worker not found")
    )
)]
#[axum::debug_handler]
pub async fn update_worker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let worker = state.worker_service.update(id, payload).await?;
    Ok(Json(ApiResponse::ok("Worker updated", worker)))
}
