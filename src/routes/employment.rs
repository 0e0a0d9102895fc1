use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::employment_dto::{LaborChange, UpdateEmploymentPayload},
    dto::ApiResponse,
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/ficha-empresa/trabajador/{worker_id}",
    params(("worker_id" = Uuid, Path, description = "Worker ID")),
    responses(
        (status = 200, description = "Employment record"),
        (status = 404, description = "Record not found")
    )
)]
#[axum::debug_handler]
pub async fn get_record(
    State(state): State<AppState>,
    Path(worker_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let record = state.employment_service.get_by_worker(worker_id).await?;
    Ok(Json(ApiResponse::ok("Employment record", record)))
}

#[utoipa::path(
    put,
    path = "/api/ficha-empresa/{id}",
    params(("id" = Uuid, Path, description = "Employment record ID")),
    request_body = UpdateEmploymentPayload,
    responses(
        (status = 200, description = "Record updated"),
        (status = 400, description = "Record is terminated"),
        (status = 404, description = "Record not found")
    )
)]
#[axum::debug_handler]
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmploymentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let record = state.employment_service.update_fields(id, payload).await?;
    Ok(Json(ApiResponse::ok("Employment record updated", record)))
}

#[utoipa::path(
    post,
    path = "/api/ficha-empresa/trabajador/{worker_id}/cambio",
    params(("worker_id" = Uuid, Path, description = "Worker ID")),
    request_body = LaborChange,
    responses(
        (status = 200, description = "Labor change applied"),
        (status = 400, description = "Business rule violated"),
        (status = 404, description = "Worker or record not found")
    )
)]
#[axum::debug_handler]
pub async fn apply_labor_change(
    State(state): State<AppState>,
    Path(worker_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(change): Json<LaborChange>,
) -> Result<impl IntoResponse> {
    let summary = state
        .employment_service
        .apply_labor_change(worker_id, change, claims.user_id())
        .await?;
    Ok(Json(ApiResponse::ok("Labor change applied", summary)))
}
