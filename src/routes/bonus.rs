use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::bonus_dto::{
        AssignBonusPayload, CreateBonusPayload, UpdateAssignmentPayload, UpdateBonusPayload,
    },
    dto::ApiResponse,
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/bono",
    request_body = CreateBonusPayload,
    responses(
        (status = 201, description = "Bonus created"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Duplicate name or signature")
    )
)]
#[axum::debug_handler]
pub async fn create_bonus(
    State(state): State<AppState>,
    Json(payload): Json<CreateBonusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let bonus = state.bonus_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Bonus created", bonus)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/bono",
    responses((status = 200, description = "Bonus catalog"))
)]
#[axum::debug_handler]
pub async fn list_bonuses(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let bonuses = state.bonus_service.list().await?;
    Ok(Json(ApiResponse::ok("Bonuses", bonuses)))
}

#[utoipa::path(
    get,
    path = "/api/bono/{id}",
    params(("id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Bonus"),
        (status = 404, description = "Bonus not found")
    )
)]
#[axum::debug_handler]
pub async fn get_bonus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let bonus = state.bonus_service.get(id).await?;
    Ok(Json(ApiResponse::ok("Bonus", bonus)))
}

#[utoipa::path(
    put,
    path = "/api/bono/{id}",
    params(("id" = Uuid, Path, description = "Bonus ID")),
    request_body = UpdateBonusPayload,
    responses(
        (status = 200, description = "Bonus updated; active assignments recomputed"),
        (status = 404, description = "Bonus not found"),
        (status = 409, description = "Duplicate name or signature")
    )
)]
#[axum::debug_handler]
pub async fn update_bonus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBonusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let bonus = state.bonus_service.update(id, payload).await?;
    Ok(Json(ApiResponse::ok("Bonus updated", bonus)))
}

#[utoipa::path(
    post,
    path = "/api/bono/asignar",
    request_body = AssignBonusPayload,
    responses(
        (status = 201, description = "Bonus assigned"),
        (status = 404, description = "Bonus or employment record not found")
    )
)]
#[axum::debug_handler]
pub async fn assign_bonus(
    State(state): State<AppState>,
    Json(payload): Json<AssignBonusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let assignment = state.bonus_service.assign(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Bonus assigned", assignment)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/bono/asignaciones/ficha/{record_id}",
    params(("record_id" = Uuid, Path, description = "Employment record ID")),
    responses((status = 200, description = "Assignments for one employment record"))
)]
#[axum::debug_handler]
pub async fn list_assignments(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let assignments = state.bonus_service.list_assignments(record_id).await?;
    Ok(Json(ApiResponse::ok("Bonus assignments", assignments)))
}

#[utoipa::path(
    put,
    path = "/api/bono/asignaciones/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentPayload,
    responses(
        (status = 200, description = "Assignment updated"),
        (status = 404, description = "Assignment not found")
    )
)]
#[axum::debug_handler]
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssignmentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let assignment = state.bonus_service.update_assignment(id, payload).await?;
    Ok(Json(ApiResponse::ok("Bonus assignment updated", assignment)))
}
