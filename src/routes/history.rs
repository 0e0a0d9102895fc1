use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{dto::ApiResponse, error::Result, AppState};

#[utoipa::path(
    get,
    path = "/api/historial-laboral/trabajador/{worker_id}",
    params(("worker_id" = Uuid, Path, description = "Worker ID")),
    responses((status = 200, description = "Direct-change history, newest first"))
)]
#[axum::debug_handler]
pub async fn list_history(
    State(state): State<AppState>,
    Path(worker_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let entries = state.history_service.list_by_worker(worker_id).await?;
    Ok(Json(ApiResponse::ok("Employment history", entries)))
}

#[utoipa::path(
    get,
    path = "/api/historial-laboral/trabajador/{worker_id}/unificado",
    params(("worker_id" = Uuid, Path, description = "Worker ID")),
    responses((status = 200, description = "Unified history (direct and leave entries), newest first"))
)]
#[axum::debug_handler]
pub async fn list_unified_history(
    State(state): State<AppState>,
    Path(worker_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let entries = state.history_service.list_unified(worker_id).await?;
    Ok(Json(ApiResponse::ok("Unified employment history", entries)))
}
