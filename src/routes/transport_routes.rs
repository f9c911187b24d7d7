use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::analytics_controller::AnalyticsController;
use crate::controllers::transport_controller::TransportController;
use crate::dto::analytics_dto::RecordActivityRequest;
use crate::dto::transport_dto::{
    AssignTransportRequest, CancelTransportRequest, TransportFilters, TransportResponse,
    UpdateTransportRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transport_router() -> Router<AppState> {
    Router::new()
        .route("/", post(assign_transport))
        .route("/", get(list_transports))
        .route("/:id", get(get_transport))
        .route("/:id", put(update_transport))
        .route("/:id/cancel", post(cancel_transport))
        .route("/:id/activity", post(record_activity))
}

async fn assign_transport(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<AssignTransportRequest>,
) -> Result<Json<ApiResponse<TransportResponse>>, AppError> {
    let controller = TransportController::new(state.pool.clone());
    let response = controller.assign(user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn get_transport(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransportResponse>, AppError> {
    let controller = TransportController::new(state.pool.clone());
    let response = controller.get_by_id(id, user.school_id).await?;
    Ok(Json(response))
}

async fn list_transports(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<TransportFilters>,
) -> Result<Json<Vec<TransportResponse>>, AppError> {
    let controller = TransportController::new(state.pool.clone());
    let response = controller.list(user.school_id, filters).await?;
    Ok(Json(response))
}

async fn update_transport(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTransportRequest>,
) -> Result<Json<ApiResponse<TransportResponse>>, AppError> {
    let controller = TransportController::new(state.pool.clone());
    let response = controller.update(id, user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn cancel_transport(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelTransportRequest>,
) -> Result<Json<ApiResponse<TransportResponse>>, AppError> {
    let controller = TransportController::new(state.pool.clone());
    let response = controller.cancel(id, user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn record_activity(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordActivityRequest>,
) -> Result<Json<ApiResponse<TransportResponse>>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller
        .record_activity(id, user.school_id, user.user_id, request)
        .await?;
    Ok(Json(response))
}
