use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::stop_controller::StopController;
use crate::dto::stop_dto::{CreateStopRequest, StopFilters, StopResponse, UpdateStopRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_stop_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_stop))
        .route("/", get(list_stops))
        .route("/:id", get(get_stop))
        .route("/:id", put(update_stop))
        .route("/:id", delete(retire_stop))
}

async fn create_stop(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateStopRequest>,
) -> Result<Json<ApiResponse<StopResponse>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.create(user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn get_stop(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StopResponse>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.get_by_id(id, user.school_id).await?;
    Ok(Json(response))
}

async fn list_stops(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<StopFilters>,
) -> Result<Json<Vec<StopResponse>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.list(user.school_id, filters).await?;
    Ok(Json(response))
}

async fn update_stop(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStopRequest>,
) -> Result<Json<ApiResponse<StopResponse>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.update(id, user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn retire_stop(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StopResponse>>, AppError> {
    let controller = StopController::new(state.pool.clone());
    let response = controller.retire(id, user.school_id, user.user_id).await?;
    Ok(Json(response))
}
