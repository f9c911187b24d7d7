use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{
    AssignResourcesRequest, CreateRouteRequest, OptimizeRouteRequest, RouteFilters, RouteResponse,
    UnassignQuery, UpdateRouteRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/", get(list_routes))
        .route("/optimize", post(optimize_route))
        .route("/:id", get(get_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
        .route("/:id/assignment", post(assign_resources))
        .route("/:id/assignment", delete(unassign_resources))
}

async fn create_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.create(user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn optimize_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<OptimizeRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.optimize(user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn get_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.get_by_id(id, user.school_id).await?;
    Ok(Json(response))
}

async fn list_routes(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<RouteFilters>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list(user.school_id, filters).await?;
    Ok(Json(response))
}

async fn update_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update(id, user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = RouteController::new(state.pool.clone());
    controller.delete(id, user.school_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_resources(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignResourcesRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = AssignmentController::new(state.pool.clone());
    let response = controller.assign(id, user.school_id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn unassign_resources(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UnassignQuery>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = AssignmentController::new(state.pool.clone());
    let response = controller
        .unassign(id, user.school_id, user.user_id, query.force)
        .await?;
    Ok(Json(response))
}
