use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::analytics_controller::AnalyticsController;
use crate::dto::analytics_dto::{
    ActivityResponse, BindingMetricsResponse, ComplianceQuery, DriverComplianceResponse,
    DriverPerformanceResponse, FleetAnalyticsResponse, PerformanceQuery, RoutePerformanceResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/fleet", get(get_fleet_analytics))
        .route("/compliance", get(get_driver_compliance))
        .route("/drivers", get(get_driver_performance))
        .route("/routes", get(get_route_performance))
        .route("/bindings/:id", get(get_binding_metrics))
        .route("/bindings/:id/activities", get(get_binding_activities))
}

async fn get_fleet_analytics(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<FleetAnalyticsResponse>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_fleet_analytics(user.school_id).await?;
    Ok(Json(response))
}

async fn get_driver_compliance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<ComplianceQuery>,
) -> Result<Json<Vec<DriverComplianceResponse>>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_driver_compliance(user.school_id, query).await?;
    Ok(Json(response))
}

async fn get_driver_performance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<Vec<DriverPerformanceResponse>>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_driver_performance(user.school_id, query).await?;
    Ok(Json(response))
}

async fn get_route_performance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<Vec<RoutePerformanceResponse>>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_route_performance(user.school_id, query).await?;
    Ok(Json(response))
}

async fn get_binding_metrics(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BindingMetricsResponse>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_binding_metrics(id, user.school_id).await?;
    Ok(Json(response))
}

async fn get_binding_activities(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ActivityResponse>>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_binding_activities(id, user.school_id).await?;
    Ok(Json(response))
}
