use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::cache::schedule_cache::ScheduleCache;
use crate::controllers::schedule_controller::ScheduleController;
use crate::dto::schedule_dto::{RouteSchedule, ScheduleQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_schedule_router() -> Router<AppState> {
    Router::new().route("/", get(get_schedule))
}

async fn get_schedule(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<RouteSchedule>>, AppError> {
    let controller = ScheduleController::new(
        state.pool.clone(),
        ScheduleCache::new(state.redis.clone()),
    );
    let response = controller
        .get_schedule(user.school_id, query.date, query.route_id)
        .await?;
    Ok(Json(response))
}
