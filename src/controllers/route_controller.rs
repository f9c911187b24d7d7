//! Controlador de Routes
//!
//! Creación manual y construcción optimizada desde paradas. La pasada de
//! optimización es determinista: respeta el orden de paradas dado y
//! deriva distancia, duración, offsets y capacidad con margen.

use std::collections::HashMap;

use crate::dto::route_dto::{
    CreateRouteRequest, OptimizeRouteRequest, RouteFilters, RouteResponse, UpdateRouteRequest,
};
use crate::dto::ApiResponse;
use crate::models::route::RouteType;
use crate::repositories::route_repository::{NewRoute, RouteRepository};
use crate::repositories::stop_repository::StopRepository;
use crate::services::geo::GeoPoint;
use crate::services::route_optimizer::{self, PlannedStop, RouteConstraints};
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct RouteController {
    repository: RouteRepository,
    stops: StopRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RouteRepository::new(pool.clone()),
            stops: StopRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        school_id: Uuid,
        actor_id: Uuid,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let route = self
            .repository
            .create(
                school_id,
                NewRoute {
                    route_code: request.route_code,
                    name: request.name,
                    start_location: request.start_location,
                    end_location: request.end_location,
                    route_type: request.route_type.unwrap_or(RouteType::RoundTrip),
                    capacity: request.capacity,
                    base_fee: request.base_fee,
                    per_km_fee: request.per_km_fee,
                    pickup_time: request.pickup_time,
                    dropoff_time: request.dropoff_time,
                    total_distance_km: request.total_distance_km.unwrap_or(0.0),
                    estimated_duration_minutes: request.estimated_duration_minutes.unwrap_or(0),
                    created_by: actor_id,
                },
                &[],
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Ruta creada exitosamente".to_string(),
        ))
    }

    /// Construir una ruta desde paradas registradas. Requiere >= 2 paradas
    /// existentes dentro de la escuela; la distancia, duración, offsets y
    /// capacidad salen de la pasada de planificación.
    pub async fn optimize(
        &self,
        school_id: Uuid,
        actor_id: Uuid,
        request: OptimizeRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let ids: Vec<Uuid> = request.stops.iter().map(|s| s.stop_id).collect();
        let found = self.stops.find_many(&ids, school_id).await?;
        let by_id: HashMap<Uuid, _> = found.into_iter().map(|s| (s.id, s)).collect();

        let mut planned = Vec::with_capacity(request.stops.len());
        for stop_ref in &request.stops {
            let stop = by_id.get(&stop_ref.stop_id).ok_or_else(|| {
                AppError::NotFound(format!("Stop with id '{}' not found", stop_ref.stop_id))
            })?;
            planned.push(PlannedStop {
                stop_id: stop.id,
                point: GeoPoint::new(stop.latitude, stop.longitude),
                estimated_students: stop_ref.estimated_students.max(0),
            });
        }

        let constraints = RouteConstraints {
            max_distance_km: request.constraints.max_distance_km,
            max_duration_minutes: request.constraints.max_duration_minutes,
            min_capacity: request.constraints.min_capacity,
            speed_kmh: request.constraints.speed_kmh,
        };

        let plan = route_optimizer::plan_route(&planned, &constraints)?;

        // Inicio y fin de la ruta: las paradas extremas de la secuencia
        let (first_id, last_id) = match (planned.first(), planned.last()) {
            (Some(first), Some(last)) => (first.stop_id, last.stop_id),
            _ => return Err(AppError::BadRequest("At least 2 stops are required".to_string())),
        };
        let first = &by_id[&first_id];
        let last = &by_id[&last_id];

        let route = self
            .repository
            .create(
                school_id,
                NewRoute {
                    route_code: request.route_code,
                    name: request.name,
                    start_location: first.address.clone(),
                    end_location: last.address.clone(),
                    route_type: request.route_type.unwrap_or(RouteType::RoundTrip),
                    capacity: plan.capacity,
                    base_fee: request.base_fee,
                    per_km_fee: request.per_km_fee,
                    pickup_time: request.pickup_time,
                    dropoff_time: request.dropoff_time,
                    total_distance_km: plan.total_distance_km,
                    estimated_duration_minutes: plan.estimated_duration_minutes,
                    created_by: actor_id,
                },
                &plan.waypoints,
            )
            .await?;

        let waypoints = self.repository.find_waypoints(route.id).await?;

        Ok(ApiResponse::success_with_message(
            RouteResponse::from_route(route, waypoints),
            "Ruta optimizada y creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, school_id: Uuid) -> Result<RouteResponse, AppError> {
        let route = self
            .repository
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", id)))?;

        let waypoints = self.repository.find_waypoints(route.id).await?;
        Ok(RouteResponse::from_route(route, waypoints))
    }

    pub async fn list(
        &self,
        school_id: Uuid,
        filters: RouteFilters,
    ) -> Result<Vec<RouteResponse>, AppError> {
        let limit = filters.limit.unwrap_or(50).min(100);
        let offset = filters.offset.unwrap_or(0);

        let routes = self
            .repository
            .find_all(school_id, filters.status, filters.route_type, limit, offset)
            .await?;

        Ok(routes.into_iter().map(RouteResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
        request: UpdateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let route = self
            .repository
            .update(
                id,
                school_id,
                request.route_code,
                request.name,
                request.start_location,
                request.end_location,
                request.route_type,
                request.status,
                request.capacity,
                request.base_fee,
                request.per_km_fee,
                request.pickup_time,
                request.dropoff_time,
                request.total_distance_km,
                request.estimated_duration_minutes,
                actor_id,
            )
            .await?;

        let waypoints = self.repository.find_waypoints(route.id).await?;

        Ok(ApiResponse::success_with_message(
            RouteResponse::from_route(route, waypoints),
            "Ruta actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id, school_id).await
    }
}
