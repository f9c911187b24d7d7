//! DTOs de Route

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::route::{Route, RouteStatus, RouteType, RouteWaypoint};

// Request para crear una ruta manualmente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 2, max = 50))]
    pub route_code: String,

    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(length(min = 5, max = 500))]
    pub start_location: String,

    #[validate(length(min = 5, max = 500))]
    pub end_location: String,

    pub route_type: Option<RouteType>,

    #[validate(range(min = 1))]
    pub capacity: i32,

    pub base_fee: Decimal,
    pub per_km_fee: Decimal,

    pub pickup_time: NaiveTime,
    pub dropoff_time: NaiveTime,

    #[validate(range(min = 0.0))]
    pub total_distance_km: Option<f64>,

    #[validate(range(min = 0))]
    pub estimated_duration_minutes: Option<i32>,
}

// Referencia a una parada dentro de una petición de optimización
#[derive(Debug, Deserialize)]
pub struct OptimizeStopRef {
    pub stop_id: Uuid,
    pub estimated_students: i32,
}

// Restricciones opcionales de optimización
#[derive(Debug, Deserialize, Default)]
pub struct RouteConstraintsDto {
    pub max_distance_km: Option<f64>,
    pub max_duration_minutes: Option<i32>,
    pub min_capacity: Option<i32>,
    pub speed_kmh: Option<f64>,
}

// Request para construir una ruta optimizada desde paradas
#[derive(Debug, Deserialize, Validate)]
pub struct OptimizeRouteRequest {
    #[validate(length(min = 2, max = 50))]
    pub route_code: String,

    #[validate(length(min = 2, max = 200))]
    pub name: String,

    pub route_type: Option<RouteType>,

    pub base_fee: Decimal,
    pub per_km_fee: Decimal,

    pub pickup_time: NaiveTime,
    pub dropoff_time: NaiveTime,

    pub stops: Vec<OptimizeStopRef>,

    #[serde(default)]
    pub constraints: RouteConstraintsDto,
}

// Request para actualizar una ruta existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 2, max = 50))]
    pub route_code: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 5, max = 500))]
    pub start_location: Option<String>,

    #[validate(length(min = 5, max = 500))]
    pub end_location: Option<String>,

    pub route_type: Option<RouteType>,
    pub status: Option<RouteStatus>,

    #[validate(range(min = 1))]
    pub capacity: Option<i32>,

    pub base_fee: Option<Decimal>,
    pub per_km_fee: Option<Decimal>,

    pub pickup_time: Option<NaiveTime>,
    pub dropoff_time: Option<NaiveTime>,

    #[validate(range(min = 0.0))]
    pub total_distance_km: Option<f64>,

    #[validate(range(min = 0))]
    pub estimated_duration_minutes: Option<i32>,
}

// Request para asignar recursos (par vehículo/conductor) a una ruta
#[derive(Debug, Deserialize)]
pub struct AssignResourcesRequest {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
}

// Query para desasignar recursos
#[derive(Debug, Deserialize, Default)]
pub struct UnassignQuery {
    #[serde(default)]
    pub force: bool,
}

// Filtros para búsqueda de rutas
#[derive(Debug, Deserialize)]
pub struct RouteFilters {
    pub status: Option<RouteStatus>,
    pub route_type: Option<RouteType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Waypoint dentro de la response de ruta
#[derive(Debug, Serialize)]
pub struct WaypointResponse {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub arrival_offset_minutes: i32,
    pub estimated_students: i32,
}

impl From<RouteWaypoint> for WaypointResponse {
    fn from(w: RouteWaypoint) -> Self {
        Self {
            stop_id: w.stop_id,
            sequence: w.sequence,
            arrival_offset_minutes: w.arrival_offset_minutes,
            estimated_students: w.estimated_students,
        }
    }
}

// Response de ruta
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub school_id: Uuid,
    pub route_code: String,
    pub name: String,
    pub start_location: String,
    pub end_location: String,
    pub route_type: RouteType,
    pub status: RouteStatus,
    pub total_distance_km: f64,
    pub estimated_duration_minutes: i32,
    pub capacity: i32,
    pub current_occupancy: i32,
    pub assigned_vehicle_id: Option<Uuid>,
    pub assigned_driver_id: Option<Uuid>,
    pub base_fee: Decimal,
    pub per_km_fee: Decimal,
    pub pickup_time: NaiveTime,
    pub dropoff_time: NaiveTime,
    pub waypoints: Vec<WaypointResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RouteResponse {
    pub fn from_route(route: Route, waypoints: Vec<RouteWaypoint>) -> Self {
        Self {
            id: route.id,
            school_id: route.school_id,
            route_code: route.route_code,
            name: route.name,
            start_location: route.start_location,
            end_location: route.end_location,
            route_type: route.route_type,
            status: route.status,
            total_distance_km: route.total_distance_km,
            estimated_duration_minutes: route.estimated_duration_minutes,
            capacity: route.capacity,
            current_occupancy: route.current_occupancy,
            assigned_vehicle_id: route.assigned_vehicle_id,
            assigned_driver_id: route.assigned_driver_id,
            base_fee: route.base_fee,
            per_km_fee: route.per_km_fee,
            pickup_time: route.pickup_time,
            dropoff_time: route.dropoff_time,
            waypoints: waypoints.into_iter().map(WaypointResponse::from).collect(),
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        RouteResponse::from_route(route, Vec::new())
    }
}
