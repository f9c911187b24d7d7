//! Modelo de Route
//!
//! Ruta de transporte: secuencia ordenada de paradas con horario
//! canónico, tarifa y recursos asignados. Mapea a las tablas routes
//! y route_waypoints.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de ruta - mapea al ENUM route_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "route_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Pickup,
    Dropoff,
    RoundTrip,
    SpecialNeeds,
    Emergency,
}

/// Estado de la ruta - mapea al ENUM route_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "route_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Active,
    Inactive,
    Maintenance,
    Suspended,
}

impl RouteStatus {
    /// Solo una ruta activa puede recibir bindings o recursos.
    pub fn is_operable(self) -> bool {
        match self {
            RouteStatus::Active => true,
            RouteStatus::Inactive | RouteStatus::Maintenance | RouteStatus::Suspended => false,
        }
    }
}

/// Route principal - mapea exactamente a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
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
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Route {
    pub fn has_assigned_resources(&self) -> bool {
        self.assigned_vehicle_id.is_some() || self.assigned_driver_id.is_some()
    }
}

/// Waypoint de ruta - mapea a la tabla route_waypoints
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteWaypoint {
    pub route_id: Uuid,
    pub stop_id: Uuid,
    pub sequence: i32,
    pub arrival_offset_minutes: i32,
    pub estimated_students: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_routes_are_operable() {
        assert!(RouteStatus::Active.is_operable());
        assert!(!RouteStatus::Inactive.is_operable());
        assert!(!RouteStatus::Maintenance.is_operable());
        assert!(!RouteStatus::Suspended.is_operable());
    }
}
