//! Modelo de Vehicle
//!
//! Registro de vehículo con su back-reference de exclusividad:
//! `assigned_route_id` es NULL cuando el vehículo está libre y se toma
//! por compare-and-swap al asignarlo a una ruta.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    OutOfService,
    Retired,
}

impl VehicleStatus {
    /// Solo un vehículo activo es asignable a una ruta.
    pub fn is_assignable(self) -> bool {
        match self {
            VehicleStatus::Active => true,
            VehicleStatus::Maintenance | VehicleStatus::OutOfService | VehicleStatus::Retired => {
                false
            }
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub school_id: Uuid,
    pub license_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub capacity: i32,
    pub status: VehicleStatus,
    pub insurance_expiry: Option<NaiveDate>,
    pub assigned_route_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_vehicles_are_assignable() {
        assert!(VehicleStatus::Active.is_assignable());
        assert!(!VehicleStatus::Maintenance.is_assignable());
        assert!(!VehicleStatus::OutOfService.is_assignable());
        assert!(!VehicleStatus::Retired.is_assignable());
    }
}
