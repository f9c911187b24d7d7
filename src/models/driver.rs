//! Modelo de Driver
//!
//! Registro de conductor con licencia, revisión médica y la misma
//! back-reference de exclusividad que Vehicle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del conductor - mapea al ENUM driver_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "driver_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    OnLeave,
    Suspended,
    Terminated,
}

impl DriverStatus {
    /// Solo un conductor activo es asignable a una ruta.
    pub fn is_assignable(self) -> bool {
        match self {
            DriverStatus::Active => true,
            DriverStatus::OnLeave | DriverStatus::Suspended | DriverStatus::Terminated => false,
        }
    }
}

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub school_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub license_number: String,
    pub license_expiry: NaiveDate,
    pub medical_check_expiry: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub status: DriverStatus,
    pub assigned_route_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_drivers_are_assignable() {
        assert!(DriverStatus::Active.is_assignable());
        assert!(!DriverStatus::OnLeave.is_assignable());
        assert!(!DriverStatus::Suspended.is_assignable());
        assert!(!DriverStatus::Terminated.is_assignable());
    }
}
