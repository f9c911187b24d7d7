//! Modelo de Stop
//!
//! Parada geográfica de recogida/entrega. Mapea a la tabla stops.
//! Las paradas nunca se borran físicamente: se retiran por estado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de parada - mapea al ENUM stop_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "stop_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Pickup,
    Dropoff,
    Waypoint,
    Emergency,
}

/// Estado de la parada - mapea al ENUM stop_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "stop_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    Active,
    Inactive,
    TemporarilyClosed,
    PermanentlyClosed,
}

impl StopStatus {
    /// Una parada solo admite nuevos bindings si está activa.
    pub fn is_usable(self) -> bool {
        match self {
            StopStatus::Active => true,
            StopStatus::Inactive | StopStatus::TemporarilyClosed | StopStatus::PermanentlyClosed => {
                false
            }
        }
    }
}

/// Stop principal - mapea exactamente a la tabla stops
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub stop_type: StopType,
    pub status: StopStatus,
    pub capacity: i32,
    pub safety_rating: Option<f64>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_stops_are_usable() {
        assert!(StopStatus::Active.is_usable());
        assert!(!StopStatus::Inactive.is_usable());
        assert!(!StopStatus::TemporarilyClosed.is_usable());
        assert!(!StopStatus::PermanentlyClosed.is_usable());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let s = serde_json::to_string(&StopStatus::TemporarilyClosed).unwrap();
        assert_eq!(s, "\"temporarily_closed\"");
    }
}
