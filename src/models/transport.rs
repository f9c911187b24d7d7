//! Modelo de TransportBinding y TripActivity
//!
//! Binding: asociación alumno <-> ruta + par de paradas, con ventana de
//! validez, tarifa calculada y métricas rodantes. Un solo binding activo
//! por alumno (índice único parcial en la base de datos).
//!
//! TripActivity: historial append-only de viajes realizados; inmutable
//! una vez escrito.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de transporte - mapea al ENUM transport_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "transport_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Regular,
    SpecialNeeds,
    Medical,
    Emergency,
    Temporary,
}

/// Estado del binding - mapea al ENUM binding_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "binding_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BindingStatus {
    Active,
    Inactive,
    Suspended,
    Completed,
    Cancelled,
}

impl BindingStatus {
    /// Un binding en estado terminal ya no acepta actividad ni cambios.
    pub fn is_terminal(self) -> bool {
        match self {
            BindingStatus::Completed | BindingStatus::Cancelled => true,
            BindingStatus::Active | BindingStatus::Inactive | BindingStatus::Suspended => false,
        }
    }
}

/// Estado realizado de un viaje - mapea al ENUM trip_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "trip_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Completed,
    Missed,
    Delayed,
    Cancelled,
}

/// TransportBinding principal - mapea exactamente a la tabla transport_bindings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransportBinding {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub route_id: Uuid,
    pub pickup_stop_id: Uuid,
    pub dropoff_stop_id: Uuid,
    pub transport_type: TransportType,
    pub status: BindingStatus,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub scheduled_pickup_time: NaiveTime,
    pub scheduled_dropoff_time: NaiveTime,
    pub fee: Decimal,
    pub needs_reassignment: bool,
    pub total_trips: i32,
    pub completed_trips: i32,
    pub avg_delay_minutes: f64,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransportBinding {
    /// ¿El binding cubre la fecha dada? (ventana [start_date, end_date o infinito))
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        match self.end_date {
            Some(end) => date <= end,
            None => true,
        }
    }
}

/// TripActivity - mapea exactamente a la tabla transport_activities
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripActivity {
    pub id: Uuid,
    pub binding_id: Uuid,
    pub school_id: Uuid,
    pub activity_date: NaiveDate,
    pub planned_pickup_time: NaiveTime,
    pub actual_pickup_time: Option<NaiveTime>,
    pub planned_dropoff_time: NaiveTime,
    pub actual_dropoff_time: Option<NaiveTime>,
    pub status: TripStatus,
    pub delay_minutes: i32,
    pub note: Option<String>,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding_with_window(start: &str, end: Option<&str>) -> TransportBinding {
        TransportBinding {
            id: Uuid::new_v4(),
            school_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            route_id: Uuid::new_v4(),
            pickup_stop_id: Uuid::new_v4(),
            dropoff_stop_id: Uuid::new_v4(),
            transport_type: TransportType::Regular,
            status: BindingStatus::Active,
            frequency: "weekdays".to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.map(|e| e.parse().unwrap()),
            scheduled_pickup_time: "07:00:00".parse().unwrap(),
            scheduled_dropoff_time: "14:30:00".parse().unwrap(),
            fee: Decimal::ZERO,
            needs_reassignment: false,
            total_trips: 0,
            completed_trips: 0,
            avg_delay_minutes: 0.0,
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_covers_date_with_open_window() {
        let b = binding_with_window("2025-09-01", None);
        assert!(!b.covers_date("2025-08-31".parse().unwrap()));
        assert!(b.covers_date("2025-09-01".parse().unwrap()));
        assert!(b.covers_date("2030-01-01".parse().unwrap()));
    }

    #[test]
    fn test_covers_date_with_closed_window() {
        let b = binding_with_window("2025-09-01", Some("2025-12-20"));
        assert!(b.covers_date("2025-12-20".parse().unwrap()));
        assert!(!b.covers_date("2025-12-21".parse().unwrap()));
    }

    #[test]
    fn test_terminal_states() {
        assert!(BindingStatus::Cancelled.is_terminal());
        assert!(BindingStatus::Completed.is_terminal());
        assert!(!BindingStatus::Active.is_terminal());
        assert!(!BindingStatus::Suspended.is_terminal());
    }
}
