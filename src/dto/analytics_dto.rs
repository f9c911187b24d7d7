//! DTOs de actividad y analytics

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::transport::{TripActivity, TripStatus};

// Request para registrar un viaje realizado contra un binding
#[derive(Debug, Deserialize, Validate)]
pub struct RecordActivityRequest {
    pub activity_date: NaiveDate,
    pub status: TripStatus,
    pub actual_pickup_time: Option<NaiveTime>,
    pub actual_dropoff_time: Option<NaiveTime>,

    #[validate(range(min = 0))]
    pub delay_minutes: Option<i32>,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

// Response de un registro de actividad
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub binding_id: Uuid,
    pub activity_date: NaiveDate,
    pub planned_pickup_time: NaiveTime,
    pub actual_pickup_time: Option<NaiveTime>,
    pub planned_dropoff_time: NaiveTime,
    pub actual_dropoff_time: Option<NaiveTime>,
    pub status: TripStatus,
    pub delay_minutes: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TripActivity> for ActivityResponse {
    fn from(a: TripActivity) -> Self {
        Self {
            id: a.id,
            binding_id: a.binding_id,
            activity_date: a.activity_date,
            planned_pickup_time: a.planned_pickup_time,
            actual_pickup_time: a.actual_pickup_time,
            planned_dropoff_time: a.planned_dropoff_time,
            actual_dropoff_time: a.actual_dropoff_time,
            status: a.status,
            delay_minutes: a.delay_minutes,
            note: a.note,
            created_at: a.created_at,
        }
    }
}

// Métricas rodantes de un binding
#[derive(Debug, Serialize)]
pub struct BindingMetricsResponse {
    pub binding_id: Uuid,
    pub total_trips: i32,
    pub completed_trips: i32,
    pub avg_delay_minutes: f64,
    pub on_time_rate: f64,
}

/// Conteo por estado (vehículos, rutas o bindings)
#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

// Resumen de flota bajo demanda
#[derive(Debug, Serialize)]
pub struct FleetAnalyticsResponse {
    pub vehicles_by_status: Vec<StatusCount>,
    pub routes_by_status: Vec<StatusCount>,
    pub bindings_by_status: Vec<StatusCount>,
    pub bindings_by_type: Vec<StatusCount>,
    pub average_driver_rating: Option<f64>,
}

// Query de la ventana de vencimientos
#[derive(Debug, Deserialize)]
pub struct ComplianceQuery {
    pub window_days: Option<i64>,
}

// Conductor con licencia o revisión médica por vencer
#[derive(Debug, Serialize)]
pub struct DriverComplianceResponse {
    pub driver_id: Uuid,
    pub full_name: String,
    pub license_expiry: NaiveDate,
    pub medical_check_expiry: Option<NaiveDate>,
    pub license_expiring: bool,
    pub medical_check_expiring: bool,
}

// Query de rango de fechas para agregados de rendimiento
#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// Rendimiento agregado por conductor
#[derive(Debug, Serialize)]
pub struct DriverPerformanceResponse {
    pub driver_id: Uuid,
    pub full_name: String,
    pub total_trips: i64,
    pub completed_trips: i64,
    pub on_time_rate: f64,
    pub avg_delay_minutes: f64,
}

// Rendimiento agregado por ruta
#[derive(Debug, Serialize)]
pub struct RoutePerformanceResponse {
    pub route_id: Uuid,
    pub route_code: String,
    pub total_trips: i64,
    pub completed_trips: i64,
    pub on_time_rate: f64,
    pub avg_delay_minutes: f64,
}
