//! DTOs de TransportBinding

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::transport::{BindingStatus, TransportBinding, TransportType};
use crate::services::metrics::RollingMetrics;

// Request para asignar transporte a un alumno
#[derive(Debug, Deserialize, Validate)]
pub struct AssignTransportRequest {
    pub student_id: Uuid,
    pub route_id: Uuid,
    pub pickup_stop_id: Uuid,
    pub dropoff_stop_id: Uuid,

    pub transport_type: Option<TransportType>,

    #[validate(length(min = 2, max = 30))]
    pub frequency: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

// Request para actualizar un binding existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTransportRequest {
    pub route_id: Option<Uuid>,
    pub pickup_stop_id: Option<Uuid>,
    pub dropoff_stop_id: Option<Uuid>,

    pub transport_type: Option<TransportType>,

    #[validate(length(min = 2, max = 30))]
    pub frequency: Option<String>,

    pub end_date: Option<NaiveDate>,
}

// Request para cancelar un binding
#[derive(Debug, Deserialize, Validate)]
pub struct CancelTransportRequest {
    #[validate(length(min = 2, max = 500))]
    pub reason: String,
}

// Filtros para búsqueda de bindings
#[derive(Debug, Deserialize)]
pub struct TransportFilters {
    pub status: Option<BindingStatus>,
    pub transport_type: Option<TransportType>,
    pub route_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Response de binding
#[derive(Debug, Serialize)]
pub struct TransportResponse {
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
    pub on_time_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransportBinding> for TransportResponse {
    fn from(b: TransportBinding) -> Self {
        let metrics = RollingMetrics {
            total_trips: b.total_trips,
            completed_trips: b.completed_trips,
            avg_delay_minutes: b.avg_delay_minutes,
        };
        Self {
            id: b.id,
            school_id: b.school_id,
            student_id: b.student_id,
            route_id: b.route_id,
            pickup_stop_id: b.pickup_stop_id,
            dropoff_stop_id: b.dropoff_stop_id,
            transport_type: b.transport_type,
            status: b.status,
            frequency: b.frequency,
            start_date: b.start_date,
            end_date: b.end_date,
            scheduled_pickup_time: b.scheduled_pickup_time,
            scheduled_dropoff_time: b.scheduled_dropoff_time,
            fee: b.fee,
            needs_reassignment: b.needs_reassignment,
            total_trips: b.total_trips,
            completed_trips: b.completed_trips,
            avg_delay_minutes: b.avg_delay_minutes,
            on_time_rate: metrics.on_time_rate(),
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
