//! DTOs del generador de horarios

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Query del horario diario
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub date: NaiveDate,
    pub route_id: Option<Uuid>,
}

/// Entrada individual de un horario (un alumno en una parada)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub binding_id: Uuid,
    pub student_id: Uuid,
    pub stop_id: Uuid,
    pub stop_name: String,
    pub scheduled_time: NaiveTime,
    pub needs_reassignment: bool,
}

/// Horario de una ruta para una fecha: recogidas y entregas ordenadas
/// por la hora canónica de la ruta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSchedule {
    pub route_id: Uuid,
    pub route_code: String,
    pub route_name: String,
    pub date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub dropoff_time: NaiveTime,
    pub pickups: Vec<ScheduleEntry>,
    pub dropoffs: Vec<ScheduleEntry>,
}
