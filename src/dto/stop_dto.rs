//! DTOs de Stop

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::stop::{Stop, StopStatus, StopType};

// Request para crear una parada
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStopRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(length(min = 5, max = 500))]
    pub address: String,

    pub latitude: f64,
    pub longitude: f64,

    pub stop_type: Option<StopType>,

    #[validate(range(min = 0))]
    pub capacity: Option<i32>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub safety_rating: Option<f64>,
}

// Request para actualizar una parada
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStopRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 5, max = 500))]
    pub address: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub stop_type: Option<StopType>,
    pub status: Option<StopStatus>,

    #[validate(range(min = 0))]
    pub capacity: Option<i32>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub safety_rating: Option<f64>,
}

// Filtros para búsqueda de paradas
#[derive(Debug, Deserialize)]
pub struct StopFilters {
    pub status: Option<StopStatus>,
    pub stop_type: Option<StopType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Response de parada
#[derive(Debug, Serialize)]
pub struct StopResponse {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Stop> for StopResponse {
    fn from(stop: Stop) -> Self {
        Self {
            id: stop.id,
            school_id: stop.school_id,
            name: stop.name,
            address: stop.address,
            latitude: stop.latitude,
            longitude: stop.longitude,
            stop_type: stop.stop_type,
            status: stop.status,
            capacity: stop.capacity,
            safety_rating: stop.safety_rating,
            created_at: stop.created_at,
            updated_at: stop.updated_at,
        }
    }
}
