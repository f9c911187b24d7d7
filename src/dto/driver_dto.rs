//! DTOs de Driver

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::{Driver, DriverStatus};

// Request para crear un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 200))]
    pub full_name: String,

    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,

    #[validate(length(min = 3, max = 50))]
    pub license_number: String,

    pub license_expiry: NaiveDate,
    pub medical_check_expiry: Option<NaiveDate>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
}

// Request para actualizar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 200))]
    pub full_name: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,

    #[validate(length(min = 3, max = 50))]
    pub license_number: Option<String>,

    pub license_expiry: Option<NaiveDate>,
    pub medical_check_expiry: Option<NaiveDate>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,

    pub status: Option<DriverStatus>,
}

// Filtros para búsqueda de conductores
#[derive(Debug, Deserialize)]
pub struct DriverFilters {
    pub status: Option<DriverStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Response de conductor
#[derive(Debug, Serialize)]
pub struct DriverResponse {
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
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            school_id: driver.school_id,
            full_name: driver.full_name,
            phone: driver.phone,
            license_number: driver.license_number,
            license_expiry: driver.license_expiry,
            medical_check_expiry: driver.medical_check_expiry,
            rating: driver.rating,
            status: driver.status,
            assigned_route_id: driver.assigned_route_id,
            created_at: driver.created_at,
        }
    }
}
