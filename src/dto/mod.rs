//! DTOs de la API
//!
//! Requests y responses por recurso, más la envoltura genérica
//! ApiResponse que devuelven las operaciones de escritura.

pub mod stop_dto;
pub mod route_dto;
pub mod vehicle_dto;
pub mod driver_dto;
pub mod transport_dto;
pub mod schedule_dto;
pub mod analytics_dto;

use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}
