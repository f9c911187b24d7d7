//! Controlador de Drivers

use crate::dto::driver_dto::{
    CreateDriverRequest, DriverFilters, DriverResponse, UpdateDriverRequest,
};
use crate::dto::ApiResponse;
use crate::repositories::driver_repository::DriverRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct DriverController {
    repository: DriverRepository,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        school_id: Uuid,
        request: CreateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let driver = self
            .repository
            .create(
                school_id,
                request.full_name,
                request.phone,
                request.license_number,
                request.license_expiry,
                request.medical_check_expiry,
                request.rating,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            DriverResponse::from(driver),
            "Conductor creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, school_id: Uuid) -> Result<DriverResponse, AppError> {
        let driver = self
            .repository
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver with id '{}' not found", id)))?;

        Ok(DriverResponse::from(driver))
    }

    pub async fn list(
        &self,
        school_id: Uuid,
        filters: DriverFilters,
    ) -> Result<Vec<DriverResponse>, AppError> {
        let limit = filters.limit.unwrap_or(50).min(100);
        let offset = filters.offset.unwrap_or(0);

        let drivers = self
            .repository
            .find_all(school_id, filters.status, limit, offset)
            .await?;

        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        request: UpdateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let driver = self
            .repository
            .update(
                id,
                school_id,
                request.full_name,
                request.phone,
                request.license_number,
                request.license_expiry,
                request.medical_check_expiry,
                request.rating,
                request.status,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            DriverResponse::from(driver),
            "Conductor actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id, school_id).await
    }
}
