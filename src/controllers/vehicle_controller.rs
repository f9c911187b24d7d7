//! Controlador de Vehicles

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        school_id: Uuid,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let vehicle = self
            .repository
            .create(
                school_id,
                request.license_plate,
                request.brand,
                request.model,
                request.capacity,
                request.insurance_expiry,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, school_id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", id)))?;

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list(
        &self,
        school_id: Uuid,
        filters: VehicleFilters,
    ) -> Result<Vec<VehicleResponse>, AppError> {
        let limit = filters.limit.unwrap_or(50).min(100);
        let offset = filters.offset.unwrap_or(0);

        let vehicles = self
            .repository
            .find_all(school_id, filters.status, limit, offset)
            .await?;

        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let vehicle = self
            .repository
            .update(
                id,
                school_id,
                request.license_plate,
                request.brand,
                request.model,
                request.capacity,
                request.status,
                request.insurance_expiry,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id, school_id).await
    }
}
