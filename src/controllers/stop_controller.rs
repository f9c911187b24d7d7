//! Controlador de Stops

use crate::dto::stop_dto::{CreateStopRequest, StopFilters, StopResponse, UpdateStopRequest};
use crate::dto::ApiResponse;
use crate::models::stop::StopType;
use crate::repositories::stop_repository::StopRepository;
use crate::utils::errors::{AppError, precondition_error};
use crate::utils::validation::validate_coordinates;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct StopController {
    repository: StopRepository,
}

impl StopController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StopRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        school_id: Uuid,
        actor_id: Uuid,
        request: CreateStopRequest,
    ) -> Result<ApiResponse<StopResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        validate_coordinates(request.latitude, request.longitude).map_err(|e| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("coordinates", e);
            AppError::Validation(errors)
        })?;

        let stop = self
            .repository
            .create(
                school_id,
                request.name,
                request.address,
                request.latitude,
                request.longitude,
                request.stop_type.unwrap_or(StopType::Pickup),
                request.capacity.unwrap_or(0),
                request.safety_rating,
                actor_id,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            StopResponse::from(stop),
            "Parada creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, school_id: Uuid) -> Result<StopResponse, AppError> {
        let stop = self
            .repository
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Stop with id '{}' not found", id)))?;

        Ok(StopResponse::from(stop))
    }

    pub async fn list(
        &self,
        school_id: Uuid,
        filters: StopFilters,
    ) -> Result<Vec<StopResponse>, AppError> {
        let limit = filters.limit.unwrap_or(50).min(100);
        let offset = filters.offset.unwrap_or(0);

        let stops = self
            .repository
            .find_all(school_id, filters.status, filters.stop_type, limit, offset)
            .await?;

        Ok(stops.into_iter().map(StopResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
        request: UpdateStopRequest,
    ) -> Result<ApiResponse<StopResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        if let (Some(lat), Some(lng)) = (request.latitude, request.longitude) {
            validate_coordinates(lat, lng).map_err(|e| {
                let mut errors = validator::ValidationErrors::new();
                errors.add("coordinates", e);
                AppError::Validation(errors)
            })?;
        }

        let stop = self
            .repository
            .update(
                id,
                school_id,
                request.name,
                request.address,
                request.latitude,
                request.longitude,
                request.stop_type,
                request.status,
                request.capacity,
                request.safety_rating,
                actor_id,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            StopResponse::from(stop),
            "Parada actualizada exitosamente".to_string(),
        ))
    }

    /// Retiro lógico de la parada. Rechazado mientras una ruta viva o un
    /// binding activo la referencie.
    pub async fn retire(
        &self,
        id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
    ) -> Result<ApiResponse<StopResponse>, AppError> {
        if self.repository.is_referenced(id, school_id).await? {
            return Err(precondition_error(
                "retire stop",
                "it is still referenced by a route or an active transport binding",
            ));
        }

        let stop = self.repository.retire(id, school_id, actor_id).await?;

        Ok(ApiResponse::success_with_message(
            StopResponse::from(stop),
            "Parada retirada exitosamente".to_string(),
        ))
    }
}
