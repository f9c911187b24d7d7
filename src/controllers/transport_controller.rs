//! Controlador de asignación de transporte a alumnos
//!
//! Valida ruta y paradas, calcula la tarifa y copia los horarios
//! canónicos de la ruta al binding en el momento de la asignación (un
//! cambio posterior de horario de la ruta no altera bindings existentes
//! salvo re-sincronización explícita vía update).

use crate::dto::transport_dto::{
    AssignTransportRequest, CancelTransportRequest, TransportFilters, TransportResponse,
    UpdateTransportRequest,
};
use crate::dto::ApiResponse;
use crate::models::route::Route;
use crate::models::stop::Stop;
use crate::models::transport::TransportType;
use crate::repositories::stop_repository::StopRepository;
use crate::repositories::transport_repository::{BindingChanges, NewBinding, TransportRepository};
use crate::services::fees;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_date_window;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct TransportController {
    repository: TransportRepository,
    stops: StopRepository,
}

impl TransportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TransportRepository::new(pool.clone()),
            stops: StopRepository::new(pool),
        }
    }

    async fn load_operable_route(&self, route_id: Uuid, school_id: Uuid) -> Result<Route, AppError> {
        let route = self
            .repository
            .find_route_for_binding(route_id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", route_id)))?;

        if !route.status.is_operable() {
            return Err(AppError::PreconditionFailed(format!(
                "Route '{}' is not active and cannot accept transport bindings",
                route.route_code
            )));
        }

        Ok(route)
    }

    async fn load_usable_stop(&self, stop_id: Uuid, school_id: Uuid) -> Result<Stop, AppError> {
        let stop = self
            .stops
            .find_by_id(stop_id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Stop with id '{}' not found", stop_id)))?;

        if !stop.status.is_usable() {
            return Err(AppError::PreconditionFailed(format!(
                "Stop '{}' is not active and cannot be used for transport",
                stop.name
            )));
        }

        Ok(stop)
    }

    pub async fn assign(
        &self,
        school_id: Uuid,
        actor_id: Uuid,
        request: AssignTransportRequest,
    ) -> Result<ApiResponse<TransportResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        validate_date_window(request.start_date, request.end_date).map_err(|e| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("end_date", e);
            AppError::Validation(errors)
        })?;

        let route = self.load_operable_route(request.route_id, school_id).await?;
        self.load_usable_stop(request.pickup_stop_id, school_id).await?;
        self.load_usable_stop(request.dropoff_stop_id, school_id).await?;

        // Fast-fail; el índice único parcial tiene la palabra final.
        if self
            .repository
            .student_has_active_binding(request.student_id, school_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Student '{}' already has an active transport binding",
                request.student_id
            )));
        }

        let transport_type = request.transport_type.unwrap_or(TransportType::Regular);
        let fee = fees::compute_fee(
            route.base_fee,
            route.per_km_fee,
            route.total_distance_km,
            transport_type,
        );

        let binding = self
            .repository
            .create(
                school_id,
                NewBinding {
                    student_id: request.student_id,
                    route_id: route.id,
                    pickup_stop_id: request.pickup_stop_id,
                    dropoff_stop_id: request.dropoff_stop_id,
                    transport_type,
                    frequency: request.frequency.unwrap_or_else(|| "weekdays".to_string()),
                    start_date: request.start_date,
                    end_date: request.end_date,
                    scheduled_pickup_time: route.pickup_time,
                    scheduled_dropoff_time: route.dropoff_time,
                    fee,
                    created_by: actor_id,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            TransportResponse::from(binding),
            "Transporte asignado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, school_id: Uuid) -> Result<TransportResponse, AppError> {
        let binding = self
            .repository
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Transport binding with id '{}' not found", id))
            })?;

        Ok(TransportResponse::from(binding))
    }

    pub async fn list(
        &self,
        school_id: Uuid,
        filters: TransportFilters,
    ) -> Result<Vec<TransportResponse>, AppError> {
        let limit = filters.limit.unwrap_or(50).min(100);
        let offset = filters.offset.unwrap_or(0);

        let bindings = self
            .repository
            .find_all(
                school_id,
                filters.status,
                filters.transport_type,
                filters.route_id,
                filters.student_id,
                limit,
                offset,
            )
            .await?;

        Ok(bindings.into_iter().map(TransportResponse::from).collect())
    }

    /// Re-valida referencias cambiadas exactamente igual que en la
    /// creación. Un cambio de ruta re-calcula la tarifa y re-copia los
    /// horarios canónicos de la nueva ruta.
    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
        request: UpdateTransportRequest,
    ) -> Result<ApiResponse<TransportResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let current = self
            .repository
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Transport binding with id '{}' not found", id))
            })?;

        if let Some(stop_id) = request.pickup_stop_id {
            self.load_usable_stop(stop_id, school_id).await?;
        }
        if let Some(stop_id) = request.dropoff_stop_id {
            self.load_usable_stop(stop_id, school_id).await?;
        }

        let effective_type = request.transport_type.unwrap_or(current.transport_type);
        let mut changes = BindingChanges {
            route_id: None,
            pickup_stop_id: request.pickup_stop_id,
            dropoff_stop_id: request.dropoff_stop_id,
            transport_type: request.transport_type,
            frequency: request.frequency,
            end_date: request.end_date,
            ..Default::default()
        };

        match request.route_id {
            Some(new_route_id) if new_route_id != current.route_id => {
                let route = self.load_operable_route(new_route_id, school_id).await?;
                changes.route_id = Some(new_route_id);
                changes.scheduled_pickup_time = Some(route.pickup_time);
                changes.scheduled_dropoff_time = Some(route.dropoff_time);
                changes.fee = Some(fees::compute_fee(
                    route.base_fee,
                    route.per_km_fee,
                    route.total_distance_km,
                    effective_type,
                ));
            }
            _ => {
                if request.transport_type.is_some() {
                    let route = self
                        .repository
                        .find_route_for_binding(current.route_id, school_id)
                        .await?
                        .ok_or_else(|| {
                            AppError::NotFound(format!(
                                "Route with id '{}' not found",
                                current.route_id
                            ))
                        })?;
                    changes.fee = Some(fees::compute_fee(
                        route.base_fee,
                        route.per_km_fee,
                        route.total_distance_km,
                        effective_type,
                    ));
                }
            }
        }

        if let Some(end_date) = changes.end_date {
            validate_date_window(current.start_date, Some(end_date)).map_err(|e| {
                let mut errors = validator::ValidationErrors::new();
                errors.add("end_date", e);
                AppError::Validation(errors)
            })?;
        }

        let binding = self.repository.update(id, school_id, changes, actor_id).await?;

        Ok(ApiResponse::success_with_message(
            TransportResponse::from(binding),
            "Transporte actualizado exitosamente".to_string(),
        ))
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
        request: CancelTransportRequest,
    ) -> Result<ApiResponse<TransportResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let binding = self
            .repository
            .cancel(id, school_id, request.reason, actor_id)
            .await?;

        Ok(ApiResponse::success_with_message(
            TransportResponse::from(binding),
            "Transporte cancelado exitosamente".to_string(),
        ))
    }
}
