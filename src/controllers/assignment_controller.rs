//! Controlador de asignación de recursos
//!
//! Valida existencia y estado de vehículo/conductor (fast-fail) y delega
//! la vinculación atómica al repositorio de rutas: el par se aplica
//! entero o no se aplica, y el CAS del storage decide los empates entre
//! peticiones concurrentes.

use crate::dto::route_dto::{AssignResourcesRequest, RouteResponse};
use crate::dto::ApiResponse;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AssignmentController {
    routes: RouteRepository,
    vehicles: VehicleRepository,
    drivers: DriverRepository,
}

impl AssignmentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            routes: RouteRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
        }
    }

    pub async fn assign(
        &self,
        route_id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
        request: AssignResourcesRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        if request.vehicle_id.is_none() && request.driver_id.is_none() {
            return Err(AppError::BadRequest(
                "At least one of vehicle_id or driver_id is required".to_string(),
            ));
        }

        // Pre-checks de existencia y estado. Solo fast-fail: la
        // exclusividad real la resuelve el CAS dentro de la transacción.
        if let Some(vid) = request.vehicle_id {
            let vehicle = self
                .vehicles
                .find_by_id(vid, school_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", vid)))?;

            if !vehicle.status.is_assignable() {
                return Err(AppError::PreconditionFailed(format!(
                    "Cannot assign vehicle '{}': its status is not active",
                    vehicle.license_plate
                )));
            }
        }

        if let Some(did) = request.driver_id {
            let driver = self
                .drivers
                .find_by_id(did, school_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Driver with id '{}' not found", did)))?;

            if !driver.status.is_assignable() {
                return Err(AppError::PreconditionFailed(format!(
                    "Cannot assign driver '{}': their status is not active",
                    driver.full_name
                )));
            }
        }

        let route = self
            .routes
            .assign_resources(route_id, school_id, request.vehicle_id, request.driver_id, actor_id)
            .await?;

        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Recursos asignados exitosamente".to_string(),
        ))
    }

    pub async fn unassign(
        &self,
        route_id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
        force: bool,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        let route = self
            .routes
            .unassign_resources(route_id, school_id, force, actor_id)
            .await?;

        let message = if force {
            "Recursos desasignados; los bindings activos quedaron marcados para re-asignación"
        } else {
            "Recursos desasignados exitosamente"
        };

        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            message.to_string(),
        ))
    }
}
