//! Repositorio de Routes
//!
//! Incluye la asignación atómica de recursos: el par vehículo/conductor
//! se toma por compare-and-swap sobre `assigned_route_id IS NULL` dentro
//! de una única transacción, así dos peticiones concurrentes no pueden
//! observar ambas "libre" y doble-asignar. O se aplican las dos
//! vinculaciones pedidas o ninguna.

use crate::models::route::{Route, RouteStatus, RouteType, RouteWaypoint};
use crate::services::route_optimizer::PlannedWaypoint;
use crate::utils::errors::{map_unique_violation, AppError};
use chrono::{NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Campos de una ruta nueva
pub struct NewRoute {
    pub route_code: String,
    pub name: String,
    pub start_location: String,
    pub end_location: String,
    pub route_type: RouteType,
    pub capacity: i32,
    pub base_fee: Decimal,
    pub per_km_fee: Decimal,
    pub pickup_time: NaiveTime,
    pub dropoff_time: NaiveTime,
    pub total_distance_km: f64,
    pub estimated_duration_minutes: i32,
    pub created_by: Uuid,
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear ruta con sus waypoints en una transacción.
    pub async fn create(
        &self,
        school_id: Uuid,
        new_route: NewRoute,
        waypoints: &[PlannedWaypoint],
    ) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;
        let code_for_error = new_route.route_code.clone();

        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (
                id, school_id, route_code, name, start_location, end_location,
                route_type, status, total_distance_km, estimated_duration_minutes,
                capacity, current_occupancy, base_fee, per_km_fee,
                pickup_time, dropoff_time, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8, $9, $10, 0, $11, $12, $13, $14, $15, $16, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(school_id)
        .bind(new_route.route_code)
        .bind(new_route.name)
        .bind(new_route.start_location)
        .bind(new_route.end_location)
        .bind(new_route.route_type)
        .bind(new_route.total_distance_km)
        .bind(new_route.estimated_duration_minutes)
        .bind(new_route.capacity)
        .bind(new_route.base_fee)
        .bind(new_route.per_km_fee)
        .bind(new_route.pickup_time)
        .bind(new_route.dropoff_time)
        .bind(new_route.created_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "uq_routes_code_per_school",
                AppError::Conflict(format!("Route with code '{}' already exists", code_for_error)),
            )
        })?;

        for w in waypoints {
            sqlx::query(
                r#"
                INSERT INTO route_waypoints (route_id, stop_id, sequence, arrival_offset_minutes, estimated_students)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(route.id)
            .bind(w.stop_id)
            .bind(w.sequence)
            .bind(w.arrival_offset_minutes)
            .bind(w.estimated_students)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(route)
    }

    pub async fn find_by_id(&self, id: Uuid, school_id: Uuid) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE id = $1 AND school_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn find_waypoints(&self, route_id: Uuid) -> Result<Vec<RouteWaypoint>, AppError> {
        let waypoints = sqlx::query_as::<_, RouteWaypoint>(
            "SELECT * FROM route_waypoints WHERE route_id = $1 ORDER BY sequence",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(waypoints)
    }

    pub async fn find_all(
        &self,
        school_id: Uuid,
        status: Option<RouteStatus>,
        route_type: Option<RouteType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE school_id = $1 AND deleted_at IS NULL
            AND ($2::route_status IS NULL OR status = $2)
            AND ($3::route_type IS NULL OR route_type = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(school_id)
        .bind(status)
        .bind(route_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        route_code: Option<String>,
        name: Option<String>,
        start_location: Option<String>,
        end_location: Option<String>,
        route_type: Option<RouteType>,
        status: Option<RouteStatus>,
        capacity: Option<i32>,
        base_fee: Option<Decimal>,
        per_km_fee: Option<Decimal>,
        pickup_time: Option<NaiveTime>,
        dropoff_time: Option<NaiveTime>,
        total_distance_km: Option<f64>,
        estimated_duration_minutes: Option<i32>,
        updated_by: Uuid,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes SET
                route_code = COALESCE($3, route_code),
                name = COALESCE($4, name),
                start_location = COALESCE($5, start_location),
                end_location = COALESCE($6, end_location),
                route_type = COALESCE($7, route_type),
                status = COALESCE($8, status),
                capacity = COALESCE($9, capacity),
                base_fee = COALESCE($10, base_fee),
                per_km_fee = COALESCE($11, per_km_fee),
                pickup_time = COALESCE($12, pickup_time),
                dropoff_time = COALESCE($13, dropoff_time),
                total_distance_km = COALESCE($14, total_distance_km),
                estimated_duration_minutes = COALESCE($15, estimated_duration_minutes),
                updated_by = $16,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(school_id)
        .bind(route_code)
        .bind(name)
        .bind(start_location)
        .bind(end_location)
        .bind(route_type)
        .bind(status)
        .bind(capacity)
        .bind(base_fee)
        .bind(per_km_fee)
        .bind(pickup_time)
        .bind(dropoff_time)
        .bind(total_distance_km)
        .bind(estimated_duration_minutes)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "uq_routes_code_per_school",
                AppError::Conflict("Another route already uses that route code".to_string()),
            )
        })?
        .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", id)))?;

        Ok(route)
    }

    pub async fn has_active_bindings(&self, route_id: Uuid, school_id: Uuid) -> Result<bool, AppError> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM transport_bindings
                WHERE route_id = $1 AND school_id = $2 AND status = 'active'
            )
            "#,
        )
        .bind(route_id)
        .bind(school_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Borrado lógico. Rechazado mientras la ruta tenga recursos asignados
    /// o bindings activos.
    pub async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<(), AppError> {
        let route = self
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", id)))?;

        if route.has_assigned_resources() {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot delete route '{}': a vehicle or driver is still assigned",
                route.route_code
            )));
        }

        if self.has_active_bindings(id, school_id).await? {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot delete route '{}': active student transport bindings still reference it",
                route.route_code
            )));
        }

        sqlx::query(
            "UPDATE routes SET deleted_at = NOW(), status = 'inactive', updated_at = NOW() WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(school_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Asignación atómica del par vehículo/conductor a una ruta.
    ///
    /// Cada recurso se toma con un CAS sobre su back-reference; si el CAS
    /// no afecta filas el recurso ya está tomado por otra ruta (o dejó de
    /// estar activo) y toda la transacción se revierte.
    pub async fn assign_resources(
        &self,
        route_id: Uuid,
        school_id: Uuid,
        vehicle_id: Option<Uuid>,
        driver_id: Option<Uuid>,
        updated_by: Uuid,
    ) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE id = $1 AND school_id = $2 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(route_id)
        .bind(school_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", route_id)))?;

        if !route.status.is_operable() {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot assign resources to route '{}': route status is not active",
                route.route_code
            )));
        }

        if let Some(vid) = vehicle_id {
            // Liberar el vehículo anterior de la ruta si se reemplaza
            if let Some(old) = route.assigned_vehicle_id {
                if old != vid {
                    sqlx::query("UPDATE vehicles SET assigned_route_id = NULL, updated_at = NOW() WHERE id = $1 AND school_id = $2")
                        .bind(old)
                        .bind(school_id)
                        .execute(&mut *tx)
                        .await?;
                }
            }

            let claimed = sqlx::query(
                r#"
                UPDATE vehicles SET assigned_route_id = $1, updated_at = NOW()
                WHERE id = $2 AND school_id = $3 AND status = 'active'
                AND (assigned_route_id IS NULL OR assigned_route_id = $1)
                "#,
            )
            .bind(route_id)
            .bind(vid)
            .bind(school_id)
            .execute(&mut *tx)
            .await?;

            if claimed.rows_affected() == 0 {
                return Err(AppError::Conflict(format!(
                    "Vehicle '{}' is already assigned to another active route or is not active",
                    vid
                )));
            }
        }

        if let Some(did) = driver_id {
            if let Some(old) = route.assigned_driver_id {
                if old != did {
                    sqlx::query("UPDATE drivers SET assigned_route_id = NULL, updated_at = NOW() WHERE id = $1 AND school_id = $2")
                        .bind(old)
                        .bind(school_id)
                        .execute(&mut *tx)
                        .await?;
                }
            }

            let claimed = sqlx::query(
                r#"
                UPDATE drivers SET assigned_route_id = $1, updated_at = NOW()
                WHERE id = $2 AND school_id = $3 AND status = 'active'
                AND (assigned_route_id IS NULL OR assigned_route_id = $1)
                "#,
            )
            .bind(route_id)
            .bind(did)
            .bind(school_id)
            .execute(&mut *tx)
            .await?;

            if claimed.rows_affected() == 0 {
                return Err(AppError::Conflict(format!(
                    "Driver '{}' is already assigned to another active route or is not active",
                    did
                )));
            }
        }

        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes SET
                assigned_vehicle_id = COALESCE($3, assigned_vehicle_id),
                assigned_driver_id = COALESCE($4, assigned_driver_id),
                updated_by = $5,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(school_id)
        .bind(vehicle_id)
        .bind(driver_id)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(route)
    }

    /// Desasignar vehículo y conductor de una ruta.
    ///
    /// Con bindings activos solo procede con `force`; en ese caso los
    /// bindings quedan marcados para re-asignación, nunca descartados.
    pub async fn unassign_resources(
        &self,
        route_id: Uuid,
        school_id: Uuid,
        force: bool,
        updated_by: Uuid,
    ) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE id = $1 AND school_id = $2 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(route_id)
        .bind(school_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Route with id '{}' not found", route_id)))?;

        let active: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM transport_bindings WHERE route_id = $1 AND school_id = $2 AND status = 'active')",
        )
        .bind(route_id)
        .bind(school_id)
        .fetch_one(&mut *tx)
        .await?;

        if active.0 && !force {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot unassign resources from route '{}': active student bindings reference it (use force to flag them for re-assignment)",
                route.route_code
            )));
        }

        if active.0 {
            sqlx::query(
                "UPDATE transport_bindings SET needs_reassignment = TRUE, updated_at = NOW() WHERE route_id = $1 AND school_id = $2 AND status = 'active'",
            )
            .bind(route_id)
            .bind(school_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE vehicles SET assigned_route_id = NULL, updated_at = NOW() WHERE assigned_route_id = $1 AND school_id = $2")
            .bind(route_id)
            .bind(school_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE drivers SET assigned_route_id = NULL, updated_at = NOW() WHERE assigned_route_id = $1 AND school_id = $2")
            .bind(route_id)
            .bind(school_id)
            .execute(&mut *tx)
            .await?;

        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes SET
                assigned_vehicle_id = NULL,
                assigned_driver_id = NULL,
                updated_by = $3,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(school_id)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(route)
    }
}
