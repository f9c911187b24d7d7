//! Repositorio de TransportBindings
//!
//! La regla "un binding activo por alumno" es el índice único parcial
//! `uq_one_active_binding_per_student`; el INSERT confía en él y traduce
//! la violación a conflicto. La plaza en la ruta se ocupa con un CAS
//! sobre `current_occupancy < capacity` en la misma transacción.

use crate::models::route::Route;
use crate::models::transport::{BindingStatus, TransportBinding, TransportType};
use crate::utils::errors::{map_unique_violation, AppError};
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Campos de un binding nuevo
pub struct NewBinding {
    pub student_id: Uuid,
    pub route_id: Uuid,
    pub pickup_stop_id: Uuid,
    pub dropoff_stop_id: Uuid,
    pub transport_type: TransportType,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub scheduled_pickup_time: NaiveTime,
    pub scheduled_dropoff_time: NaiveTime,
    pub fee: Decimal,
    pub created_by: Uuid,
}

/// Cambios sobre un binding existente (merge de campos)
#[derive(Default)]
pub struct BindingChanges {
    pub route_id: Option<Uuid>,
    pub pickup_stop_id: Option<Uuid>,
    pub dropoff_stop_id: Option<Uuid>,
    pub transport_type: Option<TransportType>,
    pub frequency: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub scheduled_pickup_time: Option<NaiveTime>,
    pub scheduled_dropoff_time: Option<NaiveTime>,
    pub fee: Option<Decimal>,
}

/// Fila del horario diario (binding + ruta + nombres de paradas)
#[derive(Debug, FromRow)]
pub struct ScheduleRow {
    pub binding_id: Uuid,
    pub student_id: Uuid,
    pub needs_reassignment: bool,
    pub pickup_stop_id: Uuid,
    pub pickup_stop_name: String,
    pub dropoff_stop_id: Uuid,
    pub dropoff_stop_name: String,
    pub scheduled_pickup_time: NaiveTime,
    pub scheduled_dropoff_time: NaiveTime,
    pub route_id: Uuid,
    pub route_code: String,
    pub route_name: String,
    pub route_pickup_time: NaiveTime,
    pub route_dropoff_time: NaiveTime,
}

pub struct TransportRepository {
    pool: PgPool,
}

impl TransportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ocupar una plaza en la ruta. CAS: falla si la ruta está llena o
    /// dejó de estar activa entre el pre-check y esta transacción.
    async fn claim_seat(
        tx: &mut Transaction<'_, Postgres>,
        route_id: Uuid,
        school_id: Uuid,
    ) -> Result<(), AppError> {
        let claimed = sqlx::query(
            r#"
            UPDATE routes SET current_occupancy = current_occupancy + 1, updated_at = NOW()
            WHERE id = $1 AND school_id = $2 AND deleted_at IS NULL
            AND status = 'active' AND current_occupancy < capacity
            "#,
        )
        .bind(route_id)
        .bind(school_id)
        .execute(&mut **tx)
        .await?;

        if claimed.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Route '{}' is at full capacity or no longer active",
                route_id
            )));
        }
        Ok(())
    }

    async fn release_seat(
        tx: &mut Transaction<'_, Postgres>,
        route_id: Uuid,
        school_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE routes SET current_occupancy = GREATEST(current_occupancy - 1, 0), updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            "#,
        )
        .bind(route_id)
        .bind(school_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn create(&self, school_id: Uuid, b: NewBinding) -> Result<TransportBinding, AppError> {
        let mut tx = self.pool.begin().await?;

        Self::claim_seat(&mut tx, b.route_id, school_id).await?;

        let binding = sqlx::query_as::<_, TransportBinding>(
            r#"
            INSERT INTO transport_bindings (
                id, school_id, student_id, route_id, pickup_stop_id, dropoff_stop_id,
                transport_type, status, frequency, start_date, end_date,
                scheduled_pickup_time, scheduled_dropoff_time, fee,
                created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(school_id)
        .bind(b.student_id)
        .bind(b.route_id)
        .bind(b.pickup_stop_id)
        .bind(b.dropoff_stop_id)
        .bind(b.transport_type)
        .bind(b.frequency)
        .bind(b.start_date)
        .bind(b.end_date)
        .bind(b.scheduled_pickup_time)
        .bind(b.scheduled_dropoff_time)
        .bind(b.fee)
        .bind(b.created_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "uq_one_active_binding_per_student",
                AppError::Conflict(format!(
                    "Student '{}' already has an active transport binding",
                    b.student_id
                )),
            )
        })?;

        tx.commit().await?;
        Ok(binding)
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        school_id: Uuid,
    ) -> Result<Option<TransportBinding>, AppError> {
        let binding = sqlx::query_as::<_, TransportBinding>(
            "SELECT * FROM transport_bindings WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(binding)
    }

    /// Pre-check de binding activo para un alumno. Solo fast-fail: la
    /// invariante autoritativa es el índice único parcial.
    pub async fn student_has_active_binding(
        &self,
        student_id: Uuid,
        school_id: Uuid,
    ) -> Result<bool, AppError> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM transport_bindings
                WHERE school_id = $1 AND student_id = $2 AND status = 'active'
            )
            "#,
        )
        .bind(school_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn find_all(
        &self,
        school_id: Uuid,
        status: Option<BindingStatus>,
        transport_type: Option<TransportType>,
        route_id: Option<Uuid>,
        student_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransportBinding>, AppError> {
        let bindings = sqlx::query_as::<_, TransportBinding>(
            r#"
            SELECT * FROM transport_bindings
            WHERE school_id = $1
            AND ($2::binding_status IS NULL OR status = $2)
            AND ($3::transport_type IS NULL OR transport_type = $3)
            AND ($4::uuid IS NULL OR route_id = $4)
            AND ($5::uuid IS NULL OR student_id = $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(school_id)
        .bind(status)
        .bind(transport_type)
        .bind(route_id)
        .bind(student_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(bindings)
    }

    /// Merge de cambios sobre un binding. Si cambia la ruta, la plaza
    /// nueva se ocupa (CAS) y la anterior se libera en la misma
    /// transacción.
    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        changes: BindingChanges,
        updated_by: Uuid,
    ) -> Result<TransportBinding, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, TransportBinding>(
            "SELECT * FROM transport_bindings WHERE id = $1 AND school_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(school_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transport binding with id '{}' not found", id)))?;

        if current.status.is_terminal() {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot update transport binding '{}': its status is terminal",
                id
            )));
        }

        if let Some(new_route) = changes.route_id {
            if new_route != current.route_id && current.status == BindingStatus::Active {
                Self::claim_seat(&mut tx, new_route, school_id).await?;
                Self::release_seat(&mut tx, current.route_id, school_id).await?;
            }
        }

        let binding = sqlx::query_as::<_, TransportBinding>(
            r#"
            UPDATE transport_bindings SET
                route_id = COALESCE($3, route_id),
                pickup_stop_id = COALESCE($4, pickup_stop_id),
                dropoff_stop_id = COALESCE($5, dropoff_stop_id),
                transport_type = COALESCE($6, transport_type),
                frequency = COALESCE($7, frequency),
                end_date = COALESCE($8, end_date),
                scheduled_pickup_time = COALESCE($9, scheduled_pickup_time),
                scheduled_dropoff_time = COALESCE($10, scheduled_dropoff_time),
                fee = COALESCE($11, fee),
                needs_reassignment = CASE WHEN $3::uuid IS NOT NULL THEN FALSE ELSE needs_reassignment END,
                updated_by = $12,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(school_id)
        .bind(changes.route_id)
        .bind(changes.pickup_stop_id)
        .bind(changes.dropoff_stop_id)
        .bind(changes.transport_type)
        .bind(changes.frequency)
        .bind(changes.end_date)
        .bind(changes.scheduled_pickup_time)
        .bind(changes.scheduled_dropoff_time)
        .bind(changes.fee)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(binding)
    }

    /// Cancelación idempotente-con-guardia: la segunda cancelación es un
    /// conflicto y no altera el estado terminal. Añade el registro de
    /// actividad terminal con el motivo y libera la plaza.
    pub async fn cancel(
        &self,
        id: Uuid,
        school_id: Uuid,
        reason: String,
        cancelled_by: Uuid,
    ) -> Result<TransportBinding, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, TransportBinding>(
            "SELECT * FROM transport_bindings WHERE id = $1 AND school_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(school_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transport binding with id '{}' not found", id)))?;

        if current.status == BindingStatus::Cancelled {
            return Err(AppError::Conflict(format!(
                "Transport binding '{}' is already cancelled",
                id
            )));
        }

        let binding = sqlx::query_as::<_, TransportBinding>(
            r#"
            UPDATE transport_bindings SET
                status = 'cancelled',
                end_date = CURRENT_DATE,
                updated_by = $3,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(school_id)
        .bind(cancelled_by)
        .fetch_one(&mut *tx)
        .await?;

        if current.status != BindingStatus::Completed {
            Self::release_seat(&mut tx, current.route_id, school_id).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO transport_activities (
                id, binding_id, school_id, activity_date,
                planned_pickup_time, planned_dropoff_time,
                status, delay_minutes, note, recorded_by, created_at
            )
            VALUES ($1, $2, $3, CURRENT_DATE, $4, $5, 'cancelled', 0, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(school_id)
        .bind(current.scheduled_pickup_time)
        .bind(current.scheduled_dropoff_time)
        .bind(reason)
        .bind(cancelled_by)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(binding)
    }

    /// Filas del horario diario: bindings activos cuya ventana de validez
    /// cubre la fecha, con ruta y nombres de paradas. Lectura pura.
    pub async fn find_schedule_rows(
        &self,
        school_id: Uuid,
        date: NaiveDate,
        route_id: Option<Uuid>,
    ) -> Result<Vec<ScheduleRow>, AppError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT
                b.id AS binding_id,
                b.student_id,
                b.needs_reassignment,
                b.pickup_stop_id,
                ps.name AS pickup_stop_name,
                b.dropoff_stop_id,
                ds.name AS dropoff_stop_name,
                b.scheduled_pickup_time,
                b.scheduled_dropoff_time,
                r.id AS route_id,
                r.route_code,
                r.name AS route_name,
                r.pickup_time AS route_pickup_time,
                r.dropoff_time AS route_dropoff_time
            FROM transport_bindings b
            JOIN routes r ON r.id = b.route_id
            JOIN stops ps ON ps.id = b.pickup_stop_id
            JOIN stops ds ON ds.id = b.dropoff_stop_id
            WHERE b.school_id = $1
            AND b.status = 'active'
            AND b.start_date <= $2
            AND (b.end_date IS NULL OR b.end_date >= $2)
            AND ($3::uuid IS NULL OR r.id = $3)
            ORDER BY r.route_code, b.scheduled_pickup_time, b.created_at
            "#,
        )
        .bind(school_id)
        .bind(date)
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_route_for_binding(
        &self,
        route_id: Uuid,
        school_id: Uuid,
    ) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE id = $1 AND school_id = $2 AND deleted_at IS NULL",
        )
        .bind(route_id)
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }
}
