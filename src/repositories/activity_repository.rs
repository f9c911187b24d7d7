//! Repositorio de actividad y analytics
//!
//! El registro de un viaje realizado es la única escritura: inserta la
//! fila append-only y pliega el evento en las métricas rodantes del
//! binding bajo SELECT ... FOR UPDATE (las grabaciones concurrentes
//! sobre el mismo binding se serializan). Los agregados de flota son
//! lecturas recalculadas bajo demanda.

use crate::models::transport::{BindingStatus, TransportBinding, TripActivity, TripStatus};
use crate::services::metrics::RollingMetrics;
use crate::utils::errors::AppError;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Evento de viaje a registrar
pub struct NewActivity {
    pub activity_date: NaiveDate,
    pub status: TripStatus,
    pub actual_pickup_time: Option<NaiveTime>,
    pub actual_dropoff_time: Option<NaiveTime>,
    pub delay_minutes: i32,
    pub note: Option<String>,
    pub recorded_by: Uuid,
}

/// Conteo agrupado por estado (texto del ENUM)
#[derive(Debug, FromRow)]
pub struct StatusCountRow {
    pub status: String,
    pub count: i64,
}

/// Fila de cumplimiento de conductores
#[derive(Debug, FromRow)]
pub struct ComplianceRow {
    pub driver_id: Uuid,
    pub full_name: String,
    pub license_expiry: NaiveDate,
    pub medical_check_expiry: Option<NaiveDate>,
}

/// Agregado de rendimiento por conductor
#[derive(Debug, FromRow)]
pub struct DriverPerformanceRow {
    pub driver_id: Uuid,
    pub full_name: String,
    pub total_trips: i64,
    pub completed_trips: i64,
    pub avg_delay_minutes: f64,
}

/// Agregado de rendimiento por ruta
#[derive(Debug, FromRow)]
pub struct RoutePerformanceRow {
    pub route_id: Uuid,
    pub route_code: String,
    pub total_trips: i64,
    pub completed_trips: i64,
    pub avg_delay_minutes: f64,
}

pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar un viaje realizado y actualizar las métricas rodantes
    /// del binding con la media online (sin re-escanear el historial).
    pub async fn record(
        &self,
        binding_id: Uuid,
        school_id: Uuid,
        activity: NewActivity,
    ) -> Result<(TripActivity, TransportBinding), AppError> {
        let mut tx = self.pool.begin().await?;

        let binding = sqlx::query_as::<_, TransportBinding>(
            "SELECT * FROM transport_bindings WHERE id = $1 AND school_id = $2 FOR UPDATE",
        )
        .bind(binding_id)
        .bind(school_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Transport binding with id '{}' not found", binding_id))
        })?;

        if binding.status == BindingStatus::Cancelled {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot record activity on transport binding '{}': it is cancelled",
                binding_id
            )));
        }

        let record = sqlx::query_as::<_, TripActivity>(
            r#"
            INSERT INTO transport_activities (
                id, binding_id, school_id, activity_date,
                planned_pickup_time, actual_pickup_time,
                planned_dropoff_time, actual_dropoff_time,
                status, delay_minutes, note, recorded_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(binding_id)
        .bind(school_id)
        .bind(activity.activity_date)
        .bind(binding.scheduled_pickup_time)
        .bind(activity.actual_pickup_time)
        .bind(binding.scheduled_dropoff_time)
        .bind(activity.actual_dropoff_time)
        .bind(activity.status)
        .bind(activity.delay_minutes)
        .bind(activity.note)
        .bind(activity.recorded_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let metrics = RollingMetrics {
            total_trips: binding.total_trips,
            completed_trips: binding.completed_trips,
            avg_delay_minutes: binding.avg_delay_minutes,
        }
        .apply(activity.status, activity.delay_minutes);

        let binding = sqlx::query_as::<_, TransportBinding>(
            r#"
            UPDATE transport_bindings SET
                total_trips = $3,
                completed_trips = $4,
                avg_delay_minutes = $5,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(binding_id)
        .bind(school_id)
        .bind(metrics.total_trips)
        .bind(metrics.completed_trips)
        .bind(metrics.avg_delay_minutes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((record, binding))
    }

    pub async fn find_by_binding(
        &self,
        binding_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<TripActivity>, AppError> {
        let activities = sqlx::query_as::<_, TripActivity>(
            r#"
            SELECT * FROM transport_activities
            WHERE binding_id = $1 AND school_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(binding_id)
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    pub async fn count_vehicles_by_status(&self, school_id: Uuid) -> Result<Vec<StatusCountRow>, AppError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status::text AS status, COUNT(*) AS count FROM vehicles WHERE school_id = $1 GROUP BY status ORDER BY status",
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_routes_by_status(&self, school_id: Uuid) -> Result<Vec<StatusCountRow>, AppError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status::text AS status, COUNT(*) AS count FROM routes WHERE school_id = $1 AND deleted_at IS NULL GROUP BY status ORDER BY status",
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_bindings_by_status(&self, school_id: Uuid) -> Result<Vec<StatusCountRow>, AppError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status::text AS status, COUNT(*) AS count FROM transport_bindings WHERE school_id = $1 GROUP BY status ORDER BY status",
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_bindings_by_type(&self, school_id: Uuid) -> Result<Vec<StatusCountRow>, AppError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT transport_type::text AS status, COUNT(*) AS count FROM transport_bindings WHERE school_id = $1 GROUP BY transport_type ORDER BY transport_type",
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn average_driver_rating(&self, school_id: Uuid) -> Result<Option<f64>, AppError> {
        let row: (Option<f64>,) = sqlx::query_as(
            "SELECT AVG(rating) FROM drivers WHERE school_id = $1 AND rating IS NOT NULL",
        )
        .bind(school_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// Conductores cuya licencia o revisión médica vence antes del corte.
    pub async fn drivers_expiring_before(
        &self,
        school_id: Uuid,
        cutoff: NaiveDate,
    ) -> Result<Vec<ComplianceRow>, AppError> {
        let rows = sqlx::query_as::<_, ComplianceRow>(
            r#"
            SELECT id AS driver_id, full_name, license_expiry, medical_check_expiry
            FROM drivers
            WHERE school_id = $1
            AND status <> 'terminated'
            AND (license_expiry <= $2 OR (medical_check_expiry IS NOT NULL AND medical_check_expiry <= $2))
            ORDER BY license_expiry
            "#,
        )
        .bind(school_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Rendimiento por conductor derivado del log de actividad en el
    /// rango de fechas dado (vía la ruta asignada al binding).
    pub async fn driver_performance(
        &self,
        school_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DriverPerformanceRow>, AppError> {
        let rows = sqlx::query_as::<_, DriverPerformanceRow>(
            r#"
            SELECT
                d.id AS driver_id,
                d.full_name,
                COUNT(a.id) AS total_trips,
                COUNT(a.id) FILTER (WHERE a.status = 'completed') AS completed_trips,
                COALESCE(AVG(a.delay_minutes), 0)::float8 AS avg_delay_minutes
            FROM transport_activities a
            JOIN transport_bindings b ON b.id = a.binding_id
            JOIN routes r ON r.id = b.route_id
            JOIN drivers d ON d.id = r.assigned_driver_id
            WHERE a.school_id = $1
            AND a.activity_date BETWEEN $2 AND $3
            GROUP BY d.id, d.full_name
            ORDER BY total_trips DESC
            "#,
        )
        .bind(school_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Rendimiento por ruta derivado del log de actividad.
    pub async fn route_performance(
        &self,
        school_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RoutePerformanceRow>, AppError> {
        let rows = sqlx::query_as::<_, RoutePerformanceRow>(
            r#"
            SELECT
                r.id AS route_id,
                r.route_code,
                COUNT(a.id) AS total_trips,
                COUNT(a.id) FILTER (WHERE a.status = 'completed') AS completed_trips,
                COALESCE(AVG(a.delay_minutes), 0)::float8 AS avg_delay_minutes
            FROM transport_activities a
            JOIN transport_bindings b ON b.id = a.binding_id
            JOIN routes r ON r.id = b.route_id
            WHERE a.school_id = $1
            AND a.activity_date BETWEEN $2 AND $3
            GROUP BY r.id, r.route_code
            ORDER BY total_trips DESC
            "#,
        )
        .bind(school_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
