//! Construcción de rutas a partir de paradas
//!
//! Pasada secuencial determinista sobre las paradas en el orden dado:
//! calcula distancia total, duración estimada, offsets de llegada
//! proporcionales a la distancia acumulada y capacidad con margen de
//! seguridad. No reordena paradas.
//!
//! Contrato: capacidad >= suma de alumnos estimados por parada + margen;
//! duración monótona no decreciente con la distancia.

use thiserror::Error;
use uuid::Uuid;

use crate::services::geo::{self, GeoError, GeoPoint, DEFAULT_SPEED_KMH};
use crate::utils::errors::AppError;

/// Margen de seguridad sobre la demanda estimada (20%, mínimo 2 plazas).
const CAPACITY_BUFFER_RATIO: f64 = 0.20;
const CAPACITY_BUFFER_MIN: i32 = 2;

/// Errores de la construcción de rutas
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    #[error("at least 2 stops are required to build a route, got {0}")]
    InsufficientStops(usize),

    #[error("route distance {actual_km:.2} km exceeds the maximum of {max_km:.2} km")]
    MaxDistanceExceeded { actual_km: f64, max_km: f64 },

    #[error("route duration {actual_minutes} min exceeds the maximum of {max_minutes} min")]
    MaxDurationExceeded { actual_minutes: i32, max_minutes: i32 },

    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl From<OptimizeError> for AppError {
    fn from(e: OptimizeError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

/// Parada candidata con su demanda estimada
#[derive(Debug, Clone)]
pub struct PlannedStop {
    pub stop_id: Uuid,
    pub point: GeoPoint,
    pub estimated_students: i32,
}

/// Restricciones opcionales sobre la ruta resultante
#[derive(Debug, Clone, Default)]
pub struct RouteConstraints {
    pub max_distance_km: Option<f64>,
    pub max_duration_minutes: Option<i32>,
    pub min_capacity: Option<i32>,
    pub speed_kmh: Option<f64>,
}

/// Waypoint planificado de la ruta resultante
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedWaypoint {
    pub stop_id: Uuid,
    pub sequence: i32,
    pub arrival_offset_minutes: i32,
    pub estimated_students: i32,
}

/// Resultado de la pasada de planificación
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub waypoints: Vec<PlannedWaypoint>,
    pub total_distance_km: f64,
    pub estimated_duration_minutes: i32,
    pub capacity: i32,
}

/// Construir el plan de ruta sobre las paradas en el orden dado.
pub fn plan_route(stops: &[PlannedStop], constraints: &RouteConstraints) -> Result<RoutePlan, OptimizeError> {
    if stops.len() < 2 {
        return Err(OptimizeError::InsufficientStops(stops.len()));
    }

    let speed = constraints.speed_kmh.unwrap_or(DEFAULT_SPEED_KMH);
    let points: Vec<GeoPoint> = stops.iter().map(|s| s.point).collect();

    let total_distance_km = geo::route_distance_km(&points)?;
    let estimated_duration_minutes = geo::estimate_duration_minutes(total_distance_km, speed)?;

    if let Some(max_km) = constraints.max_distance_km {
        if total_distance_km > max_km {
            return Err(OptimizeError::MaxDistanceExceeded {
                actual_km: total_distance_km,
                max_km,
            });
        }
    }
    if let Some(max_minutes) = constraints.max_duration_minutes {
        if estimated_duration_minutes > max_minutes {
            return Err(OptimizeError::MaxDurationExceeded {
                actual_minutes: estimated_duration_minutes,
                max_minutes,
            });
        }
    }

    // Offsets de llegada proporcionales a la distancia acumulada
    let mut waypoints = Vec::with_capacity(stops.len());
    let mut cumulative_km = 0.0;
    for (i, stop) in stops.iter().enumerate() {
        if i > 0 {
            cumulative_km += geo::distance_km(points[i - 1], points[i])?;
        }
        let arrival_offset_minutes = if total_distance_km > 0.0 {
            (estimated_duration_minutes as f64 * cumulative_km / total_distance_km).round() as i32
        } else {
            0
        };
        waypoints.push(PlannedWaypoint {
            stop_id: stop.stop_id,
            sequence: i as i32,
            arrival_offset_minutes,
            estimated_students: stop.estimated_students,
        });
    }

    let demand: i32 = stops.iter().map(|s| s.estimated_students).sum();
    let buffer = ((demand as f64 * CAPACITY_BUFFER_RATIO).ceil() as i32).max(CAPACITY_BUFFER_MIN);
    let capacity = (demand + buffer).max(constraints.min_capacity.unwrap_or(0)).max(1);

    Ok(RoutePlan {
        waypoints,
        total_distance_km,
        estimated_duration_minutes,
        capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(lat: f64, lng: f64, students: i32) -> PlannedStop {
        PlannedStop {
            stop_id: Uuid::new_v4(),
            point: GeoPoint::new(lat, lng),
            estimated_students: students,
        }
    }

    #[test]
    fn test_requires_two_stops() {
        let err = plan_route(&[stop(6.45, 3.39, 10)], &RouteConstraints::default()).unwrap_err();
        assert_eq!(err, OptimizeError::InsufficientStops(1));
        assert!(plan_route(&[], &RouteConstraints::default()).is_err());
    }

    #[test]
    fn test_distance_is_sum_of_consecutive_legs() {
        let stops = vec![stop(6.45, 3.39, 10), stop(6.46, 3.40, 15), stop(6.47, 3.41, 5)];
        let plan = plan_route(&stops, &RouteConstraints::default()).unwrap();

        let expected = geo::route_distance_km(&[
            stops[0].point,
            stops[1].point,
            stops[2].point,
        ])
        .unwrap();
        assert!((plan.total_distance_km - expected).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_covers_demand_plus_buffer() {
        let stops = vec![stop(6.45, 3.39, 10), stop(6.46, 3.40, 15), stop(6.47, 3.41, 5)];
        let plan = plan_route(&stops, &RouteConstraints::default()).unwrap();

        // demanda 30 + margen 20% = 36
        assert!(plan.capacity >= 30 + CAPACITY_BUFFER_MIN);
        assert_eq!(plan.capacity, 36);
    }

    #[test]
    fn test_min_capacity_constraint_wins_over_demand() {
        let stops = vec![stop(6.45, 3.39, 1), stop(6.46, 3.40, 1)];
        let constraints = RouteConstraints {
            min_capacity: Some(20),
            ..Default::default()
        };
        let plan = plan_route(&stops, &constraints).unwrap();
        assert_eq!(plan.capacity, 20);
    }

    #[test]
    fn test_offsets_start_at_zero_and_are_monotone() {
        let stops = vec![
            stop(6.45, 3.39, 10),
            stop(6.46, 3.40, 15),
            stop(6.47, 3.41, 5),
            stop(6.50, 3.45, 8),
        ];
        let plan = plan_route(&stops, &RouteConstraints::default()).unwrap();

        assert_eq!(plan.waypoints[0].arrival_offset_minutes, 0);
        for pair in plan.waypoints.windows(2) {
            assert!(pair[1].arrival_offset_minutes >= pair[0].arrival_offset_minutes);
            assert_eq!(pair[1].sequence, pair[0].sequence + 1);
        }
        let last = plan.waypoints.last().unwrap();
        assert_eq!(last.arrival_offset_minutes, plan.estimated_duration_minutes);
    }

    #[test]
    fn test_max_distance_constraint_rejects() {
        let stops = vec![stop(6.45, 3.39, 10), stop(7.45, 4.39, 15)];
        let constraints = RouteConstraints {
            max_distance_km: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            plan_route(&stops, &constraints),
            Err(OptimizeError::MaxDistanceExceeded { .. })
        ));
    }

    #[test]
    fn test_max_duration_constraint_rejects() {
        let stops = vec![stop(6.45, 3.39, 10), stop(7.45, 4.39, 15)];
        let constraints = RouteConstraints {
            max_duration_minutes: Some(30),
            ..Default::default()
        };
        assert!(matches!(
            plan_route(&stops, &constraints),
            Err(OptimizeError::MaxDurationExceeded { .. })
        ));
    }

    #[test]
    fn test_duplicate_coordinates_yield_zero_distance_plan() {
        let stops = vec![stop(6.45, 3.39, 4), stop(6.45, 3.39, 6)];
        let plan = plan_route(&stops, &RouteConstraints::default()).unwrap();
        assert!(plan.total_distance_km < 1e-9);
        assert_eq!(plan.estimated_duration_minutes, 0);
        assert!(plan.waypoints.iter().all(|w| w.arrival_offset_minutes == 0));
    }
}
