//! Cálculo de distancias geográficas
//!
//! Distancia de círculo máximo (haversine) sobre una tierra esférica,
//! distancia total de una secuencia de puntos y estimación de duración.
//! Funciones puras, deterministas, sin acceso a datos.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Radio de la tierra en kilómetros.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Velocidad media asumida para estimar duración de recorrido.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Errores de entrada del módulo geográfico
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("invalid coordinate (lat {lat}, lng {lng}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid speed {0} km/h: must be greater than zero")]
    InvalidSpeed(f64),
}

/// Punto geográfico (grados decimales)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    fn validate(&self) -> Result<(), GeoError> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::InvalidCoordinate {
                lat: self.latitude,
                lng: self.longitude,
            });
        }
        Ok(())
    }
}

/// Distancia haversine entre dos puntos en kilómetros.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> Result<f64, GeoError> {
    a.validate()?;
    b.validate()?;

    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    Ok(EARTH_RADIUS_KM * c)
}

/// Distancia total de una secuencia ordenada de puntos: suma de tramos
/// consecutivos. Cero o un punto devuelve 0.
pub fn route_distance_km(points: &[GeoPoint]) -> Result<f64, GeoError> {
    let mut total = 0.0;
    for pair in points.windows(2) {
        total += distance_km(pair[0], pair[1])?;
    }
    Ok(total)
}

/// Estimar duración en minutos: `ceil(km / km/h * 60)`.
pub fn estimate_duration_minutes(distance_km: f64, speed_kmh: f64) -> Result<i32, GeoError> {
    if speed_kmh <= 0.0 {
        return Err(GeoError::InvalidSpeed(speed_kmh));
    }
    Ok((distance_km / speed_kmh * 60.0).ceil() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = GeoPoint::new(6.45, 3.39);
        let dist = distance_km(p, p).unwrap();
        assert!(dist < 1e-9, "same point should have ~0 distance, got {}", dist);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = GeoPoint::new(6.45, 3.39);
        let b = GeoPoint::new(6.47, 3.41);
        let ab = distance_km(a, b).unwrap();
        let ba = distance_km(b, a).unwrap();
        assert!((ab - ba).abs() < 1e-12, "haversine should be symmetric");
    }

    #[test]
    fn test_distance_known_pair() {
        // Las Vegas (36.17, -115.14) a Los Angeles (34.05, -118.24): ~370 km
        let dist = distance_km(
            GeoPoint::new(36.17, -115.14),
            GeoPoint::new(34.05, -118.24),
        )
        .unwrap();
        assert!(dist > 350.0 && dist < 400.0, "LV to LA should be ~370km, got {}", dist);
    }

    #[test]
    fn test_distance_rejects_out_of_range() {
        let bad = GeoPoint::new(91.0, 0.0);
        let ok = GeoPoint::new(0.0, 0.0);
        assert!(matches!(
            distance_km(bad, ok),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        let bad_lng = GeoPoint::new(0.0, 180.5);
        assert!(distance_km(ok, bad_lng).is_err());
    }

    #[test]
    fn test_route_distance_degenerate_inputs() {
        assert_eq!(route_distance_km(&[]).unwrap(), 0.0);
        assert_eq!(route_distance_km(&[GeoPoint::new(6.45, 3.39)]).unwrap(), 0.0);
    }

    #[test]
    fn test_route_distance_is_sum_of_legs() {
        let a = GeoPoint::new(6.45, 3.39);
        let b = GeoPoint::new(6.46, 3.40);
        let c = GeoPoint::new(6.47, 3.41);
        let total = route_distance_km(&[a, b, c]).unwrap();
        let legs = distance_km(a, b).unwrap() + distance_km(b, c).unwrap();
        assert!((total - legs).abs() < 1e-12);
        // Tres paradas urbanas separadas ~0.01 grados: ~3.1 km en total
        assert!(total > 2.5 && total < 3.5, "got {}", total);
    }

    #[test]
    fn test_estimate_duration_rounds_up() {
        // 10 km a 40 km/h = 15 min exactos
        assert_eq!(estimate_duration_minutes(10.0, 40.0).unwrap(), 15);
        // 10.1 km a 40 km/h = 15.15 min -> 16
        assert_eq!(estimate_duration_minutes(10.1, 40.0).unwrap(), 16);
        assert_eq!(estimate_duration_minutes(0.0, 40.0).unwrap(), 0);
    }

    #[test]
    fn test_estimate_duration_rejects_bad_speed() {
        assert!(matches!(
            estimate_duration_minutes(10.0, 0.0),
            Err(GeoError::InvalidSpeed(_))
        ));
        assert!(estimate_duration_minutes(10.0, -5.0).is_err());
    }
}
