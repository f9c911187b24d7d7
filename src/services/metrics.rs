//! Métricas rodantes de un binding
//!
//! Actualización incremental (media online) sin re-escanear el historial:
//! `new_avg = (old_avg * (n - 1) + delay) / n` con n = contador
//! post-incremento. La tasa de puntualidad cuenta solo viajes
//! `completed`; los `delayed` restan puntualidad aunque su retraso
//! alimente la media por separado.

use crate::models::transport::TripStatus;

/// Resumen cacheado de métricas de un binding
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RollingMetrics {
    pub total_trips: i32,
    pub completed_trips: i32,
    pub avg_delay_minutes: f64,
}

impl RollingMetrics {
    /// Plegar un viaje realizado sobre las métricas actuales.
    pub fn apply(self, status: TripStatus, delay_minutes: i32) -> RollingMetrics {
        let n = self.total_trips + 1;
        let avg_delay_minutes =
            (self.avg_delay_minutes * (n - 1) as f64 + delay_minutes as f64) / n as f64;

        let completed_trips = match status {
            TripStatus::Completed => self.completed_trips + 1,
            TripStatus::Missed | TripStatus::Delayed | TripStatus::Cancelled => self.completed_trips,
        };

        RollingMetrics {
            total_trips: n,
            completed_trips,
            avg_delay_minutes,
        }
    }

    /// Tasa de puntualidad en porcentaje. Nunca divide por cero.
    pub fn on_time_rate(&self) -> f64 {
        if self.total_trips == 0 {
            return 0.0;
        }
        self.completed_trips as f64 / self.total_trips as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_mean_matches_batch_mean() {
        let m = RollingMetrics::default()
            .apply(TripStatus::Completed, 0)
            .apply(TripStatus::Completed, 10)
            .apply(TripStatus::Completed, 20);

        assert_eq!(m.total_trips, 3);
        assert!((m.avg_delay_minutes - 10.0).abs() < 1e-12);
        assert!((m.on_time_rate() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_on_time_rate_zero_without_trips() {
        let m = RollingMetrics::default();
        assert_eq!(m.on_time_rate(), 0.0);
    }

    #[test]
    fn test_delayed_counts_against_on_time_rate() {
        let m = RollingMetrics::default()
            .apply(TripStatus::Completed, 0)
            .apply(TripStatus::Delayed, 12)
            .apply(TripStatus::Missed, 0)
            .apply(TripStatus::Completed, 4);

        assert_eq!(m.total_trips, 4);
        assert_eq!(m.completed_trips, 2);
        assert!((m.on_time_rate() - 50.0).abs() < 1e-12);
        assert!((m.avg_delay_minutes - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_incremental_equals_recompute_over_longer_history() {
        let delays = [0, 3, 7, 2, 18, 0, 5];
        let mut m = RollingMetrics::default();
        for d in delays {
            m = m.apply(TripStatus::Completed, d);
        }
        let batch: f64 = delays.iter().sum::<i32>() as f64 / delays.len() as f64;
        assert!((m.avg_delay_minutes - batch).abs() < 1e-9);
    }
}
