//! Cálculo de tarifas de transporte
//!
//! Tarifa final = base + por-km * distancia + recargo por tipo de
//! transporte, redondeada a 2 decimales. Los recargos son una tabla
//! fija por tipo; regular y temporal no llevan recargo.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::transport::TransportType;

lazy_static! {
    /// Recargos por tipo de transporte
    static ref TYPE_SURCHARGES: HashMap<TransportType, Decimal> = {
        let mut m = HashMap::new();
        m.insert(TransportType::Regular, Decimal::ZERO);
        m.insert(TransportType::Temporary, Decimal::ZERO);
        m.insert(TransportType::SpecialNeeds, Decimal::new(30000, 2)); // 300.00
        m.insert(TransportType::Medical, Decimal::new(25000, 2));      // 250.00
        m.insert(TransportType::Emergency, Decimal::new(50000, 2));    // 500.00
        m
    };
}

/// Recargo para un tipo de transporte
pub fn type_surcharge(transport_type: TransportType) -> Decimal {
    TYPE_SURCHARGES
        .get(&transport_type)
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// Calcular la tarifa de un binding.
///
/// `distance_km` llega como f64 (así se almacena la distancia de ruta);
/// la conversión a Decimal ocurre antes de multiplicar para no acumular
/// error binario en el importe.
pub fn compute_fee(
    base_fee: Decimal,
    per_km_fee: Decimal,
    distance_km: f64,
    transport_type: TransportType,
) -> Decimal {
    let distance = Decimal::from_f64_retain(distance_km).unwrap_or(Decimal::ZERO);
    let mut total = base_fee + per_km_fee * distance + type_surcharge(transport_type);
    total = total.round_dp(2);
    // Escala fija de 2 decimales: es un importe
    total.rescale(2);
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_needs_fee_example() {
        // base 500 + 20/km * 10 km + recargo special_needs 300 = 1000.00
        let fee = compute_fee(
            Decimal::new(500, 0),
            Decimal::new(20, 0),
            10.0,
            TransportType::SpecialNeeds,
        );
        assert_eq!(fee, Decimal::new(100000, 2));
        assert_eq!(fee.to_string(), "1000.00");
    }

    #[test]
    fn test_regular_and_temporary_have_no_surcharge() {
        assert_eq!(type_surcharge(TransportType::Regular), Decimal::ZERO);
        assert_eq!(type_surcharge(TransportType::Temporary), Decimal::ZERO);

        let regular = compute_fee(Decimal::new(500, 0), Decimal::new(20, 0), 10.0, TransportType::Regular);
        assert_eq!(regular.to_string(), "700.00");
    }

    #[test]
    fn test_fee_rounds_to_two_decimals() {
        // 100 + 3/km * 3.333 km = 109.999 -> 110.00
        let fee = compute_fee(Decimal::new(100, 0), Decimal::new(3, 0), 3.333, TransportType::Regular);
        assert_eq!(fee, Decimal::new(11000, 2));
    }

    #[test]
    fn test_zero_distance_is_base_plus_surcharge() {
        let fee = compute_fee(Decimal::new(400, 0), Decimal::new(25, 0), 0.0, TransportType::Medical);
        assert_eq!(fee.to_string(), "650.00");
    }
}
