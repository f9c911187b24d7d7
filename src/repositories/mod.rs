//! Repositorios de acceso a datos
//!
//! Toda query está acotada por school_id (aislamiento multi-tenant).
//! Las invariantes de exclusividad se resuelven contra la base de datos
//! (índices únicos parciales y compare-and-swap), no contra pre-checks.

pub mod stop_repository;
pub mod route_repository;
pub mod vehicle_repository;
pub mod driver_repository;
pub mod transport_repository;
pub mod activity_repository;
