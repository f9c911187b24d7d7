pub mod stop_routes;
pub mod route_routes;
pub mod vehicle_routes;
pub mod driver_routes;
pub mod transport_routes;
pub mod schedule_routes;
pub mod analytics_routes;
