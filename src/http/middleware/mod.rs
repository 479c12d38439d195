pub mod authorization;
pub mod in_flight;

pub use authorization::authorization_middleware;
pub use in_flight::in_flight_middleware;
