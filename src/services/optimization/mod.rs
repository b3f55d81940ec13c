mod blind_spots;
mod coverage;
mod errors;
mod models;
mod service;
mod service_builder;

pub use blind_spots::{BlindSpot, BlindSpotReport, BlindSpotSearch};
pub use coverage::{CoverageReport, CoverageSearch};
pub use errors::Error;
pub use models::Interrupt;
pub use service::{SeededCoverageReport, Service};
pub use service_builder::{SIMULATION_RADIUS_M, ServiceBuilder};
