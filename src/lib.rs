//! Genetic search for surveillance camera planning.
//!
//! Two searches share one set of geographic and genetic building blocks:
//!
//! - [`BlindSpotSearch`] evolves single points towards locations the existing
//!   cameras cover poorly and returns a ranked, spread-out selection of them.
//! - [`CoverageSearch`] evolves layouts of a fixed number of new cameras that
//!   maximize grid coverage while keeping a minimum spacing.
//!
//! Both are synchronous and take an explicit random number generator. The
//! async [`Service`] wraps them for use inside a tokio runtime.
//!
//! ```rust,no_run
//! use coverage_ga::models::{BlindSpotConfig, GeoPoint};
//! use coverage_ga::BlindSpotSearch;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let cameras = vec![GeoPoint::new(19.430, -99.140), GeoPoint::new(19.440, -99.130)];
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let report = BlindSpotSearch::new(BlindSpotConfig::default())?.run(&cameras, &mut rng)?;
//! for spot in report.blind_spots {
//!     println!("{:?} scored {:.3}", spot.location, spot.fitness);
//! }
//! # Ok::<(), coverage_ga::services::optimization::Error>(())
//! ```

pub mod models;
pub mod services;

pub use services::optimization::{
    BlindSpot, BlindSpotReport, BlindSpotSearch, CoverageReport, CoverageSearch, Interrupt,
    Service,
};
