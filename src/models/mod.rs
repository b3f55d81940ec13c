mod breeder;
mod config;
mod crossover;
mod distribution;
mod diversity;
mod fitness;
mod geo;
mod grid;
mod metrics;
mod mutagen;
mod population;
mod repair;
mod selector;

pub use breeder::Breeder;
pub use config::{BlindSpotConfig, ConfigError, CoverageConfig, MutationSettings};
pub use crossover::{AlphaOutOfRange, Crossover};
pub use distribution::Distribution;
pub use diversity::select_diverse;
pub use fitness::{
    BlindSpotLandscape, BlindSpotThresholds, CoveragePenalties, blind_spot_fitness,
    coverage_fitness, spacing_penalty,
};
pub use geo::{
    BoundingBox, CameraRecord, EARTH_RADIUS_M, GeoPoint, Located, MIN_SPAN_DEG, distance, normalize,
};
pub use grid::{EvaluationGrid, FALLBACK_SAMPLE_SIZE, GridError, GridSpec, MAX_LATTICE_POINTS};
pub use metrics::{
    CameraSimulation, CoverageMetrics, CoverageSurface, cameras_in_range, coverage_metrics,
    simulate_camera,
};
pub use mutagen::{Mutagen, MutagenError, ProbabilityOutOfRange, SigmaOutOfRange};
pub use population::{GenerationStats, Population};
pub use repair::{RepairOutcome, repair_spacing};
pub use selector::{SelectionError, Selector};
