use super::models::Interrupt;
use crate::models::GridSpec;
use crate::services::optimization::Service;
use tracing::instrument;

/// Default radius for single-camera what-if checks, in meters.
pub const SIMULATION_RADIUS_M: f64 = 120.0;

pub struct ServiceBuilder {
    pub(super) seed: Option<u64>,
    pub(super) interrupt: Interrupt,
    pub(super) simulation_grid: GridSpec,
    pub(super) simulation_radius_m: f64,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self {
            seed: None,
            interrupt: Interrupt::new(),
            simulation_grid: GridSpec::lightweight(),
            simulation_radius_m: SIMULATION_RADIUS_M,
        }
    }
}

impl ServiceBuilder {
    /// Seeds every run with the same value, making results reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Shares an existing cancellation handle with the service.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_simulation_grid(mut self, grid: GridSpec) -> Self {
        self.simulation_grid = grid;
        self
    }

    pub fn with_simulation_radius(mut self, radius_m: f64) -> Self {
        self.simulation_radius_m = radius_m;
        self
    }

    #[instrument(level = "debug", skip(self), fields(seed = ?self.seed))]
    pub fn build(self) -> Service {
        Service {
            seed: self.seed,
            interrupt: self.interrupt,
            simulation_grid: self.simulation_grid,
            simulation_radius_m: self.simulation_radius_m,
        }
    }
}
