use super::Error;
use super::blind_spots::{BlindSpot, BlindSpotReport, BlindSpotSearch};
use super::coverage::{CoverageReport, CoverageSearch};
use super::models::Interrupt;
use super::service_builder::ServiceBuilder;
use crate::models::{
    BlindSpotConfig, CameraSimulation, ConfigError, CoverageConfig, GridSpec, Located, normalize,
    simulate_camera,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Coverage search seeded with the blind spots found before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeededCoverageReport {
    pub seeds: Vec<BlindSpot>,
    pub coverage: CoverageReport,
}

/// Async entry point for camera planning.
///
/// Caller records are normalized to points up front and every search runs on
/// tokio's blocking pool, so the runtime stays responsive while a search evolves.
pub struct Service {
    pub(super) seed: Option<u64>,
    pub(super) interrupt: Interrupt,
    pub(super) simulation_grid: GridSpec,
    pub(super) simulation_radius_m: f64,
}

impl Service {
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Handle that stops every running and future search of this service until reset.
    pub fn interrupt_handle(&self) -> Interrupt {
        self.interrupt.clone()
    }

    pub fn interrupt(&self) {
        self.interrupt.interrupt();
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    #[instrument(level = "info", skip(self, cameras, config), fields(cameras = cameras.len()))]
    pub async fn blind_spots<L: Located>(
        &self,
        cameras: &[L],
        config: BlindSpotConfig,
    ) -> Result<BlindSpotReport, Error> {
        let cameras = normalize(cameras);
        let search = BlindSpotSearch::new(config)?.with_interrupt(self.interrupt.clone());
        let mut rng = self.rng();

        tokio::task::spawn_blocking(move || search.run(&cameras, &mut rng)).await?
    }

    #[instrument(level = "info", skip(self, cameras, config), fields(cameras = cameras.len()))]
    pub async fn improve_coverage<L: Located>(
        &self,
        cameras: &[L],
        config: CoverageConfig,
    ) -> Result<CoverageReport, Error> {
        let cameras = normalize(cameras);
        let search = CoverageSearch::new(config)?.with_interrupt(self.interrupt.clone());
        let mut rng = self.rng();

        tokio::task::spawn_blocking(move || search.run(&cameras, &mut rng)).await?
    }

    /// Finds blind spots first and starts the coverage search from the best
    /// `seed_count` of them (at least one).
    #[instrument(level = "info", skip(self, cameras, blind_spot_config, coverage_config), fields(cameras = cameras.len(), seed_count = seed_count))]
    pub async fn improve_coverage_seeded<L: Located>(
        &self,
        cameras: &[L],
        blind_spot_config: BlindSpotConfig,
        coverage_config: CoverageConfig,
        seed_count: usize,
    ) -> Result<SeededCoverageReport, Error> {
        let cameras = normalize(cameras);
        let blind_spot_search =
            BlindSpotSearch::new(blind_spot_config)?.with_interrupt(self.interrupt.clone());
        let coverage_search =
            CoverageSearch::new(coverage_config)?.with_interrupt(self.interrupt.clone());
        let mut rng = self.rng();

        tokio::task::spawn_blocking(move || -> Result<SeededCoverageReport, Error> {
            let mut seeds = blind_spot_search.run(&cameras, &mut rng)?.blind_spots;
            seeds.truncate(seed_count.max(1));

            tracing::info!(seeds = seeds.len(), "Seeding coverage search with blind spots");

            let coverage = coverage_search
                .with_seed_points(seeds.iter().map(|s| s.location).collect())
                .run(&cameras, &mut rng)?;

            Ok(SeededCoverageReport { seeds, coverage })
        })
        .await?
    }

    /// Coverage with and without one proposed camera, on the service's lightweight grid.
    #[instrument(level = "info", skip(self, cameras, proposed), fields(cameras = cameras.len()))]
    pub async fn simulate_camera<L: Located, P: Located>(
        &self,
        cameras: &[L],
        proposed: P,
    ) -> Result<CameraSimulation, Error> {
        let cameras = normalize(cameras);
        let proposed = proposed.location();
        let grid = self.simulation_grid.clone();
        grid.validate()?;
        let radius_m = self.simulation_radius_m;
        ConfigError::non_negative("simulation_radius_m", radius_m)?;
        let mut rng = self.rng();

        tokio::task::spawn_blocking(move || {
            simulate_camera(&cameras, proposed, &grid, radius_m, &mut rng).map_err(Error::from)
        })
        .await?
    }
}
