use super::Error;
use super::models::{Interrupt, check_interrupt};
use crate::models::{
    BlindSpotConfig, BlindSpotLandscape, BoundingBox, Breeder, Crossover, Distribution,
    GenerationStats, GeoPoint, Mutagen, Population, Selector, select_diverse,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A location poorly covered by the existing cameras.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlindSpot {
    pub location: GeoPoint,
    /// Blind-spot score in `[0, 1]`.
    pub fitness: f64,
}

/// Result of a blind-spot search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlindSpotReport {
    /// Best first, mutually separated where the population allowed it.
    pub blind_spots: Vec<BlindSpot>,
    /// One entry per evolved generation.
    pub history: Vec<GenerationStats>,
}

impl BlindSpotReport {
    pub fn locations(&self) -> Vec<GeoPoint> {
        self.blind_spots.iter().map(|spot| spot.location).collect()
    }
}

/// Genetic search over single points for the worst-covered locations.
#[derive(Debug, Clone)]
pub struct BlindSpotSearch {
    config: BlindSpotConfig,
    crossover: Crossover,
    mutagen: Mutagen,
    breeder: Breeder,
    interrupt: Option<Interrupt>,
}

impl BlindSpotSearch {
    /// Validates `config` and prepares the genetic operators.
    pub fn new(config: BlindSpotConfig) -> Result<Self, Error> {
        config.validate()?;

        let crossover = Crossover::blend(config.blend_alpha)?;
        let mutagen = Mutagen::from_settings(&config.mutation)?;
        let breeder = Breeder::new(
            Selector::tournament(config.tournament_size)?,
            config.elite_count,
        );

        Ok(Self {
            config,
            crossover,
            mutagen,
            breeder,
            interrupt: None,
        })
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn config(&self) -> &BlindSpotConfig {
        &self.config
    }

    #[instrument(level = "info", skip(self, cameras, rng), fields(cameras = cameras.len(), population_size = self.config.population_size, generations = self.config.generations))]
    pub fn run<R: Rng>(&self, cameras: &[GeoPoint], rng: &mut R) -> Result<BlindSpotReport, Error> {
        let Some(bbox) = BoundingBox::around(cameras) else {
            tracing::info!("No cameras, nothing to search");
            return Ok(BlindSpotReport::default());
        };

        tracing::info!("Blind-spot search started");

        let config = &self.config;
        let area = bbox.expand(config.margin_fraction);
        let landscape = BlindSpotLandscape::new(cameras, &config.thresholds);

        let mut individuals = Distribution::uniform().points(config.population_size, &area, rng);
        let mut history = Vec::with_capacity(config.generations);

        for generation in 0..config.generations {
            check_interrupt(self.interrupt.as_ref(), generation)?;

            let population = Population::evaluate(individuals, |p| landscape.fitness(p));
            let stats = population.stats(generation);
            tracing::debug!(
                generation,
                best_fitness = stats.best_fitness,
                mean_fitness = stats.mean_fitness,
                "Generation evaluated"
            );
            history.push(stats);

            // Children are only clamped into the expanded area, by mutation
            individuals = self.breeder.next_generation(&population, rng, |lhs, rhs, rng| {
                let child = self.crossover.blend_point(rng, lhs, rhs);
                self.mutagen.mutate_point(rng, child, &area)
            })?;
        }

        check_interrupt(self.interrupt.as_ref(), config.generations)?;

        let ranked = Population::evaluate(individuals, |p| landscape.fitness(p)).into_ranked();
        let points: Vec<GeoPoint> = ranked.iter().map(|(p, _)| *p).collect();

        let mut blind_spots: Vec<BlindSpot> =
            select_diverse(&points, config.min_separation_m, config.result_count)
                .into_iter()
                .map(|idx| BlindSpot {
                    location: ranked[idx].0,
                    fitness: ranked[idx].1,
                })
                .collect();

        // Backfilled picks may outrank separated ones
        blind_spots.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        tracing::info!(
            found = blind_spots.len(),
            best_fitness = blind_spots.first().map(|s| s.fitness),
            "Blind-spot search finished"
        );

        Ok(BlindSpotReport {
            blind_spots,
            history,
        })
    }
}
