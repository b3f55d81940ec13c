use super::Error;
use super::models::{Interrupt, check_interrupt};
use crate::models::{
    BoundingBox, Breeder, CoverageConfig, CoverageMetrics, CoverageSurface, Crossover,
    Distribution, EvaluationGrid, GenerationStats, GeoPoint, Mutagen, Population, Selector,
    coverage_fitness, repair_spacing,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::instrument;

/// Result of a coverage improvement search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Proposed cameras, exactly `new_camera_count` of them for non-empty input.
    pub new_cameras: Vec<GeoPoint>,
    /// Best fitness seen in any generation, in `[0, 100]`.
    pub fitness: f64,
    /// Coverage of existing plus proposed cameras.
    pub metrics: Option<CoverageMetrics>,
    /// Coverage of the existing cameras alone, over the same grid.
    pub baseline: Option<CoverageMetrics>,
    pub history: Vec<GenerationStats>,
}

impl CoverageReport {
    fn empty() -> Self {
        Self {
            new_cameras: Vec::new(),
            fitness: 0.0,
            metrics: None,
            baseline: None,
            history: Vec::new(),
        }
    }

    /// Percentage points of total coverage gained over the baseline.
    pub fn coverage_gain(&self) -> Option<f64> {
        match (&self.metrics, &self.baseline) {
            (Some(after), Some(before)) => Some(after.coverage_total - before.coverage_total),
            _ => None,
        }
    }
}

/// Genetic search for a fixed number of new cameras maximizing coverage.
#[derive(Debug, Clone)]
pub struct CoverageSearch {
    config: CoverageConfig,
    crossover: Crossover,
    mutagen: Mutagen,
    breeder: Breeder,
    grid: Option<EvaluationGrid>,
    seeds: Vec<GeoPoint>,
    interrupt: Option<Interrupt>,
}

impl CoverageSearch {
    /// Validates `config` and prepares the genetic operators.
    pub fn new(config: CoverageConfig) -> Result<Self, Error> {
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
            grid: None,
            seeds: Vec::new(),
            interrupt: None,
        })
    }

    /// Measures coverage over `grid` instead of building one from the cameras.
    pub fn with_grid(mut self, grid: EvaluationGrid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Points initial layouts may start from, such as earlier blind spots.
    pub fn with_seed_points(mut self, seeds: Vec<GeoPoint>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    fn evaluation_grid<R: Rng>(
        &self,
        existing: &[GeoPoint],
        rng: &mut R,
    ) -> Result<Cow<'_, EvaluationGrid>, Error> {
        let grid = match &self.grid {
            Some(grid) => Cow::Borrowed(grid),
            None => Cow::Owned(EvaluationGrid::build(existing, &self.config.grid, rng)?),
        };

        if grid.is_empty() {
            tracing::warn!("Evaluation grid is empty, sampling existing cameras instead");
            return Ok(Cow::Owned(EvaluationGrid::sampled_from(existing, rng)));
        }

        Ok(grid)
    }

    #[instrument(level = "info", skip(self, existing, rng), fields(existing = existing.len(), new_cameras = self.config.new_camera_count, population_size = self.config.population_size, generations = self.config.generations))]
    pub fn run<R: Rng>(&self, existing: &[GeoPoint], rng: &mut R) -> Result<CoverageReport, Error> {
        let Some(bbox) = BoundingBox::around(existing) else {
            tracing::info!("No existing cameras, nothing to improve");
            return Ok(CoverageReport::empty());
        };

        tracing::info!("Coverage search started");

        let config = &self.config;
        let penalties = &config.penalties;
        let area = bbox.expand(config.margin_fraction);

        let grid = self.evaluation_grid(existing, rng)?;
        let surface = CoverageSurface::new(&grid, existing, config.coverage_radius_m);
        let baseline = surface.baseline();

        let mut unconverged_repairs = 0usize;
        let mut repair = |layout: &mut Vec<GeoPoint>, rng: &mut R| {
            if !penalties.penalize_proximity {
                return;
            }
            let outcome = repair_spacing(
                layout,
                existing,
                &area,
                penalties,
                config.repair_iterations,
                rng,
            );
            if !outcome.converged {
                unconverged_repairs += 1;
            }
        };

        let distribution = Distribution::seeded(self.seeds.clone(), config.seed_probability);
        let mut individuals =
            distribution.layouts(config.population_size, config.new_camera_count, &area, rng);
        for layout in individuals.iter_mut() {
            repair(layout, &mut *rng);
        }

        let score = |layout: &Vec<GeoPoint>| coverage_fitness(&surface, existing, layout, penalties);

        let mut best: Option<(Vec<GeoPoint>, f64)> = None;
        let mut keep_best = |population: &Population<Vec<GeoPoint>>| {
            if let Some((idx, fitness)) = population.best()
                && best.as_ref().is_none_or(|(_, f)| fitness > *f)
            {
                best = Some((population.individuals()[idx].clone(), fitness));
            }
        };

        let mut history = Vec::with_capacity(config.generations);

        for generation in 0..config.generations {
            check_interrupt(self.interrupt.as_ref(), generation)?;

            let population = Population::evaluate(individuals, score);
            keep_best(&population);

            let stats = population.stats(generation);
            tracing::debug!(
                generation,
                best_fitness = stats.best_fitness,
                mean_fitness = stats.mean_fitness,
                "Generation evaluated"
            );
            history.push(stats);

            individuals = self.breeder.next_generation(&population, rng, |lhs, rhs, rng| {
                let mut child = self.crossover.blend_layout(rng, lhs, rhs);
                self.mutagen.mutate_layout(rng, &mut child, &area);
                for point in child.iter_mut() {
                    *point = area.clamp(*point);
                }
                repair(&mut child, rng);
                child
            })?;
        }

        check_interrupt(self.interrupt.as_ref(), config.generations)?;
        keep_best(&Population::evaluate(individuals, score));

        if unconverged_repairs > 0 {
            tracing::warn!(
                unconverged_repairs,
                budget = config.repair_iterations,
                "Spacing repair ran out of iterations for some layouts"
            );
        }

        let Some((new_cameras, fitness)) = best else {
            return Ok(CoverageReport::empty());
        };
        let metrics = surface.metrics_with(&new_cameras);

        tracing::info!(
            fitness,
            coverage_before = baseline.coverage_total,
            coverage_after = metrics.coverage_total,
            "Coverage search finished"
        );

        Ok(CoverageReport {
            new_cameras,
            fitness,
            metrics: Some(metrics),
            baseline: Some(baseline),
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoveragePenalties, GridSpec};
    use rand::{SeedableRng, rngs::StdRng};

    fn small_config() -> CoverageConfig {
        CoverageConfig {
            new_camera_count: 2,
            population_size: 20,
            generations: 8,
            grid: GridSpec {
                spacing_m: 100.0,
                ..GridSpec::default()
            },
            ..CoverageConfig::default()
        }
    }

    fn cameras() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(19.430, -99.140),
            GeoPoint::new(19.430, -99.130),
            GeoPoint::new(19.440, -99.140),
            GeoPoint::new(19.440, -99.130),
        ]
    }

    #[test]
    fn it_returns_an_empty_report_without_cameras() {
        let mut rng = StdRng::seed_from_u64(42);
        let report = CoverageSearch::new(small_config())
            .unwrap()
            .run(&[], &mut rng)
            .unwrap();

        assert!(report.new_cameras.is_empty());
        assert_eq!(report.fitness, 0.0);
        assert_eq!(report.metrics, None);
        assert_eq!(report.coverage_gain(), None);
    }

    #[test]
    fn it_proposes_the_requested_number_of_cameras() {
        let mut rng = StdRng::seed_from_u64(42);
        let cameras = cameras();
        let report = CoverageSearch::new(small_config())
            .unwrap()
            .run(&cameras, &mut rng)
            .unwrap();

        let area = BoundingBox::around(&cameras).unwrap().expand(0.12);

        assert_eq!(report.new_cameras.len(), 2);
        assert!(report.new_cameras.iter().all(|p| area.contains(p)));
        assert!((0.0..=100.0).contains(&report.fitness));
        assert_eq!(report.history.len(), 8);
        assert!(report.coverage_gain().unwrap() >= 0.0);
    }

    #[test]
    fn it_never_loses_the_best_layout() {
        let mut rng = StdRng::seed_from_u64(42);
        let report = CoverageSearch::new(small_config())
            .unwrap()
            .run(&cameras(), &mut rng)
            .unwrap();

        let best_seen = report
            .history
            .iter()
            .map(|s| s.best_fitness)
            .fold(f64::MIN, f64::max);

        assert!(report.fitness >= best_seen);
    }

    #[test]
    fn it_uses_a_precomputed_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        let cameras = cameras();
        let grid = EvaluationGrid::from_points(vec![GeoPoint::new(19.435, -99.135)]);

        let config = CoverageConfig {
            new_camera_count: 1,
            penalties: CoveragePenalties {
                penalize_proximity: false,
                ..CoveragePenalties::default()
            },
            ..small_config()
        };
        let report = CoverageSearch::new(config)
            .unwrap()
            .with_grid(grid)
            .run(&cameras, &mut rng)
            .unwrap();

        // The single grid point is ~700 m from every camera
        assert_eq!(report.baseline.unwrap().coverage_total, 0.0);
        assert_eq!(report.metrics.unwrap().coverage_total, report.fitness);
    }

    #[test]
    fn it_falls_back_to_cameras_for_an_empty_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        let report = CoverageSearch::new(small_config())
            .unwrap()
            .with_grid(EvaluationGrid::default())
            .run(&cameras(), &mut rng)
            .unwrap();

        // Every fallback point is an existing camera and therefore covered
        assert_eq!(report.baseline.unwrap().coverage_total, 100.0);
    }

    #[test]
    fn it_stops_when_interrupted() {
        let mut rng = StdRng::seed_from_u64(42);
        let interrupt = Interrupt::new();
        interrupt.interrupt();

        let result = CoverageSearch::new(small_config())
            .unwrap()
            .with_interrupt(interrupt)
            .run(&cameras(), &mut rng);

        assert!(matches!(result, Err(Error::Interrupted { .. })));
    }
}
