use super::geo::{GeoPoint, distance};
use super::grid::{EvaluationGrid, GridError, GridSpec};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Share of grid points per coverage level, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    /// Points seen by at least one camera (`100 - no_coverage`).
    pub coverage_total: f64,
    pub no_coverage: f64,
    pub level_1: f64,
    pub level_2: f64,
    pub level_3_plus: f64,
}

impl Default for CoverageMetrics {
    fn default() -> Self {
        Self {
            coverage_total: 0.0,
            no_coverage: 100.0,
            level_1: 0.0,
            level_2: 0.0,
            level_3_plus: 0.0,
        }
    }
}

impl CoverageMetrics {
    /// Buckets per-point camera counts into coverage levels.
    pub(crate) fn from_counts(counts: impl IntoIterator<Item = u32>) -> Self {
        let mut buckets = [0usize; 4];
        let mut n = 0usize;
        for count in counts {
            buckets[(count as usize).min(3)] += 1;
            n += 1;
        }

        if n == 0 {
            return Self::default();
        }

        let pct = |c: usize| c as f64 / n as f64 * 100.0;
        let no_coverage = pct(buckets[0]);

        Self {
            coverage_total: 100.0 - no_coverage,
            no_coverage,
            level_1: pct(buckets[1]),
            level_2: pct(buckets[2]),
            level_3_plus: pct(buckets[3]),
        }
    }
}

/// Number of `cameras` within `radius_m` (inclusive) of `point`.
pub fn cameras_in_range(point: &GeoPoint, cameras: &[GeoPoint], radius_m: f64) -> u32 {
    cameras
        .iter()
        .filter(|camera| distance(point, camera) <= radius_m)
        .count() as u32
}

/// Coverage levels of `grid` under `cameras`.
#[instrument(level = "debug", skip(grid, cameras), fields(grid_points = grid.len(), cameras = cameras.len(), radius_m = radius_m))]
pub fn coverage_metrics(grid: &EvaluationGrid, cameras: &[GeoPoint], radius_m: f64) -> CoverageMetrics {
    let counts: Vec<u32> = grid
        .points()
        .par_iter()
        .map(|point| cameras_in_range(point, cameras, radius_m))
        .collect();

    CoverageMetrics::from_counts(counts)
}

/// A grid with the contribution of the existing cameras already counted.
///
/// Scoring a candidate set then only needs distances from the grid to the
/// candidates; the resulting metrics are identical to recounting every camera.
#[derive(Debug)]
pub struct CoverageSurface<'a> {
    grid: &'a EvaluationGrid,
    radius_m: f64,
    base_counts: Vec<u32>,
}

impl<'a> CoverageSurface<'a> {
    #[instrument(level = "debug", skip(grid, existing), fields(grid_points = grid.len(), existing = existing.len(), radius_m = radius_m))]
    pub fn new(grid: &'a EvaluationGrid, existing: &[GeoPoint], radius_m: f64) -> Self {
        let base_counts = grid
            .points()
            .par_iter()
            .map(|point| cameras_in_range(point, existing, radius_m))
            .collect();

        Self {
            grid,
            radius_m,
            base_counts,
        }
    }

    pub fn grid(&self) -> &EvaluationGrid {
        self.grid
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Metrics for the existing cameras alone.
    pub fn baseline(&self) -> CoverageMetrics {
        CoverageMetrics::from_counts(self.base_counts.iter().copied())
    }

    /// Metrics for the existing cameras plus `extra`.
    pub fn metrics_with(&self, extra: &[GeoPoint]) -> CoverageMetrics {
        CoverageMetrics::from_counts(
            self.grid
                .points()
                .iter()
                .zip(self.base_counts.iter())
                .map(|(point, base)| base + cameras_in_range(point, extra, self.radius_m)),
        )
    }
}

/// Coverage after adding one proposed camera, and the change it made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSimulation {
    /// Total coverage with the proposed camera, rounded to two decimals.
    pub coverage: f64,
    /// Change in total coverage, rounded to two decimals.
    pub delta: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// What-if check for a single proposed camera without running a search.
#[instrument(level = "info", skip(existing, rng), fields(existing = existing.len(), proposed = ?proposed, radius_m = radius_m))]
pub fn simulate_camera<R: Rng>(
    existing: &[GeoPoint],
    proposed: GeoPoint,
    spec: &GridSpec,
    radius_m: f64,
    rng: &mut R,
) -> Result<CameraSimulation, GridError> {
    if existing.is_empty() {
        return Ok(CameraSimulation {
            coverage: 0.0,
            delta: 0.0,
        });
    }

    let grid = EvaluationGrid::build(existing, spec, rng)?;
    let surface = CoverageSurface::new(&grid, existing, radius_m);

    let before = surface.baseline().coverage_total;
    let after = surface.metrics_with(&[proposed]).coverage_total;

    Ok(CameraSimulation {
        coverage: round2(after),
        delta: round2(after - before),
    })
}
