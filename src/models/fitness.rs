//! Fitness functions for both searches.
//!
//! Blind-spot candidates are single points scored in `[0, 1]`; coverage
//! candidates are whole sets of new cameras scored in `[0, 100]`. Neither
//! function draws randomness or looks at sibling individuals, so populations
//! can be scored in parallel.

use super::ConfigError;
use super::geo::{BoundingBox, GeoPoint, centroid, distance, nearest_distance};
use super::metrics::CoverageSurface;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Score ceiling for points that are already inside some camera's radius.
const COVERED_SCORE_CAP: f64 = 0.05;
const GAP_WEIGHT: f64 = 0.70;
const INTERIORITY_WEIGHT: f64 = 0.30;
const EXTRAPOLATION_WEIGHT: f64 = 0.70;
const EXTRAPOLATION_DAMPING: f64 = 0.5;
const BORDER_PENALTY: f64 = 0.15;
/// Share of the spacing weight applied to new-to-existing violations.
const EXISTING_SPACING_SHARE: f64 = 0.75;

/// Tunable distances of the blind-spot model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlindSpotThresholds {
    /// Points within this distance of a camera count as covered.
    pub coverage_radius_m: f64,
    /// Gap distance at which the gap reward saturates.
    pub max_gap_m: f64,
    /// Distance from the camera centroid at which the extrapolation penalty saturates.
    pub max_extrapolation_m: f64,
    /// Number of nearest cameras averaged for the interiority term.
    pub neighbors: usize,
    /// Width of the penalized band along the camera bounding box, as a fraction of its span.
    pub border_fraction: f64,
}

impl Default for BlindSpotThresholds {
    fn default() -> Self {
        Self {
            coverage_radius_m: 80.0,
            max_gap_m: 350.0,
            max_extrapolation_m: 900.0,
            neighbors: 4,
            border_fraction: 0.10,
        }
    }
}

impl BlindSpotThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("thresholds.coverage_radius_m", self.coverage_radius_m)?;
        ConfigError::non_negative("thresholds.max_gap_m", self.max_gap_m)?;
        ConfigError::non_negative("thresholds.max_extrapolation_m", self.max_extrapolation_m)?;
        ConfigError::non_negative("thresholds.border_fraction", self.border_fraction)?;
        Ok(())
    }
}

/// Everything about the camera layout the blind-spot score needs, computed once.
#[derive(Debug)]
pub struct BlindSpotLandscape<'a> {
    cameras: &'a [GeoPoint],
    bbox: Option<BoundingBox>,
    centroid: Option<GeoPoint>,
    thresholds: &'a BlindSpotThresholds,
}

impl<'a> BlindSpotLandscape<'a> {
    pub fn new(cameras: &'a [GeoPoint], thresholds: &'a BlindSpotThresholds) -> Self {
        Self {
            cameras,
            bbox: BoundingBox::around(cameras),
            centroid: centroid(cameras),
            thresholds,
        }
    }

    /// Scores `point` in `[0, 1]`; higher means a more convincing blind spot.
    pub fn fitness(&self, point: &GeoPoint) -> f64 {
        let (Some(dmin), Some(bbox), Some(center)) = (
            nearest_distance(point, self.cameras),
            self.bbox,
            self.centroid,
        ) else {
            return 0.0;
        };
        let t = self.thresholds;

        // Covered points keep a small slope so dense layouts still have a gradient
        if dmin <= t.coverage_radius_m {
            return (COVERED_SCORE_CAP * dmin / t.coverage_radius_m.max(1e-9))
                .clamp(0.0, COVERED_SCORE_CAP);
        }

        let max_gap = t.max_gap_m.max(1e-9);
        let gap = (dmin.min(t.max_gap_m) / max_gap).clamp(0.0, 1.0);

        let interiority =
            (1.0 - (self.mean_neighbor_distance(point) / max_gap).min(1.0)).clamp(0.0, 1.0);

        let from_center = distance(point, &center);
        let extrapolation = if from_center > t.max_gap_m {
            ((from_center - t.max_gap_m) / (t.max_extrapolation_m - t.max_gap_m).max(1e-9))
                .clamp(0.0, 1.0)
        } else {
            0.0
        } * EXTRAPOLATION_DAMPING;

        let border = if bbox.near_edge(point, t.border_fraction) {
            BORDER_PENALTY
        } else {
            0.0
        };

        (GAP_WEIGHT * gap + INTERIORITY_WEIGHT * interiority
            - EXTRAPOLATION_WEIGHT * extrapolation
            - border)
            .clamp(0.0, 1.0)
    }

    fn mean_neighbor_distance(&self, point: &GeoPoint) -> f64 {
        let mut distances: Vec<f64> = self.cameras.iter().map(|c| distance(point, c)).collect();
        distances.sort_unstable_by(|a, b| a.total_cmp(b));

        let k = self.thresholds.neighbors.clamp(1, distances.len());
        distances[..k].iter().sum::<f64>() / k as f64
    }
}

/// Blind-spot score of a single point; see [`BlindSpotLandscape::fitness`].
pub fn blind_spot_fitness(
    point: &GeoPoint,
    cameras: &[GeoPoint],
    thresholds: &BlindSpotThresholds,
) -> f64 {
    BlindSpotLandscape::new(cameras, thresholds).fitness(point)
}

/// Penalty switches and weights of the coverage score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoveragePenalties {
    pub penalize_over_coverage: bool,
    /// Subtracted per percent of grid points seen by three or more cameras.
    pub over_coverage_weight: f64,
    /// Also gates the repair step of the coverage search.
    pub penalize_proximity: bool,
    pub min_distance_between_new_m: f64,
    /// Zero disables the new-to-existing check.
    pub min_distance_to_existing_m: f64,
    pub proximity_weight: f64,
}

impl Default for CoveragePenalties {
    fn default() -> Self {
        Self {
            penalize_over_coverage: true,
            over_coverage_weight: 0.15,
            penalize_proximity: true,
            min_distance_between_new_m: 180.0,
            min_distance_to_existing_m: 60.0,
            proximity_weight: 10.0,
        }
    }
}

impl CoveragePenalties {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("penalties.over_coverage_weight", self.over_coverage_weight)?;
        ConfigError::non_negative(
            "penalties.min_distance_between_new_m",
            self.min_distance_between_new_m,
        )?;
        ConfigError::non_negative(
            "penalties.min_distance_to_existing_m",
            self.min_distance_to_existing_m,
        )?;
        ConfigError::non_negative("penalties.proximity_weight", self.proximity_weight)?;
        Ok(())
    }
}

/// Total penalty for candidates crowding each other or the existing cameras.
#[instrument(level = "debug", skip_all, fields(candidates = candidates.len()))]
pub fn spacing_penalty(
    candidates: &[GeoPoint],
    existing: &[GeoPoint],
    penalties: &CoveragePenalties,
) -> f64 {
    let weight = penalties.proximity_weight;
    let min_new = penalties.min_distance_between_new_m;
    let min_existing = penalties.min_distance_to_existing_m;
    let mut penalty = 0.0;

    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            let d = distance(a, b);
            if d < min_new {
                penalty += weight * (1.0 - d / min_new.max(1e-6));
            }
        }
    }

    if min_existing > 0.0 {
        for candidate in candidates {
            if let Some(d) = nearest_distance(candidate, existing)
                && d < min_existing
            {
                penalty += EXISTING_SPACING_SHARE * weight * (1.0 - d / min_existing.max(1e-6));
            }
        }
    }

    penalty
}

/// Scores a set of new cameras in `[0, 100]`: coverage reached minus penalties.
pub fn coverage_fitness(
    surface: &CoverageSurface<'_>,
    existing: &[GeoPoint],
    candidates: &[GeoPoint],
    penalties: &CoveragePenalties,
) -> f64 {
    let metrics = surface.metrics_with(candidates);
    let mut score = metrics.coverage_total;

    if penalties.penalize_over_coverage {
        score -= penalties.over_coverage_weight * metrics.level_3_plus;
    }

    if penalties.penalize_proximity && !candidates.is_empty() {
        score -= spacing_penalty(candidates, existing, penalties);
    }

    score.clamp(0.0, 100.0)
}
