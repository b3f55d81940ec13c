use super::ConfigError;
use super::geo::{BoundingBox, GeoPoint, METERS_PER_DEG_LAT};
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Upper bound on lattice points materialized before subsampling.
pub const MAX_LATTICE_POINTS: usize = 4_000_000;

/// How many existing cameras stand in for an empty grid.
pub const FALLBACK_SAMPLE_SIZE: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error(
        "LatticeTooLarge: spacing produces {lattice_points} lattice points, limit={limit}"
    )]
    LatticeTooLarge { lattice_points: f64, limit: usize },
}

/// Parameters for laying a sampling lattice over the camera area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Target distance between neighbouring lattice points, in meters.
    pub spacing_m: f64,
    /// Fraction of the camera bounding box span added on every side.
    pub margin_fraction: f64,
    /// Lattices larger than this are randomly thinned down to exactly this many points.
    pub max_points: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            spacing_m: 150.0,
            margin_fraction: 0.06,
            max_points: 6000,
        }
    }
}

impl GridSpec {
    /// Coarser lattice for quick single-camera checks.
    pub fn lightweight() -> Self {
        Self {
            spacing_m: 250.0,
            margin_fraction: 0.05,
            max_points: 1500,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("grid.spacing_m", self.spacing_m)?;
        ConfigError::non_negative("grid.margin_fraction", self.margin_fraction)?;
        ConfigError::positive("grid.max_points", self.max_points as f64)?;
        Ok(())
    }
}

/// Static set of sample points coverage is measured over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationGrid {
    points: Vec<GeoPoint>,
}

impl EvaluationGrid {
    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Lays a lattice over the margin-expanded bounding box of `cameras`.
    ///
    /// Points are emitted row by row (latitude outer, longitude inner). When the
    /// lattice exceeds `spec.max_points` a uniform sample without replacement is
    /// kept, in lattice order. No cameras yields an empty grid.
    #[instrument(level = "debug", skip(cameras, rng), fields(cameras = cameras.len(), spacing_m = spec.spacing_m, max_points = spec.max_points))]
    pub fn build<R: Rng>(
        cameras: &[GeoPoint],
        spec: &GridSpec,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        let Some(bbox) = BoundingBox::around(cameras) else {
            return Ok(Self::default());
        };
        let area = bbox.expand(spec.margin_fraction);

        let m_per_deg_lon = METERS_PER_DEG_LAT * area.mid_lat().to_radians().cos();
        let step_lat = spec.spacing_m / METERS_PER_DEG_LAT;
        let step_lon = spec.spacing_m / m_per_deg_lon.max(1e-6);

        let rows = ((area.max_lat - area.min_lat) / step_lat).floor() + 1.0;
        let cols = ((area.max_lon - area.min_lon) / step_lon).floor() + 1.0;
        let lattice_points = rows * cols;
        if lattice_points > MAX_LATTICE_POINTS as f64 {
            return Err(GridError::LatticeTooLarge {
                lattice_points,
                limit: MAX_LATTICE_POINTS,
            });
        }

        let (rows, cols) = (rows as usize, cols as usize);
        let mut points = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            let lat = (area.min_lat + i as f64 * step_lat).min(area.max_lat);
            for j in 0..cols {
                let lon = (area.min_lon + j as f64 * step_lon).min(area.max_lon);
                points.push(GeoPoint::new(lat, lon));
            }
        }

        if points.len() > spec.max_points {
            let mut keep = index::sample(rng, points.len(), spec.max_points).into_vec();
            keep.sort_unstable();
            points = keep.into_iter().map(|i| points[i]).collect();
        }

        tracing::debug!(points = points.len(), "Evaluation grid built");

        Ok(Self { points })
    }

    /// Stand-in grid made of (up to [`FALLBACK_SAMPLE_SIZE`]) randomly chosen cameras.
    pub fn sampled_from<R: Rng>(cameras: &[GeoPoint], rng: &mut R) -> Self {
        let amount = cameras.len().min(FALLBACK_SAMPLE_SIZE);
        let points = index::sample(rng, cameras.len(), amount)
            .into_iter()
            .map(|i| cameras[i])
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
