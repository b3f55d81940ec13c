use super::geo::{BoundingBox, GeoPoint};
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// How the first generation is spread over the search area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    /// Every coordinate drawn uniformly from the area.
    #[default]
    Uniform,
    /// With chance `probability` a layout starts from randomly chosen seed points
    /// (clamped into the area) and is filled up uniformly; otherwise it is uniform.
    Seeded {
        seeds: Vec<GeoPoint>,
        probability: f64,
    },
}

impl Distribution {
    pub fn uniform() -> Self {
        Self::Uniform
    }

    /// Falls back to [`Distribution::Uniform`] when there are no seeds.
    pub fn seeded(seeds: Vec<GeoPoint>, probability: f64) -> Self {
        if seeds.is_empty() {
            return Self::Uniform;
        }
        Self::Seeded { seeds, probability }
    }

    /// `population_size` single-point individuals.
    pub fn points<R: Rng>(
        &self,
        population_size: usize,
        bounds: &BoundingBox,
        rng: &mut R,
    ) -> Vec<GeoPoint> {
        (0..population_size).map(|_| bounds.sample(rng)).collect()
    }

    /// `population_size` layouts of exactly `cameras` points each.
    #[instrument(level = "debug", skip(self, bounds, rng), fields(seeded = matches!(self, Self::Seeded { .. })))]
    pub fn layouts<R: Rng>(
        &self,
        population_size: usize,
        cameras: usize,
        bounds: &BoundingBox,
        rng: &mut R,
    ) -> Vec<Vec<GeoPoint>> {
        (0..population_size)
            .map(|_| match self {
                Self::Seeded { seeds, probability } if rng.random::<f64>() < *probability => {
                    seeded_layout(seeds, cameras, bounds, rng)
                }
                _ => random_layout(cameras, bounds, rng),
            })
            .collect()
    }
}

fn random_layout<R: Rng>(cameras: usize, bounds: &BoundingBox, rng: &mut R) -> Vec<GeoPoint> {
    (0..cameras).map(|_| bounds.sample(rng)).collect()
}

fn seeded_layout<R: Rng>(
    seeds: &[GeoPoint],
    cameras: usize,
    bounds: &BoundingBox,
    rng: &mut R,
) -> Vec<GeoPoint> {
    let take = seeds.len().min(cameras);
    let mut layout: Vec<GeoPoint> = index::sample(rng, seeds.len(), take)
        .into_iter()
        .map(|i| bounds.clamp(seeds[i]))
        .collect();

    while layout.len() < cameras {
        layout.push(bounds.sample(rng));
    }

    layout
}
