use super::config::MutationSettings;
use super::geo::{BoundingBox, GeoPoint};
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
#[error("mutation probability must be between 0.0 and 1.0, got: {0}")]
pub struct ProbabilityOutOfRange(f64);

#[derive(Debug, thiserror::Error)]
#[error("{axis} sigma must be finite and non-negative, got: {value}")]
pub struct SigmaOutOfRange {
    pub axis: &'static str,
    pub value: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum MutagenError {
    #[error("Mutation probability error: {0}")]
    Probability(#[from] ProbabilityOutOfRange),
    #[error("Mutation sigma error: {0}")]
    Sigma(#[from] SigmaOutOfRange),
    #[error("Normal distribution error: {0}")]
    Normal(#[from] NormalError),
}

fn step(axis: &'static str, sigma_deg: f64) -> Result<Normal<f64>, MutagenError> {
    if !(sigma_deg.is_finite() && sigma_deg >= 0.0) {
        return Err(SigmaOutOfRange {
            axis,
            value: sigma_deg,
        }
        .into());
    }
    Ok(Normal::new(0.0, sigma_deg)?)
}

// ============================================================
// Mutagen
// ============================================================

/// Gaussian perturbation of whole points, followed by clamping into the search area.
#[derive(Debug, Clone, Copy)]
pub struct Mutagen {
    probability: f64,
    lat_step: Normal<f64>,
    lon_step: Normal<f64>,
}

impl Mutagen {
    /// With chance `probability` a point moves by `N(0, sigma_lat_deg)` in
    /// latitude and an independent `N(0, sigma_lon_deg)` in longitude.
    pub fn gaussian(
        probability: f64,
        sigma_lat_deg: f64,
        sigma_lon_deg: f64,
    ) -> Result<Self, MutagenError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ProbabilityOutOfRange(probability).into());
        }

        Ok(Self {
            probability,
            lat_step: step("latitude", sigma_lat_deg)?,
            lon_step: step("longitude", sigma_lon_deg)?,
        })
    }

    pub fn from_settings(settings: &MutationSettings) -> Result<Self, MutagenError> {
        Self::gaussian(
            settings.probability,
            settings.sigma_lat_deg,
            settings.sigma_lon_deg,
        )
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Mutates a single point; the result always lies inside `bounds`.
    pub fn mutate_point<R: Rng>(
        &self,
        rng: &mut R,
        point: GeoPoint,
        bounds: &BoundingBox,
    ) -> GeoPoint {
        if !rng.random_bool(self.probability) {
            return bounds.clamp(point);
        }

        let latitude = point.latitude + self.lat_step.sample(rng);
        let longitude = point.longitude + self.lon_step.sample(rng);

        bounds.clamp(GeoPoint::new(latitude, longitude))
    }

    /// Mutates every point of a camera layout in place.
    #[instrument(level = "debug", skip(self, rng, layout, bounds), fields(cameras = layout.len(), probability = self.probability))]
    pub fn mutate_layout<R: Rng>(&self, rng: &mut R, layout: &mut [GeoPoint], bounds: &BoundingBox) {
        for point in layout.iter_mut() {
            *point = self.mutate_point(rng, *point, bounds);
        }
    }
}
