use super::geo::GeoPoint;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Samples one coordinate from the parents' interval extended by `alpha` of its width on both sides.
fn blend_coordinate<R: Rng>(rng: &mut R, lhs: f64, rhs: f64, alpha: f64) -> f64 {
    let (lo, hi) = if lhs <= rhs { (lhs, rhs) } else { (rhs, lhs) };
    let extension = alpha * (hi - lo);

    // Inclusive so identical parents yield their shared value
    rng.random_range((lo - extension)..=(hi + extension))
}

/// Blend crossover (BLX-α) for geographic individuals.
///
/// Each coordinate of the child is drawn uniformly from the interval spanned by
/// the two parents, widened by `alpha` times its width on either side. With
/// `alpha = 0` children always lie between their parents; larger values let
/// the search step outside of the region the parents already cover.
///
/// Children are not clamped here. Keeping them inside the search area is the
/// job of the mutation step and, for camera layouts, of repair.
///
/// # Examples
///
/// ```rust
/// use coverage_ga::models::Crossover;
///
/// let blend = Crossover::blend(0.5)?;
/// assert_eq!(blend.alpha(), 0.5);
///
/// assert!(Crossover::blend(-0.1).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossover {
    alpha: f64,
}

/// Error returned when the blend extension is negative or not a number.
#[derive(Debug, thiserror::Error)]
#[error("blend crossover alpha must be a finite value >= 0.0, got {0}")]
pub struct AlphaOutOfRange(f64);

impl Crossover {
    /// Creates a BLX-α crossover.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaOutOfRange`] when `alpha` is negative, infinite or NaN.
    pub fn blend(alpha: f64) -> Result<Self, AlphaOutOfRange> {
        if !(alpha.is_finite() && alpha >= 0.0) {
            return Err(AlphaOutOfRange(alpha));
        }

        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Child of two single-point individuals.
    pub fn blend_point<R: Rng>(&self, rng: &mut R, lhs: &GeoPoint, rhs: &GeoPoint) -> GeoPoint {
        GeoPoint::new(
            blend_coordinate(rng, lhs.latitude, rhs.latitude, self.alpha),
            blend_coordinate(rng, lhs.longitude, rhs.longitude, self.alpha),
        )
    }

    /// Child of two camera layouts, blended point by point in slot order.
    ///
    /// Both parents carry the same number of cameras; a longer parent's extra
    /// points are ignored.
    #[instrument(level = "debug", skip(self, rng, lhs, rhs), fields(cameras = lhs.len(), alpha = self.alpha))]
    pub fn blend_layout<R: Rng>(
        &self,
        rng: &mut R,
        lhs: &[GeoPoint],
        rhs: &[GeoPoint],
    ) -> Vec<GeoPoint> {
        lhs.iter()
            .zip(rhs.iter())
            .map(|(a, b)| self.blend_point(rng, a, b))
            .collect()
    }
}
