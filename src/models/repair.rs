use super::fitness::CoveragePenalties;
use super::geo::{BoundingBox, GeoPoint, distance, nearest_distance};
use rand::Rng;
use tracing::instrument;

/// How a repair pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOutcome {
    /// Iterations spent, at most the configured budget.
    pub iterations: usize,
    /// False when the budget ran out while violations were still being fixed.
    pub converged: bool,
}

/// Best-effort fix of spacing violations in a camera layout.
///
/// Each iteration first relocates every point closer than
/// `min_distance_to_existing_m` to an existing camera (skipped when that
/// distance is zero), then, for every pair `i < j` closer than
/// `min_distance_between_new_m`, relocates point `j`. Relocated points are
/// drawn uniformly from `bounds`. Iteration stops as soon as a pass changes
/// nothing or the budget is spent; every point is clamped into `bounds` on the
/// way out.
#[instrument(level = "debug", skip(layout, existing, bounds, penalties, rng), fields(cameras = layout.len(), max_iterations = max_iterations))]
pub fn repair_spacing<R: Rng>(
    layout: &mut [GeoPoint],
    existing: &[GeoPoint],
    bounds: &BoundingBox,
    penalties: &CoveragePenalties,
    max_iterations: usize,
    rng: &mut R,
) -> RepairOutcome {
    let min_new = penalties.min_distance_between_new_m;
    let min_existing = penalties.min_distance_to_existing_m;

    let mut outcome = RepairOutcome {
        iterations: 0,
        converged: false,
    };

    while outcome.iterations < max_iterations {
        outcome.iterations += 1;
        let mut changed = false;

        if min_existing > 0.0 {
            for point in layout.iter_mut() {
                if nearest_distance(point, existing).is_some_and(|d| d < min_existing) {
                    *point = bounds.sample(rng);
                    changed = true;
                }
            }
        }

        for i in 0..layout.len() {
            for j in (i + 1)..layout.len() {
                if distance(&layout[i], &layout[j]) < min_new {
                    layout[j] = bounds.sample(rng);
                    changed = true;
                }
            }
        }

        if !changed {
            outcome.converged = true;
            break;
        }
    }

    for point in layout.iter_mut() {
        *point = bounds.clamp(*point);
    }

    if !outcome.converged {
        tracing::debug!(
            iterations = outcome.iterations,
            "Spacing repair ran out of iterations"
        );
    }

    outcome
}
