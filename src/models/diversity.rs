use super::geo::{GeoPoint, distance};
use tracing::instrument;

/// Picks up to `cap` mutually separated points from a best-first ranking.
///
/// Points are accepted in ranking order unless they lie closer than
/// `min_separation_m` to an already accepted one. If that leaves fewer than
/// `cap`, the best rejected points are appended regardless of separation, so
/// the result always holds exactly `min(cap, ranked.len())` entries.
///
/// Returns indices into `ranked`: first the separated picks in ranking order,
/// then the backfill in ranking order.
#[instrument(level = "debug", skip(ranked), fields(candidates = ranked.len()))]
pub fn select_diverse(ranked: &[GeoPoint], min_separation_m: f64, cap: usize) -> Vec<usize> {
    let mut picked: Vec<usize> = Vec::with_capacity(cap.min(ranked.len()));
    let mut taken = vec![false; ranked.len()];

    for (idx, point) in ranked.iter().enumerate() {
        if picked.len() >= cap {
            break;
        }

        let separated = picked
            .iter()
            .all(|&p| distance(point, &ranked[p]) >= min_separation_m);

        if separated {
            picked.push(idx);
            taken[idx] = true;
        }
    }

    let separated = picked.len();

    for idx in 0..ranked.len() {
        if picked.len() >= cap {
            break;
        }
        if !taken[idx] {
            picked.push(idx);
            taken[idx] = true;
        }
    }

    if picked.len() > separated {
        tracing::debug!(
            separated,
            backfilled = picked.len() - separated,
            "Not enough separated candidates, backfilled by rank"
        );
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Points on the equator spaced `step_deg` apart (0.001 deg is ~111 m).
    fn line(n: usize, step_deg: f64) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(0.0, i as f64 * step_deg))
            .collect()
    }

    #[test]
    fn it_skips_points_that_are_too_close() {
        // 0 m, 111 m, 222 m, 333 m, 444 m
        let ranked = line(5, 0.001);

        let picked = select_diverse(&ranked, 200.0, 3);

        assert_eq!(picked, vec![0, 2, 4]);
    }

    #[test]
    fn it_stops_at_the_cap() {
        let ranked = line(10, 0.01);
        assert_eq!(select_diverse(&ranked, 100.0, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn it_backfills_with_the_best_remaining() {
        let ranked = vec![GeoPoint::new(0.0, 0.0); 4];

        let picked = select_diverse(&ranked, 1_000.0, 3);

        assert_eq!(picked, vec![0, 1, 2]);
    }

    #[test]
    fn it_backfills_duplicates_by_position() {
        // Identical coordinates must not collapse into one entry
        let p = GeoPoint::new(1.0, 1.0);
        let ranked = vec![p, p, p];

        assert_eq!(select_diverse(&ranked, 10.0, 10).len(), 3);
    }

    #[test]
    fn it_returns_nothing_for_nothing() {
        assert!(select_diverse(&[], 100.0, 5).is_empty());
        assert!(select_diverse(&line(3, 0.01), 100.0, 0).is_empty());
    }

    #[test]
    fn it_keeps_separated_picks_ahead_of_backfill() {
        // 0 m, 111 m, 1111 m
        let ranked = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 0.01),
        ];

        assert_eq!(select_diverse(&ranked, 200.0, 3), vec![0, 2, 1]);
    }
}
