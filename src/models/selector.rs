//! Parent selection for both searches.
//!
//! ## Tournament Selection
//!
//! Each draw samples `tournament_size` distinct individuals uniformly at random
//! and keeps the fittest of them. Repeating the draw fills a mating pool the size
//! of the population; parents are then picked from that pool uniformly.
//!
//! Larger tournaments raise the selection pressure:
//! - Size 2-3: weak pressure, good exploration
//! - Size 4-5: balanced, the default for both searches
//! - Size 6+: strong pressure, risk of premature convergence
//!
//! When the population is smaller than the tournament, every individual takes
//! part in every tournament.
//!
//! ```rust
//! use coverage_ga::models::Selector;
//!
//! let selector = Selector::tournament(4)?;
//! assert_eq!(selector.tournament_size(), 4);
//!
//! assert!(Selector::tournament(0).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Errors that can occur during parent selection.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum SelectionError {
    /// A tournament needs at least one contestant.
    #[error("InvalidTournamentSize: tournament_size must be at least 1, got {0}")]
    InvalidTournamentSize(usize),

    /// There is nobody to select from.
    #[error("EmptyPopulation: no individuals available for selection")]
    EmptyPopulation,
}

/// Runs one tournament and returns the index of its winner.
///
/// Ties go to the contestant drawn first.
fn run_tournament<R: Rng>(fitness: &[f64], size: usize, rng: &mut R) -> Option<usize> {
    let amount = size.min(fitness.len());
    let mut winner: Option<usize> = None;

    for idx in index::sample(rng, fitness.len(), amount) {
        match winner {
            Some(best) if fitness[idx] <= fitness[best] => {}
            _ => winner = Some(idx),
        }
    }

    winner
}

/// Tournament selector over a population's fitness values.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    tournament_size: usize,
}

impl Selector {
    /// Creates a tournament selector with the given tournament size.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidTournamentSize`] when `tournament_size` is zero.
    pub fn tournament(tournament_size: usize) -> Result<Self, SelectionError> {
        if tournament_size == 0 {
            return Err(SelectionError::InvalidTournamentSize(tournament_size));
        }

        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Fills a mating pool of `pool_size` indices into `fitness`.
    #[instrument(level = "debug", skip(self, fitness, rng), fields(tournament_size = self.tournament_size, candidates = fitness.len(), pool_size = pool_size))]
    pub fn select_pool<R: Rng>(
        &self,
        fitness: &[f64],
        pool_size: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, SelectionError> {
        if fitness.is_empty() {
            return Err(SelectionError::EmptyPopulation);
        }

        (0..pool_size)
            .map(|_| {
                run_tournament(fitness, self.tournament_size, rng)
                    .ok_or(SelectionError::EmptyPopulation)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_rejects_empty_tournaments() {
        assert_eq!(
            Selector::tournament(0),
            Err(SelectionError::InvalidTournamentSize(0))
        );
    }

    #[test]
    fn it_fails_on_an_empty_population() {
        let mut rng = StdRng::seed_from_u64(42);
        let selector = Selector::tournament(3).unwrap();

        assert_eq!(
            selector.select_pool(&[], 5, &mut rng),
            Err(SelectionError::EmptyPopulation)
        );
    }

    #[test]
    fn it_fills_the_pool_with_valid_indices() {
        let mut rng = StdRng::seed_from_u64(42);
        let selector = Selector::tournament(2).unwrap();
        let fitness = [0.1, 0.5, 0.3, 0.9, 0.2];

        let pool = selector.select_pool(&fitness, 10, &mut rng).unwrap();

        assert_eq!(pool.len(), 10);
        assert!(pool.iter().all(|&i| i < fitness.len()));
    }

    #[test]
    fn it_always_picks_the_best_when_everyone_competes() {
        let mut rng = StdRng::seed_from_u64(42);
        let selector = Selector::tournament(10).unwrap();
        let fitness = [0.1, 0.5, 0.9, 0.3];

        let pool = selector.select_pool(&fitness, 20, &mut rng).unwrap();
        assert!(pool.iter().all(|&i| i == 2));
    }

    #[test]
    fn it_never_picks_the_worst_with_pairs() {
        let mut rng = StdRng::seed_from_u64(42);
        let selector = Selector::tournament(2).unwrap();
        let fitness = [0.0, 1.0, 2.0, 3.0];

        // Index 0 loses every pairwise tournament it enters
        let pool = selector.select_pool(&fitness, 200, &mut rng).unwrap();
        assert!(!pool.contains(&0));
    }

    #[test]
    fn it_favours_fitter_individuals() {
        let mut rng = StdRng::seed_from_u64(42);
        let selector = Selector::tournament(3).unwrap();
        let fitness: Vec<f64> = (0..10).map(f64::from).collect();

        let pool = selector.select_pool(&fitness, 1000, &mut rng).unwrap();
        let top = pool.iter().filter(|&&i| i >= 5).count();

        assert!(top > 700);
    }
}
