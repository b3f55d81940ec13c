use super::population::Population;
use super::selector::{SelectionError, Selector};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::instrument;

/// Turns one evaluated generation into the next.
///
/// The top `elite_count` individuals (at least one) are copied unchanged, a
/// mating pool the size of the population is filled by tournament selection,
/// and children bred from two parents drawn uniformly from the pool fill the
/// remaining slots.
#[derive(Debug, Clone, Copy)]
pub struct Breeder {
    selector: Selector,
    elite_count: usize,
}

impl Breeder {
    pub fn new(selector: Selector, elite_count: usize) -> Self {
        Self {
            selector,
            elite_count: elite_count.max(1),
        }
    }

    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    /// Next generation of the same size as `current`.
    ///
    /// `breed_child` receives two parents and must return a finished child
    /// (crossed over, mutated and otherwise fixed up).
    #[instrument(level = "debug", skip(self, current, rng, breed_child), fields(population = current.len(), elite_count = self.elite_count))]
    pub fn next_generation<T, R, F>(
        &self,
        current: &Population<T>,
        rng: &mut R,
        mut breed_child: F,
    ) -> Result<Vec<T>, SelectionError>
    where
        T: Clone,
        R: Rng,
        F: FnMut(&T, &T, &mut R) -> T,
    {
        let size = current.len();
        let individuals = current.individuals();

        let mut next: Vec<T> = current
            .ranking()
            .into_iter()
            .take(self.elite_count.min(size))
            .map(|idx| individuals[idx].clone())
            .collect();

        let pool = self.selector.select_pool(current.fitness(), size, rng)?;

        while next.len() < size {
            let (Some(&lhs), Some(&rhs)) = (pool.choose(rng), pool.choose(rng)) else {
                return Err(SelectionError::EmptyPopulation);
            };
            let child = breed_child(&individuals[lhs], &individuals[rhs], &mut *rng);
            next.push(child);
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn population() -> Population<f64> {
        Population::evaluate(vec![0.1, 0.9, 0.5, 0.7, 0.3], |x| *x)
    }

    #[test]
    fn it_keeps_at_least_one_elite() {
        let breeder = Breeder::new(Selector::tournament(2).unwrap(), 0);
        assert_eq!(breeder.elite_count(), 1);
    }

    #[test]
    fn it_copies_elites_first() {
        let mut rng = StdRng::seed_from_u64(42);
        let breeder = Breeder::new(Selector::tournament(2).unwrap(), 2);

        let next = breeder
            .next_generation(&population(), &mut rng, |_, _, _| -1.0)
            .unwrap();

        assert_eq!(next, vec![0.9, 0.7, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn it_breeds_from_selected_parents() {
        let mut rng = StdRng::seed_from_u64(42);
        let breeder = Breeder::new(Selector::tournament(2).unwrap(), 1);
        let current = population();

        let next = breeder
            .next_generation(&current, &mut rng, |a, b, _| a.max(*b))
            .unwrap();

        assert_eq!(next.len(), current.len());
        // The worst individual never wins a pairwise tournament
        assert!(next.iter().all(|x| *x > 0.1));
    }

    #[test]
    fn it_fails_on_an_empty_generation() {
        let mut rng = StdRng::seed_from_u64(42);
        let breeder = Breeder::new(Selector::tournament(2).unwrap(), 1);
        let empty = Population::<f64>::evaluate(vec![], |x| *x);

        let result = breeder.next_generation(&empty, &mut rng, |a, _, _| *a);
        assert!(matches!(result, Err(SelectionError::EmptyPopulation)));
    }
}
