use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Best and mean fitness of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// A generation of individuals together with their fitness, index-aligned.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Population<T> {
    individuals: Vec<T>,
    fitness: Vec<f64>,
}

impl<T: Sync> Population<T> {
    /// Scores every individual in parallel.
    ///
    /// `fitness` must not depend on evaluation order; results are collected in
    /// input order regardless of how rayon schedules the work.
    pub fn evaluate<F>(individuals: Vec<T>, fitness: F) -> Self
    where
        F: Fn(&T) -> f64 + Sync,
    {
        let fitness = individuals.par_iter().map(&fitness).collect();
        Self {
            individuals,
            fitness,
        }
    }
}

impl<T> Population<T> {
    pub fn individuals(&self) -> &[T] {
        &self.individuals
    }

    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Index and fitness of the fittest individual; the first one wins ties.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.fitness
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (idx, f)| match best {
                Some((_, b)) if f <= b => best,
                _ => Some((idx, f)),
            })
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.fitness.is_empty() {
            return 0.0;
        }
        self.fitness.iter().sum::<f64>() / self.fitness.len() as f64
    }

    /// Indices ordered by fitness, best first; equal scores keep their population order.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.fitness.len()).collect();
        order.sort_by(|&a, &b| self.fitness[b].total_cmp(&self.fitness[a]));
        order
    }

    pub fn stats(&self, generation: usize) -> GenerationStats {
        GenerationStats {
            generation,
            best_fitness: self.best().map_or(0.0, |(_, f)| f),
            mean_fitness: self.mean_fitness(),
        }
    }

    /// Individuals paired with their fitness, best first.
    pub fn into_ranked(self) -> Vec<(T, f64)> {
        let order = self.ranking();
        let mut slots: Vec<Option<T>> = self.individuals.into_iter().map(Some).collect();

        order
            .into_iter()
            .filter_map(|idx| slots[idx].take().map(|ind| (ind, self.fitness[idx])))
            .collect()
    }
}
