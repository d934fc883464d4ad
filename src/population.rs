//! Population management for the genetic algorithm.
//!
//! The operators are named after the ecological roles they play: the
//! predator culls the weaker half, the herbivore grazes the neighbourhood of
//! the best schedule, and rain washes fresh random schedules in.

use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::generator::Generator;
use crate::genetic::Genetic;
use crate::individual::Individual;
use crate::problem::Problem;
use crate::utils::{seeded_rng, sub_seeds};
use rand::Rng;
use rayon::prelude::*;

/// Manages the population of individuals for the genetic algorithm.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub individuals: Vec<Individual>,
}

impl Population {
    /// Create an empty population.
    pub fn new() -> Self {
        Population::default()
    }

    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Population { individuals }
    }

    /// Fill a population with `size` freshly generated schedules.
    pub fn initialize<R: Rng + ?Sized>(
        generator: &Generator<'_>,
        size: usize,
        rng: &mut R,
    ) -> Self {
        Population::from_individuals(rain(generator, size, rng))
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Add individuals at the end.
    pub fn extend(&mut self, individuals: impl IntoIterator<Item = Individual>) {
        self.individuals.extend(individuals);
    }

    /// Drop everything past `size`.
    pub fn truncate(&mut self, size: usize) {
        self.individuals.truncate(size);
    }

    /// Score every individual that has no fitness yet, in parallel.
    pub fn evaluate(&mut self, evaluator: &Evaluator, problem: &Problem) -> Result<()> {
        self.individuals
            .par_iter_mut()
            .filter(|individual| !individual.is_evaluated())
            .try_for_each(|individual| {
                individual.fitness = Some(evaluator.evaluate(&individual.schedule, problem)?);
                Ok(())
            })
    }

    /// Predator: keep the better half.
    ///
    /// Sorting is stable, so equally scored individuals keep their order. A
    /// population of one is left untouched.
    pub fn select(&mut self) {
        self.individuals.sort_by_key(Individual::score);
        if self.individuals.len() > 1 {
            let keep = self.individuals.len() / 2;
            self.individuals.truncate(keep);
        }
    }

    /// The lowest scored individual.
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().min_by_key(|individual| individual.score())
    }

    /// Mutate each individual with probability `probability`, in parallel.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        genetic: &Genetic<'_>,
        probability: f64,
        intensity: f64,
        rng: &mut R,
    ) {
        let seeds = sub_seeds(rng, self.individuals.len());
        self.individuals
            .par_iter_mut()
            .zip(seeds.into_par_iter())
            .for_each(|(individual, seed)| {
                let mut rng = seeded_rng(seed);
                if rng.gen_bool(probability) {
                    genetic.mutate(&mut individual.schedule, intensity, &mut rng);
                    individual.invalidate();
                }
            });
    }
}

/// Herbivore: `count` lightly mutated copies of `best`.
pub fn smooth<R: Rng + ?Sized>(
    best: &Individual,
    count: usize,
    genetic: &Genetic<'_>,
    intensity: f64,
    rng: &mut R,
) -> Vec<Individual> {
    sub_seeds(rng, count)
        .into_par_iter()
        .map(|seed| {
            let mut schedule = best.schedule.clone();
            genetic.mutate(&mut schedule, intensity, &mut seeded_rng(seed));
            Individual::new(schedule)
        })
        .collect()
}

/// Rain: `count` freshly generated individuals.
pub fn rain<R: Rng + ?Sized>(
    generator: &Generator<'_>,
    count: usize,
    rng: &mut R,
) -> Vec<Individual> {
    generator
        .generate_population(count, rng)
        .into_iter()
        .map(Individual::new)
        .collect()
}

/// Two children for each adjacent pair of parents.
pub fn breed(parents: &[Individual], genetic: &Genetic<'_>) -> Vec<Individual> {
    parents
        .chunks_exact(2)
        .flat_map(|pair| {
            let (first, second) = genetic.crossover(&pair[0].schedule, &pair[1].schedule);
            [Individual::new(first), Individual::new(second)]
        })
        .collect()
}
