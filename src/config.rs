//! Configuration parameters for the timetable search.

use crate::error::{Result, TimetableError};
use crate::evaluator::ConstraintSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How individuals are mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MutationOperator {
    /// Exchange timeslots (and possibly rooms and lecturers) between event pairs
    #[default]
    PairwiseSwap,
    /// Redraw timeslot, room and lecturer of single events
    Resample,
}

/// How the population is refilled after selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Strategy {
    /// Survivors plus smoothed copies of the best plus fresh random schedules
    #[default]
    Ecological,
    /// Survivors plus children of survivor pairs
    Crossover,
}

/// Configuration settings for the timetable search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fixed population size
    pub population_size: usize,
    /// Maximum number of generations
    pub max_generations: usize,
    /// Probability that an individual is mutated in a generation
    pub mutation_probability: f64,
    /// Fraction of events touched by a regular mutation
    pub mutation_intensity: f64,
    /// Fraction of events touched when smoothing the best schedule
    pub smoothing_intensity: f64,
    /// Probability of also exchanging rooms in a pairwise swap
    pub room_swap_probability: f64,
    /// Probability of also exchanging lecturers in a pairwise swap
    pub lecturer_swap_probability: f64,
    /// Per-field redraw probability of the resample operator
    pub resample_probability: f64,
    pub mutation_operator: MutationOperator,
    pub strategy: Strategy,
    /// Cut position of crossover, as a fraction of the demands
    pub crossover_fraction: f64,
    /// Maximum number of groups sharing one lecture
    pub max_merged_groups: usize,
    /// Rules used for scoring
    pub constraints: ConstraintSet,
    /// Seed of the random stream; drawn at random when absent
    pub seed: Option<u64>,
    /// Optional time limit for the search
    pub time_limit: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            population_size: 50,
            max_generations: 100,
            mutation_probability: 0.3,
            mutation_intensity: 0.3,
            smoothing_intensity: 0.1,
            room_swap_probability: 0.5,
            lecturer_swap_probability: 0.5,
            resample_probability: 0.5,
            mutation_operator: MutationOperator::PairwiseSwap,
            strategy: Strategy::Ecological,
            crossover_fraction: 0.5,
            max_merged_groups: 3,
            constraints: ConstraintSet::default(),
            seed: None,
            time_limit: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the generation cap.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Set the per-individual mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Set the fraction of events touched by a regular mutation.
    pub fn with_mutation_intensity(mut self, intensity: f64) -> Self {
        self.mutation_intensity = intensity;
        self
    }

    /// Set the fraction of events touched when smoothing.
    pub fn with_smoothing_intensity(mut self, intensity: f64) -> Self {
        self.smoothing_intensity = intensity;
        self
    }

    /// Set the room and lecturer exchange probabilities of pairwise swaps.
    pub fn with_swap_probabilities(mut self, room: f64, lecturer: f64) -> Self {
        self.room_swap_probability = room;
        self.lecturer_swap_probability = lecturer;
        self
    }

    /// Set the per-field redraw probability of the resample operator.
    pub fn with_resample_probability(mut self, probability: f64) -> Self {
        self.resample_probability = probability;
        self
    }

    /// Set the mutation operator.
    pub fn with_mutation_operator(mut self, operator: MutationOperator) -> Self {
        self.mutation_operator = operator;
        self
    }

    /// Set the refill strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the crossover cut fraction.
    pub fn with_crossover_fraction(mut self, fraction: f64) -> Self {
        self.crossover_fraction = fraction;
        self
    }

    /// Set the maximum number of groups merged into one lecture.
    pub fn with_max_merged_groups(mut self, groups: usize) -> Self {
        self.max_merged_groups = groups;
        self
    }

    /// Set the scoring rules.
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Check that all values are within their valid ranges.
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("mutation_probability", self.mutation_probability),
            ("room_swap_probability", self.room_swap_probability),
            ("lecturer_swap_probability", self.lecturer_swap_probability),
            ("resample_probability", self.resample_probability),
            ("crossover_fraction", self.crossover_fraction),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TimetableError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let intensities = [
            ("mutation_intensity", self.mutation_intensity),
            ("smoothing_intensity", self.smoothing_intensity),
        ];
        for (name, value) in intensities {
            if !(value > 0.0 && value <= 1.0) {
                return Err(TimetableError::InvalidConfig(format!(
                    "{} must be within (0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.max_merged_groups == 0 {
            return Err(TimetableError::InvalidConfig(
                "max_merged_groups must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
