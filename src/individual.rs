//! Individual representation for the genetic algorithm population.

use crate::evaluator::Fitness;
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An individual in the genetic algorithm population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    /// The schedule represented by this individual
    pub schedule: Schedule,
    /// Score of the schedule, `None` until evaluated or after a mutation
    pub fitness: Option<Fitness>,
}

impl Individual {
    /// Create a new, unevaluated individual from a schedule.
    pub fn new(schedule: Schedule) -> Self {
        Individual {
            schedule,
            fitness: None,
        }
    }

    /// Score used for ranking; unevaluated individuals rank last.
    pub fn score(&self) -> u64 {
        self.fitness.map_or(u64::MAX, |f| f.value())
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Mark the schedule as changed.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}

impl PartialEq for Individual {
    fn eq(&self, other: &Self) -> bool {
        self.score() == other.score()
    }
}

impl Eq for Individual {}

impl PartialOrd for Individual {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Individual {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score().cmp(&other.score())
    }
}
