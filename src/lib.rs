//! # timetable_ga
//!
//! Evolutionary search for weekly academic timetables.
//!
//! Teaching events (lectures and practicals) are assigned to time slots,
//! lecturers and rooms so that hard feasibility rules (no double booking, no
//! overloaded lecturers) and soft preferences (room capacity, lecturer
//! certification) are violated as little as possible.
//!
//! Each generation scores the population, keeps the better half, refills it
//! with smoothed copies of the best schedule and freshly generated ones, and
//! mutates a share of the result. The search stops once a schedule without
//! any violation is found or the generation cap is reached.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod genetic;
pub mod individual;
pub mod occupancy;
pub mod population;
pub mod problem;
pub mod schedule;
pub mod synthetic;
pub mod timeslot;
pub mod utils;

use crate::config::{Config, Strategy};
use crate::error::{Result, TimetableError};
use crate::evaluator::Evaluator;
use crate::generator::Generator;
use crate::genetic::Genetic;
use crate::individual::Individual;
use crate::population::Population;
use crate::problem::Problem;
use crate::utils::seeded_rng;

use log::{debug, info, warn};
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A schedule without any violation was found
    Solved,
    /// The generation cap was reached
    GenerationCap,
    /// The configured time limit ran out
    TimeLimit,
    /// Selection left no individual to evolve
    EmptyPopulation,
}

/// The result of a finished search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best individual seen over all generations
    pub best: Individual,
    pub termination: Termination,
    /// Number of evaluated generations
    pub generations: usize,
    /// Seed that reproduces this run
    pub seed: u64,
    pub run_time: Duration,
    /// Best score of each generation
    pub history: Vec<u64>,
}

/// The main algorithm structure that orchestrates the evolutionary search.
pub struct TimetableAlgorithm {
    pub problem: Problem,
    pub config: Config,
    pub evaluator: Evaluator,
    pub population: Population,
    pub best: Option<Individual>,
    pub generation: usize,
    pub history: Vec<u64>,
    pub seed: u64,
    pub run_time: Duration,
    rng: ChaCha8Rng,
    start_time: Instant,
}

impl TimetableAlgorithm {
    /// Create a new search for the given problem and configuration.
    pub fn new(problem: Problem, config: Config) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);

        Ok(TimetableAlgorithm {
            evaluator: Evaluator::new(config.constraints.clone()),
            problem,
            config,
            population: Population::new(),
            best: None,
            generation: 0,
            history: Vec::new(),
            seed,
            run_time: Duration::from_secs(0),
            rng: seeded_rng(seed),
            start_time: Instant::now(),
        })
    }

    /// Initialize the population with random schedules.
    pub fn initialize(&mut self) {
        self.rng = seeded_rng(self.seed);
        self.best = None;
        self.generation = 0;
        self.history.clear();

        let generator = Generator::new(&self.problem, self.config.max_merged_groups);
        self.population =
            Population::initialize(&generator, self.config.population_size, &mut self.rng);
    }

    /// Run the search until a termination criterion is met.
    pub fn run(&mut self) -> Result<SearchOutcome> {
        self.start_time = Instant::now();
        self.initialize();

        info!(
            "Starting search: seed {}, population {}, {} demands",
            self.seed,
            self.config.population_size,
            self.problem.demands().len()
        );

        let termination = loop {
            self.population.evaluate(&self.evaluator, &self.problem)?;
            self.population.select();
            self.generation += 1;

            let leader = match self.population.best() {
                Some(leader) => leader.clone(),
                None => {
                    warn!("Population is empty after selection, stopping");
                    break Termination::EmptyPopulation;
                }
            };

            self.history.push(leader.score());
            info!(
                "Generation {}: best fitness {}",
                self.generation,
                leader.score()
            );

            if self.best.as_ref().map_or(true, |best| leader < *best) {
                self.best = Some(leader);
            }

            if self.best.as_ref().map_or(false, |best| best.score() == 0) {
                break Termination::Solved;
            }
            if self.generation >= self.config.max_generations {
                break Termination::GenerationCap;
            }
            if self.time_exceeded() {
                break Termination::TimeLimit;
            }

            self.reshape();

            let genetic = Genetic::new(&self.problem, &self.config);
            self.population.mutate(
                &genetic,
                self.config.mutation_probability,
                self.config.mutation_intensity,
                &mut self.rng,
            );
        };

        self.run_time = self.start_time.elapsed();

        let best = self.best.clone().ok_or(TimetableError::EmptyPopulation)?;
        if best.schedule.unplaced() > 0 {
            warn!(
                "Best schedule leaves {} of {} demands unplaced",
                best.schedule.unplaced(),
                best.schedule.required()
            );
        }
        info!(
            "Search finished after {} generations ({:?}): best fitness {}",
            self.generation,
            termination,
            best.score()
        );

        Ok(SearchOutcome {
            best,
            termination,
            generations: self.generation,
            seed: self.seed,
            run_time: self.run_time,
            history: self.history.clone(),
        })
    }

    /// Refill the surviving population up to the configured size.
    fn reshape(&mut self) {
        let target = self.config.population_size;
        let survivors = self.population.len();
        let generator = Generator::new(&self.problem, self.config.max_merged_groups);
        let genetic = Genetic::new(&self.problem, &self.config);

        match self.config.strategy {
            Strategy::Ecological => {
                let remainder = target.saturating_sub(survivors);
                let smoothed_count = ((remainder + 1) / 2).min(survivors);
                let rain_count = remainder - smoothed_count;

                if let Some(best) = self.best.as_ref() {
                    let smoothed = population::smooth(
                        best,
                        smoothed_count,
                        &genetic,
                        self.config.smoothing_intensity,
                        &mut self.rng,
                    );
                    self.population.extend(smoothed);
                }
                let fresh = population::rain(&generator, rain_count, &mut self.rng);
                self.population.extend(fresh);

                debug!(
                    "Reshaped: {} survivors, {} smoothed, {} fresh",
                    survivors, smoothed_count, rain_count
                );
            }
            Strategy::Crossover => {
                let children = population::breed(&self.population.individuals, &genetic);
                let child_count = children.len();
                self.population.extend(children);
                self.population.truncate(target);

                let missing = target.saturating_sub(self.population.len());
                let fresh = population::rain(&generator, missing, &mut self.rng);
                self.population.extend(fresh);

                debug!(
                    "Reshaped: {} survivors, {} children, {} fresh",
                    survivors, child_count, missing
                );
            }
        }
    }

    /// Check whether the optional time limit has run out.
    fn time_exceeded(&self) -> bool {
        self.config
            .time_limit
            .map_or(false, |limit| self.start_time.elapsed() >= limit)
    }
}
