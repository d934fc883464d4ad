//! Utility functions and structures for the timetable search.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::evaluator::{Fitness, EVENT_HOURS};
use crate::problem::Problem;
use crate::schedule::Schedule;
use crate::timeslot::WeekParity;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Draw one seed per ordinal from a master stream.
///
/// Work dispatched in parallel seeds its own generator from `seeds[i]`, so the
/// outcome does not depend on scheduling order.
pub fn sub_seeds<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.gen()).collect()
}

/// A reproducible random stream.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Teaching hours per lecturer and week parity, keyed by lecturer id.
pub fn lecturer_hours(
    schedule: &Schedule,
    problem: &Problem,
) -> BTreeMap<(String, WeekParity), f64> {
    let mut hours = BTreeMap::new();

    for event in schedule.events() {
        let id = problem
            .lecturers
            .get(event.lecturer)
            .map(|l| l.id.clone())
            .unwrap_or_else(|| format!("#{}", event.lecturer));
        *hours.entry((id, event.timeslot.parity())).or_insert(0.0) += EVENT_HOURS;
    }

    hours
}

/// Statistics about a finished search.
pub struct SearchStatistics {
    pub seed: u64,
    pub generations: usize,
    pub runtime: Duration,
    pub best_fitness: Fitness,
    pub events: usize,
    pub unplaced: usize,
}

impl SearchStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Seed: {}
- Generations: {}
- Runtime: {}
- Best Fitness: {}
- Hard Violations: {}
- Soft Violations: {}
- Gaps: {}
- Events: {}
- Unplaced Events: {}",
            self.seed,
            self.generations,
            format_duration(self.runtime),
            self.best_fitness.value(),
            self.best_fitness.hard(),
            self.best_fitness.soft(),
            self.best_fitness.gaps,
            self.events,
            self.unplaced
        )
    }
}
