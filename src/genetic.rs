//! Genetic operators (mutation, crossover) for the timetable search.

use crate::config::{Config, MutationOperator};
use crate::problem::Problem;
use crate::schedule::{pair_mut, Event, Schedule};
use crate::timeslot::TimeSlot;
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Implements the genetic operators for the timetable search.
#[derive(Debug, Clone, Copy)]
pub struct Genetic<'a> {
    problem: &'a Problem,
    operator: MutationOperator,
    room_swap_probability: f64,
    lecturer_swap_probability: f64,
    resample_probability: f64,
    crossover_fraction: f64,
}

impl<'a> Genetic<'a> {
    pub fn new(problem: &'a Problem, config: &Config) -> Self {
        Genetic {
            problem,
            operator: config.mutation_operator,
            room_swap_probability: config.room_swap_probability,
            lecturer_swap_probability: config.lecturer_swap_probability,
            resample_probability: config.resample_probability,
            crossover_fraction: config.crossover_fraction,
        }
    }

    /// Mutate a schedule with the configured operator, touching roughly
    /// `intensity` of its events. The number of events never changes.
    pub fn mutate<R: Rng + ?Sized>(&self, schedule: &mut Schedule, intensity: f64, rng: &mut R) {
        match self.operator {
            MutationOperator::PairwiseSwap => self.swap_mutation(schedule, intensity, rng),
            MutationOperator::Resample => self.resample_mutation(schedule, intensity, rng),
        }
    }

    /// Pair up random events and exchange their timeslots, and sometimes
    /// their rooms and lecturers.
    pub fn swap_mutation<R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        intensity: f64,
        rng: &mut R,
    ) {
        let events = schedule.events_mut();
        let count = swap_count(events.len(), intensity);
        if count < 2 {
            return;
        }

        let picked = index::sample(rng, events.len(), count).into_vec();
        for pair in picked.chunks_exact(2) {
            let (first, second) = pair_mut(events, pair[0], pair[1]);
            if !can_swap_timeslots(first, second) {
                continue;
            }
            std::mem::swap(&mut first.timeslot, &mut second.timeslot);

            if rng.gen_bool(self.room_swap_probability) && first.room != second.room {
                std::mem::swap(&mut first.room, &mut second.room);
            }
            if rng.gen_bool(self.lecturer_swap_probability) && first.lecturer != second.lecturer {
                std::mem::swap(&mut first.lecturer, &mut second.lecturer);
            }
        }
    }

    /// Redraw timeslot, room and lecturer of random events independently.
    ///
    /// Lecturers are only drawn among those certified for the event.
    pub fn resample_mutation<R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        intensity: f64,
        rng: &mut R,
    ) {
        let events = schedule.events_mut();
        let len = events.len();
        if len == 0 {
            return;
        }

        let count = ((len as f64 * intensity).ceil() as usize).clamp(1, len);
        let room_count = self.problem.rooms.len();

        for i in index::sample(rng, len, count) {
            let event = &mut events[i];

            if rng.gen_bool(self.resample_probability) {
                event.timeslot = TimeSlot::random(event.week(), rng);
            }
            if rng.gen_bool(self.resample_probability) && room_count > 0 {
                event.room = rng.gen_range(0..room_count);
            }
            if rng.gen_bool(self.resample_probability) {
                let capable = self
                    .problem
                    .capable_lecturers(event.subject(), event.event_type());
                if let Some(&lecturer) = capable.choose(rng) {
                    event.lecturer = lecturer;
                }
            }
        }
    }

    /// Splice two schedules at the same demand boundary.
    ///
    /// The first child takes the events of `first` placed for demands before
    /// the cut and the events of `second` from the cut on; the second child
    /// takes the complement.
    pub fn crossover(&self, first: &Schedule, second: &Schedule) -> (Schedule, Schedule) {
        let required = first.required().max(second.required());
        let cut = (required as f64 * self.crossover_fraction).floor() as usize;

        let splice = |head: &Schedule, tail: &Schedule| {
            let events: Vec<Event> = head
                .events()
                .iter()
                .filter(|e| e.demand() < cut)
                .chain(tail.events().iter().filter(|e| e.demand() >= cut))
                .cloned()
                .collect();
            Schedule::from_events(events, required)
        };

        (splice(first, second), splice(second, first))
    }
}

/// Number of events a pairwise mutation touches: at least two, even, and no
/// more than the schedule holds.
pub fn swap_count(len: usize, intensity: f64) -> usize {
    let mut count = (len as f64 * intensity) as usize;
    if count < 2 {
        count = 2;
    }
    if count % 2 != 0 {
        count += 1;
    }
    if count > len {
        count = len - len % 2;
    }
    count
}

/// Whether two events may exchange timeslots.
///
/// Refused when a shared group would end up holding a lecture and a practical
/// at once. Also refused across week parities, as an event's slot must stay
/// in the parity of its core (see [`Event::new`]).
pub fn can_swap_timeslots(first: &Event, second: &Event) -> bool {
    let type_conflict =
        first.event_type() != second.event_type() && first.shares_group_with(second);
    let parity_conflict = first.timeslot.parity() != second.timeslot.parity();
    !type_conflict && !parity_conflict
}
