//! Randomised, occupancy-aware construction of schedules.

use crate::occupancy::Occupancy;
use crate::problem::{Demand, Problem};
use crate::schedule::{Event, EventCore, Schedule};
use crate::timeslot::{EventType, TimeSlot};
use crate::utils::{seeded_rng, sub_seeds};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

/// Builds candidate schedules for a problem.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    problem: &'a Problem,
    max_merged_groups: usize,
}

impl<'a> Generator<'a> {
    /// Create a generator merging at most `max_merged_groups` groups into one
    /// lecture.
    pub fn new(problem: &'a Problem, max_merged_groups: usize) -> Self {
        Generator {
            problem,
            max_merged_groups: max_merged_groups.max(1),
        }
    }

    /// Build one schedule, trying every demand once.
    ///
    /// Demands without a lecturer, group slot or room are left out and show
    /// up in [`Schedule::unplaced`].
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Schedule {
        let demands = self.problem.demands();
        let mut schedule = Schedule::new(demands.len());
        let mut occupancy = Occupancy::new();

        for (ordinal, demand) in demands.iter().enumerate() {
            if let Some(event) = self.place(ordinal, demand, &occupancy, rng) {
                occupancy.record(&event);
                schedule.push(event);
            }
        }

        if schedule.unplaced() > 0 {
            debug!(
                "generated schedule with {} of {} demands unplaced",
                schedule.unplaced(),
                demands.len()
            );
        }

        schedule
    }

    /// Build `count` independent schedules in parallel.
    pub fn generate_population<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Schedule> {
        sub_seeds(rng, count)
            .into_par_iter()
            .map(|seed| self.generate(&mut seeded_rng(seed)))
            .collect()
    }

    /// Try to place a single demand at a random slot.
    fn place<R: Rng + ?Sized>(
        &self,
        ordinal: usize,
        demand: &Demand,
        occupancy: &Occupancy,
        rng: &mut R,
    ) -> Option<Event> {
        let problem = self.problem;
        let slot = TimeSlot::random(demand.week, rng);

        let mut lecturers = problem
            .capable_lecturers(demand.subject, demand.event_type)
            .to_vec();
        lecturers.shuffle(rng);
        let lecturer = lecturers
            .into_iter()
            .find(|&l| occupancy.lecturer_free(l, slot))?;

        let owner = problem.subject_group(demand.subject).ok()?;
        let (groups, subgroups) = match demand.event_type {
            EventType::Lecture => {
                if !occupancy.group_free(owner, None, slot) {
                    return None;
                }
                let mut groups = vec![owner];
                if self.max_merged_groups > 1 {
                    let free: Vec<usize> = (0..problem.groups.len())
                        .filter(|&g| g != owner && occupancy.group_free(g, None, slot))
                        .collect();
                    let extra = rng.gen_range(0..=free.len().min(self.max_merged_groups - 1));
                    groups.extend(free.choose_multiple(rng, extra).copied());
                }
                (groups, Vec::new())
            }
            EventType::Practical => {
                if !occupancy.group_free(owner, demand.subgroup, slot) {
                    return None;
                }
                let subgroups = demand
                    .subgroup
                    .map(|s| vec![(owner, s)])
                    .unwrap_or_default();
                (vec![owner], subgroups)
            }
        };

        let mut attendees = 0;
        for &group in &groups {
            let split = subgroups.iter().any(|&(g, _)| g == group);
            attendees += problem.attendees(group, split).ok()?;
        }

        let mut rooms: Vec<usize> = problem
            .rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room.capacity >= attendees)
            .map(|(i, _)| i)
            .collect();
        rooms.shuffle(rng);
        let room = rooms.into_iter().find(|&r| occupancy.room_free(r, slot))?;

        let subject = problem.subject(demand.subject).ok()?;
        let core = EventCore {
            demand: ordinal,
            subject: demand.subject,
            subject_name: subject.name.clone(),
            event_type: demand.event_type,
            week: demand.week,
            groups,
            subgroups,
        };

        Event::new(slot, lecturer, room, core)
    }
}
