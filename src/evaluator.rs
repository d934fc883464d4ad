//! Constraint evaluation of schedules.
//!
//! A schedule is scored in a single pass over its events while occupancy maps
//! are rebuilt. Every hard violation weighs [`HARD_WEIGHT`] soft violations;
//! the optional gap penalty adds one per idle period between two busy ones.

use crate::error::{EntityKind, Result, TimetableError};
use crate::occupancy::Occupancy;
use crate::problem::Problem;
use crate::schedule::{Event, Schedule};
use crate::timeslot::WeekParity;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight of one hard violation relative to a soft one.
pub const HARD_WEIGHT: u64 = 1000;

/// Teaching hours credited per event.
pub const EVENT_HOURS: f64 = 1.5;

/// Feasibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardConstraint {
    LecturerClash,
    GroupClash,
    RoomClash,
    LecturerOverload,
    UnplacedEvents,
}

impl HardConstraint {
    pub const ALL: [HardConstraint; 5] = [
        HardConstraint::LecturerClash,
        HardConstraint::GroupClash,
        HardConstraint::RoomClash,
        HardConstraint::LecturerOverload,
        HardConstraint::UnplacedEvents,
    ];
}

/// Quality preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoftConstraint {
    RoomCapacity,
    SubjectCertification,
    EventTypeCertification,
}

impl SoftConstraint {
    pub const ALL: [SoftConstraint; 3] = [
        SoftConstraint::RoomCapacity,
        SoftConstraint::SubjectCertification,
        SoftConstraint::EventTypeCertification,
    ];
}

/// How exceeding a lecturer's weekly hours is penalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverloadPenalty {
    /// +1 per event leaving the lecturer above the cap
    #[default]
    Flat,
    /// +⌈overrun hours⌉ per event leaving the lecturer above the cap
    Scaled,
}

/// The rules an [`Evaluator`] applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    pub hard: Vec<HardConstraint>,
    pub soft: Vec<SoftConstraint>,
    pub gap_penalty: bool,
    pub overload: OverloadPenalty,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        ConstraintSet {
            hard: HardConstraint::ALL.to_vec(),
            soft: SoftConstraint::ALL.to_vec(),
            gap_penalty: false,
            overload: OverloadPenalty::Flat,
        }
    }
}

impl ConstraintSet {
    /// Every hard and soft rule, no gap penalty.
    pub fn new() -> Self {
        ConstraintSet::default()
    }

    pub fn with_gap_penalty(mut self, enabled: bool) -> Self {
        self.gap_penalty = enabled;
        self
    }

    pub fn with_overload(mut self, overload: OverloadPenalty) -> Self {
        self.overload = overload;
        self
    }

    pub fn without_hard(mut self, constraint: HardConstraint) -> Self {
        self.hard.retain(|&c| c != constraint);
        self
    }

    pub fn without_soft(mut self, constraint: SoftConstraint) -> Self {
        self.soft.retain(|&c| c != constraint);
        self
    }

    pub fn has_hard(&self, constraint: HardConstraint) -> bool {
        self.hard.contains(&constraint)
    }

    pub fn has_soft(&self, constraint: SoftConstraint) -> bool {
        self.soft.contains(&constraint)
    }
}

/// Per-rule violation counts of a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fitness {
    pub lecturer_clashes: u32,
    pub group_clashes: u32,
    pub room_clashes: u32,
    pub lecturer_overload: u32,
    pub unplaced_events: u32,
    pub room_capacity: u32,
    pub subject_certification: u32,
    pub event_type_certification: u32,
    pub gaps: u32,
}

impl Fitness {
    /// Number of hard violations.
    pub fn hard(&self) -> u32 {
        self.lecturer_clashes
            + self.group_clashes
            + self.room_clashes
            + self.lecturer_overload
            + self.unplaced_events
    }

    /// Number of soft violations.
    pub fn soft(&self) -> u32 {
        self.room_capacity + self.subject_certification + self.event_type_certification
    }

    /// The score to minimise.
    pub fn value(&self) -> u64 {
        self.hard() as u64 * HARD_WEIGHT + self.soft() as u64 + self.gaps as u64
    }

    /// No violation of any kind.
    pub fn is_perfect(&self) -> bool {
        self.value() == 0
    }
}

/// Scores schedules against a [`ConstraintSet`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    constraints: ConstraintSet,
}

impl Evaluator {
    pub fn new(constraints: ConstraintSet) -> Self {
        Evaluator { constraints }
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Score a schedule.
    ///
    /// Fails only when an event references an entity missing from `problem`.
    pub fn evaluate(&self, schedule: &Schedule, problem: &Problem) -> Result<Fitness> {
        let rules = &self.constraints;
        let mut fitness = Fitness::default();
        let mut occupancy = Occupancy::new();
        let mut hours: HashMap<(usize, WeekParity), f64> = HashMap::new();

        for event in schedule.events() {
            check_references(event, problem)?;
            let lecturer = problem.lecturer(event.lecturer)?;
            let room = problem.room(event.room)?;

            if rules.has_hard(HardConstraint::LecturerClash) && occupancy.lecturer_clash(event) {
                fitness.lecturer_clashes += 1;
            }
            if rules.has_hard(HardConstraint::GroupClash) {
                fitness.group_clashes += occupancy.group_clashes(event) as u32;
            }
            if rules.has_hard(HardConstraint::RoomClash) && occupancy.room_clash(event) {
                fitness.room_clashes += 1;
            }
            occupancy.record(event);

            let worked = hours
                .entry((event.lecturer, event.timeslot.parity()))
                .or_insert(0.0);
            *worked += EVENT_HOURS;
            if rules.has_hard(HardConstraint::LecturerOverload)
                && *worked > lecturer.max_hours_per_week
            {
                fitness.lecturer_overload += match rules.overload {
                    OverloadPenalty::Flat => 1,
                    OverloadPenalty::Scaled => {
                        (*worked - lecturer.max_hours_per_week).ceil() as u32
                    }
                };
            }

            if rules.has_soft(SoftConstraint::RoomCapacity) {
                let mut attendees = 0;
                for &group in event.groups() {
                    attendees += problem.attendees(group, event.subgroup_of(group).is_some())?;
                }
                if room.capacity < attendees {
                    fitness.room_capacity += 1;
                }
            }
            if rules.has_soft(SoftConstraint::SubjectCertification)
                && !problem.can_teach_subject(event.lecturer, event.subject())?
            {
                fitness.subject_certification += 1;
            }
            if rules.has_soft(SoftConstraint::EventTypeCertification)
                && !problem.can_teach_type(event.lecturer, event.event_type())?
            {
                fitness.event_type_certification += 1;
            }
        }

        if rules.has_hard(HardConstraint::UnplacedEvents) {
            fitness.unplaced_events = schedule.unplaced() as u32;
        }
        if rules.gap_penalty {
            fitness.gaps = count_gaps(schedule);
        }

        Ok(fitness)
    }
}

fn check_references(event: &Event, problem: &Problem) -> Result<()> {
    problem.subject(event.subject())?;
    problem.lecturer(event.lecturer)?;
    problem.room(event.room)?;
    for &group in event.groups() {
        let known = problem.group(group)?;
        if let Some(subgroup) = event.subgroup_of(group) {
            if subgroup >= known.subgroups.len() {
                return Err(TimetableError::UnknownEntity {
                    kind: EntityKind::Subgroup,
                    id: format!("{}#{}", known.id, subgroup),
                });
            }
        }
    }
    Ok(())
}

/// Busy periods of one group on one day.
#[derive(Default)]
struct GroupDay {
    whole: Vec<u8>,
    subgroups: HashMap<usize, Vec<u8>>,
}

impl GroupDay {
    /// A split group is idle per subgroup, with whole-group periods shared by all.
    fn gaps(&self) -> u32 {
        if self.subgroups.is_empty() {
            return gaps_between(&self.whole);
        }
        self.subgroups
            .values()
            .map(|own| {
                let periods: Vec<u8> = own.iter().chain(&self.whole).copied().collect();
                gaps_between(&periods)
            })
            .sum()
    }
}

/// Idle periods per lecturer and per group (or subgroup) and day.
pub fn count_gaps(schedule: &Schedule) -> u32 {
    let mut lecturer_days: HashMap<(usize, WeekParity, u8), Vec<u8>> = HashMap::new();
    let mut group_days: HashMap<(usize, WeekParity, u8), GroupDay> = HashMap::new();

    for event in schedule.events() {
        let slot = event.timeslot;
        lecturer_days
            .entry((event.lecturer, slot.parity(), slot.day()))
            .or_default()
            .push(slot.period());
        for &group in event.groups() {
            let day = group_days
                .entry((group, slot.parity(), slot.day()))
                .or_default();
            match event.subgroup_of(group) {
                Some(subgroup) => day.subgroups.entry(subgroup).or_default().push(slot.period()),
                None => day.whole.push(slot.period()),
            }
        }
    }

    let lecturer_gaps: u32 = lecturer_days.values().map(|periods| gaps_between(periods)).sum();
    let group_gaps: u32 = group_days.values().map(GroupDay::gaps).sum();
    lecturer_gaps + group_gaps
}

/// Number of consecutive busy periods more than one period apart.
pub fn gaps_between(periods: &[u8]) -> u32 {
    periods
        .iter()
        .copied()
        .sorted()
        .dedup()
        .tuple_windows()
        .filter(|&(a, b)| b - a > 1)
        .count() as u32
}
