//! Events and schedules, the mutable work product of the search.

use crate::error::TimetableError;
use crate::timeslot::{EventType, TimeSlot, WeekParity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The part of an event fixed at generation time.
///
/// Shared between clones of a schedule; mutation never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCore {
    /// Position of the demand this event was placed for
    pub demand: usize,
    pub subject: usize,
    pub subject_name: String,
    pub event_type: EventType,
    /// Week parity the event was generated for
    pub week: WeekParity,
    /// Participating group indices, duplicate free and non-empty
    pub groups: Vec<usize>,
    /// (group index, subgroup position) pairs for split practicals
    pub subgroups: Vec<(usize, usize)>,
}

/// A single teaching event.
///
/// The timeslot always belongs to the week parity of the core; operators
/// moving an event keep it there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    pub(crate) timeslot: TimeSlot,
    pub lecturer: usize,
    pub room: usize,
    core: Arc<EventCore>,
}

#[derive(Deserialize)]
struct RawEvent {
    timeslot: TimeSlot,
    lecturer: usize,
    room: usize,
    core: EventCore,
}

impl TryFrom<RawEvent> for Event {
    type Error = TimetableError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let summary = format!(
            "{} [{}] at {} for groups {:?}",
            raw.core.subject_name, raw.core.event_type, raw.timeslot, raw.core.groups
        );
        Event::new(raw.timeslot, raw.lecturer, raw.room, raw.core)
            .ok_or(TimetableError::InvalidEvent(summary))
    }
}

impl Event {
    /// Create an event, or `None` if it would break an event invariant:
    /// a slot outside the core's week parity, no groups, repeated groups, a
    /// subgroup for a group not taking part, a group split twice, or a
    /// subgroup split on a lecture.
    pub fn new(timeslot: TimeSlot, lecturer: usize, room: usize, core: EventCore) -> Option<Self> {
        if timeslot.parity() != core.week || core.groups.is_empty() {
            return None;
        }

        let mut seen = core.groups.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != core.groups.len() {
            return None;
        }

        if !core.subgroups.is_empty() && core.event_type == EventType::Lecture {
            return None;
        }

        let mut split: Vec<usize> = core.subgroups.iter().map(|&(g, _)| g).collect();
        if split.iter().any(|g| !core.groups.contains(g)) {
            return None;
        }
        split.sort_unstable();
        split.dedup();
        if split.len() != core.subgroups.len() {
            return None;
        }

        Some(Event {
            timeslot,
            lecturer,
            room,
            core: Arc::new(core),
        })
    }

    pub fn timeslot(&self) -> TimeSlot {
        self.timeslot
    }

    pub fn core(&self) -> &EventCore {
        &self.core
    }

    pub fn demand(&self) -> usize {
        self.core.demand
    }

    pub fn subject(&self) -> usize {
        self.core.subject
    }

    pub fn subject_name(&self) -> &str {
        &self.core.subject_name
    }

    pub fn event_type(&self) -> EventType {
        self.core.event_type
    }

    pub fn week(&self) -> WeekParity {
        self.core.week
    }

    pub fn groups(&self) -> &[usize] {
        &self.core.groups
    }

    pub fn is_lecture(&self) -> bool {
        self.core.event_type == EventType::Lecture
    }

    /// Subgroup of `group` attending this event, if the group is split.
    pub fn subgroup_of(&self, group: usize) -> Option<usize> {
        self.core
            .subgroups
            .iter()
            .find(|&&(g, _)| g == group)
            .map(|&(_, s)| s)
    }

    /// Whether both events involve at least one common group.
    pub fn shares_group_with(&self, other: &Event) -> bool {
        self.groups().iter().any(|g| other.groups().contains(g))
    }

    /// Whether two events point at the same immutable core.
    pub fn same_core(&self, other: &Event) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

/// An ordered collection of events built for one set of demands.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    events: Vec<Event>,
    /// Number of demands this schedule was built for
    required: usize,
}

impl Schedule {
    /// Create an empty schedule for `required` demands.
    pub fn new(required: usize) -> Self {
        Schedule {
            events: Vec::with_capacity(required),
            required,
        }
    }

    /// Build a schedule directly from events.
    pub fn from_events(events: Vec<Event>, required: usize) -> Self {
        Schedule { events, required }
    }

    /// Append an event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of demands the schedule was built for.
    pub fn required(&self) -> usize {
        self.required
    }

    /// Demands without a placed event.
    pub fn unplaced(&self) -> usize {
        self.required.saturating_sub(self.events.len())
    }

    /// Events grouped by timeslot in slot order.
    pub fn by_timeslot(&self) -> BTreeMap<TimeSlot, Vec<&Event>> {
        let mut slots: BTreeMap<TimeSlot, Vec<&Event>> = BTreeMap::new();
        for event in &self.events {
            slots.entry(event.timeslot).or_default().push(event);
        }
        slots
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule:")?;
        writeln!(f, "  Events: {}", self.events.len())?;
        writeln!(f, "  Unplaced: {}", self.unplaced())?;

        for (i, event) in self.events.iter().enumerate() {
            writeln!(
                f,
                "  Event {}: {} {} [{}] groups {:?} (Lecturer: {}, Room: {})",
                i,
                event.timeslot,
                event.subject_name(),
                event.event_type(),
                event.groups(),
                event.lecturer,
                event.room
            )?;
        }

        Ok(())
    }
}

/// Mutable references to two distinct events of a slice.
pub(crate) fn pair_mut(events: &mut [Event], i: usize, j: usize) -> (&mut Event, &mut Event) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = events.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = events.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
