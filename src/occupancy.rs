//! Slot occupancy of lecturers, groups and rooms.

use crate::schedule::Event;
use crate::timeslot::{EventType, TimeSlot};
use std::collections::{HashMap, HashSet};

/// The first event that claimed a lecturer or room at a slot.
#[derive(Debug, Clone, Copy)]
struct Booking {
    event_type: EventType,
    lecturer: usize,
    room: usize,
}

impl Booking {
    fn of(event: &Event) -> Self {
        Booking {
            event_type: event.event_type(),
            lecturer: event.lecturer,
            room: event.room,
        }
    }
}

/// Occupancy maps keyed by (entity, slot).
///
/// Every event books `(group, slot)` for each of its groups; a split practical
/// additionally books `(group, subgroup, slot)`.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    lecturers: HashMap<(usize, TimeSlot), Booking>,
    groups: HashSet<(usize, TimeSlot)>,
    subgroups: HashSet<(usize, usize, TimeSlot)>,
    rooms: HashMap<(usize, TimeSlot), Booking>,
}

impl Occupancy {
    pub fn new() -> Self {
        Occupancy::default()
    }

    pub fn lecturer_free(&self, lecturer: usize, slot: TimeSlot) -> bool {
        !self.lecturers.contains_key(&(lecturer, slot))
    }

    pub fn room_free(&self, room: usize, slot: TimeSlot) -> bool {
        !self.rooms.contains_key(&(room, slot))
    }

    /// Whether a group (or one of its subgroups) can attend at a slot.
    ///
    /// Any booking of the group blocks it, whether whole or split.
    pub fn group_free(&self, group: usize, subgroup: Option<usize>, slot: TimeSlot) -> bool {
        !self.groups.contains(&(group, slot))
            && subgroup.map_or(true, |s| !self.subgroups.contains(&(group, s, slot)))
    }

    /// Whether the event's lecturer is already teaching elsewhere at its slot.
    ///
    /// Lectures by the same lecturer in the same room are merged sections.
    pub fn lecturer_clash(&self, event: &Event) -> bool {
        match self.lecturers.get(&(event.lecturer, event.timeslot)) {
            Some(booking) => !(booking.event_type == EventType::Lecture
                && event.is_lecture()
                && booking.room == event.room),
            None => false,
        }
    }

    /// Whether the event's room is taken at its slot.
    ///
    /// Lectures by the same lecturer may share a room.
    pub fn room_clash(&self, event: &Event) -> bool {
        match self.rooms.get(&(event.room, event.timeslot)) {
            Some(booking) => !(booking.event_type == EventType::Lecture
                && event.is_lecture()
                && booking.lecturer == event.lecturer),
            None => false,
        }
    }

    /// Number of booked keys the event runs into: one per group already busy
    /// at its slot, plus one per subgroup already busy.
    pub fn group_clashes(&self, event: &Event) -> usize {
        let slot = event.timeslot;
        event
            .groups()
            .iter()
            .map(|&g| {
                let group = usize::from(self.groups.contains(&(g, slot)));
                let subgroup = event
                    .subgroup_of(g)
                    .map_or(0, |s| usize::from(self.subgroups.contains(&(g, s, slot))));
                group + subgroup
            })
            .sum()
    }

    /// Record an event. Lecturer and room keep their first booking.
    pub fn record(&mut self, event: &Event) {
        let slot = event.timeslot;
        let booking = Booking::of(event);

        self.lecturers.entry((event.lecturer, slot)).or_insert(booking);
        self.rooms.entry((event.room, slot)).or_insert(booking);

        for &group in event.groups() {
            self.groups.insert((group, slot));
            if let Some(subgroup) = event.subgroup_of(group) {
                self.subgroups.insert((group, subgroup, slot));
            }
        }
    }
}
