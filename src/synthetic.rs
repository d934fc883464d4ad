//! Randomly generated catalogs for demos and benchmarks.

use crate::problem::{Catalogs, Group, Lecturer, Room, Subject};
use crate::timeslot::{EventType, WeekType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const SUBJECT_NAMES: [&str; 8] = [
    "Mathematics",
    "Physics",
    "Programming",
    "Databases",
    "Networks",
    "Algorithms",
    "Statistics",
    "Operating Systems",
];

const LECTURER_NAMES: [&str; 8] = [
    "Bob", "Alice", "Victor", "Jane", "James", "John", "Sarah", "Mike",
];

/// Sizes of a synthetic instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub groups: usize,
    pub subjects: usize,
    pub lecturers: usize,
    pub rooms: usize,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        SyntheticSpec {
            groups: 6,
            subjects: 10,
            lecturers: 8,
            rooms: 6,
        }
    }
}

impl SyntheticSpec {
    /// Generate catalogs of this size.
    ///
    /// Every subject gets at least one lecturer certified for both event
    /// types, and the first room seats any merged lecture.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Catalogs {
        let group_count = self.groups.max(1);
        let lecturer_count = self.lecturers.max(1);

        let groups: Vec<Group> = (0..group_count)
            .map(|i| {
                let id = format!("G{}", i + 1);
                let subgroups = if i % 2 == 0 {
                    vec![format!("{}/1", id), format!("{}/2", id)]
                } else {
                    Vec::new()
                };
                Group::new(id, rng.gen_range(18..=32), subgroups)
            })
            .collect();

        let subjects: Vec<Subject> = (0..self.subjects)
            .map(|i| {
                let group = &groups[i % group_count];
                let name = format!(
                    "{} {}",
                    SUBJECT_NAMES[i % SUBJECT_NAMES.len()],
                    i / SUBJECT_NAMES.len() + 1
                );
                let week_type = *[WeekType::Both, WeekType::Both, WeekType::Even, WeekType::Odd]
                    .choose(rng)
                    .unwrap_or(&WeekType::Both);
                Subject::new(
                    format!("S{}", i + 1),
                    name,
                    group.id.clone(),
                    rng.gen_range(1..=2),
                    rng.gen_range(0..=2),
                )
                .with_subgroups(!group.subgroups.is_empty() && rng.gen_bool(0.5))
                .with_week_type(week_type)
            })
            .collect();

        let subject_ids: Vec<&str> = subjects.iter().map(|s| s.id.as_str()).collect();
        let mut lecturers: Vec<Lecturer> = (0..lecturer_count)
            .map(|i| {
                let taught = rng.gen_range(1..=3).min(subject_ids.len());
                let event_types = if i % 4 == 3 {
                    vec![EventType::Practical]
                } else {
                    vec![EventType::Lecture, EventType::Practical]
                };
                Lecturer::new(
                    format!("L{}", i + 1),
                    LECTURER_NAMES[i % LECTURER_NAMES.len()],
                    subject_ids.choose_multiple(rng, taught).copied(),
                    event_types,
                    f64::from(rng.gen_range(6..=12_u32)) * 1.5,
                )
            })
            .collect();

        let generalists: Vec<usize> = (0..lecturer_count).filter(|i| i % 4 != 3).collect();
        let generalists = if generalists.is_empty() {
            vec![0]
        } else {
            generalists
        };
        for (i, id) in subject_ids.iter().enumerate() {
            let lecturer = &mut lecturers[generalists[i % generalists.len()]];
            lecturer.subjects.insert(id.to_string());
            lecturer.event_types.insert(EventType::Lecture);
            lecturer.event_types.insert(EventType::Practical);
        }

        let rooms = (0..self.rooms.max(1))
            .map(|i| {
                let capacity = if i == 0 { 120 } else { rng.gen_range(20..=60) };
                Room::new(format!("R{}", i + 1), capacity)
            })
            .collect();

        Catalogs {
            groups,
            subjects,
            lecturers,
            rooms,
        }
    }
}
