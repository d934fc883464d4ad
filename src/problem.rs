//! Catalog entities and the resolved timetabling problem.

use crate::error::{EntityKind, Result, TimetableError};
use crate::timeslot::{EventType, WeekParity, WeekType};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A student group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub students: u32,
    #[serde(default)]
    pub subgroups: Vec<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, students: u32, subgroups: Vec<String>) -> Self {
        Group {
            id: id.into(),
            students,
            subgroups,
        }
    }

    /// Head count when only half of the group attends.
    pub fn half(&self) -> u32 {
        self.students / 2
    }
}

/// A course taught to one owning group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub group: String,
    pub lectures: u32,
    pub practicals: u32,
    #[serde(default)]
    pub requires_subgroups: bool,
    #[serde(default)]
    pub week_type: WeekType,
}

impl Subject {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        group: impl Into<String>,
        lectures: u32,
        practicals: u32,
    ) -> Self {
        Subject {
            id: id.into(),
            name: name.into(),
            group: group.into(),
            lectures,
            practicals,
            requires_subgroups: false,
            week_type: WeekType::Both,
        }
    }

    pub fn with_subgroups(mut self, required: bool) -> Self {
        self.requires_subgroups = required;
        self
    }

    pub fn with_week_type(mut self, week_type: WeekType) -> Self {
        self.week_type = week_type;
        self
    }
}

/// An instructor and what they are certified to teach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: String,
    pub name: String,
    pub subjects: HashSet<String>,
    pub event_types: HashSet<EventType>,
    pub max_hours_per_week: f64,
}

impl Lecturer {
    pub fn new<S, T>(
        id: impl Into<String>,
        name: impl Into<String>,
        subjects: S,
        event_types: T,
        max_hours_per_week: f64,
    ) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator<Item = EventType>,
    {
        Lecturer {
            id: id.into(),
            name: name.into(),
            subjects: subjects.into_iter().map(Into::into).collect(),
            event_types: event_types.into_iter().collect(),
            max_hours_per_week,
        }
    }
}

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub capacity: u32,
}

impl Room {
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Room {
            id: id.into(),
            capacity,
        }
    }
}

/// The raw catalogs as handed over by an external loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogs {
    pub groups: Vec<Group>,
    pub subjects: Vec<Subject>,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
}

impl Catalogs {
    /// Load catalogs from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let catalogs = serde_json::from_reader(BufReader::new(file))?;
        Ok(catalogs)
    }
}

/// One event the generator has to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub subject: usize,
    pub event_type: EventType,
    pub week: WeekParity,
    /// Subgroup position within the owning group, for split practicals.
    pub subgroup: Option<usize>,
}

/// A timetabling instance with all catalog references resolved to indices.
#[derive(Debug, Clone)]
pub struct Problem {
    pub groups: Vec<Group>,
    pub subjects: Vec<Subject>,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    /// Owning group index per subject.
    subject_group: Vec<usize>,
    /// Certified subject indices per lecturer.
    lecturer_subjects: Vec<HashSet<usize>>,
    /// Lecturers certified for both subject and event type.
    capable: HashMap<(usize, EventType), Vec<usize>>,
    demands: Vec<Demand>,
}

impl Problem {
    /// Resolve catalogs into a problem, failing on duplicate ids or unknown
    /// references.
    pub fn new(catalogs: Catalogs) -> Result<Self> {
        let Catalogs {
            groups,
            subjects,
            lecturers,
            rooms,
        } = catalogs;

        let (subject_group, lecturer_subjects) = {
            let group_index =
                index_ids(groups.iter().map(|g| g.id.as_str()), EntityKind::Group)?;
            let subject_index =
                index_ids(subjects.iter().map(|s| s.id.as_str()), EntityKind::Subject)?;
            index_ids(lecturers.iter().map(|l| l.id.as_str()), EntityKind::Lecturer)?;
            index_ids(rooms.iter().map(|r| r.id.as_str()), EntityKind::Room)?;

            let subject_group = subjects
                .iter()
                .map(|s| {
                    group_index
                        .get(s.group.as_str())
                        .copied()
                        .ok_or_else(|| TimetableError::unknown_id(EntityKind::Group, &s.group))
                })
                .collect::<Result<Vec<_>>>()?;

            let lecturer_subjects = lecturers
                .iter()
                .map(|l| {
                    l.subjects
                        .iter()
                        .map(|id| {
                            subject_index.get(id.as_str()).copied().ok_or_else(|| {
                                TimetableError::unknown_id(EntityKind::Subject, id)
                            })
                        })
                        .collect::<Result<HashSet<_>>>()
                })
                .collect::<Result<Vec<_>>>()?;

            (subject_group, lecturer_subjects)
        };

        let mut capable: HashMap<(usize, EventType), Vec<usize>> = HashMap::new();
        for (lecturer, subjects_taught) in lecturer_subjects.iter().enumerate() {
            let mut taught: Vec<usize> = subjects_taught.iter().copied().collect();
            taught.sort_unstable();
            for subject in taught {
                for &event_type in &[EventType::Lecture, EventType::Practical] {
                    if lecturers[lecturer].event_types.contains(&event_type) {
                        capable.entry((subject, event_type)).or_default().push(lecturer);
                    }
                }
            }
        }

        let demands = expand_demands(&subjects, &subject_group, &groups);

        Ok(Problem {
            groups,
            subjects,
            lecturers,
            rooms,
            subject_group,
            lecturer_subjects,
            capable,
            demands,
        })
    }

    /// Load and resolve catalogs from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Problem::new(Catalogs::from_json_file(path)?)
    }

    pub fn group(&self, index: usize) -> Result<&Group> {
        self.groups
            .get(index)
            .ok_or_else(|| TimetableError::unknown_index(EntityKind::Group, index))
    }

    pub fn subject(&self, index: usize) -> Result<&Subject> {
        self.subjects
            .get(index)
            .ok_or_else(|| TimetableError::unknown_index(EntityKind::Subject, index))
    }

    pub fn lecturer(&self, index: usize) -> Result<&Lecturer> {
        self.lecturers
            .get(index)
            .ok_or_else(|| TimetableError::unknown_index(EntityKind::Lecturer, index))
    }

    pub fn room(&self, index: usize) -> Result<&Room> {
        self.rooms
            .get(index)
            .ok_or_else(|| TimetableError::unknown_index(EntityKind::Room, index))
    }

    /// Index of the group owning a subject.
    pub fn subject_group(&self, subject: usize) -> Result<usize> {
        self.subject_group
            .get(subject)
            .copied()
            .ok_or_else(|| TimetableError::unknown_index(EntityKind::Subject, subject))
    }

    /// Whether a lecturer is certified for a subject.
    pub fn can_teach_subject(&self, lecturer: usize, subject: usize) -> Result<bool> {
        self.lecturer_subjects
            .get(lecturer)
            .map(|taught| taught.contains(&subject))
            .ok_or_else(|| TimetableError::unknown_index(EntityKind::Lecturer, lecturer))
    }

    /// Whether a lecturer is certified for an event type.
    pub fn can_teach_type(&self, lecturer: usize, event_type: EventType) -> Result<bool> {
        Ok(self.lecturer(lecturer)?.event_types.contains(&event_type))
    }

    /// Lecturers certified for both the subject and the event type.
    pub fn capable_lecturers(&self, subject: usize, event_type: EventType) -> &[usize] {
        self.capable
            .get(&(subject, event_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Events every schedule should contain, in generation order.
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Seats needed for a group, halved when only one subgroup attends.
    pub fn attendees(&self, group: usize, split: bool) -> Result<u32> {
        let group = self.group(group)?;
        Ok(if split { group.half() } else { group.students })
    }
}

fn index_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: EntityKind,
) -> Result<HashMap<&'a str, usize>> {
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if index.insert(id, i).is_some() {
            return Err(TimetableError::DuplicateEntity {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(index)
}

/// Per subject and parity: lectures first, then practicals, one per subgroup
/// when the subject requires subgroups. A subject requiring subgroups whose
/// group has none gets whole-group practicals instead.
fn expand_demands(subjects: &[Subject], subject_group: &[usize], groups: &[Group]) -> Vec<Demand> {
    let mut demands = Vec::new();

    for (subject_idx, subject) in subjects.iter().enumerate() {
        let subgroup_count = groups[subject_group[subject_idx]].subgroups.len();

        for &week in subject.week_type.parities() {
            for _ in 0..subject.lectures {
                demands.push(Demand {
                    subject: subject_idx,
                    event_type: EventType::Lecture,
                    week,
                    subgroup: None,
                });
            }

            for _ in 0..subject.practicals {
                if subject.requires_subgroups && subgroup_count > 0 {
                    for subgroup in 0..subgroup_count {
                        demands.push(Demand {
                            subject: subject_idx,
                            event_type: EventType::Practical,
                            week,
                            subgroup: Some(subgroup),
                        });
                    }
                } else {
                    demands.push(Demand {
                        subject: subject_idx,
                        event_type: EventType::Practical,
                        week,
                        subgroup: None,
                    });
                }
            }
        }
    }

    demands
}
