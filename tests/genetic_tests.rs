//! Unit tests for the mutation and crossover operators.

use timetable_ga::config::{Config, MutationOperator};
use timetable_ga::generator::Generator;
use timetable_ga::genetic::{can_swap_timeslots, swap_count, Genetic};
use timetable_ga::problem::{Catalogs, Group, Lecturer, Problem, Room, Subject};
use timetable_ga::schedule::{Event, EventCore, Schedule};
use timetable_ga::synthetic::SyntheticSpec;
use timetable_ga::timeslot::{EventType, TimeSlot, WeekParity};
use timetable_ga::utils::seeded_rng;

/// Two groups with one subject each and two interchangeable lecturers.
fn create_test_problem() -> Problem {
    let catalogs = Catalogs {
        groups: vec![Group::new("G1", 20, vec![]), Group::new("G2", 20, vec![])],
        subjects: vec![
            Subject::new("S1", "Mathematics", "G1", 1, 1),
            Subject::new("S2", "Physics", "G2", 1, 1),
        ],
        lecturers: vec![
            Lecturer::new(
                "L1",
                "Bob",
                ["S1", "S2"],
                [EventType::Lecture, EventType::Practical],
                20.0,
            ),
            Lecturer::new(
                "L2",
                "Alice",
                ["S1", "S2"],
                [EventType::Lecture, EventType::Practical],
                20.0,
            ),
        ],
        rooms: vec![Room::new("R1", 40), Room::new("R2", 40)],
    };
    Problem::new(catalogs).unwrap()
}

fn create_synthetic_problem() -> Problem {
    Problem::new(SyntheticSpec::default().generate(&mut seeded_rng(17))).unwrap()
}

fn event(demand: usize, event_type: EventType, group: usize, timeslot: TimeSlot, lecturer: usize, room: usize) -> Event {
    let core = EventCore {
        demand,
        subject: group,
        subject_name: format!("Subject {}", group),
        event_type,
        week: timeslot.parity(),
        groups: vec![group],
        subgroups: vec![],
    };
    Event::new(timeslot, lecturer, room, core).unwrap()
}

fn even(day: u8, period: u8) -> TimeSlot {
    TimeSlot::new(WeekParity::Even, day, period).unwrap()
}

fn odd(day: u8, period: u8) -> TimeSlot {
    TimeSlot::new(WeekParity::Odd, day, period).unwrap()
}

/// Sorted (timeslot, lecturer, room) triples, for permutation checks.
fn assignments(schedule: &Schedule) -> (Vec<TimeSlot>, Vec<usize>, Vec<usize>) {
    let mut slots: Vec<TimeSlot> = schedule.events().iter().map(|e| e.timeslot()).collect();
    let mut lecturers: Vec<usize> = schedule.events().iter().map(|e| e.lecturer).collect();
    let mut rooms: Vec<usize> = schedule.events().iter().map(|e| e.room).collect();
    slots.sort();
    lecturers.sort();
    rooms.sort();
    (slots, lecturers, rooms)
}

#[test]
fn test_swap_count() {
    assert_eq!(swap_count(0, 0.3), 0);
    assert_eq!(swap_count(1, 0.3), 0);
    assert_eq!(swap_count(2, 0.3), 2);
    assert_eq!(swap_count(3, 0.1), 2);
    assert_eq!(swap_count(10, 0.3), 4);
    assert_eq!(swap_count(10, 0.5), 6);
    assert_eq!(swap_count(20, 0.1), 2);
    assert_eq!(swap_count(5, 1.0), 4);
}

#[test]
fn test_can_swap_timeslots() {
    let lecture = event(0, EventType::Lecture, 0, even(0, 0), 0, 0);
    let own_practical = event(1, EventType::Practical, 0, even(1, 0), 0, 0);
    let other_practical = event(2, EventType::Practical, 1, even(2, 0), 0, 0);
    let other_lecture = event(3, EventType::Lecture, 1, even(3, 0), 0, 0);
    let odd_lecture = event(4, EventType::Lecture, 1, odd(0, 0), 0, 0);

    // A group would end up in a lecture and a practical at once
    assert!(!can_swap_timeslots(&lecture, &own_practical));
    assert!(can_swap_timeslots(&lecture, &other_practical));
    assert!(can_swap_timeslots(&lecture, &other_lecture));
    // Slots stay within their week parity
    assert!(!can_swap_timeslots(&lecture, &odd_lecture));
}

#[test]
fn test_swap_mutation_exchanges_whole_assignments() {
    let problem = create_test_problem();
    let config = Config::new().with_swap_probabilities(1.0, 1.0);
    let genetic = Genetic::new(&problem, &config);

    let original = Schedule::from_events(
        vec![
            event(0, EventType::Lecture, 0, even(0, 0), 0, 0),
            event(1, EventType::Lecture, 1, even(3, 2), 1, 1),
        ],
        2,
    );
    let mut mutated = original.clone();
    genetic.swap_mutation(&mut mutated, 0.3, &mut seeded_rng(5));

    let (first, second) = (&mutated.events()[0], &mutated.events()[1]);
    assert_eq!(first.timeslot(), even(3, 2));
    assert_eq!(first.lecturer, 1);
    assert_eq!(first.room, 1);
    assert_eq!(second.timeslot(), even(0, 0));
    assert_eq!(second.lecturer, 0);
    assert_eq!(second.room, 0);
    assert!(first.same_core(&original.events()[0]));
}

#[test]
fn test_swap_mutation_skips_conflicting_pairs() {
    let problem = create_test_problem();
    let config = Config::new().with_swap_probabilities(1.0, 1.0);
    let genetic = Genetic::new(&problem, &config);

    let original = Schedule::from_events(
        vec![
            event(0, EventType::Lecture, 0, even(0, 0), 0, 0),
            event(1, EventType::Practical, 0, even(1, 0), 1, 1),
        ],
        2,
    );
    let mut mutated = original.clone();
    genetic.swap_mutation(&mut mutated, 1.0, &mut seeded_rng(5));
    assert_eq!(mutated, original);
}

#[test]
fn test_mutation_preserves_events() {
    let problem = create_synthetic_problem();
    let generator = Generator::new(&problem, 3);
    let mut rng = seeded_rng(12);

    for operator in [MutationOperator::PairwiseSwap, MutationOperator::Resample] {
        let config = Config::new().with_mutation_operator(operator);
        let genetic = Genetic::new(&problem, &config);

        for _ in 0..10 {
            let original = generator.generate(&mut rng);
            let mut mutated = original.clone();
            genetic.mutate(&mut mutated, 0.5, &mut rng);

            assert_eq!(mutated.len(), original.len());
            assert_eq!(mutated.required(), original.required());
            for (before, after) in original.events().iter().zip(mutated.events()) {
                assert!(before.same_core(after));
                assert_eq!(after.timeslot().parity(), after.week());
            }
        }
    }
}

#[test]
fn test_swap_mutation_permutes_assignments() {
    let problem = create_synthetic_problem();
    let generator = Generator::new(&problem, 3);
    let genetic = Genetic::new(&problem, &Config::new());
    let mut rng = seeded_rng(31);

    let original = generator.generate(&mut rng);
    let mut mutated = original.clone();
    genetic.swap_mutation(&mut mutated, 0.6, &mut rng);

    assert_eq!(assignments(&mutated), assignments(&original));
}

#[test]
fn test_resample_keeps_lecturers_certified() {
    let problem = create_synthetic_problem();
    let generator = Generator::new(&problem, 3);
    let config = Config::new().with_resample_probability(1.0);
    let genetic = Genetic::new(&problem, &config);
    let mut rng = seeded_rng(40);

    let mut schedule = generator.generate(&mut rng);
    genetic.resample_mutation(&mut schedule, 1.0, &mut rng);

    for event in schedule.events() {
        assert!(problem
            .capable_lecturers(event.subject(), event.event_type())
            .contains(&event.lecturer));
        assert!(event.room < problem.rooms.len());
        assert_eq!(event.timeslot().parity(), event.week());
    }
}

#[test]
fn test_mutating_empty_schedule_is_noop() {
    let problem = create_test_problem();
    let mut empty = Schedule::new(3);

    for operator in [MutationOperator::PairwiseSwap, MutationOperator::Resample] {
        let config = Config::new().with_mutation_operator(operator);
        Genetic::new(&problem, &config).mutate(&mut empty, 0.5, &mut seeded_rng(0));
        assert!(empty.is_empty());
        assert_eq!(empty.unplaced(), 3);
    }
}

#[test]
fn test_crossover_splices_at_demand_cut() {
    let problem = create_test_problem();
    let genetic = Genetic::new(&problem, &Config::new().with_crossover_fraction(0.5));

    let parent = |lecturer| {
        Schedule::from_events(
            (0..4)
                .map(|d| event(d, EventType::Lecture, d % 2, even(d as u8, 0), lecturer, 0))
                .collect(),
            4,
        )
    };
    let first = parent(0);
    let second = parent(1);

    let (child_a, child_b) = genetic.crossover(&first, &second);
    let lecturers = |s: &Schedule| s.events().iter().map(|e| e.lecturer).collect::<Vec<_>>();

    assert_eq!(lecturers(&child_a), vec![0, 0, 1, 1]);
    assert_eq!(lecturers(&child_b), vec![1, 1, 0, 0]);
    assert_eq!(child_a.required(), 4);

    // Missing demands in a parent stay missing in the child that inherits them
    let partial = Schedule::from_events(vec![first.events()[3].clone()], 4);
    let (child, _) = genetic.crossover(&second, &partial);
    assert_eq!(child.len(), 3);
    assert_eq!(child.unplaced(), 1);
}
