//! Unit tests for population management and the ecological operators.

use timetable_ga::config::Config;
use timetable_ga::evaluator::{Evaluator, Fitness};
use timetable_ga::generator::Generator;
use timetable_ga::genetic::Genetic;
use timetable_ga::individual::Individual;
use timetable_ga::population::{breed, rain, smooth, Population};
use timetable_ga::problem::Problem;
use timetable_ga::schedule::Schedule;
use timetable_ga::synthetic::SyntheticSpec;
use timetable_ga::utils::seeded_rng;

fn create_test_problem() -> Problem {
    let sizes = SyntheticSpec {
        groups: 4,
        subjects: 6,
        lecturers: 5,
        rooms: 4,
    };
    Problem::new(sizes.generate(&mut seeded_rng(6))).unwrap()
}

/// An individual with a fixed score, tagged through its required count.
fn scored(score: u32, tag: usize) -> Individual {
    let mut individual = Individual::new(Schedule::new(tag));
    individual.fitness = Some(Fitness {
        room_capacity: score,
        ..Fitness::default()
    });
    individual
}

fn scores(population: &Population) -> Vec<u64> {
    population.individuals.iter().map(Individual::score).collect()
}

#[test]
fn test_select_keeps_better_half() {
    let mut population = Population::from_individuals(vec![
        scored(7, 0),
        scored(2, 1),
        scored(9, 2),
        scored(4, 3),
        scored(1, 4),
    ]);

    population.select();
    assert_eq!(scores(&population), vec![1, 2]);

    population.select();
    assert_eq!(scores(&population), vec![1]);

    // A single survivor is never culled
    population.select();
    assert_eq!(scores(&population), vec![1]);
    assert_eq!(population.best().map(Individual::score), Some(1));
}

#[test]
fn test_select_is_stable_for_ties() {
    let mut population = Population::from_individuals(vec![
        scored(3, 10),
        scored(1, 11),
        scored(3, 12),
        scored(1, 13),
        scored(3, 14),
        scored(5, 15),
    ]);

    population.select();
    let tags: Vec<usize> = population
        .individuals
        .iter()
        .map(|i| i.schedule.required())
        .collect();
    assert_eq!(tags, vec![11, 13, 10]);
}

#[test]
fn test_unevaluated_individuals_rank_last() {
    let mut population = Population::from_individuals(vec![
        Individual::new(Schedule::new(0)),
        scored(1000, 1),
    ]);

    population.select();
    assert_eq!(scores(&population), vec![1000]);
    assert!(Population::new().best().is_none());
}

#[test]
fn test_evaluate_scores_only_new_individuals() {
    let problem = create_test_problem();
    let generator = Generator::new(&problem, 3);
    let evaluator = Evaluator::default();

    let mut population = Population::initialize(&generator, 6, &mut seeded_rng(1));
    population.extend([scored(42, 0)]);
    assert_eq!(population.len(), 7);

    population.evaluate(&evaluator, &problem).unwrap();
    assert!(population.individuals.iter().all(Individual::is_evaluated));
    // Already scored individuals are not rescored
    assert_eq!(population.individuals[6].score(), 42);

    for individual in &population.individuals[..6] {
        let fitness = evaluator.evaluate(&individual.schedule, &problem).unwrap();
        assert_eq!(individual.fitness, Some(fitness));
    }
}

#[test]
fn test_mutate_is_reproducible_and_invalidates() {
    let problem = create_test_problem();
    let generator = Generator::new(&problem, 3);
    let genetic = Genetic::new(&problem, &Config::new());
    let evaluator = Evaluator::default();

    let mut population = Population::initialize(&generator, 10, &mut seeded_rng(2));
    population.evaluate(&evaluator, &problem).unwrap();
    let mut twin = population.clone();

    population.mutate(&genetic, 1.0, 0.5, &mut seeded_rng(3));
    twin.mutate(&genetic, 1.0, 0.5, &mut seeded_rng(3));

    assert!(population.individuals.iter().all(|i| !i.is_evaluated()));
    let schedules: Vec<&Schedule> = population.individuals.iter().map(|i| &i.schedule).collect();
    let twins: Vec<&Schedule> = twin.individuals.iter().map(|i| &i.schedule).collect();
    assert_eq!(schedules, twins);

    let mut untouched = twin.clone();
    untouched.evaluate(&evaluator, &problem).unwrap();
    let before = untouched.clone();
    untouched.mutate(&genetic, 0.0, 0.5, &mut seeded_rng(4));
    assert!(untouched.individuals.iter().all(Individual::is_evaluated));
    assert_eq!(scores(&untouched), scores(&before));
}

#[test]
fn test_smooth_and_rain_sizes() {
    let problem = create_test_problem();
    let generator = Generator::new(&problem, 3);
    let genetic = Genetic::new(&problem, &Config::new());
    let mut rng = seeded_rng(9);

    let best = Individual::new(generator.generate(&mut rng));
    let smoothed = smooth(&best, 5, &genetic, 0.1, &mut rng);
    assert_eq!(smoothed.len(), 5);
    for individual in &smoothed {
        assert!(!individual.is_evaluated());
        assert_eq!(individual.schedule.len(), best.schedule.len());
    }

    let fresh = rain(&generator, 4, &mut rng);
    assert_eq!(fresh.len(), 4);
    assert!(fresh
        .iter()
        .all(|i| i.schedule.required() == problem.demands().len()));

    assert!(smooth(&best, 0, &genetic, 0.1, &mut rng).is_empty());
    assert!(rain(&generator, 0, &mut rng).is_empty());
}

#[test]
fn test_breed_pairs_neighbours() {
    let problem = create_test_problem();
    let generator = Generator::new(&problem, 3);
    let genetic = Genetic::new(&problem, &Config::new());

    let parents = rain(&generator, 5, &mut seeded_rng(14));
    let children = breed(&parents, &genetic);

    // The odd one out has no partner
    assert_eq!(children.len(), 4);
    assert!(children.iter().all(|c| !c.is_evaluated()));

    let (first, second) = genetic.crossover(&parents[0].schedule, &parents[1].schedule);
    assert_eq!(children[0].schedule, first);
    assert_eq!(children[1].schedule, second);
}
