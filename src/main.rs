//! Command line entry point: search a timetable for JSON or synthetic catalogs.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use timetable_ga::config::{Config, MutationOperator, Strategy};
use timetable_ga::evaluator::{ConstraintSet, OverloadPenalty};
use timetable_ga::problem::{Catalogs, Problem};
use timetable_ga::synthetic::SyntheticSpec;
use timetable_ga::utils::{lecturer_hours, seeded_rng, SearchStatistics};
use timetable_ga::TimetableAlgorithm;

#[derive(Parser, Debug)]
#[command(name = "timetable", version, about = "Evolutionary weekly timetable search")]
struct Args {
    /// JSON file with groups, subjects, lecturers and rooms; synthetic catalogs when absent
    #[arg(long)]
    catalogs: Option<PathBuf>,

    /// Synthetic catalogs: number of groups
    #[arg(long, default_value_t = 6)]
    groups: usize,

    /// Synthetic catalogs: number of subjects
    #[arg(long, default_value_t = 10)]
    subjects: usize,

    /// Synthetic catalogs: number of lecturers
    #[arg(long, default_value_t = 8)]
    lecturers: usize,

    /// Synthetic catalogs: number of rooms
    #[arg(long, default_value_t = 6)]
    rooms: usize,

    /// Random seed; a fresh one is drawn and logged when absent
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    population: usize,

    #[arg(long, default_value_t = 100)]
    generations: usize,

    /// Penalise idle periods between lessons
    #[arg(long)]
    gaps: bool,

    /// Scale the overload penalty by the size of the overrun
    #[arg(long)]
    scaled_overload: bool,

    /// Refill the population by crossover instead of smoothing and rain
    #[arg(long)]
    crossover: bool,

    /// Mutate by resampling single events instead of swapping pairs
    #[arg(long)]
    resample: bool,

    /// Time limit in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Print the best schedule as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let catalogs = match &args.catalogs {
        Some(path) => Catalogs::from_json_file(path)?,
        None => {
            let sizes = SyntheticSpec {
                groups: args.groups,
                subjects: args.subjects,
                lecturers: args.lecturers,
                rooms: args.rooms,
            };
            sizes.generate(&mut seeded_rng(args.seed.unwrap_or(0)))
        }
    };
    let problem = Problem::new(catalogs)?;

    let overload = if args.scaled_overload {
        OverloadPenalty::Scaled
    } else {
        OverloadPenalty::Flat
    };
    let mut config = Config::new()
        .with_population_size(args.population)
        .with_max_generations(args.generations)
        .with_constraints(
            ConstraintSet::new()
                .with_gap_penalty(args.gaps)
                .with_overload(overload),
        );
    if args.crossover {
        config = config.with_strategy(Strategy::Crossover);
    }
    if args.resample {
        config = config.with_mutation_operator(MutationOperator::Resample);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(seconds) = args.time_limit {
        config = config.with_time_limit(Duration::from_secs(seconds));
    }

    let mut algorithm = TimetableAlgorithm::new(problem, config)?;
    let outcome = algorithm.run()?;
    let best = &outcome.best;

    let statistics = SearchStatistics {
        seed: outcome.seed,
        generations: outcome.generations,
        runtime: outcome.run_time,
        best_fitness: best.fitness.unwrap_or_default(),
        events: best.schedule.len(),
        unplaced: best.schedule.unplaced(),
    };
    println!("{}", statistics.format());
    println!("Termination: {:?}", outcome.termination);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&best.schedule)?);
        return Ok(());
    }

    let problem = &algorithm.problem;
    for (slot, events) in best.schedule.by_timeslot() {
        println!("{}", slot);
        for event in events {
            let groups: Vec<&str> = event
                .groups()
                .iter()
                .filter_map(|&g| problem.groups.get(g).map(|group| group.id.as_str()))
                .collect();
            println!(
                "  {} [{}] groups {} | lecturer {} | room {}",
                event.subject_name(),
                event.event_type(),
                groups.join(", "),
                problem.lecturer(event.lecturer)?.name,
                problem.room(event.room)?.id
            );
        }
    }

    println!("Lecturer hours:");
    for ((lecturer, parity), hours) in lecturer_hours(&best.schedule, problem) {
        println!("  {} ({}): {:.1}", lecturer, parity, hours);
    }

    Ok(())
}
