use anyhow::{anyhow, Result};
use clap::{arg, value_parser, Arg, ArgAction, Command};
use log::info;
use serde_json::{json, Map, Value};
use std::{cell::RefCell, fs, path::PathBuf};
use unsqs_algorithms::nested_sqs as algorithm;
use unsqs_challenges::{
    nested_sqs::{Challenge, Solution, Track},
    ErrorKind, UnsqsError,
};
use unsqs_utils::{compress_obj, dejsonify, jsonify, read_input_arg};

fn one_indexed_arg() -> Arg {
    Arg::new("one-indexed")
        .long("one-indexed")
        .help("Points are numbered from 1 instead of 0")
        .action(ArgAction::SetTrue)
}

fn cli() -> Command {
    Command::new("unsqs")
        .about("Constructs or verifies uniform nested Steiner quadruple systems")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compute_solution")
                .about("Computes a UNSQS and prints one block per line")
                .arg(arg!(<V> "Number of points").value_parser(value_parser!(usize)))
                .arg(arg!(<P> "Number of distinct ND-pairs").value_parser(value_parser!(usize)))
                .arg(arg!(<SEED> "Seed for the tabu search").value_parser(value_parser!(u64)))
                .arg(
                    arg!([TABU_TENURE] "Iterations a vacated split stays tabu")
                        .default_value("7")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    arg!([PENALTY_WEIGHT] "Weight of the distinct pair count term")
                        .default_value("1000.0")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    arg!([RANDOM_MOVE_PROB] "Probability of a random diversification move")
                        .default_value("0.1")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("max-iterations")
                        .long("max-iterations")
                        .value_name("N")
                        .help("Give up after this many tabu iterations")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the solution is also saved to this file path as json")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress [COMPRESS] "If output file is set, the solution is compressed as zlib")
                        .action(ArgAction::SetTrue),
                )
                .arg(one_indexed_arg()),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Verifies a solution")
                .arg(arg!(<V> "Number of points").value_parser(value_parser!(usize)))
                .arg(arg!(<P> "Number of distinct ND-pairs").value_parser(value_parser!(usize)))
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to a json or text file, or '-' for stdin")
                        .value_parser(value_parser!(String)),
                )
                .arg(one_indexed_arg()),
        )
        .subcommand(Command::new("hyperparameters").about("Describes the search hyperparameters"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("compute_solution", sub_m)) => compute_solution(
            Track {
                v: *sub_m.get_one::<usize>("V").unwrap(),
                p: *sub_m.get_one::<usize>("P").unwrap(),
            },
            *sub_m.get_one::<u64>("SEED").unwrap(),
            hyperparameters(
                *sub_m.get_one::<u64>("TABU_TENURE").unwrap(),
                *sub_m.get_one::<f64>("PENALTY_WEIGHT").unwrap(),
                *sub_m.get_one::<f64>("RANDOM_MOVE_PROB").unwrap(),
                sub_m.get_one::<u64>("max-iterations").cloned(),
            ),
            sub_m.get_one::<PathBuf>("output").cloned(),
            sub_m.get_flag("compress"),
            sub_m.get_flag("one-indexed"),
        ),
        Some(("verify_solution", sub_m)) => verify_solution(
            Track {
                v: *sub_m.get_one::<usize>("V").unwrap(),
                p: *sub_m.get_one::<usize>("P").unwrap(),
            },
            sub_m.get_one::<String>("SOLUTION").unwrap(),
            sub_m.get_flag("one-indexed"),
        ),
        Some(("hyperparameters", _)) => {
            algorithm::help();
            Ok(())
        }
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<UnsqsError>().map(UnsqsError::kind) {
        Some(ErrorKind::SearchExhausted) => 85,
        _ => 1,
    }
}

fn hyperparameters(
    tabu_tenure: u64,
    penalty_weight: f64,
    random_move_prob: f64,
    max_iterations: Option<u64>,
) -> Map<String, Value> {
    let mut hp = Map::new();
    hp.insert("tabu_tenure".to_string(), json!(tabu_tenure));
    hp.insert("penalty_weight".to_string(), json!(penalty_weight));
    hp.insert("random_move_prob".to_string(), json!(random_move_prob));
    if let Some(max_iterations) = max_iterations {
        hp.insert("max_iterations".to_string(), json!(max_iterations));
    }
    hp
}

pub fn compute_solution(
    track: Track,
    seed: u64,
    hyperparameters: Map<String, Value>,
    output_file: Option<PathBuf>,
    compress: bool,
    one_indexed: bool,
) -> Result<()> {
    let challenge = Challenge::generate_instance(seed, &track)?;
    info!(
        "V={} P={} F_target={} blocks={}",
        track.v, track.p, challenge.f_target, challenge.required_blocks
    );

    let solution = RefCell::new(None);
    let save_solution_fn = |s: &Solution| -> Result<()> {
        *solution.borrow_mut() = Some(s.clone());
        Ok(())
    };
    algorithm::solve_challenge(&challenge, &save_solution_fn, &Some(hyperparameters))?;
    let solution = solution
        .into_inner()
        .ok_or_else(|| anyhow!("Search finished without saving a solution"))?;

    if let Some(path) = output_file {
        if compress {
            fs::write(&path, compress_obj(&solution)?)?;
        } else {
            fs::write(&path, jsonify(&solution)?)?;
        }
        info!("solution written to: {:?}", path);
    }
    print!("{}", solution.to_text(one_indexed));
    Ok(())
}

pub fn verify_solution(track: Track, solution: &str, one_indexed: bool) -> Result<()> {
    let challenge = Challenge::generate_instance(0, &track)?;
    let solution = load_solution(solution, one_indexed)?;
    challenge.verify_solution(&solution)?;
    println!("Solution is valid");
    Ok(())
}

fn load_solution(solution: &str, one_indexed: bool) -> Result<Solution> {
    let content = read_input_arg(solution)?;
    if content.trim_start().starts_with('{') {
        let solution = dejsonify::<Solution>(&content)
            .map_err(|e| anyhow!("Failed to parse solution: {}", e))?;
        if one_indexed {
            return Ok(Solution::from_text(&solution.to_text(false), true)?);
        }
        Ok(solution)
    } else {
        Ok(Solution::from_text(&content, one_indexed)?)
    }
}
