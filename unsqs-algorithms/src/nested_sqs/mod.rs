// Two phases: an exact cover search builds an SQS(v), then a tabu search
// picks one of three splits per block until the ND-pairs are uniform.
mod exact_cover;
mod split_cost;
mod tabu_search;
mod universe;

pub use exact_cover::{construct_sqs, ExactCover, ExactCoverStats};
pub use split_cost::{split_pairs, Pair, SplitCostModel, NUM_SPLITS};
pub use tabu_search::{Move, MoveKind, TabuConfig, TabuSearch, TabuStats};
pub use universe::{binomial, Block, Universe};

use anyhow::{anyhow, Result};
use log::info;
use logging_timer::time;
use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use unsqs_challenges::{
    nested_sqs::{Challenge, Solution},
    UnsqsError, UnsqsResult,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Hyperparameters {
    pub tabu_tenure: u64,
    pub penalty_weight: f64,
    pub random_move_prob: f64,
    pub max_iterations: Option<u64>,
    pub log_interval: u64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        let config = TabuConfig::default();
        Self {
            tabu_tenure: config.tabu_tenure,
            penalty_weight: 1000.0,
            random_move_prob: config.random_move_prob,
            max_iterations: config.max_iterations,
            log_interval: config.log_interval,
        }
    }
}

impl Hyperparameters {
    pub fn from_map(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        let hp = match hyperparameters {
            Some(hp) => serde_json::from_value::<Hyperparameters>(Value::Object(hp.clone()))
                .map_err(|e| anyhow!("Failed to parse hyperparameters: {}", e))?,
            None => Hyperparameters::default(),
        };
        hp.validate()?;
        Ok(hp)
    }

    pub fn validate(&self) -> UnsqsResult<()> {
        if !self.penalty_weight.is_finite() || self.penalty_weight < 0.0 {
            return Err(UnsqsError::InvalidHyperparameter {
                name: "penalty_weight",
                reason: format!("{} is not a finite non-negative weight", self.penalty_weight),
            });
        }
        if !(0.0..=1.0).contains(&self.random_move_prob) {
            return Err(UnsqsError::InvalidHyperparameter {
                name: "random_move_prob",
                reason: format!("{} is not a probability", self.random_move_prob),
            });
        }
        Ok(())
    }

    pub fn tabu_config(&self) -> TabuConfig {
        TabuConfig {
            tabu_tenure: self.tabu_tenure,
            random_move_prob: self.random_move_prob,
            max_iterations: self.max_iterations,
            log_interval: self.log_interval,
        }
    }
}

#[time]
pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let hp = Hyperparameters::from_map(hyperparameters)?;

    let blocks = construct_sqs(challenge.num_points())?;
    info!(
        "SQS({}) constructed with {} blocks",
        challenge.num_points(),
        blocks.len()
    );

    let model = SplitCostModel::for_challenge(challenge, blocks, hp.penalty_weight);
    let rng = SmallRng::seed_from_u64(challenge.seed);
    let mut search = TabuSearch::new(model, hp.tabu_config(), rng);
    search.run()?;

    save_solution(&search.model().to_solution())?;
    Ok(())
}

pub fn help() {
    println!("Exact cover SQS construction followed by tabu search over block splits.");
    println!("Hyperparameters:");
    println!("  tabu_tenure: iterations a vacated split stays forbidden (default: 7)");
    println!("  penalty_weight: weight of the distinct pair count term (default: 1000.0)");
    println!("  random_move_prob: probability of replacing the greedy move (default: 0.1)");
    println!("  max_iterations: optional cap on tabu iterations (default: unbounded)");
    println!("  log_interval: iterations between debug progress lines (default: 10000)");
}
