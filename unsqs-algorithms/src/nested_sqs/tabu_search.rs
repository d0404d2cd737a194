use super::split_cost::{SplitCostModel, NUM_SPLITS};
use log::{debug, info, warn};
use logging_timer::time;
use ndarray::Array2;
use rand::Rng;
use unsqs_challenges::{UnsqsError, UnsqsResult};

const ESCAPE_WARN_INTERVAL: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabuConfig {
    pub tabu_tenure: u64,
    pub random_move_prob: f64,
    /// `None` searches until the cost reaches zero, however long that takes.
    pub max_iterations: Option<u64>,
    /// Iterations between progress log lines; 0 disables them.
    pub log_interval: u64,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tabu_tenure: 7,
            random_move_prob: 0.1,
            max_iterations: None,
            log_interval: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub block: usize,
    pub option: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Greedy,
    /// Greedy choice replaced with probability `random_move_prob`.
    Diversify,
    /// Every move was tabu.
    Escape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabuStats {
    pub greedy_moves: u64,
    pub diversify_moves: u64,
    pub escape_moves: u64,
    pub aspirations: u64,
}

pub struct TabuSearch<R: Rng> {
    model: SplitCostModel,
    /// `tabu[[block, option]]`: first iteration at which moving `block` to
    /// `option` is allowed again.
    tabu: Array2<u64>,
    iteration: u64,
    current_cost: f64,
    best_cost: f64,
    config: TabuConfig,
    rng: R,
    stats: TabuStats,
}

impl<R: Rng> TabuSearch<R> {
    pub fn new(model: SplitCostModel, config: TabuConfig, rng: R) -> Self {
        let current_cost = model.cost();
        Self {
            tabu: Array2::zeros((model.num_blocks(), NUM_SPLITS)),
            model,
            iteration: 0,
            current_cost,
            best_cost: current_cost,
            config,
            rng,
            stats: TabuStats::default(),
        }
    }

    pub fn model(&self) -> &SplitCostModel {
        &self.model
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn current_cost(&self) -> f64 {
        self.current_cost
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub fn stats(&self) -> TabuStats {
        self.stats
    }

    pub fn is_tabu(&self, mv: Move) -> bool {
        self.iteration < self.tabu[[mv.block, mv.option]]
    }

    /// Smallest-delta move that is either not tabu or beats the best cost
    /// seen. Ties keep the first move in block-then-option order.
    pub fn best_admissible_move(&self) -> Option<(Move, f64)> {
        let mut best: Option<(Move, f64)> = None;
        for block in 0..self.model.num_blocks() {
            let current = self.model.split(block);
            for option in (0..NUM_SPLITS).filter(|&o| o != current) {
                let mv = Move { block, option };
                let delta = self.model.delta(block, option);
                if self.is_tabu(mv) && self.current_cost + delta >= self.best_cost {
                    continue;
                }
                if best.map_or(true, |(_, best_delta)| delta < best_delta) {
                    best = Some((mv, delta));
                }
            }
        }
        best
    }

    fn random_move(&mut self) -> Move {
        let block = self.rng.gen_range(0..self.model.num_blocks());
        let current = self.model.split(block);
        let option = (current + 1 + self.rng.gen_range(0..NUM_SPLITS - 1)) % NUM_SPLITS;
        Move { block, option }
    }

    /// Chooses and applies one move.
    pub fn step(&mut self) -> (Move, MoveKind) {
        self.iteration += 1;
        let (mv, kind) = match self.best_admissible_move() {
            None => (self.random_move(), MoveKind::Escape),
            Some((mv, delta)) => {
                if self.rng.gen::<f64>() < self.config.random_move_prob {
                    (self.random_move(), MoveKind::Diversify)
                } else {
                    if self.is_tabu(mv) {
                        debug_assert!(self.current_cost + delta < self.best_cost);
                        self.stats.aspirations += 1;
                    }
                    (mv, MoveKind::Greedy)
                }
            }
        };
        match kind {
            MoveKind::Greedy => self.stats.greedy_moves += 1,
            MoveKind::Diversify => self.stats.diversify_moves += 1,
            MoveKind::Escape => self.stats.escape_moves += 1,
        }
        self.apply(mv);
        (mv, kind)
    }

    fn apply(&mut self, mv: Move) {
        let old_option = self.model.split(mv.block);
        self.model.commit(mv.block, mv.option);
        self.tabu[[mv.block, old_option]] =
            self.iteration.saturating_add(self.config.tabu_tenure);
        self.current_cost = self.model.cost();
        if self.current_cost < self.best_cost {
            self.best_cost = self.current_cost;
        }
    }

    /// Iterates until every used pair hits its target count and exactly `P`
    /// pairs are used. Only returns an error when `max_iterations` is set and
    /// runs out first.
    #[time]
    pub fn run(&mut self) -> UnsqsResult<()> {
        info!(
            "tabu search over {} blocks, initial cost {}",
            self.model.num_blocks(),
            self.current_cost
        );
        while !self.model.is_solved() {
            if let Some(max_iterations) = self.config.max_iterations {
                if self.iteration >= max_iterations {
                    warn!(
                        "tabu search stopped after {} iterations, best cost {}",
                        self.iteration, self.best_cost
                    );
                    return Err(UnsqsError::SearchExhausted {
                        iterations: self.iteration,
                        best_cost: self.best_cost,
                    });
                }
            }
            let (_, kind) = self.step();
            if kind == MoveKind::Escape && self.stats.escape_moves % ESCAPE_WARN_INTERVAL == 0 {
                warn!(
                    "{} escape moves in {} iterations, tabu_tenure {} may be too long for {} blocks",
                    self.stats.escape_moves,
                    self.iteration,
                    self.config.tabu_tenure,
                    self.model.num_blocks()
                );
            }
            if self.config.log_interval > 0 && self.iteration % self.config.log_interval == 0 {
                debug!(
                    "iteration {}: cost {} (best {}), {} distinct pairs, {:?}",
                    self.iteration,
                    self.current_cost,
                    self.best_cost,
                    self.model.distinct_pairs(),
                    self.stats
                );
            }
        }
        info!(
            "tabu search reached cost 0 after {} iterations ({} escape moves)",
            self.iteration, self.stats.escape_moves
        );
        Ok(())
    }
}
