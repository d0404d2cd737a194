use super::universe::{Block, Universe};
use log::{debug, info};
use logging_timer::time;
use unsqs_challenges::{UnsqsError, UnsqsResult};

const PROGRESS_INTERVAL: u64 = 1_000_000;

/// One decision level: the triple being covered and how far through its
/// candidate list the search has gone.
#[derive(Debug, Clone, Copy)]
struct Frame {
    triple: usize,
    cursor: usize,
    chosen: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactCoverStats {
    pub nodes: u64,
    pub backtracks: u64,
    pub max_depth: usize,
}

/// Backtracking search for a family of blocks covering every triple exactly
/// once. Always branches on the uncovered triple with the fewest available
/// candidates; lower triple ids win ties.
pub struct ExactCover<'a> {
    universe: &'a Universe,
    covered: Vec<bool>,
    /// Per candidate, how many of its triples are covered. A candidate is
    /// available iff this is zero.
    blocked_by: Vec<u8>,
    /// Per triple, how many of its candidates are available.
    available: Vec<usize>,
    frames: Vec<Frame>,
    stats: ExactCoverStats,
}

impl<'a> ExactCover<'a> {
    pub fn new(universe: &'a Universe) -> Self {
        let available = (0..universe.num_triples())
            .map(|t| universe.covering(t).len())
            .collect();
        Self {
            universe,
            covered: vec![false; universe.num_triples()],
            blocked_by: vec![0; universe.num_candidates()],
            available,
            frames: Vec::with_capacity(universe.required_blocks()),
            stats: ExactCoverStats::default(),
        }
    }

    pub fn stats(&self) -> ExactCoverStats {
        self.stats
    }

    pub fn is_covered(&self, t: usize) -> bool {
        self.covered[t]
    }

    /// Live count of candidates that could still cover triple `t`.
    pub fn available_candidates(&self, t: usize) -> usize {
        self.available[t]
    }

    pub fn is_available(&self, candidate: usize) -> bool {
        self.blocked_by[candidate] == 0
    }

    /// Runs the search to completion. Consults no random source, so the
    /// result depends only on the point count.
    #[time]
    pub fn solve(&mut self) -> UnsqsResult<Vec<Block>> {
        let required = self.universe.required_blocks();
        if required == 0 {
            return Ok(Vec::new());
        }
        if let Some(t) = self.select_triple() {
            self.push_frame(t);
        }

        loop {
            let level = match self.frames.len() {
                0 => {
                    return Err(UnsqsError::ConstructionFailed {
                        v: self.universe.num_points(),
                        nodes: self.stats.nodes,
                    })
                }
                len => len - 1,
            };

            if let Some(previous) = self.frames[level].chosen.take() {
                self.release(previous);
                self.stats.backtracks += 1;
            }

            let Frame { triple, cursor, .. } = self.frames[level];
            let next = self.universe.covering(triple)[cursor..]
                .iter()
                .position(|&c| self.blocked_by[c] == 0)
                .map(|offset| cursor + offset);

            let Some(pos) = next else {
                self.frames.pop();
                continue;
            };
            let candidate = self.universe.covering(triple)[pos];
            self.frames[level].cursor = pos + 1;
            self.frames[level].chosen = Some(candidate);
            self.select(candidate);
            self.stats.nodes += 1;
            if self.stats.nodes % PROGRESS_INTERVAL == 0 {
                debug!(
                    "exact cover: {} nodes, depth {}/{}",
                    self.stats.nodes,
                    self.frames.len(),
                    required
                );
            }

            if self.frames.len() == required {
                let blocks = self.chosen_blocks()?;
                info!(
                    "exact cover for v={} found after {} nodes ({} backtracks)",
                    self.universe.num_points(),
                    self.stats.nodes,
                    self.stats.backtracks
                );
                return Ok(blocks);
            }

            // On a dead end the frame stays put and its choice is undone on
            // the next pass.
            if let Some(t) = self.select_triple() {
                self.push_frame(t);
            }
        }
    }

    fn push_frame(&mut self, triple: usize) {
        self.frames.push(Frame {
            triple,
            cursor: 0,
            chosen: None,
        });
        self.stats.max_depth = self.stats.max_depth.max(self.frames.len());
    }

    /// Most constrained uncovered triple, or `None` if some uncovered triple
    /// has no candidate left (or nothing is uncovered).
    fn select_triple(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for t in 0..self.covered.len() {
            if self.covered[t] {
                continue;
            }
            let count = self.available[t];
            if count == 0 {
                return None;
            }
            if best.map_or(true, |(_, best_count)| count < best_count) {
                best = Some((t, count));
            }
        }
        best.map(|(t, _)| t)
    }

    fn select(&mut self, candidate: usize) {
        let universe = self.universe;
        for &t in &universe.candidate(candidate).triples {
            debug_assert!(!self.covered[t]);
            self.covered[t] = true;
            for &c in universe.covering(t) {
                self.blocked_by[c] += 1;
                if self.blocked_by[c] == 1 {
                    for &u in &universe.candidate(c).triples {
                        self.available[u] -= 1;
                    }
                }
            }
        }
    }

    fn release(&mut self, candidate: usize) {
        let universe = self.universe;
        for &t in universe.candidate(candidate).triples.iter().rev() {
            debug_assert!(self.covered[t]);
            self.covered[t] = false;
            for &c in universe.covering(t) {
                self.blocked_by[c] -= 1;
                if self.blocked_by[c] == 0 {
                    for &u in &universe.candidate(c).triples {
                        self.available[u] += 1;
                    }
                }
            }
        }
    }

    fn chosen_blocks(&self) -> UnsqsResult<Vec<Block>> {
        if self.covered.iter().any(|&c| !c) {
            return Err(UnsqsError::ConstructionFailed {
                v: self.universe.num_points(),
                nodes: self.stats.nodes,
            });
        }
        Ok(self
            .frames
            .iter()
            .filter_map(|frame| frame.chosen)
            .map(|c| *self.universe.candidate(c))
            .collect())
    }
}

/// Builds an SQS(v) as a list of increasing 4-tuples.
pub fn construct_sqs(v: usize) -> UnsqsResult<Vec<[usize; 4]>> {
    let universe = Universe::new(v);
    let blocks = ExactCover::new(&universe).solve()?;
    Ok(blocks.into_iter().map(|block| block.points).collect())
}
