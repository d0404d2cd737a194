use ndarray::Array2;
use unsqs_challenges::nested_sqs::{Challenge, Solution};

/// Number of ways to split four points into two pairs.
pub const NUM_SPLITS: usize = 3;

pub type Pair = (usize, usize);

/// The two ND-pairs a block emits under `option`:
/// 0 → {a,b},{c,d}; 1 → {a,c},{b,d}; 2 → {a,d},{b,c}.
///
/// Points are increasing, so each pair comes out as `(min, max)`.
#[inline]
pub fn split_pairs(points: &[usize; 4], option: usize) -> [Pair; 2] {
    let [a, b, c, d] = *points;
    match option {
        0 => [(a, b), (c, d)],
        1 => [(a, c), (b, d)],
        2 => [(a, d), (b, c)],
        _ => unreachable!("split option {} out of range", option),
    }
}

/// Squared deviation of a used pair from the target count.
#[inline]
fn contribution(count: u32, f_target: i64) -> i64 {
    if count > 0 {
        let diff = count as i64 - f_target;
        diff * diff
    } else {
        0
    }
}

/// Pair occurrence table and cost of a split assignment over a fixed block
/// system.
///
/// `cost = λ·|distinct − P| + Σ_{count>0} (count − F)²`. The quadratic sum and
/// the distinct count are maintained as exact integers and the cost is
/// derived from them, so incremental and from-scratch costs agree exactly.
#[derive(Debug, Clone)]
pub struct SplitCostModel {
    num_points: usize,
    blocks: Vec<[usize; 4]>,
    splits: Vec<usize>,
    pair_counts: Array2<u32>,
    distinct: usize,
    quadratic: i64,
    f_target: i64,
    target_distinct: usize,
    penalty_weight: f64,
}

impl SplitCostModel {
    /// Starts every block at split option 0.
    pub fn new(
        num_points: usize,
        blocks: Vec<[usize; 4]>,
        target_distinct: usize,
        f_target: usize,
        penalty_weight: f64,
    ) -> Self {
        let splits = vec![0; blocks.len()];
        Self::with_splits(
            num_points,
            blocks,
            splits,
            target_distinct,
            f_target,
            penalty_weight,
        )
    }

    pub fn for_challenge(challenge: &Challenge, blocks: Vec<[usize; 4]>, penalty_weight: f64) -> Self {
        Self::new(
            challenge.num_points(),
            blocks,
            challenge.num_distinct_pairs(),
            challenge.f_target,
            penalty_weight,
        )
    }

    pub fn with_splits(
        num_points: usize,
        blocks: Vec<[usize; 4]>,
        splits: Vec<usize>,
        target_distinct: usize,
        f_target: usize,
        penalty_weight: f64,
    ) -> Self {
        assert_eq!(blocks.len(), splits.len());
        let mut model = Self {
            num_points,
            blocks,
            splits,
            pair_counts: Array2::zeros((num_points, num_points)),
            distinct: 0,
            quadratic: 0,
            f_target: f_target as i64,
            target_distinct,
            penalty_weight,
        };
        model.pair_counts = model.recount_from_scratch();
        model.distinct = model.pair_counts.iter().filter(|&&c| c > 0).count();
        model.quadratic = model
            .pair_counts
            .iter()
            .map(|&c| contribution(c, model.f_target))
            .sum();
        model
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[[usize; 4]] {
        &self.blocks
    }

    pub fn split(&self, block: usize) -> usize {
        self.splits[block]
    }

    pub fn splits(&self) -> &[usize] {
        &self.splits
    }

    /// Occurrences of the pair `{x, y}`.
    pub fn pair_count(&self, x: usize, y: usize) -> u32 {
        self.pair_counts[[x.min(y), x.max(y)]]
    }

    /// Upper triangle holds the counts, everything else is zero.
    pub fn pair_counts(&self) -> &Array2<u32> {
        &self.pair_counts
    }

    pub fn distinct_pairs(&self) -> usize {
        self.distinct
    }

    pub fn cost(&self) -> f64 {
        self.cost_of(self.distinct, self.quadratic)
    }

    /// All pairs used are used `F` times and exactly `P` of them occur.
    pub fn is_solved(&self) -> bool {
        self.distinct == self.target_distinct && self.quadratic == 0
    }

    fn cost_of(&self, distinct: usize, quadratic: i64) -> f64 {
        self.penalty_weight * distinct.abs_diff(self.target_distinct) as f64 + quadratic as f64
    }

    /// Cost change of switching `block` to `new_option`, without touching any
    /// state. Only the four affected pairs are inspected.
    pub fn delta(&self, block: usize, new_option: usize) -> f64 {
        let (distinct, quadratic) = self.delta_terms(block, new_option);
        self.cost_of(distinct, quadratic) - self.cost()
    }

    fn delta_terms(&self, block: usize, new_option: usize) -> (usize, i64) {
        let points = &self.blocks[block];
        let old_option = self.splits[block];
        if old_option == new_option {
            return (self.distinct, self.quadratic);
        }

        let mut quadratic = self.quadratic;
        let mut distinct = self.distinct as isize;
        for (x, y) in split_pairs(points, old_option) {
            let count = self.pair_counts[[x, y]];
            quadratic += contribution(count - 1, self.f_target) - contribution(count, self.f_target);
            if count == 1 {
                distinct -= 1;
            }
        }
        for (x, y) in split_pairs(points, new_option) {
            let count = self.pair_counts[[x, y]];
            quadratic += contribution(count + 1, self.f_target) - contribution(count, self.f_target);
            if count == 0 {
                distinct += 1;
            }
        }
        (distinct as usize, quadratic)
    }

    /// Applies the same four pair transitions [`Self::delta`] evaluates.
    pub fn commit(&mut self, block: usize, new_option: usize) {
        let old_option = self.splits[block];
        if old_option == new_option {
            return;
        }
        let points = self.blocks[block];
        for (x, y) in split_pairs(&points, old_option) {
            let count = self.pair_counts[[x, y]];
            self.quadratic += contribution(count - 1, self.f_target) - contribution(count, self.f_target);
            self.pair_counts[[x, y]] = count - 1;
            if count == 1 {
                self.distinct -= 1;
            }
        }
        for (x, y) in split_pairs(&points, new_option) {
            let count = self.pair_counts[[x, y]];
            self.quadratic += contribution(count + 1, self.f_target) - contribution(count, self.f_target);
            self.pair_counts[[x, y]] = count + 1;
            if count == 0 {
                self.distinct += 1;
            }
        }
        self.splits[block] = new_option;
    }

    /// Pair table rebuilt from the current splits.
    pub fn recount_from_scratch(&self) -> Array2<u32> {
        let mut counts = Array2::zeros((self.num_points, self.num_points));
        for (points, &option) in self.blocks.iter().zip(&self.splits) {
            for (x, y) in split_pairs(points, option) {
                counts[[x, y]] += 1;
            }
        }
        counts
    }

    pub fn cost_from_scratch(&self) -> f64 {
        let counts = self.recount_from_scratch();
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        let quadratic = counts.iter().map(|&c| contribution(c, self.f_target)).sum();
        self.cost_of(distinct, quadratic)
    }

    /// Output rows: first ND-pair, then second ND-pair.
    pub fn to_solution(&self) -> Solution {
        Solution {
            blocks: self
                .blocks
                .iter()
                .zip(&self.splits)
                .map(|(points, &option)| {
                    let [(a, b), (c, d)] = split_pairs(points, option);
                    [a, b, c, d]
                })
                .collect(),
        }
    }
}
