use crate::error::{UnsqsError, UnsqsResult};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::collections::{HashMap, HashSet};

/// Largest supported point count. Bounds the `v³` triple index and keeps
/// every count derived from `v` far from overflow.
pub const MAX_POINTS: usize = 60;

/// Instances used while tuning the search.
pub const DEV_INSTANCES: [(usize, usize); 8] = [
    (8, 28),
    (10, 30),
    (16, 56),
    (20, 190),
    (26, 325),
    (28, 182),
    (32, 496),
    (38, 703),
];

/// Parameter combinations for which no UNSQS is currently known.
pub const OPEN_INSTANCES: [(usize, usize); 8] = [
    (14, 91),
    (22, 154),
    (26, 260),
    (34, 374),
    (44, 946),
    (46, 690),
    (46, 759),
    (50, 1225),
];

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Track {
    /// Number of points.
    pub v: usize,
    /// Number of distinct ND-pairs.
    pub p: usize,
}

impl From<(usize, usize)> for Track {
    fn from((v, p): (usize, usize)) -> Self {
        Self { v, p }
    }
}

/// A UNSQS in output form. Each row lists the first ND-pair followed by the
/// second ND-pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    pub blocks: Vec<[usize; 4]>,
}

impl Solution {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Parses whitespace separated rows of four integers. Blank lines are
    /// skipped.
    pub fn from_text(text: &str, one_indexed: bool) -> UnsqsResult<Self> {
        let mut blocks = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let values = line
                .split_whitespace()
                .map(|token| token.parse::<usize>())
                .collect::<Result<Vec<usize>, _>>()
                .map_err(|e| UnsqsError::InvalidSolution {
                    reason: format!("line {}: {}", line_no + 1, e),
                })?;
            let row: [usize; 4] =
                values
                    .as_slice()
                    .try_into()
                    .map_err(|_| UnsqsError::InvalidSolution {
                        reason: format!(
                            "line {}: expected 4 points, found {}",
                            line_no + 1,
                            values.len()
                        ),
                    })?;
            if one_indexed {
                if row.contains(&0) {
                    return Err(UnsqsError::InvalidSolution {
                        reason: format!("line {}: point 0 in 1-indexed output", line_no + 1),
                    });
                }
                blocks.push(row.map(|x| x - 1));
            } else {
                blocks.push(row);
            }
        }
        Ok(Self { blocks })
    }

    pub fn to_text(&self, one_indexed: bool) -> String {
        let offset = usize::from(one_indexed);
        self.blocks
            .iter()
            .map(|row| {
                format!(
                    "{} {} {} {}\n",
                    row[0] + offset,
                    row[1] + offset,
                    row[2] + offset,
                    row[3] + offset
                )
            })
            .collect()
    }
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Challenge {
    pub seed: u64,
    pub track: Track,
    /// `v*(v-1)*(v-2)/24`, the block count of any SQS(v).
    pub required_blocks: usize,
    /// `v*(v-1)*(v-2)/12`, two ND-pairs per block.
    pub total_pairs: usize,
    /// Occurrences required of every distinct ND-pair.
    pub f_target: usize,
}

impl Challenge {
    pub fn generate_instance(seed: u64, track: &Track) -> UnsqsResult<Self> {
        let Track { v, p } = *track;
        if v < 4 {
            return Err(UnsqsError::TooFewPoints { v });
        }
        if v > MAX_POINTS {
            return Err(UnsqsError::TooManyPoints {
                v,
                max_points: MAX_POINTS,
            });
        }
        let falling = v * (v - 1) * (v - 2);
        if falling % 24 != 0 {
            return Err(UnsqsError::FractionalBlockCount { v });
        }
        let max_pairs = v * (v - 1) / 2;
        if p == 0 || p > max_pairs {
            return Err(UnsqsError::InvalidDistinctPairs { p, max_pairs });
        }
        let total_pairs = falling / 12;
        if total_pairs % p != 0 {
            return Err(UnsqsError::FractionalTarget { v, p, total_pairs });
        }
        let f_target = total_pairs / p;
        let pair_degree = (v - 2) / 2;
        if f_target > pair_degree {
            return Err(UnsqsError::TargetExceedsPairDegree {
                f_target,
                pair_degree,
            });
        }

        Ok(Self {
            seed,
            track: *track,
            required_blocks: falling / 24,
            total_pairs,
            f_target,
        })
    }

    pub fn num_points(&self) -> usize {
        self.track.v
    }

    pub fn num_distinct_pairs(&self) -> usize {
        self.track.p
    }

    /// Checks a solution without trusting any bookkeeping from the search:
    /// row count, four distinct in-range points per row, every triple in at
    /// most one row, and the ND-pair distribution.
    pub fn verify_solution(&self, solution: &Solution) -> UnsqsResult<()> {
        let v = self.track.v;
        if solution.blocks.len() != self.required_blocks {
            return Err(UnsqsError::InvalidSolution {
                reason: format!(
                    "Expected {} blocks, found {}",
                    self.required_blocks,
                    solution.blocks.len()
                ),
            });
        }

        let mut pair_occurrences: HashMap<(usize, usize), usize> = HashMap::new();
        let mut seen_triples: HashSet<[usize; 3]> = HashSet::with_capacity(4 * solution.blocks.len());
        for (idx, row) in solution.blocks.iter().enumerate() {
            if let Some(&x) = row.iter().find(|&&x| x >= v) {
                return Err(UnsqsError::InvalidSolution {
                    reason: format!("Block {} contains point {} outside [0, {})", idx, x, v),
                });
            }
            let mut sorted = *row;
            sorted.sort_unstable();
            if sorted.windows(2).any(|w| w[0] == w[1]) {
                return Err(UnsqsError::InvalidSolution {
                    reason: format!("Block {} ({:?}) repeats a point", idx, row),
                });
            }

            for pair in [(row[0], row[1]), (row[2], row[3])] {
                let key = (pair.0.min(pair.1), pair.0.max(pair.1));
                *pair_occurrences.entry(key).or_insert(0) += 1;
            }

            let [a, b, c, d] = sorted;
            for triple in [[a, b, c], [a, b, d], [a, c, d], [b, c, d]] {
                if !seen_triples.insert(triple) {
                    return Err(UnsqsError::InvalidSolution {
                        reason: format!("Triple {:?} is covered more than once", triple),
                    });
                }
            }
        }

        if let Some((pair, count)) = pair_occurrences
            .iter()
            .filter(|(_, count)| **count != self.f_target)
            .min()
        {
            return Err(UnsqsError::InvalidSolution {
                reason: format!(
                    "ND-pair {:?} occurs {} times, expected {}",
                    pair, count, self.f_target
                ),
            });
        }
        if pair_occurrences.len() != self.track.p {
            return Err(UnsqsError::InvalidSolution {
                reason: format!(
                    "{} distinct ND-pairs used, expected {}",
                    pair_occurrences.len(),
                    self.track.p
                ),
            });
        }
        Ok(())
    }
}
