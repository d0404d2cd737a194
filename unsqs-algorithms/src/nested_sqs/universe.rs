use ndarray::Array3;

/// A candidate block: four increasing points together with the ids of the
/// triples `(a,b,c)`, `(a,b,d)`, `(a,c,d)` and `(b,c,d)` it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub points: [usize; 4],
    pub triples: [usize; 4],
}

/// Every triple and every candidate block of a point set, indexed for the
/// exact cover search.
#[derive(Debug, Clone)]
pub struct Universe {
    num_points: usize,
    triple_index: Array3<usize>,
    triples: Vec<[usize; 3]>,
    candidates: Vec<Block>,
    triple_candidates: Vec<Vec<usize>>,
}

impl Universe {
    pub fn new(num_points: usize) -> Self {
        let v = num_points;
        let mut triple_index = Array3::from_elem((v, v, v), usize::MAX);
        let mut triples = Vec::with_capacity(binomial(v, 3));
        for i in 0..v {
            for j in (i + 1)..v {
                for k in (j + 1)..v {
                    triple_index[[i, j, k]] = triples.len();
                    triples.push([i, j, k]);
                }
            }
        }

        let mut candidates = Vec::with_capacity(binomial(v, 4));
        for a in 0..v {
            for b in (a + 1)..v {
                for c in (b + 1)..v {
                    for d in (c + 1)..v {
                        candidates.push(Block {
                            points: [a, b, c, d],
                            triples: [
                                triple_index[[a, b, c]],
                                triple_index[[a, b, d]],
                                triple_index[[a, c, d]],
                                triple_index[[b, c, d]],
                            ],
                        });
                    }
                }
            }
        }

        // Candidates are pushed in index order, so every list is ascending.
        let mut triple_candidates = vec![Vec::with_capacity(v.saturating_sub(3)); triples.len()];
        for (idx, block) in candidates.iter().enumerate() {
            for &t in &block.triples {
                triple_candidates[t].push(idx);
            }
        }

        Self {
            num_points,
            triple_index,
            triples,
            candidates,
            triple_candidates,
        }
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn num_triples(&self) -> usize {
        self.triples.len()
    }

    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Blocks in an exact cover of all triples.
    pub fn required_blocks(&self) -> usize {
        self.triples.len() / 4
    }

    /// Id of the triple `{i, j, k}` given in increasing order.
    pub fn triple_id(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < j && j < k && k < self.num_points);
        self.triple_index[[i, j, k]]
    }

    pub fn triple(&self, id: usize) -> [usize; 3] {
        self.triples[id]
    }

    pub fn candidates(&self) -> &[Block] {
        &self.candidates
    }

    pub fn candidate(&self, idx: usize) -> &Block {
        &self.candidates[idx]
    }

    /// Candidate indices containing triple `t`, ascending.
    pub fn covering(&self, t: usize) -> &[usize] {
        &self.triple_candidates[t]
    }
}

pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}
