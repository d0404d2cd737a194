#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parameter,
    Construction,
    SearchExhausted,
    InvalidSolution,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnsqsError {
    TooFewPoints {
        v: usize,
    },
    TooManyPoints {
        v: usize,
        max_points: usize,
    },
    FractionalBlockCount {
        v: usize,
    },
    InvalidDistinctPairs {
        p: usize,
        max_pairs: usize,
    },
    FractionalTarget {
        v: usize,
        p: usize,
        total_pairs: usize,
    },
    TargetExceedsPairDegree {
        f_target: usize,
        pair_degree: usize,
    },
    InvalidHyperparameter {
        name: &'static str,
        reason: String,
    },
    ConstructionFailed {
        v: usize,
        nodes: u64,
    },
    SearchExhausted {
        iterations: u64,
        best_cost: f64,
    },
    InvalidSolution {
        reason: String,
    },
}

impl UnsqsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnsqsError::TooFewPoints { .. }
            | UnsqsError::TooManyPoints { .. }
            | UnsqsError::FractionalBlockCount { .. }
            | UnsqsError::InvalidDistinctPairs { .. }
            | UnsqsError::FractionalTarget { .. }
            | UnsqsError::TargetExceedsPairDegree { .. }
            | UnsqsError::InvalidHyperparameter { .. } => ErrorKind::Parameter,
            UnsqsError::ConstructionFailed { .. } => ErrorKind::Construction,
            UnsqsError::SearchExhausted { .. } => ErrorKind::SearchExhausted,
            UnsqsError::InvalidSolution { .. } => ErrorKind::InvalidSolution,
        }
    }
}

impl std::fmt::Display for UnsqsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsqsError::TooFewPoints { v } => {
                write!(f, "v={} is too small. At least 4 points are required", v)
            }
            UnsqsError::TooManyPoints { v, max_points } => write!(
                f,
                "v={} is too large. At most {} points are supported",
                v, max_points
            ),
            UnsqsError::FractionalBlockCount { v } => write!(
                f,
                "v={} => v*(v-1)*(v-2)/24 is not an integer, no quadruple system can exist",
                v
            ),
            UnsqsError::InvalidDistinctPairs { p, max_pairs } => write!(
                f,
                "p={} is invalid. Must be between 1 and {} (the number of point pairs)",
                p, max_pairs
            ),
            UnsqsError::FractionalTarget { v, p, total_pairs } => write!(
                f,
                "Invalid parameters: v={}, p={} => (v*(v-1)*(v-2))/(12*p) is not an integer ({} pair slots)",
                v, p, total_pairs
            ),
            UnsqsError::TargetExceedsPairDegree {
                f_target,
                pair_degree,
            } => write!(
                f,
                "Each distinct pair must occur {} times but a pair lies in only {} blocks",
                f_target, pair_degree
            ),
            UnsqsError::InvalidHyperparameter { name, reason } => {
                write!(f, "Hyperparameter '{}' is invalid: {}", name, reason)
            }
            UnsqsError::ConstructionFailed { v, nodes } => write!(
                f,
                "Failed to construct SQS for v={} (search exhausted after {} nodes)",
                v, nodes
            ),
            UnsqsError::SearchExhausted {
                iterations,
                best_cost,
            } => write!(
                f,
                "Split search exhausted its budget of {} iterations (best cost {})",
                iterations, best_cost
            ),
            UnsqsError::InvalidSolution { reason } => write!(f, "Invalid solution: {}", reason),
        }
    }
}

impl std::error::Error for UnsqsError {}

pub type UnsqsResult<T> = std::result::Result<T, UnsqsError>;
