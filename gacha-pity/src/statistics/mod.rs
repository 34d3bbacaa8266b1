pub mod engine;
pub mod projection;
pub mod result;
pub mod summary;

pub use engine::{
    calculate, compute_cumulative_probabilities, compute_first_success_probabilities,
    compute_raw_probabilities, cumulative_from_first_success,
};
pub use projection::{PullProjection, project_pulls};
pub use result::{ProbabilityResult, RollRow};
pub use summary::PullSummary;
