// Core algorithm exports
pub mod compatibility;
pub mod error;
pub mod filters;
pub mod lifecycle;
pub mod ranker;

pub use compatibility::CompatibilityScorer;
pub use error::MatchingError;
pub use filters::{candidates, pair_key};
pub use lifecycle::MatchLifecycle;
pub use ranker::MatchRanker;
