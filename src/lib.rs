//! UniMeet Algo - matching and compatibility engine for the UniMeet campus
//! dating app.
//!
//! This library scores pairwise compatibility between student profiles,
//! ranks match candidates, and drives the match-proposal lifecycle
//! (propose -> accept/reject). An optional external AI scorer can replace
//! local ranking; the engine falls back to its rule-based scorer whenever
//! the AI service is absent or failing.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CompatibilityScorer, MatchLifecycle, MatchRanker, MatchingError};
pub use crate::models::{CompatibilityBreakdown, Match, MatchStatus, Profile, ScoringWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let scorer = CompatibilityScorer::with_default_weights();
        let a = Profile::bare("a");
        let b = Profile::bare("b");
        // two empty profiles resolve to the neutral defaults
        assert!(scorer.score(&a, &b) > 0.0);
    }
}
