use crate::core::error::MatchingError;
use crate::models::{Match, MatchStatus, Profile};
use async_trait::async_trait;

/// Read access to the user-profile universe.
///
/// Profile writes belong to the host application; the engine only reads.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a single profile, `NotFound` if absent.
    async fn get(&self, user_id: &str) -> Result<Profile, MatchingError>;

    /// The raw candidate universe.
    async fn list_all(&self) -> Result<Vec<Profile>, MatchingError>;
}

/// Persistence for match proposals.
///
/// Implementations own the concurrency discipline: `insert` must detect a
/// duplicate pair at write time (unique constraint, not just a pre-check)
/// and `transition` must re-validate the expected status at commit so a
/// double-accept race fails cleanly.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// A single match by id.
    async fn get(&self, match_id: &str) -> Result<Option<Match>, MatchingError>;

    /// All matches where the user is either side of the pair.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Match>, MatchingError>;

    /// The match for the unordered pair {a, b}, if any.
    async fn find_by_pair(&self, user_a: &str, user_b: &str)
        -> Result<Option<Match>, MatchingError>;

    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, MatchingError>;

    /// Persist a new match. Fails with `Conflict` when a match for the
    /// unordered pair already exists, even if the pre-check raced.
    async fn insert(&self, proposal: Match) -> Result<Match, MatchingError>;

    /// Compare-and-set status transition. Returns the updated match, or
    /// `None` when the match was no longer in the `from` status at commit.
    async fn transition(
        &self,
        match_id: &str,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<Option<Match>, MatchingError>;
}
