use crate::core::compatibility::CompatibilityScorer;
use crate::core::error::MatchingError;
use crate::models::{Match, MatchStatus};
use crate::services::store::{MatchStore, ProfileStore};
use std::sync::Arc;

/// Match-proposal state machine.
///
/// Creates proposals (one per unordered pair) and drives the only legal
/// transitions, PENDING -> ACCEPTED and PENDING -> REJECTED, on behalf of
/// the match target.
pub struct MatchLifecycle {
    profiles: Arc<dyn ProfileStore>,
    matches: Arc<dyn MatchStore>,
    scorer: CompatibilityScorer,
}

impl MatchLifecycle {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        matches: Arc<dyn MatchStore>,
        scorer: CompatibilityScorer,
    ) -> Self {
        Self {
            profiles,
            matches,
            scorer,
        }
    }

    /// Propose a match from `proposer_id` to `target_id`.
    ///
    /// The pre-check gives a friendly Conflict early; the store insert
    /// re-detects the duplicate at write time, so a racing pair of proposals
    /// still yields exactly one match.
    pub async fn propose(
        &self,
        proposer_id: &str,
        target_id: &str,
    ) -> Result<Match, MatchingError> {
        if self
            .matches
            .find_by_pair(proposer_id, target_id)
            .await?
            .is_some()
        {
            return Err(MatchingError::Conflict(
                proposer_id.to_string(),
                target_id.to_string(),
            ));
        }

        let proposer = self.profiles.get(proposer_id).await?;
        let target = self.profiles.get(target_id).await?;

        let score = self.scorer.score(&proposer, &target);

        let proposal = Match {
            id: uuid::Uuid::new_v4().to_string(),
            user_a_id: proposer_id.to_string(),
            user_b_id: target_id.to_string(),
            score,
            matched_at: chrono::Utc::now(),
            status: MatchStatus::Pending,
        };

        let saved = self.matches.insert(proposal).await?;
        tracing::info!(
            "Match proposed: {} -> {} (score {})",
            proposer_id,
            target_id,
            saved.score
        );

        Ok(saved)
    }

    /// Accept a pending match; only the target may do this.
    pub async fn accept(&self, match_id: &str, acting_user: &str) -> Result<Match, MatchingError> {
        self.respond(match_id, acting_user, MatchStatus::Accepted)
            .await
    }

    /// Reject a pending match; only the target may do this.
    pub async fn reject(&self, match_id: &str, acting_user: &str) -> Result<Match, MatchingError> {
        self.respond(match_id, acting_user, MatchStatus::Rejected)
            .await
    }

    async fn respond(
        &self,
        match_id: &str,
        acting_user: &str,
        to: MatchStatus,
    ) -> Result<Match, MatchingError> {
        let existing = self
            .matches
            .get(match_id)
            .await?
            .ok_or_else(|| MatchingError::NotFound(format!("match {}", match_id)))?;

        if existing.user_b_id != acting_user {
            return Err(MatchingError::Unauthorized(acting_user.to_string()));
        }

        if existing.status != MatchStatus::Pending {
            return Err(MatchingError::InvalidState);
        }

        // Re-validate PENDING at commit; a lost double-accept race lands here.
        match self
            .matches
            .transition(match_id, MatchStatus::Pending, to)
            .await?
        {
            Some(updated) => {
                tracing::info!("Match {} -> {:?} by {}", match_id, to, acting_user);
                Ok(updated)
            }
            None => Err(MatchingError::InvalidState),
        }
    }

    /// All matches touching a user, either side of the pair.
    pub async fn matches_for(&self, user_id: &str) -> Result<Vec<Match>, MatchingError> {
        self.matches.find_by_user(user_id).await
    }

    /// The user's accepted matches.
    pub async fn accepted_matches(&self, user_id: &str) -> Result<Vec<Match>, MatchingError> {
        let accepted = self
            .matches
            .find_by_status(MatchStatus::Accepted)
            .await?
            .into_iter()
            .filter(|m| m.counterpart(user_id).is_some())
            .collect();
        Ok(accepted)
    }
}
