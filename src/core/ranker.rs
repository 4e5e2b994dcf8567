use crate::core::compatibility::CompatibilityScorer;
use crate::core::error::MatchingError;
use crate::core::filters;
use crate::models::{Match, MatchStatus, Profile};
use crate::services::ai::ExternalScorer;
use crate::services::store::{MatchStore, ProfileStore};
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 10;

/// Scores and ranks the candidate pool for a user.
///
/// Delegates to the external AI scorer when one is configured and healthy;
/// any delegate failure falls back to the local rule-based scorer without
/// surfacing to the caller.
pub struct MatchRanker {
    profiles: Arc<dyn ProfileStore>,
    matches: Arc<dyn MatchStore>,
    scorer: CompatibilityScorer,
    external: Option<Arc<dyn ExternalScorer>>,
    min_score: f64,
}

impl MatchRanker {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        matches: Arc<dyn MatchStore>,
        scorer: CompatibilityScorer,
        min_score: f64,
    ) -> Self {
        Self {
            profiles,
            matches,
            scorer,
            external: None,
            min_score,
        }
    }

    pub fn with_external(mut self, external: Arc<dyn ExternalScorer>) -> Self {
        self.external = Some(external);
        self
    }

    /// Ranked match proposals for a user: PENDING, unsaved, score-descending
    /// with candidate-id tie-break, truncated to `limit` (default 10 when
    /// non-positive), never below the score threshold.
    pub async fn find_matches(
        &self,
        user_id: &str,
        limit: i32,
    ) -> Result<Vec<Match>, MatchingError> {
        let limit = if limit > 0 {
            limit as usize
        } else {
            DEFAULT_LIMIT
        };

        let current = self.profiles.get(user_id).await?;
        let existing = self.matches.find_by_user(user_id).await?;
        let pool = filters::candidates(user_id, self.profiles.list_all().await?, &existing);

        let mut scored = self.score_pool(&current, &pool, limit).await;

        scored.retain(|(_, score)| *score >= self.min_score);
        scored.sort_by(|(id_a, score_a), (id_b, score_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| id_a.cmp(id_b))
        });
        scored.truncate(limit);

        let now = chrono::Utc::now();
        let matches = scored
            .into_iter()
            .map(|(candidate_id, score)| Match {
                id: uuid::Uuid::new_v4().to_string(),
                user_a_id: user_id.to_string(),
                user_b_id: candidate_id,
                score,
                matched_at: now,
                status: MatchStatus::Pending,
            })
            .collect();

        Ok(matches)
    }

    /// Scores every pool member: AI delegate when available, local rules
    /// otherwise or on delegate failure.
    async fn score_pool(
        &self,
        current: &Profile,
        pool: &[Profile],
        top_k: usize,
    ) -> Vec<(String, f64)> {
        if let Some(external) = &self.external {
            if external.available().await {
                match external.find_matches(current, pool, top_k).await {
                    Ok(results) => {
                        tracing::info!(
                            "AI matching used for user {}: {} results",
                            current.user_id,
                            results.len()
                        );
                        return results
                            .into_iter()
                            .map(|r| (r.user_id, r.compatibility_score))
                            .collect();
                    }
                    Err(e) => {
                        tracing::warn!(
                            "AI matching failed for user {}, falling back to rule-based: {}",
                            current.user_id,
                            e
                        );
                    }
                }
            }
        }

        pool.iter()
            .map(|candidate| (candidate.user_id.clone(), self.scorer.score(current, candidate)))
            .collect()
    }
}
