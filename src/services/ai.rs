use crate::core::error::MatchingError;
use crate::models::Profile;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Optional external scorer that can replace local ranking.
///
/// Treated as unreliable: implementations report availability through the
/// probe and every call failure is an `ExternalServiceUnavailable` the
/// ranker swallows. Tests substitute a stub.
#[async_trait]
pub trait ExternalScorer: Send + Sync {
    /// Cheap health probe; a `false` skips the delegate entirely.
    async fn available(&self) -> bool;

    /// Score and rank `candidates` against `target`, best first.
    async fn find_matches(
        &self,
        target: &Profile,
        candidates: &[Profile],
        top_k: usize,
    ) -> Result<Vec<ScoredCandidate>, MatchingError>;
}

/// One ranked candidate as returned by the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(alias = "compatibilityScore")]
    pub compatibility_score: f64,
    #[serde(alias = "detailedScores", default)]
    pub detailed_scores: HashMap<String, f64>,
}

/// Flattened profile shape the AI service expects.
#[derive(Debug, Serialize)]
struct AiProfile<'a> {
    user_id: &'a str,
    mbti: Option<&'a str>,
    interests: &'a [String],
    personality_keywords: &'a [String],
    department: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<i32>,
}

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    target_user: AiProfile<'a>,
    candidate_users: Vec<AiProfile<'a>>,
    top_k: usize,
}

impl<'a> AiProfile<'a> {
    fn from_profile(profile: &'a Profile) -> Self {
        Self {
            user_id: &profile.user_id,
            mbti: profile.mbti.as_deref(),
            interests: &profile.interests,
            personality_keywords: &profile.personality_keywords,
            department: profile.department.as_deref(),
            birth_year: profile
                .birth
                .as_deref()
                .and_then(|b| b.get(0..4))
                .and_then(|y| y.parse().ok()),
            height: profile.height.as_deref().and_then(|h| {
                let digits: String = h.chars().filter(char::is_ascii_digit).collect();
                digits.parse().ok()
            }),
        }
    }
}

/// HTTP client for the UniMeet AI matching service.
///
/// `POST {base}/match` ranks candidates; `GET {base}/` is the availability
/// probe. Calls are bounded by a timeout so a hung service degrades to
/// local scoring instead of blocking the caller.
pub struct AiMatchingClient {
    base_url: String,
    enabled: bool,
    client: Client,
}

impl AiMatchingClient {
    pub fn new(base_url: String, enabled: bool, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            enabled,
            client,
        }
    }
}

#[async_trait]
impl ExternalScorer for AiMatchingClient {
    async fn available(&self) -> bool {
        if !self.enabled {
            return false;
        }

        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("AI service probe failed: {}", e);
                false
            }
        }
    }

    async fn find_matches(
        &self,
        target: &Profile,
        candidates: &[Profile],
        top_k: usize,
    ) -> Result<Vec<ScoredCandidate>, MatchingError> {
        let request = MatchRequest {
            target_user: AiProfile::from_profile(target),
            candidate_users: candidates.iter().map(AiProfile::from_profile).collect(),
            top_k,
        };

        let url = format!("{}/match", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MatchingError::ExternalServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MatchingError::ExternalServiceUnavailable(format!(
                "AI service returned {}",
                response.status()
            )));
        }

        let results: Vec<ScoredCandidate> = response
            .json()
            .await
            .map_err(|e| MatchingError::ExternalServiceUnavailable(e.to_string()))?;

        tracing::debug!(
            "AI service ranked {} of {} candidates",
            results.len(),
            candidates.len()
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Profile {
        let mut p = Profile::bare("u1");
        p.mbti = Some("INTJ".to_string());
        p.birth = Some("2000-01-01".to_string());
        p.height = Some("180cm".to_string());
        p
    }

    #[tokio::test]
    async fn test_disabled_client_reports_unavailable() {
        let client = AiMatchingClient::new("http://localhost:1".to_string(), false, 1);
        assert!(!client.available().await);
    }

    #[tokio::test]
    async fn test_probe_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("{\"status\":\"ok\"}")
            .create_async()
            .await;

        let client = AiMatchingClient::new(server.url(), true, 5);
        assert!(client.available().await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_find_matches_parses_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/match")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"user_id":"u2","compatibility_score":0.82,"detailed_scores":{"mbti":0.9}}]"#,
            )
            .create_async()
            .await;

        let client = AiMatchingClient::new(server.url(), true, 5);
        let results = client
            .find_matches(&target(), &[Profile::bare("u2")], 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_id, "u2");
        assert!((results[0].compatibility_score - 0.82).abs() < 1e-9);
        assert_eq!(results[0].detailed_scores.get("mbti"), Some(&0.9));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/match")
            .with_status(500)
            .create_async()
            .await;

        let client = AiMatchingClient::new(server.url(), true, 5);
        let err = client
            .find_matches(&target(), &[], 10)
            .await
            .unwrap_err();

        assert!(matches!(err, MatchingError::ExternalServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/match")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = AiMatchingClient::new(server.url(), true, 5);
        let err = client
            .find_matches(&target(), &[], 10)
            .await
            .unwrap_err();

        assert!(matches!(err, MatchingError::ExternalServiceUnavailable(_)));
    }

    #[test]
    fn test_ai_profile_flattening() {
        let profile = target();
        let flat = AiProfile::from_profile(&profile);

        assert_eq!(flat.birth_year, Some(2000));
        assert_eq!(flat.height, Some(180));
    }
}
