use crate::models::domain::{CompatibilityBreakdown, Match};
use serde::{Deserialize, Serialize};

/// Response for the candidate-ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindCandidatesResponse {
    pub matches: Vec<Match>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the match list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMatchesResponse {
    pub matches: Vec<Match>,
    pub count: usize,
}

/// Response for the compatibility diagnostics endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResponse {
    #[serde(rename = "userAId")]
    pub user_a_id: String,
    #[serde(rename = "userBId")]
    pub user_b_id: String,
    pub scores: CompatibilityBreakdown,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
