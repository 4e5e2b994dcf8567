use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for the candidate-ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindCandidatesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: i32,
}

fn default_limit() -> i32 {
    10
}

/// Request to propose a match to another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProposeMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Request body for accept/reject, naming the acting user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RespondMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Query parameters for listing a user's matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserMatchesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Query parameters for the compatibility diagnostics endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompatibilityQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}
