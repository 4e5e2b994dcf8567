use serde::{Deserialize, Serialize};

/// User profile as seen by the matching engine.
///
/// Everything beyond the id is optional onboarding data; the scorer degrades
/// to neutral sub-scores for whatever is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mbti: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(rename = "personalityKeywords", default)]
    pub personality_keywords: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    /// Birth date as "YYYY-MM-DD".
    #[serde(default)]
    pub birth: Option<String>,
    /// Height as a numeric string, possibly with units ("175", "175cm").
    #[serde(default)]
    pub height: Option<String>,
    #[serde(rename = "idealType", default)]
    pub ideal_type: Option<IdealType>,
}

/// A user's stated ideal partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealType {
    #[serde(default)]
    pub mbti: Option<String>,
    #[serde(rename = "ageRange", default)]
    pub age_range: Option<String>,
    #[serde(rename = "personalityKeywords", default)]
    pub personality_keywords: Vec<String>,
}

impl Profile {
    /// Minimal profile with only an id, used as a fixture base.
    pub fn bare(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: None,
            mbti: None,
            interests: vec![],
            personality_keywords: vec![],
            department: None,
            birth: None,
            height: None,
            ideal_type: None,
        }
    }
}

/// Lifecycle states of a match proposal.
///
/// EXPIRED is set by an external time-based sweeper; no engine operation
/// produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "PENDING",
            MatchStatus::Accepted => "ACCEPTED",
            MatchStatus::Rejected => "REJECTED",
            MatchStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(MatchStatus::Pending),
            "ACCEPTED" => Some(MatchStatus::Accepted),
            "REJECTED" => Some(MatchStatus::Rejected),
            "EXPIRED" => Some(MatchStatus::Expired),
            _ => None,
        }
    }
}

/// A match proposal between two users.
///
/// `user_a_id` is the proposer and `user_b_id` the target; only the target
/// may accept or reject. The pair is logically unordered: at most one match
/// exists for {a, b} at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    #[serde(rename = "userAId")]
    pub user_a_id: String,
    #[serde(rename = "userBId")]
    pub user_b_id: String,
    /// Compatibility score in [0, 1], rounded to 2 decimals.
    pub score: f64,
    #[serde(rename = "matchedAt")]
    pub matched_at: chrono::DateTime<chrono::Utc>,
    pub status: MatchStatus,
}

impl Match {
    /// The counterpart of `user_id` in this match, if the user is part of it.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.user_a_id == user_id {
            Some(&self.user_b_id)
        } else if self.user_b_id == user_id {
            Some(&self.user_a_id)
        } else {
            None
        }
    }
}

/// Per-dimension compatibility breakdown returned by `detailed_score`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    pub mbti: f64,
    pub interests: f64,
    pub personality: f64,
    #[serde(rename = "idealType")]
    pub ideal_type: f64,
    pub department: f64,
    pub age: f64,
    pub height: f64,
    pub total: f64,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub mbti: f64,
    pub interests: f64,
    pub personality: f64,
    pub ideal_type: f64,
    pub department: f64,
    pub age: f64,
    pub height: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            mbti: 0.25,
            interests: 0.20,
            personality: 0.20,
            ideal_type: 0.15,
            department: 0.10,
            age: 0.05,
            height: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            MatchStatus::Pending,
            MatchStatus::Accepted,
            MatchStatus::Rejected,
            MatchStatus::Expired,
        ] {
            assert_eq!(MatchStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MatchStatus::parse("pending"), None);
    }

    #[test]
    fn test_counterpart() {
        let m = Match {
            id: "m1".to_string(),
            user_a_id: "a".to_string(),
            user_b_id: "b".to_string(),
            score: 0.75,
            matched_at: chrono::Utc::now(),
            status: MatchStatus::Pending,
        };

        assert_eq!(m.counterpart("a"), Some("b"));
        assert_eq!(m.counterpart("b"), Some("a"));
        assert_eq!(m.counterpart("c"), None);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        let sum =
            w.mbti + w.interests + w.personality + w.ideal_type + w.department + w.age + w.height;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
