use thiserror::Error;

/// Errors surfaced by the matching engine.
///
/// Scoring-input anomalies (missing MBTI, unparseable birth date, ...) are
/// never errors; they resolve to neutral sub-scores inside the scorer.
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("match already exists for pair {0} and {1}")]
    Conflict(String, String),

    #[error("user {0} is not the target of this match")]
    Unauthorized(String),

    #[error("match is not in pending status")]
    InvalidState,

    /// Internal only: the ranker converts this into a silent fallback to
    /// local scoring, it never reaches a caller.
    #[error("AI matching service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    #[error("store error: {0}")]
    Store(String),
}

impl MatchingError {
    /// HTTP status the API layer maps this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            MatchingError::NotFound(_) => 404,
            MatchingError::Conflict(_, _) => 409,
            MatchingError::Unauthorized(_) => 403,
            MatchingError::InvalidState => 409,
            MatchingError::ExternalServiceUnavailable(_) | MatchingError::Store(_) => 500,
        }
    }
}

impl From<sqlx::Error> for MatchingError {
    fn from(value: sqlx::Error) -> Self {
        MatchingError::Store(value.to_string())
    }
}
