// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CompatibilityBreakdown, IdealType, Match, MatchStatus, Profile, ScoringWeights};
pub use requests::{
    CompatibilityQuery, FindCandidatesQuery, ProposeMatchRequest, RespondMatchRequest,
    UserMatchesQuery,
};
pub use responses::{
    CompatibilityResponse, ErrorResponse, FindCandidatesResponse, HealthResponse,
    UserMatchesResponse,
};
