use crate::core::{CompatibilityScorer, MatchLifecycle, MatchRanker, MatchingError};
use crate::models::{
    CompatibilityQuery, CompatibilityResponse, ErrorResponse, FindCandidatesQuery,
    FindCandidatesResponse, HealthResponse, ProposeMatchRequest, RespondMatchRequest,
    UserMatchesQuery, UserMatchesResponse,
};
use crate::services::ProfileStore;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub ranker: Arc<MatchRanker>,
    pub lifecycle: Arc<MatchLifecycle>,
    pub scorer: CompatibilityScorer,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/candidates", web::get().to(find_candidates))
        .route("/matches/request", web::post().to(propose_match))
        .route("/matches/{match_id}/accept", web::post().to(accept_match))
        .route("/matches/{match_id}/reject", web::post().to(reject_match))
        .route("/matches/my", web::get().to(my_matches))
        .route("/matches/accepted", web::get().to(accepted_matches))
        .route("/matches/compatibility", web::get().to(compatibility));
}

fn engine_error(e: &MatchingError) -> HttpResponse {
    let status_code = e.status_code();
    let error = match e {
        MatchingError::NotFound(_) => "not_found",
        MatchingError::Conflict(_, _) => "conflict",
        MatchingError::Unauthorized(_) => "unauthorized",
        MatchingError::InvalidState => "invalid_state",
        MatchingError::ExternalServiceUnavailable(_) | MatchingError::Store(_) => "internal_error",
    };

    HttpResponse::build(
        actix_web::http::StatusCode::from_u16(status_code)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
    )
    .json(ErrorResponse {
        error: error.to_string(),
        message: e.to_string(),
        status_code,
    })
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Ranked match candidates for a user
///
/// GET /api/v1/matches/candidates?userId={userId}&limit={limit}
async fn find_candidates(
    state: web::Data<AppState>,
    query: web::Query<FindCandidatesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    // Cap limit at 100 to prevent excessive scoring work
    let limit = query.limit.min(100);

    tracing::info!("Finding candidates for user: {}, limit: {}", query.user_id, limit);

    match state.ranker.find_matches(&query.user_id, limit).await {
        Ok(matches) => {
            tracing::info!(
                "Returning {} candidates for user {}",
                matches.len(),
                query.user_id
            );
            HttpResponse::Ok().json(FindCandidatesResponse {
                total_candidates: matches.len(),
                matches,
            })
        }
        Err(e) => {
            tracing::warn!("Candidate ranking failed for {}: {}", query.user_id, e);
            engine_error(&e)
        }
    }
}

/// Propose a match to another user
///
/// POST /api/v1/matches/request
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string"
/// }
/// ```
async fn propose_match(
    state: web::Data<AppState>,
    req: web::Json<ProposeMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state
        .lifecycle
        .propose(&req.user_id, &req.target_user_id)
        .await
    {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => {
            tracing::warn!(
                "Propose {} -> {} failed: {}",
                req.user_id,
                req.target_user_id,
                e
            );
            engine_error(&e)
        }
    }
}

/// Accept a pending match; only the match target may do this
///
/// POST /api/v1/matches/{matchId}/accept
async fn accept_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<RespondMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let match_id = path.into_inner();
    match state.lifecycle.accept(&match_id, &req.user_id).await {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => {
            tracing::warn!("Accept of {} by {} failed: {}", match_id, req.user_id, e);
            engine_error(&e)
        }
    }
}

/// Reject a pending match; only the match target may do this
///
/// POST /api/v1/matches/{matchId}/reject
async fn reject_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<RespondMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let match_id = path.into_inner();
    match state.lifecycle.reject(&match_id, &req.user_id).await {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => {
            tracing::warn!("Reject of {} by {} failed: {}", match_id, req.user_id, e);
            engine_error(&e)
        }
    }
}

/// All matches for a user
///
/// GET /api/v1/matches/my?userId={userId}
async fn my_matches(
    state: web::Data<AppState>,
    query: web::Query<UserMatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state.lifecycle.matches_for(&query.user_id).await {
        Ok(matches) => HttpResponse::Ok().json(UserMatchesResponse {
            count: matches.len(),
            matches,
        }),
        Err(e) => engine_error(&e),
    }
}

/// Accepted matches for a user
///
/// GET /api/v1/matches/accepted?userId={userId}
async fn accepted_matches(
    state: web::Data<AppState>,
    query: web::Query<UserMatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state.lifecycle.accepted_matches(&query.user_id).await {
        Ok(matches) => HttpResponse::Ok().json(UserMatchesResponse {
            count: matches.len(),
            matches,
        }),
        Err(e) => engine_error(&e),
    }
}

/// Per-dimension compatibility breakdown between two users (diagnostics)
///
/// GET /api/v1/matches/compatibility?userId={a}&targetUserId={b}
async fn compatibility(
    state: web::Data<AppState>,
    query: web::Query<CompatibilityQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let a = match state.profiles.get(&query.user_id).await {
        Ok(profile) => profile,
        Err(e) => return engine_error(&e),
    };
    let b = match state.profiles.get(&query.target_user_id).await {
        Ok(profile) => profile,
        Err(e) => return engine_error(&e),
    };

    let scores = state.scorer.detailed_score(&a, &b);

    HttpResponse::Ok().json(CompatibilityResponse {
        user_a_id: a.user_id,
        user_b_id: b.user_id,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_mapping() {
        let resp = engine_error(&MatchingError::NotFound("user x".into()));
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let resp = engine_error(&MatchingError::Conflict("a".into(), "b".into()));
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

        let resp = engine_error(&MatchingError::Unauthorized("u".into()));
        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
