mod config;
mod core;
mod models;
mod routes;
mod services;

use crate::config::Settings;
use crate::core::{CompatibilityScorer, MatchLifecycle, MatchRanker};
use crate::models::ScoringWeights;
use crate::routes::matches::AppState;
use crate::services::{AiMatchingClient, ExternalScorer, PostgresStore};
use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting UniMeet Algo matching service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize PostgreSQL store
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let store = Arc::new(
        PostgresStore::new(&settings.database.url, db_max_conn, db_min_conn)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            }),
    );

    info!("PostgreSQL store initialized (max: {} connections)", db_max_conn);

    // Initialize scorer with configured weights
    let weights = ScoringWeights {
        mbti: settings.scoring.weights.mbti,
        interests: settings.scoring.weights.interests,
        personality: settings.scoring.weights.personality,
        ideal_type: settings.scoring.weights.ideal_type,
        department: settings.scoring.weights.department,
        age: settings.scoring.weights.age,
        height: settings.scoring.weights.height,
    };

    let scorer = CompatibilityScorer::new(weights);

    info!("Compatibility scorer initialized with weights: {:?}", weights);

    // Initialize ranker, optionally with the AI scorer delegate
    let mut ranker = MatchRanker::new(
        store.clone(),
        store.clone(),
        scorer,
        settings.matching.min_score,
    );

    if settings.ai.enabled {
        let ai: Arc<dyn ExternalScorer> = Arc::new(AiMatchingClient::new(
            settings.ai.url.clone(),
            true,
            settings.ai.timeout_secs,
        ));
        ranker = ranker.with_external(ai);
        info!("AI matching delegate enabled: {}", settings.ai.url);
    } else {
        info!("AI matching delegate disabled, rule-based scoring only");
    }

    let lifecycle = MatchLifecycle::new(store.clone(), store.clone(), scorer);

    // Build application state
    let app_state = AppState {
        profiles: store.clone(),
        ranker: Arc::new(ranker),
        lifecycle: Arc::new(lifecycle),
        scorer,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
