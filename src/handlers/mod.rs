//! Request handlers for the HTTP endpoints

pub mod auth;
pub mod companies;
pub mod reply;

use serde::de::DeserializeOwned;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

use crate::auth::token::extract_bearer_token;
use crate::config::AppConfig;
use crate::services::AccessGate;
use crate::storage::traits::StorageProvider;

pub use reply::handle_rejection;

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Helper function to include the gate in request state
pub fn with_gate(gate: AccessGate) -> impl Filter<Extract = (AccessGate,), Error = Infallible> + Clone {
    warp::any().map(move || gate.clone())
}

/// Bearer token from the Authorization header, if any. Absence is not a
/// rejection here; the gate turns it into Unauthenticated.
pub fn with_bearer_token() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .map(|header: Option<String>| header.as_deref().and_then(extract_bearer_token))
}

/// Size-limited JSON body
pub fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

async fn health(storage: Arc<dyn StorageProvider>) -> Result<Response, Infallible> {
    let response = match storage.health_check().await {
        Ok(true) => {
            warp::reply::with_status(warp::reply::json(&json!({"status": "healthy"})), StatusCode::OK)
        }
        Ok(false) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "unhealthy"})),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        Err(e) => {
            log::error!("Storage health check failed: {}", e);
            warp::reply::with_status(
                warp::reply::json(&json!({"status": "unhealthy"})),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    };
    Ok(response.into_response())
}

/// Every route, with rejection recovery applied
pub fn routes(
    gate: AccessGate,
    storage: Arc<dyn StorageProvider>,
    app_name: String,
) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone {
    let root_route = warp::path::end().and(warp::get()).map(move || {
        warp::reply::json(&json!({ "message": app_name.clone() })).into_response()
    });

    let health_route = warp::path!("health")
        .and(warp::get())
        .and(warp::any().map(move || storage.clone()))
        .and_then(health);

    root_route
        .or(health_route)
        .unify()
        .or(auth::routes(gate.clone()))
        .unify()
        .or(companies::routes(gate))
        .unify()
        .recover(handle_rejection)
        .unify()
}

/// CORS policy from configuration
pub fn cors(config: &AppConfig) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["authorization", "content-type"])
        .allow_credentials(true);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(config.cors_origins.iter().map(String::as_str))
    }
}
