//! Error and rejection mapping for HTTP replies

use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};
use warp::Rejection;

use crate::error::{RapierError, Result};

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: String,
}

fn error_body(status: StatusCode, code: &str, detail: String) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error: code, detail }), status)
        .into_response()
}

/// HTTP status for a service error
pub fn status_for(err: &RapierError) -> StatusCode {
    match err {
        RapierError::Unauthenticated => StatusCode::UNAUTHORIZED,
        RapierError::Forbidden(_) => StatusCode::FORBIDDEN,
        RapierError::NotFound(_) => StatusCode::NOT_FOUND,
        RapierError::Conflict(_) => StatusCode::CONFLICT,
        RapierError::InactiveAccount => StatusCode::BAD_REQUEST,
        RapierError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RapierError::AuthError(_) | RapierError::StorageError(_) | RapierError::ConfigError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Renders a service error. Internal details are logged, never returned.
pub fn error_reply(err: &RapierError) -> Response {
    let status = status_for(err);
    let detail = if err.is_internal() {
        log::error!("Internal error while handling request: {}", err);
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    let response = error_body(status, err.code(), detail);
    if matches!(err, RapierError::Unauthenticated) {
        warp::reply::with_header(response, "WWW-Authenticate", "Bearer").into_response()
    } else {
        response
    }
}

/// JSON body with `status` on success, mapped error otherwise
pub fn json_reply<T: Serialize>(result: Result<T>, status: StatusCode) -> Response {
    match result {
        Ok(value) => warp::reply::with_status(warp::reply::json(&value), status).into_response(),
        Err(err) => error_reply(&err),
    }
}

/// Empty 204 on success
pub fn no_content_reply(result: Result<()>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_reply(&err),
    }
}

/// Converts warp's own rejections (routing, body parsing) into JSON errors
pub async fn handle_rejection(err: Rejection) -> std::result::Result<Response, Infallible> {
    let (status, code, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "NOT_FOUND", "Not Found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            e.to_string(),
        )
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            e.to_string(),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "LENGTH_REQUIRED",
            "Content-Length header is required".to_string(),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            "Payload too large".to_string(),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            "Expected application/json".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "Method not allowed".to_string(),
        )
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error".to_string(),
        )
    };

    Ok(error_body(status, code, detail))
}
