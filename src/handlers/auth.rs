//! Account endpoints: registration, login, profile and user administration

use serde::Deserialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection};

use super::reply::{json_reply, no_content_reply};
use super::{json_body, with_bearer_token, with_gate};
use crate::auth::user::{NewUser, UserUpdate};
use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::services::AccessGate;

/// Credentials for the login endpoint
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Pagination query for the user list
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

type Bearer = Option<String>;

pub async fn register(new_user: NewUser, gate: AccessGate) -> Result<Response, Infallible> {
    Ok(json_reply(gate.register(new_user).await, StatusCode::CREATED))
}

pub async fn register_admin(
    token: Bearer,
    new_user: NewUser,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate.register_admin(token.as_deref(), new_user).await;
    Ok(json_reply(result, StatusCode::CREATED))
}

pub async fn login(credentials: LoginRequest, gate: AccessGate) -> Result<Response, Infallible> {
    let result = gate.login(&credentials.username, &credentials.password).await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn me(token: Bearer, gate: AccessGate) -> Result<Response, Infallible> {
    Ok(json_reply(gate.me(token.as_deref()).await, StatusCode::OK))
}

pub async fn update_me(
    token: Bearer,
    update: UserUpdate,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate.update_me(token.as_deref(), update).await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn list_users(
    query: ListQuery,
    token: Bearer,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate
        .list_users(
            token.as_deref(),
            query.skip.unwrap_or(0),
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
        .await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn get_user(
    user_id: String,
    token: Bearer,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate.get_user(token.as_deref(), &user_id).await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn update_user(
    user_id: String,
    token: Bearer,
    update: UserUpdate,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate.update_user(token.as_deref(), &user_id, update).await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn delete_user(
    user_id: String,
    token: Bearer,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    Ok(no_content_reply(
        gate.delete_user(token.as_deref(), &user_id).await,
    ))
}

/// `/api/v1/auth/...` routes
pub fn routes(
    gate: AccessGate,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let register_route = warp::path!("api" / "v1" / "auth" / "register")
        .and(warp::post())
        .and(json_body::<NewUser>())
        .and(with_gate(gate.clone()))
        .and_then(register);

    let register_admin_route = warp::path!("api" / "v1" / "auth" / "register" / "admin")
        .and(warp::post())
        .and(with_bearer_token())
        .and(json_body::<NewUser>())
        .and(with_gate(gate.clone()))
        .and_then(register_admin);

    let login_route = warp::path!("api" / "v1" / "auth" / "login")
        .and(warp::post())
        .and(json_body::<LoginRequest>())
        .and(with_gate(gate.clone()))
        .and_then(login);

    let me_route = warp::path!("api" / "v1" / "auth" / "me")
        .and(warp::get())
        .and(with_bearer_token())
        .and(with_gate(gate.clone()))
        .and_then(me);

    let update_me_route = warp::path!("api" / "v1" / "auth" / "me")
        .and(warp::put())
        .and(with_bearer_token())
        .and(json_body::<UserUpdate>())
        .and(with_gate(gate.clone()))
        .and_then(update_me);

    let list_users_route = warp::path!("api" / "v1" / "auth" / "users")
        .and(warp::get())
        .and(warp::query::<ListQuery>())
        .and(with_bearer_token())
        .and(with_gate(gate.clone()))
        .and_then(list_users);

    let get_user_route = warp::path!("api" / "v1" / "auth" / "users" / String)
        .and(warp::get())
        .and(with_bearer_token())
        .and(with_gate(gate.clone()))
        .and_then(get_user);

    let update_user_route = warp::path!("api" / "v1" / "auth" / "users" / String)
        .and(warp::put())
        .and(with_bearer_token())
        .and(json_body::<UserUpdate>())
        .and(with_gate(gate.clone()))
        .and_then(update_user);

    let delete_user_route = warp::path!("api" / "v1" / "auth" / "users" / String)
        .and(warp::delete())
        .and(with_bearer_token())
        .and(with_gate(gate))
        .and_then(delete_user);

    register_route
        .or(register_admin_route)
        .unify()
        .or(login_route)
        .unify()
        .or(me_route)
        .unify()
        .or(update_me_route)
        .unify()
        .or(list_users_route)
        .unify()
        .or(get_user_route)
        .unify()
        .or(update_user_route)
        .unify()
        .or(delete_user_route)
        .unify()
}
