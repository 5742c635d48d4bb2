//! Company endpoints; every id-scoped route requires membership

use serde::Deserialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection};

use super::reply::json_reply;
use super::{json_body, with_bearer_token, with_gate};
use crate::services::{AccessGate, CompanyUpdate, NewCompany};

/// Body of the add-member endpoint
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
}

type Bearer = Option<String>;

pub async fn create_company(
    token: Bearer,
    new_company: NewCompany,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate.create_company(token.as_deref(), new_company).await;
    Ok(json_reply(result, StatusCode::CREATED))
}

pub async fn list_my_companies(token: Bearer, gate: AccessGate) -> Result<Response, Infallible> {
    let result = gate.list_my_companies(token.as_deref()).await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn get_company(
    company_id: String,
    token: Bearer,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate.get_company(token.as_deref(), &company_id).await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn update_company(
    company_id: String,
    token: Bearer,
    update: CompanyUpdate,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate
        .update_company(token.as_deref(), &company_id, update)
        .await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn add_member(
    company_id: String,
    token: Bearer,
    request: AddMemberRequest,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate
        .add_company_member(token.as_deref(), &company_id, &request.user_id)
        .await;
    Ok(json_reply(result, StatusCode::OK))
}

pub async fn remove_member(
    company_id: String,
    user_id: String,
    token: Bearer,
    gate: AccessGate,
) -> Result<Response, Infallible> {
    let result = gate
        .remove_company_member(token.as_deref(), &company_id, &user_id)
        .await;
    Ok(json_reply(result, StatusCode::OK))
}

/// `/api/v1/companies/...` routes
pub fn routes(
    gate: AccessGate,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let create_route = warp::path!("api" / "v1" / "companies")
        .and(warp::post())
        .and(with_bearer_token())
        .and(json_body::<NewCompany>())
        .and(with_gate(gate.clone()))
        .and_then(create_company);

    let list_route = warp::path!("api" / "v1" / "companies")
        .and(warp::get())
        .and(with_bearer_token())
        .and(with_gate(gate.clone()))
        .and_then(list_my_companies);

    let get_route = warp::path!("api" / "v1" / "companies" / String)
        .and(warp::get())
        .and(with_bearer_token())
        .and(with_gate(gate.clone()))
        .and_then(get_company);

    let update_route = warp::path!("api" / "v1" / "companies" / String)
        .and(warp::put())
        .and(with_bearer_token())
        .and(json_body::<CompanyUpdate>())
        .and(with_gate(gate.clone()))
        .and_then(update_company);

    let add_member_route = warp::path!("api" / "v1" / "companies" / String / "users")
        .and(warp::post())
        .and(with_bearer_token())
        .and(json_body::<AddMemberRequest>())
        .and(with_gate(gate.clone()))
        .and_then(add_member);

    let remove_member_route = warp::path!("api" / "v1" / "companies" / String / "users" / String)
        .and(warp::delete())
        .and(with_bearer_token())
        .and(with_gate(gate))
        .and_then(remove_member);

    create_route
        .or(list_route)
        .unify()
        .or(get_route)
        .unify()
        .or(update_route)
        .unify()
        .or(add_member_route)
        .unify()
        .or(remove_member_route)
        .unify()
}
