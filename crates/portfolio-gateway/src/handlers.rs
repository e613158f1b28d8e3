//! REST handlers.
//!
//! Each handler calls the matching RPC on the shared service and renders the
//! reply or the status as JSON.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use portfolio_rpc::proto;
use portfolio_rpc::proto::portfolio_service_server::PortfolioService;
use serde::Serialize;
use tonic::{Request, Status};

use crate::GatewayState;
use crate::error::ApiError;
use crate::json::*;

fn render<T, V>(result: Result<tonic::Response<T>, Status>, view: impl FnOnce(T) -> V) -> Response
where
    V: Serialize,
{
    match result {
        Ok(reply) => Json(view(reply.into_inner())).into_response(),
        Err(status) => ApiError(status).into_response(),
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_parameter("id", raw))
}

// ── Skills ─────────────────────────────────────────────────────

/// GET /v1/skills
pub async fn list_skills<S: PortfolioService>(State(state): State<GatewayState<S>>) -> Response {
    let result = state
        .service
        .get_all_skills(Request::new(proto::GetAllSkillsRequest {}))
        .await;
    render(result, |reply| SkillsJson {
        skills: reply.skills.into_iter().map(Into::into).collect(),
    })
}

/// GET /v1/skills/{id}
pub async fn get_skill<S: PortfolioService>(
    State(state): State<GatewayState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let result = state
        .service
        .get_skill(Request::new(proto::GetSkillRequest { id }))
        .await;
    render(result, |reply| SkillReplyJson {
        skill: reply.skill.map(Into::into),
    })
}

// ── Experiences ────────────────────────────────────────────────

/// GET /v1/experiences
pub async fn list_experiences<S: PortfolioService>(
    State(state): State<GatewayState<S>>,
) -> Response {
    let result = state
        .service
        .get_all_experiences(Request::new(proto::GetAllExperiencesRequest {}))
        .await;
    render(result, |reply| ExperiencesJson {
        experiences: reply.experiences.into_iter().map(Into::into).collect(),
    })
}

/// GET /v1/experiences/{id}
pub async fn get_experience<S: PortfolioService>(
    State(state): State<GatewayState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let result = state
        .service
        .get_experience(Request::new(proto::GetExperienceRequest { id }))
        .await;
    render(result, |reply| ExperienceReplyJson {
        experience: reply.experience.map(Into::into),
    })
}

// ── Educations ─────────────────────────────────────────────────

/// GET /v1/educations
pub async fn list_educations<S: PortfolioService>(
    State(state): State<GatewayState<S>>,
) -> Response {
    let result = state
        .service
        .get_all_educations(Request::new(proto::GetAllEducationsRequest {}))
        .await;
    render(result, |reply| EducationsJson {
        educations: reply.educations.into_iter().map(Into::into).collect(),
    })
}

/// GET /v1/educations/{id}
pub async fn get_education<S: PortfolioService>(
    State(state): State<GatewayState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let result = state
        .service
        .get_education(Request::new(proto::GetEducationRequest { id }))
        .await;
    render(result, |reply| EducationReplyJson {
        education: reply.education.map(Into::into),
    })
}

/// OPTIONS on a routed path. Plain OPTIONS requests carry no
/// Access-Control-Request-Method, so the CORS layer passes them through.
pub async fn options() -> StatusCode {
    StatusCode::OK
}

/// Any path without a route. OPTIONS is still answered with 200.
pub async fn not_found(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    ApiError(Status::not_found("Not Found")).into_response()
}
