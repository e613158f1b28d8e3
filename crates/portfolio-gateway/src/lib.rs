//! portfolio-gateway: REST/JSON gateway for the portfolio catalog.
//!
//! Every route forwards to the matching `PortfolioService` RPC in-process
//! and renders the reply with the protobuf JSON conventions (lowerCamelCase
//! keys, 64-bit integers as strings, RFC 3339 timestamps, unset fields
//! omitted). RPC failures are rendered as `{"code", "message", "details"}`
//! with an HTTP status derived from the gRPC code.
//!
//! # API Routes
//!
//! | Method | Path | RPC |
//! |---|---|---|
//! | GET | `/v1/skills` | `GetAllSkills` |
//! | GET | `/v1/skills/{id}` | `GetSkill` |
//! | GET | `/v1/experiences` | `GetAllExperiences` |
//! | GET | `/v1/experiences/{id}` | `GetExperience` |
//! | GET | `/v1/educations` | `GetAllEducations` |
//! | GET | `/v1/educations/{id}` | `GetEducation` |

pub mod error;
pub mod handlers;
pub mod json;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use portfolio_rpc::proto::portfolio_service_server::PortfolioService;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, InvalidOrigin};

/// Paths served by the gateway, for startup logging.
pub const ROUTES: &[&str] = &[
    "GET /v1/skills",
    "GET /v1/skills/{id}",
    "GET /v1/experiences",
    "GET /v1/experiences/{id}",
    "GET /v1/educations",
    "GET /v1/educations/{id}",
];

/// Shared state for gateway handlers.
pub struct GatewayState<S> {
    pub service: Arc<S>,
}

impl<S> Clone for GatewayState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Build the gateway router over any `PortfolioService` implementation.
pub fn build_router<S: PortfolioService>(service: Arc<S>, cors: CorsLayer) -> Router {
    let state = GatewayState { service };

    let v1 = Router::new()
        .route("/skills", get(handlers::list_skills::<S>).options(handlers::options))
        .route("/skills/{id}", get(handlers::get_skill::<S>).options(handlers::options))
        .route("/experiences", get(handlers::list_experiences::<S>).options(handlers::options))
        .route("/experiences/{id}", get(handlers::get_experience::<S>).options(handlers::options))
        .route("/educations", get(handlers::list_educations::<S>).options(handlers::options))
        .route("/educations/{id}", get(handlers::get_education::<S>).options(handlers::options))
        .with_state(state);

    Router::new()
        .nest("/v1", v1)
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS policy for the gateway.
///
/// `*` allows any origin; anything else is sent back verbatim as the single
/// allowed origin. Preflight requests are answered with 200, as is any
/// other OPTIONS request (see [`handlers::options`]).
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, InvalidOrigin> {
    let origin = if allowed_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(allowed_origin.trim())
            .map_err(|_| InvalidOrigin(allowed_origin.to_string()))?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_and_exact_origins_are_accepted() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("https://portfolio.example.com").is_ok());
    }

    #[test]
    fn origin_with_control_characters_is_rejected() {
        let err = cors_layer("https://bad\n.example").unwrap_err();
        assert!(err.to_string().contains("https://bad"));
    }
}
