//! RPC status → HTTP error response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tonic::{Code, Status};
use tracing::{debug, warn};

/// The configured CORS origin is not a valid header value.
#[derive(Debug, Error)]
#[error("invalid allowed origin: {0:?}")]
pub struct InvalidOrigin(pub String);

/// A failed RPC, rendered as the gateway's JSON error body.
#[derive(Debug)]
pub struct ApiError(pub Status);

impl ApiError {
    /// A path parameter that does not parse.
    pub fn invalid_parameter(name: &str, raw: &str) -> Self {
        ApiError(Status::invalid_argument(format!(
            "invalid value {raw:?} for parameter {name}: expected a 64-bit integer"
        )))
    }
}

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        ApiError(status)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: i32,
    message: &'a str,
    details: Vec<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = http_status(self.0.code());
        let code = self.0.code();
        if status.is_server_error() {
            warn!(status = status.as_u16(), ?code, message = self.0.message(), "request failed");
        } else {
            debug!(status = status.as_u16(), ?code, message = self.0.message(), "request rejected");
        }

        let body = ErrorBody {
            code: self.0.code() as i32,
            message: self.0.message(),
            details: Vec::new(),
        };
        (status, Json(body)).into_response()
    }
}

/// HTTP status for a gRPC code.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
        Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::FailedPrecondition => StatusCode::BAD_REQUEST,
        Code::Aborted => StatusCode::CONFLICT,
        Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_codes_map_to_http() {
        assert_eq!(http_status(Code::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(http_status(Code::InvalidArgument), StatusCode::BAD_REQUEST);
        assert_eq!(http_status(Code::Internal), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http_status(Code::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(http_status(Code::Cancelled).as_u16(), 499);
    }

    #[test]
    fn error_body_carries_grpc_code() {
        let body = ErrorBody {
            code: Code::NotFound as i32,
            message: "skill not found",
            details: Vec::new(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": 5, "message": "skill not found", "details": []})
        );
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logged_by(err: ApiError) -> (StatusCode, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let status = tracing::subscriber::with_default(subscriber, || err.into_response().status());
        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (status, out)
    }

    #[test]
    fn server_errors_are_logged_at_warn() {
        let (status, out) = logged_by(ApiError(Status::internal("failed to query education")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("status=500"), "{out}");
        assert!(out.contains("failed to query education"), "{out}");
    }

    #[test]
    fn client_errors_stay_at_debug() {
        let (status, out) = logged_by(ApiError(Status::not_found("skill not found")));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!out.contains("WARN"), "{out}");
        assert!(out.contains("DEBUG"), "{out}");
    }

    #[test]
    fn bad_parameter_is_invalid_argument() {
        let err = ApiError::invalid_parameter("id", "abc");
        assert_eq!(err.0.code(), Code::InvalidArgument);
        assert!(err.0.message().contains("\"abc\""));
    }
}
