use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::outreach::OutreachError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Outreach(OutreachError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Outreach(OutreachError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            AppError::Outreach(OutreachError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Outreach(OutreachError::AlreadyReviewed(_))
            | AppError::Outreach(OutreachError::SendNotAllowed { .. }) => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Outreach(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Outreach(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<OutreachError> for AppError {
    fn from(value: OutreachError) -> Self {
        Self::Outreach(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::outreach::{LeadId, RevisionId};

    #[test]
    fn outreach_errors_map_to_client_statuses() {
        let cases = [
            (
                OutreachError::InvalidArgument("leads must contain at least one entry".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                OutreachError::NotFound("lead_id 9 not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                OutreachError::AlreadyReviewed(RevisionId(3)),
                StatusCode::CONFLICT,
            ),
            (
                OutreachError::SendNotAllowed { lead_id: LeadId(4) },
                StatusCode::CONFLICT,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(AppError::from(error).status(), expected);
        }
    }

    #[test]
    fn server_failures_are_internal_errors() {
        let error = AppError::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port taken",
        ));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().starts_with("io error"));
    }
}
