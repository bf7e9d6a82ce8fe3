use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

/// Failure of the single outbound completion call.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("GLM API error: {0}")]
    Chat(ProviderError),

    #[error("Failed to parse ticket: {0}")]
    ParseTicket(ProviderError),

    #[error("Failed to analyze task: {0}")]
    AnalyzeTask(ProviderError),

    #[error("Failed to generate standup: {0}")]
    GenerateStandup(ProviderError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Chat(_)
            | ServiceError::ParseTicket(_)
            | ServiceError::AnalyzeTask(_)
            | ServiceError::GenerateStandup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = self.to_string();
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for ServiceError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}
