//! Typed errors and HTTP mapping.

use crate::response::{CACHE_CONTROL_VALUE, JSON_CONTENT_TYPE};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("unknown status mapping '{0}' (expected flattened or semantic)")]
    StatusPolicy(String),
}

/// Everything the request pipeline can fail with. Storage detail is logged where it happens;
/// clients only see the fixed message of the variant.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad params")]
    BadParams,
    #[error("invalid {kind} key: {value}")]
    InvalidKey { kind: &'static str, value: String },
    #[error("record not found")]
    NotFound,
    #[error("unable to find table: {0}")]
    UnknownTable(String),
    #[error("insert failed")]
    InsertFailed,
    #[error("update failed")]
    UpdateFailed,
    #[error("delete failed")]
    DeleteFailed,
    #[error("unable to marshal json")]
    UnableToMarshalJson,
    /// Raised by a request validator hook.
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// How error kinds map onto HTTP status codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Every error is 400 Bad Request.
    #[default]
    Flattened,
    /// 404 for missing rows/tables, 409 for failed updates, 500 for storage failures.
    Semantic,
}

impl std::str::FromStr for StatusPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flattened" | "flat" => Ok(StatusPolicy::Flattened),
            "semantic" => Ok(StatusPolicy::Semantic),
            _ => Err(ConfigError::StatusPolicy(s.to_string())),
        }
    }
}

impl AppError {
    pub fn status(&self, policy: StatusPolicy) -> StatusCode {
        if policy == StatusPolicy::Flattened {
            return StatusCode::BAD_REQUEST;
        }
        match self {
            AppError::BadParams | AppError::InvalidKey { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::UnknownTable(_) => StatusCode::NOT_FOUND,
            AppError::UpdateFailed => StatusCode::CONFLICT,
            AppError::Rejected(_) => StatusCode::FORBIDDEN,
            AppError::InsertFailed
            | AppError::DeleteFailed
            | AppError::UnableToMarshalJson
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_api_error(self, policy: StatusPolicy) -> ApiError {
        ApiError {
            status: self.status(policy),
            message: self.to_string(),
        }
    }
}

/// Error already resolved to a status; this is what handlers return.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub code: u16,
    pub message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.status.as_u16(),
            message: &self.message,
        };
        let bytes = serde_json::to_vec(&body).unwrap_or_default();
        (
            self.status,
            [
                (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
                (header::CACHE_CONTROL, CACHE_CONTROL_VALUE),
            ],
            bytes,
        )
            .into_response()
    }
}
