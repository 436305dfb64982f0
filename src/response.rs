//! JSON response writing: UTF-8 content type and no-cache on every body.

use crate::error::AppError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const CACHE_CONTROL_VALUE: &str = "no-cache";

/// Pagination envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct PagedResults<T> {
    pub page: i64,
    pub page_size: i64,
    pub data: Vec<T>,
    pub total_records: i64,
}

pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Response, AppError> {
    let body = serde_json::to_vec(value).map_err(|e| {
        tracing::error!(error = %e, "response serialization failed");
        AppError::UnableToMarshalJson
    })?;
    Ok((
        status,
        [
            (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE),
        ],
        body,
    )
        .into_response())
}

pub fn json_ok<T: Serialize + ?Sized>(value: &T) -> Result<Response, AppError> {
    json_response(StatusCode::OK, value)
}
