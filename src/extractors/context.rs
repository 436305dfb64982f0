//! Request-scoped context, built by the installed `ContextInitializer` or from the request itself.

use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, Method},
};
use std::collections::HashMap;

/// Header naming the calling user. Optional.
pub const API_USER_HEADER: &str = "X-Api-User";
/// Header carrying a caller-supplied request id. One is generated when absent.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    pub path: String,
    pub user: Option<String>,
    pub headers: HeaderMap,
    /// Free-form values set by a custom initializer for its validator to read.
    pub values: HashMap<String, String>,
}

impl RequestContext {
    /// Default context: method, path, headers, `X-Api-User`, request id.
    pub fn from_parts(parts: &Parts) -> Self {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        RequestContext {
            request_id: header(REQUEST_ID_HEADER).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            user: header(API_USER_HEADER),
            headers: parts.headers.clone(),
            values: HashMap::new(),
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(state.hooks.initialize(parts))
    }
}
