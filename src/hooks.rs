//! Pluggable request hooks: context initialization and per-(table, action) request validation.
//!
//! Both are optional. Without an initializer the context comes from the request itself;
//! without a validator every request is allowed.

use crate::error::AppError;
use crate::extractors::RequestContext;
use crate::model::Action;
use async_trait::async_trait;
use axum::http::request::Parts;
use std::sync::Arc;

pub trait ContextInitializer: Send + Sync {
    fn initialize(&self, parts: &Parts) -> RequestContext;
}

impl<F> ContextInitializer for F
where
    F: Fn(&Parts) -> RequestContext + Send + Sync,
{
    fn initialize(&self, parts: &Parts) -> RequestContext {
        self(parts)
    }
}

/// Authorization hook. An `Err` ends the request before any storage call.
#[async_trait]
pub trait RequestValidator: Send + Sync {
    async fn validate(&self, ctx: &RequestContext, table: &str, action: Action) -> Result<(), AppError>;
}

#[async_trait]
impl<F> RequestValidator for F
where
    F: Fn(&RequestContext, &str, Action) -> Result<(), AppError> + Send + Sync,
{
    async fn validate(&self, ctx: &RequestContext, table: &str, action: Action) -> Result<(), AppError> {
        self(ctx, table, action)
    }
}

#[derive(Clone, Default)]
pub struct Hooks {
    context_initializer: Option<Arc<dyn ContextInitializer>>,
    request_validator: Option<Arc<dyn RequestValidator>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context_initializer(mut self, initializer: impl ContextInitializer + 'static) -> Self {
        self.context_initializer = Some(Arc::new(initializer));
        self
    }

    pub fn with_request_validator(mut self, validator: impl RequestValidator + 'static) -> Self {
        self.request_validator = Some(Arc::new(validator));
        self
    }

    pub fn initialize(&self, parts: &Parts) -> RequestContext {
        match &self.context_initializer {
            Some(init) => init.initialize(parts),
            None => RequestContext::from_parts(parts),
        }
    }

    pub async fn validate(&self, ctx: &RequestContext, table: &str, action: Action) -> Result<(), AppError> {
        match &self.request_validator {
            Some(v) => v.validate(ctx, table, action).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("context_initializer", &self.context_initializer.is_some())
            .field("request_validator", &self.request_validator.is_some())
            .finish()
    }
}
