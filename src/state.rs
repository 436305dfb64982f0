//! Shared application state for all routes. Built once at startup; cheap to clone per request.

use crate::error::{ApiError, AppError, StatusPolicy};
use crate::extractors::RequestContext;
use crate::hooks::Hooks;
use crate::model::Action;
use crate::registry::EntityRegistry;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub registry: Arc<EntityRegistry>,
    pub hooks: Hooks,
    pub status_policy: StatusPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, registry: EntityRegistry) -> Self {
        AppState {
            store,
            registry: Arc::new(registry),
            hooks: Hooks::default(),
            status_policy: StatusPolicy::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Log a pipeline failure and resolve it to a response under the configured policy.
    pub fn reject(&self, ctx: &RequestContext, table: &str, action: Action, err: AppError) -> ApiError {
        tracing::warn!(
            request_id = %ctx.request_id,
            user = ctx.user.as_deref().unwrap_or("-"),
            table,
            %action,
            error = %err,
            "request failed"
        );
        err.into_api_error(self.status_policy)
    }
}
