//! Schema discovery: the registry as JSON.

use crate::error::{ApiError, AppError};
use crate::extractors::RequestContext;
use crate::model::Action;
use crate::response::json_ok;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};

/// Table name the validator sees for discovery requests.
pub const DDL_TABLE: &str = "ddl";

pub async fn list_ddl(State(state): State<AppState>, ctx: RequestContext) -> Result<Response, ApiError> {
    let result: Result<Response, AppError> = async {
        state.hooks.validate(&ctx, DDL_TABLE, Action::FetchSchema).await?;
        json_ok(state.registry.as_ref())
    }
    .await;
    result.map_err(|e| state.reject(&ctx, DDL_TABLE, Action::FetchSchema, e))
}

pub async fn get_ddl(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let result: Result<Response, AppError> = async {
        state.hooks.validate(&ctx, DDL_TABLE, Action::FetchSchema).await?;
        json_ok(state.registry.lookup(&name)?)
    }
    .await;
    result.map_err(|e| state.reject(&ctx, DDL_TABLE, Action::FetchSchema, e))
}
