//! Entity CRUD handlers, generic over the record type. One instantiation per table.
//!
//! Every handler runs the same sequence: parse params or key, run the request validator for
//! (table, action), decode and check the body on mutations, call the gateway, write JSON.
//! Failures are logged with table and action and resolved under the configured status policy.

use crate::error::{ApiError, AppError};
use crate::extractors::RequestContext;
use crate::model::{Action, Record, RecordKey};
use crate::response::{json_ok, PagedResults};
use crate::service::{Gateway, PageRequest};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
};
use std::collections::HashMap;

type QueryParams = Result<Query<HashMap<String, String>>, QueryRejection>;
type KeySegment = Result<Path<String>, PathRejection>;
type Body = Result<Bytes, BytesRejection>;

fn gateway<T: Record>(state: &AppState) -> Gateway<T> {
    Gateway::new(state.store.clone())
}

fn parse_key<T: Record>(segment: KeySegment) -> Result<T::Key, AppError> {
    let Path(raw) = segment.map_err(|_| AppError::BadParams)?;
    <T::Key as RecordKey>::parse_key(&raw)
}

/// Decode a body into `T`, then `before_save`, `prepare`, `validate(action)` in that order.
/// Any failure is reported to the client as bad params; the detail only goes to the log.
fn decode_record<T: Record>(body: Body, action: Action) -> Result<T, AppError> {
    let bytes = body.map_err(|e| {
        tracing::debug!(table = T::table_name(), error = %e, "body read failed");
        AppError::BadParams
    })?;
    let mut record: T = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!(table = T::table_name(), error = %e, "body decode failed");
        AppError::BadParams
    })?;
    let checked = record.before_save().and_then(|_| {
        record.prepare();
        record.validate(action)
    });
    if let Err(e) = checked {
        tracing::debug!(table = T::table_name(), %action, error = %e, "record rejected");
        return Err(AppError::BadParams);
    }
    Ok(record)
}

pub async fn list<T: Record>(
    State(state): State<AppState>,
    ctx: RequestContext,
    query: QueryParams,
) -> Result<Response, ApiError> {
    run_list::<T>(&state, &ctx, query)
        .await
        .map_err(|e| state.reject(&ctx, T::table_name(), Action::RetrieveMany, e))
}

async fn run_list<T: Record>(state: &AppState, ctx: &RequestContext, query: QueryParams) -> Result<Response, AppError> {
    let Query(params) = query.map_err(|_| AppError::BadParams)?;
    let page = PageRequest::from_query(&params)?;
    state.hooks.validate(ctx, T::table_name(), Action::RetrieveMany).await?;
    let (data, total_records) = gateway::<T>(state).list_page(&page).await?;
    json_ok(&PagedResults {
        page: page.page,
        page_size: page.page_size,
        data,
        total_records,
    })
}

pub async fn read<T: Record>(
    State(state): State<AppState>,
    ctx: RequestContext,
    key: KeySegment,
) -> Result<Response, ApiError> {
    run_read::<T>(&state, &ctx, key)
        .await
        .map_err(|e| state.reject(&ctx, T::table_name(), Action::RetrieveOne, e))
}

async fn run_read<T: Record>(state: &AppState, ctx: &RequestContext, key: KeySegment) -> Result<Response, AppError> {
    let key = parse_key::<T>(key)?;
    state.hooks.validate(ctx, T::table_name(), Action::RetrieveOne).await?;
    let record = gateway::<T>(state).get_one(&key).await?;
    json_ok(&record)
}

pub async fn create<T: Record>(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Body,
) -> Result<Response, ApiError> {
    run_create::<T>(&state, &ctx, body)
        .await
        .map_err(|e| state.reject(&ctx, T::table_name(), Action::Create, e))
}

async fn run_create<T: Record>(state: &AppState, ctx: &RequestContext, body: Body) -> Result<Response, AppError> {
    state.hooks.validate(ctx, T::table_name(), Action::Create).await?;
    let record = decode_record::<T>(body, Action::Create)?;
    let (created, affected) = gateway::<T>(state).create(record).await?;
    tracing::debug!(table = T::table_name(), key = %created.key(), affected, "created");
    json_ok(&created)
}

pub async fn update<T: Record>(
    State(state): State<AppState>,
    ctx: RequestContext,
    key: KeySegment,
    body: Body,
) -> Result<Response, ApiError> {
    run_update::<T>(&state, &ctx, key, body)
        .await
        .map_err(|e| state.reject(&ctx, T::table_name(), Action::Update, e))
}

async fn run_update<T: Record>(
    state: &AppState,
    ctx: &RequestContext,
    key: KeySegment,
    body: Body,
) -> Result<Response, AppError> {
    let key = parse_key::<T>(key)?;
    state.hooks.validate(ctx, T::table_name(), Action::Update).await?;
    let patch = decode_record::<T>(body, Action::Update)?;
    let (updated, affected) = gateway::<T>(state).update(&key, &patch).await?;
    tracing::debug!(table = T::table_name(), %key, affected, "updated");
    json_ok(&updated)
}

pub async fn delete<T: Record>(
    State(state): State<AppState>,
    ctx: RequestContext,
    key: KeySegment,
) -> Result<Response, ApiError> {
    run_delete::<T>(&state, &ctx, key)
        .await
        .map_err(|e| state.reject(&ctx, T::table_name(), Action::Delete, e))
}

async fn run_delete<T: Record>(state: &AppState, ctx: &RequestContext, key: KeySegment) -> Result<Response, AppError> {
    let key = parse_key::<T>(key)?;
    state.hooks.validate(ctx, T::table_name(), Action::Delete).await?;
    let affected = gateway::<T>(state).delete(&key).await?;
    json_ok(&affected)
}
