//! Demo consumer: the labeling API over an in-memory store, with hooks installed.
//!
//! Reads are open; writes need an `X-Api-User` header. Run from repo root: `cargo run -p labeling-demo`

use axum::http::request::Parts;
use labeling_api::{app, default_registry, Action, AppError, AppState, Hooks, MemoryStore, RequestContext, StatusPolicy};
use std::sync::Arc;
use tokio::net::TcpListener;

fn context(parts: &Parts) -> RequestContext {
    let ctx = RequestContext::from_parts(parts);
    let role = if ctx.user.is_some() { "writer" } else { "anonymous" };
    ctx.with_value("role", role)
}

fn authorize(ctx: &RequestContext, table: &str, action: Action) -> Result<(), AppError> {
    if action.is_mutation() && ctx.value("role") != Some("writer") {
        return Err(AppError::Rejected(format!("{} on {} needs X-Api-User", action, table)));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("labeling_api=debug,tower_http=info")),
        )
        .init();

    let hooks = Hooks::new()
        .with_context_initializer(context)
        .with_request_validator(authorize);
    let state = AppState::new(Arc::new(MemoryStore::new()), default_registry())
        .with_hooks(hooks)
        .with_status_policy(StatusPolicy::Semantic);

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    let port = listener.local_addr()?.port();
    tracing::info!("labeling demo listening on http://127.0.0.1:{}", port);
    axum::serve(listener, app(state, 1024 * 1024)).await?;
    Ok(())
}
