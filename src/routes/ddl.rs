//! Schema discovery routes.

use crate::handlers::{get_ddl, list_ddl};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn ddl_routes() -> Router<AppState> {
    Router::new()
        .route("/ddl", get(list_ddl))
        .route("/ddl/:name", get(get_ddl))
}
