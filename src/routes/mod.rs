//! Router assembly: seven entity route sets, schema discovery, operational endpoints.

mod common;
mod ddl;
mod entity;

pub use common::common_routes;
pub use ddl::ddl_routes;
pub use entity::entity_routes;

use crate::model::{LabelType, TImage, TImageSet, TLabel, TProject, TProjectUser, TUser};
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application router with tracing and a request body cap.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(entity_routes::<LabelType>())
        .merge(entity_routes::<TImage>())
        .merge(entity_routes::<TImageSet>())
        .merge(entity_routes::<TLabel>())
        .merge(entity_routes::<TProject>())
        .merge(entity_routes::<TProjectUser>())
        .merge(entity_routes::<TUser>())
        .merge(ddl_routes())
        .merge(common_routes())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
