//! Custom axum extractors.

mod context;
pub use context::{RequestContext, API_USER_HEADER, REQUEST_ID_HEADER};
