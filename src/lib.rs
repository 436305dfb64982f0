//! Labeling API: a typed REST facade over the seven image-labeling tables in PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod hooks;
pub mod migration;
pub mod model;
pub mod registry;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{ApiError, AppError, ConfigError, StatusPolicy};
pub use extractors::RequestContext;
pub use hooks::{ContextInitializer, Hooks, RequestValidator};
pub use migration::{ensure_database_exists, ensure_schema};
pub use model::{Action, Record};
pub use registry::{default_registry, EndpointDescriptor, EntityRegistry};
pub use routes::app;
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store, StoreError};
