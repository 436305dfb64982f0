//! CRUD routes for one record type: `/{route}` and `/{route}/:id`.

use crate::handlers::entity::{create, delete, list, read, update};
use crate::model::Record;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes<T: Record>() -> Router<AppState> {
    Router::new()
        .route(&format!("/{}", T::ROUTE), get(list::<T>).post(create::<T>))
        .route(
            &format!("/{}/:id", T::ROUTE),
            get(read::<T>).put(update::<T>).delete(delete::<T>),
        )
}
