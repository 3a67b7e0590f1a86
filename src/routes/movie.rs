//! Movie routes: static method+path table over the CRUD handlers.

use crate::handlers::movie::{create, delete as delete_handler, index, show, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn movie_routes(state: AppState) -> Router {
    Router::new()
        .route("/movies", get(index).post(create))
        .route(
            "/movies/:movie_id",
            get(show).put(update).delete(delete_handler),
        )
        .with_state(state)
}
