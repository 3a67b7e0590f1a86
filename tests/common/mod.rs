//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the same router main.rs serves, backed by the in-memory store so
//! the suite runs without a database, and provides small request/response
//! helpers around `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use movies_api::{
    common_routes, movie_routes, AppError, AppState, MemoryMovieStore, Movie, MovieChanges,
    MovieStore, NewMovie,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router with the full route table over the given store.
pub fn build_app_with_store(store: Arc<dyn MovieStore>) -> Router {
    let state = AppState::new(store);
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(movie_routes(state))
}

/// Router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_app_with_store(Arc::new(MemoryMovieStore::new()))
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn storage_down() -> AppError {
    AppError::Db(sqlx::Error::PoolClosed)
}

/// Store double whose every operation fails, for exercising 500 paths.
pub struct FailingStore;

#[async_trait]
impl MovieStore for FailingStore {
    async fn find_all(&self) -> Result<Vec<Movie>, AppError> {
        Err(storage_down())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Movie>, AppError> {
        Err(storage_down())
    }

    async fn insert(&self, _new: &NewMovie) -> Result<Movie, AppError> {
        Err(storage_down())
    }

    async fn update(&self, _id: i64, _changes: &MovieChanges) -> Result<Option<Movie>, AppError> {
        Err(storage_down())
    }

    async fn delete(&self, _id: i64) -> Result<bool, AppError> {
        Err(storage_down())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(storage_down())
    }
}

/// Store double whose lookups fail and whose writes panic: a write reaching
/// the store after a failed lookup fails the test loudly.
pub struct BrokenLookupStore;

#[async_trait]
impl MovieStore for BrokenLookupStore {
    async fn find_all(&self) -> Result<Vec<Movie>, AppError> {
        Err(storage_down())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Movie>, AppError> {
        Err(storage_down())
    }

    async fn insert(&self, _new: &NewMovie) -> Result<Movie, AppError> {
        panic!("insert reached the store after a failed lookup");
    }

    async fn update(&self, _id: i64, _changes: &MovieChanges) -> Result<Option<Movie>, AppError> {
        panic!("update reached the store after a failed lookup");
    }

    async fn delete(&self, _id: i64) -> Result<bool, AppError> {
        panic!("delete reached the store after a failed lookup");
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
