//! Movie CRUD handlers: index, show, create, update, delete.
//!
//! Each handler runs the same pipeline: validate the id when the route has
//! one, look the record up when the operation needs it, validate the body
//! when there is one, then execute the store operation. Any failed step
//! terminates the request; `AppError` renders the error envelope.

use crate::error::AppError;
use crate::response::Envelope;
use crate::service::MovieValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

pub async fn index(State(state): State<AppState>) -> Result<Envelope, AppError> {
    let movies = state.store.find_all().await?;
    Ok(Envelope::new(200, "movie list").with_data(json!({ "movies": movies })))
}

pub async fn show(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Envelope, AppError> {
    let id = MovieValidator::validate_id(&movie_id)?;
    let movie = state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Envelope::new(200, "movie details").with_data(json!({ "movie": movie })))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Envelope, AppError> {
    let new_movie = MovieValidator::validate_create(&body)?;
    let movie = state.store.insert(&new_movie).await?;
    Ok(Envelope::new(201, "movie created").with_data(json!({ "movie": movie })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Envelope, AppError> {
    let id = MovieValidator::validate_id(&movie_id)?;
    state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    let changes = MovieValidator::validate_update(&body)?;
    // The row can disappear between the lookup and the write; treat that
    // the same as a failed lookup.
    let movie = state
        .store
        .update(id, &changes)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Envelope::new(201, "movie updated").with_data(json!({ "movie": movie })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Envelope, AppError> {
    let id = MovieValidator::validate_id(&movie_id)?;
    state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Envelope::new(200, "movie deleted"))
}
