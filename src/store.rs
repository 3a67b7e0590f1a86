//! Movie storage: the `MovieStore` trait, the PostgreSQL implementation,
//! an in-memory implementation, and database bootstrap helpers.

use crate::error::AppError;
use crate::movie::{Movie, MovieChanges, NewMovie};
use async_trait::async_trait;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

/// Storage abstraction over the movie table. Handlers receive this as an
/// injected capability so tests can substitute an in-memory store.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Movie>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, AppError>;
    async fn insert(&self, new: &NewMovie) -> Result<Movie, AppError>;
    async fn update(&self, id: i64, changes: &MovieChanges) -> Result<Option<Movie>, AppError>;
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

const MOVIE_COLUMNS: &str = "id, title, description, release_date, duration, director";

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        PgMovieStore { pool }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn find_all(&self) -> Result<Vec<Movie>, AppError> {
        let sql = format!("SELECT {} FROM movies ORDER BY id", MOVIE_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let movies = sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?;
        Ok(movies)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let sql = format!("SELECT {} FROM movies WHERE id = $1", MOVIE_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn insert(&self, new: &NewMovie) -> Result<Movie, AppError> {
        let sql = format!(
            "INSERT INTO movies (title, description, release_date, duration, director) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            MOVIE_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.release_date)
            .bind(&new.duration)
            .bind(&new.director)
            .fetch_one(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn update(&self, id: i64, changes: &MovieChanges) -> Result<Option<Movie>, AppError> {
        // COALESCE keeps the stored value for fields the caller did not send.
        let sql = format!(
            "UPDATE movies SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             release_date = COALESCE($4, release_date), \
             duration = COALESCE($5, duration), \
             director = COALESCE($6, director) \
             WHERE id = $1 RETURNING {}",
            MOVIE_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.release_date)
            .bind(&changes.duration)
            .bind(&changes.director)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        tracing::debug!(id, "delete movie");
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

#[derive(Default)]
struct MemoryInner {
    movies: Vec<Movie>,
    next_id: i64,
}

/// In-memory store with the same observable semantics as [`PgMovieStore`].
/// Used by the test suite and handy for running the service without a
/// database.
#[derive(Default)]
pub struct MemoryMovieStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn find_all(&self) -> Result<Vec<Movie>, AppError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.movies.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn insert(&self, new: &NewMovie) -> Result<Movie, AppError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let movie = Movie {
            id: inner.next_id,
            title: new.title.clone(),
            description: new.description.clone(),
            release_date: new.release_date,
            duration: new.duration.clone(),
            director: new.director.clone(),
        };
        inner.movies.push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i64, changes: &MovieChanges) -> Result<Option<Movie>, AppError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(movie) = inner.movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            movie.title = title.clone();
        }
        if let Some(description) = &changes.description {
            movie.description = description.clone();
        }
        if let Some(release_date) = changes.release_date {
            movie.release_date = release_date;
        }
        if let Some(duration) = &changes.duration {
            movie.duration = duration.clone();
        }
        if let Some(director) = &changes.director {
            movie.director = director.clone();
        }
        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = inner.movies.len();
        inner.movies.retain(|m| m.id != id);
        Ok(inner.movies.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Create the movies table if it does not exist. Call before serving.
pub async fn ensure_movies_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = r#"
        CREATE TABLE IF NOT EXISTS movies (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            release_date DATE NOT NULL,
            duration TEXT NOT NULL,
            director TEXT NOT NULL
        )
        "#;
    sqlx::query(ddl).execute(pool).await?;
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects
/// to the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
