//! Movies API: movie catalog REST backend library.

pub mod error;
pub mod handlers;
pub mod movie;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use error::AppError;
pub use movie::{Movie, MovieChanges, NewMovie};
pub use response::Envelope;
pub use routes::{common_routes, movie_routes};
pub use service::MovieValidator;
pub use state::AppState;
pub use store::{
    ensure_database_exists, ensure_movies_table, MemoryMovieStore, MovieStore, PgMovieStore,
};
