//! HTTP handlers for the movie CRUD operations.

pub mod movie;
