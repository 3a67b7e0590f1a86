//! Route tables. Pure dispatch, no logic.

mod common;
mod movie;

pub use common::common_routes;
pub use movie::movie_routes;
