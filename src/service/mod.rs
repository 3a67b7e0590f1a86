//! Request validation for movie payloads.

mod validation;
pub use validation::MovieValidator;
