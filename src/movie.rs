//! Movie domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted movie row. The id is storage-generated and immutable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: String,
    pub director: String,
}

/// Validated create input. All business fields are present and non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: String,
    pub director: String,
}

/// Validated partial-update input. Unset fields leave the stored value
/// unchanged; an all-`None` value is a valid no-op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub director: Option<String>,
}
