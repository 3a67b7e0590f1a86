//! Request validation for movie payloads.

use crate::error::AppError;
use crate::movie::{MovieChanges, NewMovie};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub struct MovieValidator;

impl MovieValidator {
    /// Parse a raw path segment as a movie id. Ids are positive integers.
    pub fn validate_id(raw: &str) -> Result<i64, AppError> {
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AppError::InvalidId(vec![
                "id must be a positive integer".into(),
            ])),
        }
    }

    /// Validate a create body. All five fields are required; failures are
    /// collected per field rather than short-circuiting on the first.
    pub fn validate_create(body: &Value) -> Result<NewMovie, AppError> {
        let map = object_body(body)?;
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        let title = required_text(map, "title", &mut errors);
        let description = required_text(map, "description", &mut errors);
        let duration = required_text(map, "duration", &mut errors);
        let director = required_text(map, "director", &mut errors);
        let release_date = match map.get("release_date") {
            None | Some(Value::Null) => {
                push_error(&mut errors, "release_date", "release_date is required");
                None
            }
            Some(v) => match date_value(v) {
                Ok(d) => Some(d),
                Err(msg) => {
                    push_error(&mut errors, "release_date", &format!("release_date {}", msg));
                    None
                }
            },
        };

        match (title, description, release_date, duration, director) {
            (Some(title), Some(description), Some(release_date), Some(duration), Some(director)) => {
                Ok(NewMovie {
                    title,
                    description,
                    release_date,
                    duration,
                    director,
                })
            }
            _ => Err(AppError::InvalidPayload(errors)),
        }
    }

    /// Validate an update body. Same per-field rules as create but every
    /// field is optional; `null` counts as absent. An empty object is a
    /// valid no-op.
    pub fn validate_update(body: &Value) -> Result<MovieChanges, AppError> {
        let map = object_body(body)?;
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        let release_date = match map.get("release_date") {
            None | Some(Value::Null) => None,
            Some(v) => match date_value(v) {
                Ok(d) => Some(d),
                Err(msg) => {
                    push_error(&mut errors, "release_date", &format!("release_date {}", msg));
                    None
                }
            },
        };
        let changes = MovieChanges {
            title: optional_text(map, "title", &mut errors),
            description: optional_text(map, "description", &mut errors),
            release_date,
            duration: optional_text(map, "duration", &mut errors),
            director: optional_text(map, "director", &mut errors),
        };

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(AppError::InvalidPayload(errors))
        }
    }
}

fn object_body(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object()
        .ok_or_else(|| AppError::BadRequest("body must be a JSON object".into()))
}

fn push_error(errors: &mut BTreeMap<String, Vec<String>>, field: &str, message: &str) {
    errors.entry(field.to_string()).or_default().push(message.to_string());
}

fn required_text(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut BTreeMap<String, Vec<String>>,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, &format!("{} is required", field));
            None
        }
        Some(v) => match text_value(v) {
            Ok(s) => Some(s),
            Err(msg) => {
                push_error(errors, field, &format!("{} {}", field, msg));
                None
            }
        },
    }
}

fn optional_text(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut BTreeMap<String, Vec<String>>,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(v) => match text_value(v) {
            Ok(s) => Some(s),
            Err(msg) => {
                push_error(errors, field, &format!("{} {}", field, msg));
                None
            }
        },
    }
}

fn text_value(v: &Value) -> Result<String, &'static str> {
    match v {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::String(_) => Err("must not be empty"),
        _ => Err("must be a string"),
    }
}

/// Accepts `YYYY-MM-DD` or the date part of an RFC 3339 timestamp.
fn date_value(v: &Value) -> Result<NaiveDate, &'static str> {
    let s = v.as_str().ok_or("must be a valid date")?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
        .ok_or("must be a valid date")
}
