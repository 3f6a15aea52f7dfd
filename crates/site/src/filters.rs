//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Calendar date part of a timestamp.
///
/// Usage in templates: `{{ contact.created_at|day }}` renders `2026-03-14`.
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn day(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let s = value.to_string();
    Ok(s.get(..10).map_or_else(|| s.clone(), str::to_owned))
}

