//! Boundary validators for untrusted request input.
//!
//! Each validator takes one raw input and returns either the normalized
//! value or a typed [`Error`]; none of them performs I/O. The first failure
//! short-circuits the operation pipeline, so no mutation is attempted after
//! a rejection.
//!
//! Payload fields whose *type* errors the API distinguishes (`username`,
//! `body`, `inc_votes`) arrive as [`serde_json::Value`] so that a missing
//! field, a wrong-typed field and a valid field each get their own answer.

use pagination::PageWindow;
use serde_json::{Value, json};

use crate::domain::article::{SortColumn, SortOrder};
use crate::domain::error::Error;

/// Validation error codes attached to rejection details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    InvalidId,
    MissingField,
    InvalidType,
    EmptyValue,
    InvalidQuery,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::MissingField => "missing_field",
            Self::InvalidType => "invalid_type",
            Self::EmptyValue => "empty_value",
            Self::InvalidQuery => "invalid_query",
        }
    }
}

/// Newtype wrapper for request field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldName(&'static str);

impl FieldName {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn rejection(error: Error, field: FieldName, code: ValidationCode) -> Error {
    error.with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// Parse an identifier path segment into a positive integer key.
///
/// Accepts decimal strings with surrounding whitespace. Zero, negative,
/// fractional and non-numeric inputs are all rejected the same way; one
/// rule for every identifier position.
///
/// # Errors
///
/// Returns an [`Error`] with [`crate::domain::ErrorCode::InvalidIdentifier`]
/// when the input does not parse to a positive integer.
pub fn parse_id(raw: &str, field: FieldName) -> Result<i64, Error> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            rejection(
                Error::invalid_identifier(format!(
                    "{} must be a positive integer",
                    field.as_str()
                )),
                field,
                ValidationCode::InvalidId,
            )
        })
}

/// Parse the `inc_votes` payload field into a vote delta.
///
/// Missing fields and non-integer values share one rejection; there is no
/// magnitude limit, so callers may increment or decrement without bound.
///
/// # Errors
///
/// Returns an [`Error`] with [`crate::domain::ErrorCode::InvalidField`] when
/// the field is absent or not an integer number.
pub fn parse_vote_delta(raw: Option<&Value>) -> Result<i32, Error> {
    const FIELD: FieldName = FieldName::new("inc_votes");

    let invalid = || {
        rejection(
            Error::invalid_field("inc_votes must be a number"),
            FIELD,
            ValidationCode::InvalidType,
        )
    };

    let value = raw.ok_or_else(invalid)?;
    let delta = value.as_i64().ok_or_else(invalid)?;
    i32::try_from(delta).map_err(|_| invalid())
}

/// Parse the `username` payload field.
///
/// # Errors
///
/// Returns an [`Error`] with [`crate::domain::ErrorCode::InvalidField`] when
/// the field is absent or not a string.
pub fn parse_username(raw: Option<&Value>) -> Result<String, Error> {
    const FIELD: FieldName = FieldName::new("username");

    let value = raw.ok_or_else(|| {
        rejection(
            Error::invalid_field("Missing username or body"),
            FIELD,
            ValidationCode::MissingField,
        )
    })?;
    match value {
        Value::String(username) => Ok(username.clone()),
        _ => Err(rejection(
            Error::invalid_field("username must be a string"),
            FIELD,
            ValidationCode::InvalidType,
        )),
    }
}

/// Parse the comment `body` payload field.
///
/// The returned string is the original, untrimmed input; trimming is only
/// used to detect whitespace-only bodies.
///
/// # Errors
///
/// Returns an [`Error`] with [`crate::domain::ErrorCode::InvalidField`] for
/// a missing or non-string field, or
/// [`crate::domain::ErrorCode::EmptyBody`] when the body is empty after
/// trimming.
pub fn parse_comment_body(raw: Option<&Value>) -> Result<String, Error> {
    const FIELD: FieldName = FieldName::new("body");

    let value = raw.ok_or_else(|| {
        rejection(
            Error::invalid_field("Missing username or body"),
            FIELD,
            ValidationCode::MissingField,
        )
    })?;
    let body = match value {
        Value::String(body) => body,
        _ => {
            return Err(rejection(
                Error::invalid_field("body must be a string"),
                FIELD,
                ValidationCode::InvalidType,
            ));
        }
    };
    if body.trim().is_empty() {
        return Err(rejection(
            Error::empty_body("Comment body cannot be empty"),
            FIELD,
            ValidationCode::EmptyValue,
        ));
    }
    Ok(body.clone())
}

/// Validate the article listing's `sort_by`/`order` query parameters.
///
/// Absent or empty values take the defaults (`created_at`, `desc`). Anything
/// off the [`SortColumn`] whitelist, or an order other than a
/// case-insensitive `asc`/`desc`, is rejected — these two values are the only
/// request input that reaches query structure rather than a bound parameter.
///
/// # Errors
///
/// Returns an [`Error`] with [`crate::domain::ErrorCode::InvalidField`] for
/// any value outside the whitelist.
pub fn parse_sort_and_order(
    sort_by: Option<&str>,
    order: Option<&str>,
) -> Result<(SortColumn, SortOrder), Error> {
    let invalid = |field: FieldName| {
        rejection(
            Error::invalid_field("Invalid sort_by or order query parameter"),
            field,
            ValidationCode::InvalidQuery,
        )
    };

    let column = match sort_by {
        None => SortColumn::CreatedAt,
        Some(raw) if raw.is_empty() => SortColumn::CreatedAt,
        Some(raw) => SortColumn::parse(raw).ok_or_else(|| invalid(FieldName::new("sort_by")))?,
    };
    let order = match order {
        None => SortOrder::Desc,
        Some(raw) if raw.is_empty() => SortOrder::Desc,
        Some(raw) => SortOrder::parse(raw).ok_or_else(|| invalid(FieldName::new("order")))?,
    };
    Ok((column, order))
}

/// Validate the comment listing's optional `limit`/`page` query parameters.
///
/// Pagination applies only when `limit` is present; `page` then defaults to
/// 1. A `page` supplied without a `limit` is rejected, since there is no
/// window to cut. Both values must be positive integers.
///
/// # Errors
///
/// Returns an [`Error`] with [`crate::domain::ErrorCode::InvalidField`] for
/// non-numeric, zero or negative values, or for a `page` without a `limit`.
pub fn parse_page_window(
    limit: Option<&str>,
    page: Option<&str>,
) -> Result<Option<PageWindow>, Error> {
    const LIMIT: FieldName = FieldName::new("limit");
    const PAGE: FieldName = FieldName::new("page");

    let invalid = |field: FieldName| {
        rejection(
            Error::invalid_field(format!("{} must be a positive integer", field.as_str())),
            field,
            ValidationCode::InvalidQuery,
        )
    };

    let Some(raw_limit) = limit else {
        if page.is_some() {
            return Err(rejection(
                Error::invalid_field("page requires a limit"),
                PAGE,
                ValidationCode::InvalidQuery,
            ));
        }
        return Ok(None);
    };

    let limit = raw_limit
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid(LIMIT))?;
    let page = match page {
        None => 1,
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| invalid(PAGE))?,
    };

    PageWindow::new(limit, page)
        .map(Some)
        .map_err(|err| match err {
            pagination::PageWindowError::InvalidLimit => invalid(LIMIT),
            pagination::PageWindowError::InvalidPage => invalid(PAGE),
        })
}

/// Validate the presence shape of an optional filter value.
///
/// An absent filter is a no-op; a filter that is present but empty after
/// trimming is rejected rather than silently matching nothing.
///
/// # Errors
///
/// Returns an [`Error`] with [`crate::domain::ErrorCode::InvalidField`] for
/// a present-but-empty value.
pub fn require_filter_value(
    field: FieldName,
    value: Option<&str>,
) -> Result<Option<String>, Error> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Err(rejection(
            Error::invalid_field(format!("{} filter value is missing", field.as_str())),
            field,
            ValidationCode::EmptyValue,
        )),
        Some(raw) => Ok(Some(raw.to_owned())),
    }
}
