//! Regression coverage for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn try_new_rejects_blank_messages() {
    assert_eq!(
        Error::try_new(ErrorCode::NotFound, "   "),
        Err(ErrorValidationError::EmptyMessage)
    );
}

#[rstest]
fn constructors_set_the_matching_code() {
    assert_eq!(
        Error::invalid_identifier("bad id").code(),
        ErrorCode::InvalidIdentifier
    );
    assert_eq!(
        Error::invalid_field("bad field").code(),
        ErrorCode::InvalidField
    );
    assert_eq!(Error::empty_body("empty").code(), ErrorCode::EmptyBody);
    assert_eq!(Error::not_found("missing").code(), ErrorCode::NotFound);
    assert_eq!(
        Error::referential_violation("dangling").code(),
        ErrorCode::ReferentialViolation
    );
    assert_eq!(
        Error::service_unavailable("down").code(),
        ErrorCode::ServiceUnavailable
    );
    assert_eq!(Error::internal("boom").code(), ErrorCode::InternalError);
}

#[rstest]
fn codes_serialize_as_snake_case() {
    let err = Error::referential_violation("Article or User does not exist");
    let value = serde_json::to_value(&err).expect("error serializes");
    assert_eq!(
        value.get("code").and_then(serde_json::Value::as_str),
        Some("referential_violation")
    );
    assert_eq!(
        value.get("message").and_then(serde_json::Value::as_str),
        Some("Article or User does not exist")
    );
}

#[rstest]
fn details_are_omitted_until_attached() {
    let bare = serde_json::to_value(Error::not_found("missing")).expect("serializes");
    assert!(bare.get("details").is_none());

    let detailed = serde_json::to_value(
        Error::invalid_field("bad").with_details(json!({ "field": "inc_votes" })),
    )
    .expect("serializes");
    assert_eq!(
        detailed.pointer("/details/field").and_then(serde_json::Value::as_str),
        Some("inc_votes")
    );
}

#[rstest]
fn display_shows_the_message() {
    assert_eq!(Error::not_found("Comment not found").to_string(), "Comment not found");
}
