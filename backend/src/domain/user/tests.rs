//! Tests for the user identifier.

use super::*;
use rstest::rstest;
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
#[case(VALID_ID, None)]
#[case("", Some(UserIdValidationError::EmptyId))]
#[case("not-a-uuid", Some(UserIdValidationError::InvalidId))]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", Some(UserIdValidationError::InvalidId))]
fn user_id_validation(#[case] input: &str, #[case] expected: Option<UserIdValidationError>) {
    let result = UserId::new(input);
    match expected {
        None => assert_eq!(result.expect("valid id").as_ref(), input),
        Some(err) => assert_eq!(result.expect_err("invalid id"), err),
    }
}

#[rstest]
fn from_uuid_preserves_value() {
    let uuid = Uuid::new_v4();
    let id = UserId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), &uuid);
    assert_eq!(id.to_string(), uuid.to_string());
}

#[rstest]
fn deserialises_from_string() {
    let id: UserId = serde_json::from_value(json!(VALID_ID)).expect("deserialise id");
    assert_eq!(id.as_ref(), VALID_ID);
    assert!(serde_json::from_value::<UserId>(json!("nope")).is_err());
}
