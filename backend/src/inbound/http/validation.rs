//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs carry every field as `Option` so that a missing field, a
//! supplied read-only field and an invalid value each yield a distinct
//! `details.code` instead of a generic deserialisation failure.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::{Choices, Error, validation_error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    ReadOnlyField,
    InvalidUuid,
    InvalidDate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::ReadOnlyField => "read_only_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn read_only_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} is read-only"))
        .with_code(ErrorCode::ReadOnlyField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_date_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a YYYY-MM-DD date"))
        .with_value(ErrorCode::InvalidDate, value)
}

/// Unwrap a mandatory field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Whether an update replaces the whole resource (`PUT`) or merges a
/// subset of fields into it (`PATCH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpdateMode {
    Replace,
    Merge,
}

impl UpdateMode {
    /// Replacements must name every mutable field; merges may omit any.
    pub(crate) fn field<T>(self, value: Option<T>, field: FieldName) -> Result<Option<T>, Error> {
        match (self, value) {
            (Self::Replace, None) => Err(missing_field_error(field)),
            (_, value) => Ok(value),
        }
    }
}

/// Fail when a client supplied any of the listed read-only fields.
pub(crate) fn reject_read_only(fields: &[(FieldName, &Option<Value>)]) -> Result<(), Error> {
    match fields.iter().find(|(_, value)| value.is_some()) {
        Some((field, _)) => Err(read_only_field_error(*field)),
        None => Ok(()),
    }
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid_date_error(field, value))
}

/// Parse a closed enumeration, reporting the allowed values on failure.
pub(crate) fn parse_choice<C: Choices>(value: &str) -> Result<C, Error> {
    C::parse(value).map_err(|err| validation_error(&err))
}

/// Distinguish an explicit `null` from an absent key.
///
/// Pair with `#[serde(default)]`: absent keys stay `None`, `null` becomes
/// `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, IssuePriority};
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        assignee: Option<Option<String>>,
    }

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"assignee":null}"#, Some(None))]
    #[case(r#"{"assignee":"a"}"#, Some(Some("a".to_owned())))]
    fn deserialize_some_separates_null_from_absent(
        #[case] raw: &str,
        #[case] expected: Option<Option<String>>,
    ) {
        let patch: Patch = serde_json::from_str(raw).expect("valid JSON");
        assert_eq!(patch.assignee, expected);
    }

    #[rstest]
    fn read_only_fields_report_the_first_supplied_field() {
        let id = None;
        let author = Some(json!("someone"));
        let err = reject_read_only(&[
            (FieldName::new("id"), &id),
            (FieldName::new("author"), &author),
        ])
        .expect_err("author is supplied");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "author", "code": "read_only_field"}))
        );
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<String>(None, FieldName::new("title")).expect_err("missing");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "title", "code": "missing_field"}))
        );
    }

    #[rstest]
    #[case(UpdateMode::Replace, None, false)]
    #[case(UpdateMode::Replace, Some("x"), true)]
    #[case(UpdateMode::Merge, None, true)]
    fn replacements_require_every_field(
        #[case] mode: UpdateMode,
        #[case] value: Option<&str>,
        #[case] ok: bool,
    ) {
        assert_eq!(mode.field(value, FieldName::new("name")).is_ok(), ok);
    }

    #[rstest]
    #[case("2000-02-29", true)]
    #[case("2001-02-29", false)]
    #[case("29/02/2000", false)]
    fn dates_must_be_iso_calendar_days(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_date(raw, FieldName::new("dateBirth")).is_ok(), ok);
    }

    #[rstest]
    fn unknown_choices_list_allowed_values() {
        let err = parse_choice::<IssuePriority>("urgent").expect_err("not a priority");
        assert_eq!(err.message(), "priority must be one of: low, medium, high");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "priority", "code": "invalid_choice"}))
        );
    }

    #[rstest]
    fn invalid_uuid_echoes_the_value() {
        let err = parse_uuid("nope", FieldName::new("user")).expect_err("not a uuid");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "user", "value": "nope", "code": "invalid_uuid"}))
        );
    }
}
