//! Free-text field validation shared by projects, issues and comments.

use super::error::FieldViolation;

/// A text field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextViolation {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl FieldViolation for TextViolation {
    fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } => *field,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Blank { .. } => "blank",
            Self::TooLong { .. } => "too_long",
        }
    }
}

/// Require non-blank text of at most `max` characters (unbounded when `None`).
pub(crate) fn non_blank(
    field: &'static str,
    value: String,
    max: Option<usize>,
) -> Result<String, TextViolation> {
    if value.trim().is_empty() {
        return Err(TextViolation::Blank { field });
    }
    match max {
        Some(max) if value.chars().count() > max => Err(TextViolation::TooLong { field, max }),
        _ => Ok(value),
    }
}

/// Non-blank, unbounded description body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Validate a description.
    pub fn new(value: impl Into<String>) -> Result<Self, TextViolation> {
        non_blank("description", value.into(), None).map(Self)
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  \n\t")]
    fn blank_descriptions_are_rejected(#[case] raw: &str) {
        let err = Description::new(raw).expect_err("blank");
        assert_eq!(err, TextViolation::Blank { field: "description" });
        assert_eq!(err.code(), "blank");
    }

    #[rstest]
    fn long_descriptions_are_accepted() {
        let body = "lorem ipsum ".repeat(1_000);
        let description = Description::new(body.clone()).expect("valid");
        assert_eq!(description.as_ref(), body);
    }

    #[rstest]
    fn bounded_text_counts_characters_not_bytes() {
        assert!(non_blank("name", "é".repeat(5), Some(5)).is_ok());
        assert_eq!(
            non_blank("name", "é".repeat(6), Some(5)).expect_err("too long"),
            TextViolation::TooLong {
                field: "name",
                max: 5
            }
        );
    }
}
