//! Closed enumerations exposed to clients as `{value, label}` pairs.

use super::error::FieldViolation;

/// One selectable option of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// Supplied value is not one of the enumeration's members.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of: {expected}")]
pub struct UnknownChoice {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

impl FieldViolation for UnknownChoice {
    fn field(&self) -> &'static str {
        self.field
    }

    fn code(&self) -> &'static str {
        "invalid_choice"
    }
}

/// Enumerations with a stable wire value and a display label.
pub trait Choices: Copy + Sized + 'static {
    /// Request field carrying this enumeration.
    const FIELD: &'static str;
    /// Every member, in display order.
    const ALL: &'static [Self];

    /// Stable value used on the wire and in storage.
    fn value(self) -> &'static str;

    /// Human-readable label.
    fn label(self) -> &'static str;

    /// All members as `{value, label}` pairs.
    fn choices() -> Vec<Choice> {
        Self::ALL
            .iter()
            .map(|member| Choice {
                value: member.value(),
                label: member.label(),
            })
            .collect()
    }

    /// Look a member up by its wire value.
    fn parse(raw: &str) -> Result<Self, UnknownChoice> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.value() == raw)
            .ok_or_else(|| UnknownChoice {
                field: Self::FIELD,
                value: raw.to_owned(),
                expected: Self::ALL
                    .iter()
                    .map(|member| member.value())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Declare an enumeration together with its [`Choices`] implementation.
macro_rules! choice_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident for $field:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => ($value:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $crate::domain::choices::Choices for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn value(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::domain::choices::Choices::value(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::choices::UnknownChoice;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                <Self as $crate::domain::choices::Choices>::parse(raw)
            }
        }
    };
}

pub(crate) use choice_enum;
