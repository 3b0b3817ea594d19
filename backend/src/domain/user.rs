//! User accounts and the registration age rule.

use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::Password;
use super::error::FieldViolation;

/// Youngest age, in whole years, accepted at registration.
pub const MINIMUM_AGE: u32 = 15;
/// Maximum length of a username.
pub const USERNAME_MAX: usize = 150;
/// Maximum length of a first or last name.
pub const PERSON_NAME_MAX: usize = 150;

/// Validation errors raised by user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username may only contain letters, digits and @/./+/-/_")]
    UsernameInvalidCharacters,
    #[error("{field} must be at most {max} characters")]
    NameTooLong { field: &'static str, max: usize },
    #[error("users must be at least {minimum} years old (got {age})")]
    TooYoung { minimum: u32, age: u32 },
}

impl FieldViolation for UserValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyUsername | Self::UsernameTooLong { .. } | Self::UsernameInvalidCharacters => {
                "username"
            }
            Self::NameTooLong { field, .. } => *field,
            Self::TooYoung { .. } => "dateBirth",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::InvalidId => "invalid_uuid",
            Self::EmptyUsername => "blank",
            Self::UsernameTooLong { .. } | Self::NameTooLong { .. } => "too_long",
            Self::UsernameInvalidCharacters => "invalid_characters",
            Self::TooYoung { .. } => "too_young",
        }
    }
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Unique login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this only constrains characters.
        Regex::new(r"^[\w.@+\-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional first or last name; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name destined for `field`.
    pub fn new(field: &'static str, name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Age in whole years on `today` for someone born on `birth`.
///
/// A year only counts once the birthday has passed. Birth dates in the future
/// yield zero.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use issue_tracker::domain::age_on;
///
/// let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
/// let day_before = NaiveDate::from_ymd_opt(2015, 6, 14).unwrap();
/// let birthday = NaiveDate::from_ymd_opt(2015, 6, 15).unwrap();
/// assert_eq!(age_on(birth, day_before), 14);
/// assert_eq!(age_on(birth, birthday), 15);
/// ```
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Reject birth dates younger than [`MINIMUM_AGE`] on `today`.
pub fn ensure_minimum_age(birth: NaiveDate, today: NaiveDate) -> Result<(), UserValidationError> {
    let age = age_on(birth, today);
    if age < MINIMUM_AGE {
        return Err(UserValidationError::TooYoung {
            minimum: MINIMUM_AGE,
            age,
        });
    }
    Ok(())
}

/// Registered account.
///
/// The password hash never travels with this type; see
/// [`crate::domain::ports::UserRepository::find_credentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub date_birth: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub date_birth: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
    pub password: Password,
}

impl NewUser {
    /// Materialise the account under `id`.
    pub fn into_user(self, id: UserId) -> (User, Password) {
        let Self {
            username,
            first_name,
            last_name,
            date_birth,
            can_be_contacted,
            can_data_be_shared,
            password,
        } = self;
        (
            User {
                id,
                username,
                first_name,
                last_name,
                date_birth,
                can_be_contacted,
                can_data_be_shared,
            },
            password,
        )
    }
}

/// Profile edits; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<Username>,
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub date_birth: Option<NaiveDate>,
    pub can_be_contacted: Option<bool>,
    pub can_data_be_shared: Option<bool>,
    pub password: Option<Password>,
}

impl User {
    /// Apply profile edits, returning the new password when one was supplied.
    pub fn apply(&mut self, changes: UserChanges) -> Option<Password> {
        let UserChanges {
            username,
            first_name,
            last_name,
            date_birth,
            can_be_contacted,
            can_data_be_shared,
            password,
        } = changes;
        if let Some(value) = username {
            self.username = value;
        }
        if let Some(value) = first_name {
            self.first_name = value;
        }
        if let Some(value) = last_name {
            self.last_name = value;
        }
        if let Some(value) = date_birth {
            self.date_birth = value;
        }
        if let Some(value) = can_be_contacted {
            self.can_be_contacted = value;
        }
        if let Some(value) = can_data_be_shared {
            self.can_data_be_shared = value;
        }
        password
    }
}
