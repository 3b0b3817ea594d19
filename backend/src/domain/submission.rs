//! Client input whose validation outcome is held back until the target has
//! been resolved and the caller authorised.

use super::Error;

/// Decoded request input that may have failed field validation.
///
/// Adapters build one from the result of converting a request body; services
/// open it only after their lookups and the authorization gate succeed, so
/// `not_found` and `forbidden` are reported ahead of field errors.
///
/// # Examples
/// ```
/// use issue_tracker::domain::{Error, Submission};
///
/// let rejected: Submission<u8> = Err(Error::invalid_request("bad")).into();
/// assert!(rejected.open().is_err());
/// assert_eq!(Submission::valid(3_u8).open().ok(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<T>(Result<T, Error>);

impl<T> Submission<T> {
    /// Input that already passed validation.
    pub fn valid(value: T) -> Self {
        Self(Ok(value))
    }

    /// The validated value, if there is one.
    pub fn as_valid(&self) -> Option<&T> {
        self.0.as_ref().ok()
    }

    /// Surface the validation outcome.
    pub fn open(self) -> Result<T, Error> {
        self.0
    }
}

impl<T> From<Result<T, Error>> for Submission<T> {
    fn from(result: Result<T, Error>) -> Self {
        Self(result)
    }
}
