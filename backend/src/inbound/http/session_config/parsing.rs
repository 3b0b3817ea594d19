//! Typed lookups over the session environment.
//!
//! Debug builds swallow a missing or malformed value, log it and continue
//! with the fallback; release builds surface the error.

use actix_web::cookie::SameSite;
use actix_web::cookie::time::Duration;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SessionConfigError};

const FLAG_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";
const MINUTES_EXPECTED: &str = "a positive number of minutes";

pub(super) struct Lookup<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<'a, E: Env> Lookup<'a, E> {
    pub(super) fn new(env: &'a E, mode: BuildMode) -> Self {
        Self { env, mode }
    }

    pub(super) fn mode(&self) -> BuildMode {
        self.mode
    }

    pub(super) fn raw(&self, name: &str) -> Option<String> {
        self.env.string(name)
    }

    /// Return `fallback` in debug builds, `error` otherwise.
    pub(super) fn lenient<T>(&self, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        if self.mode.is_debug() {
            warn!(%error, "falling back to the development default");
            Ok(fallback)
        } else {
            Err(error)
        }
    }

    /// A required boolean toggle.
    pub(super) fn flag(&self, name: &'static str, fallback: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.raw(name) else {
            return self.lenient(fallback, SessionConfigError::MissingEnv { name });
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Ok(true),
            "0" | "false" | "no" | "n" => Ok(false),
            _ => self.lenient(
                fallback,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: FLAG_EXPECTED,
                },
            ),
        }
    }

    /// A required `SameSite` policy. `None` is only honoured alongside a
    /// secure cookie.
    pub(super) fn same_site(
        &self,
        name: &'static str,
        fallback: SameSite,
        cookie_secure: bool,
    ) -> Result<SameSite, SessionConfigError> {
        let Some(value) = self.raw(name) else {
            return self.lenient(fallback, SessionConfigError::MissingEnv { name });
        };
        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if cookie_secure => Ok(SameSite::None),
            "none" => self.lenient(SameSite::None, SessionConfigError::InsecureSameSiteNone),
            _ => self.lenient(
                fallback,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: SAME_SITE_EXPECTED,
                },
            ),
        }
    }

    /// An optional positive duration in minutes. Malformed values are
    /// rejected in every build mode.
    pub(super) fn minutes(&self, name: &'static str, default: i64) -> Result<Duration, SessionConfigError> {
        let Some(value) = self.raw(name) else {
            return Ok(Duration::minutes(default));
        };
        match value.trim().parse::<i64>() {
            Ok(minutes) if minutes > 0 => Ok(Duration::minutes(minutes)),
            _ => Err(SessionConfigError::InvalidEnv {
                name,
                value,
                expected: MINUTES_EXPECTED,
            }),
        }
    }
}
