//! Session cookie settings read from the environment.
//!
//! | Variable                  | Release build        | Debug build                |
//! |---------------------------|----------------------|----------------------------|
//! | `SESSION_KEY_FILE`        | >= 64 bytes          | >= 32 bytes, or generated  |
//! | `SESSION_COOKIE_SECURE`   | required             | defaults to `true`         |
//! | `SESSION_SAMESITE`        | required             | defaults to `Lax`          |
//! | `SESSION_ALLOW_EPHEMERAL` | required, must be 0  | defaults to `false`        |
//! | `SESSION_TTL_MINUTES`     | optional (120)       | optional (120)             |

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

mod parsing;

use parsing::Lookup;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below this length.
const DERIVE_MIN_LEN: usize = 32;
const DEFAULT_TTL_MINUTES: i64 = 120;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_ENV: &str = "SESSION_TTL_MINUTES";

/// Strictness applied while validating the environment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or invalid toggles fall back to defaults with a warning.
    Debug,
    /// Every toggle must be present and valid.
    Release,
}

impl BuildMode {
    /// Pick the mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    /// Key used to encrypt and sign the session cookie.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    /// Lifetime of the session cookie.
    pub ttl: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate the session settings.
///
/// # Examples
///
/// ```rust
/// use issue_tracker::inbound::http::session_config::{
///     BuildMode, session_settings_from_env,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.ttl.whole_minutes(), 120);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let lookup = Lookup::new(env, mode);
    let cookie_secure = lookup.flag(COOKIE_SECURE_ENV, true)?;
    let same_site_fallback = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let same_site = lookup.same_site(SAMESITE_ENV, same_site_fallback, cookie_secure)?;
    let allow_ephemeral = lookup.flag(ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(&lookup, allow_ephemeral)?;
    let ttl = lookup.minutes(TTL_ENV, DEFAULT_TTL_MINUTES)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    })
}

fn session_key<E: Env>(lookup: &Lookup<'_, E>, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        lookup
            .raw(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    let mode = lookup.mode();

    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "session key unreadable; generating an ephemeral key"
            );
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };

    let min_len = match mode {
        BuildMode::Release => SESSION_KEY_MIN_LEN,
        BuildMode::Debug => DERIVE_MIN_LEN,
    };
    let length = bytes.len();
    let key = (length >= min_len).then(|| Key::derive_from(&bytes));
    bytes.zeroize();
    key.ok_or(SessionConfigError::KeyTooShort {
        path,
        length,
        min_len,
    })
}
