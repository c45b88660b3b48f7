//! Session cookie configuration.
//!
//! The boolean session toggles are read straight from the environment rather
//! than through `AppSettings`, so an absent variable keeps its safe default.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use mockable::Env;
use tracing::warn;

/// Minimum key material accepted by `Key::derive_from`.
const SESSION_KEY_MIN_LEN: usize = 32;
const COOKIE_SECURE_ENV: &str = "MENTOR_MATCH_COOKIE_SECURE";
const ALLOW_EPHEMERAL_ENV: &str = "MENTOR_MATCH_ALLOW_EPHEMERAL_SESSION_KEY";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode used to pick defaults and strictness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates invalid toggles and allows ephemeral keys by default.
    Debug,
    /// Rejects invalid toggles and requires a key file by default.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
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

/// Boolean session toggles resolved from the environment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionToggles {
    /// Whether session cookies are marked `Secure`. Defaults to `true`.
    pub cookie_secure: bool,
    /// Whether an unreadable key file falls back to a random key.
    pub allow_ephemeral: bool,
}

/// Errors raised while resolving session configuration.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
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
    #[error("session key at {path} too short: need >= {SESSION_KEY_MIN_LEN} bytes, got {length}")]
    KeyTooShort { path: PathBuf, length: usize },
}

/// Read the session toggles from `env`.
///
/// Unset variables fall back to secure cookies and, outside debug builds, to
/// requiring a key file. Unparseable values are rejected in release builds
/// and replaced by the default with a warning in debug builds.
///
/// # Errors
///
/// Returns [`SessionConfigError::InvalidEnv`] in release builds when a toggle
/// is not a recognised boolean.
pub fn session_toggles_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionToggles, SessionConfigError> {
    Ok(SessionToggles {
        cookie_secure: bool_from_env(env, mode, COOKIE_SECURE_ENV, true)?,
        allow_ephemeral: bool_from_env(env, mode, ALLOW_EPHEMERAL_ENV, mode.is_debug())?,
    })
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(default);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(variable = name, value = %value, default, "invalid boolean; using default");
            Ok(default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Derive the cookie signing key from `path`.
///
/// When the file cannot be read and `allow_ephemeral` is set, a random key is
/// generated instead; sessions then do not survive a restart.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when the file is unreadable and ephemeral
/// keys are not allowed, or when it holds too little key material.
pub fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() < SESSION_KEY_MIN_LEN => Err(SessionConfigError::KeyTooShort {
            path: path.to_path_buf(),
            length: bytes.len(),
        }),
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(source) if allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using temporary session key");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
