//! Session cookie configuration and key loading.
//!
//! Toggles arrive already parsed from server settings; this module applies
//! the build-mode rules to them and loads the signing key.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroize;

/// Minimum key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// `Key::derive_from` panics below this length.
const DERIVE_MIN_LEN: usize = 32;

/// Short hex digest of the signing half of `key`, safe to log.
///
/// ```
/// use actix_web::cookie::Key;
/// use swapmeet::inbound::http::session_config::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::generate());
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..8])
}

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing keys and fall back to ephemeral ones.
    Debug,
    /// Release builds require a readable key of sufficient length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    /// ```
    /// use swapmeet::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Raw session toggles taken from configuration.
#[derive(Clone, Debug, Default)]
pub struct SessionToggles {
    pub key_file: Option<PathBuf>,
    pub cookie_secure: bool,
    pub allow_ephemeral: bool,
}

/// Validated session settings.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("no session key file configured and ephemeral keys are disabled")]
    MissingKeyFile,
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
}

/// Build session settings from toggles and build mode.
///
/// # Examples
/// ```
/// use swapmeet::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
///
/// let toggles = SessionToggles {
///     cookie_secure: false,
///     allow_ephemeral: true,
///     ..SessionToggles::default()
/// };
/// let settings = session_settings(&toggles, BuildMode::Release).expect("ephemeral key");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = load_key(toggles, mode)?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");
    let same_site = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    Ok(SessionSettings {
        key,
        cookie_secure: toggles.cookie_secure,
        same_site,
    })
}

fn ephemeral_allowed(toggles: &SessionToggles, mode: BuildMode) -> bool {
    mode == BuildMode::Debug || toggles.allow_ephemeral
}

fn load_key(toggles: &SessionToggles, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let Some(path) = toggles.key_file.as_deref() else {
        if ephemeral_allowed(toggles, mode) {
            warn!("no session key file configured; using a temporary key");
            return Ok(Key::generate());
        }
        return Err(SessionConfigError::MissingKeyFile);
    };

    match read_key(path, mode) {
        Err(SessionConfigError::KeyRead { path, source }) if ephemeral_allowed(toggles, mode) => {
            warn!(
                path = %path.display(),
                error = %source,
                "session key unreadable; using a temporary key"
            );
            Ok(Key::generate())
        }
        other => other,
    }
}

fn read_key(path: &Path, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let mut bytes = std::fs::read(path).map_err(|source| SessionConfigError::KeyRead {
        path: path.to_path_buf(),
        source,
    })?;
    let length = bytes.len();
    let min_len = match mode {
        BuildMode::Debug => DERIVE_MIN_LEN,
        BuildMode::Release => SESSION_KEY_MIN_LEN,
    };
    if length < min_len {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path: path.to_path_buf(),
            length,
            min_len,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}
