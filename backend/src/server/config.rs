//! Server settings loaded via OrthoConfig.
//!
//! Every field can be supplied as a `SWAPMEET_*` environment variable, a
//! command-line flag, or a configuration file entry.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use swapmeet::inbound::http::session_config::SessionToggles;
use swapmeet::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SWAPMEET")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. In-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is unavailable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Pool configuration when a database URL is present.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            PoolConfig::new(url).with_max_size(
                self.db_max_connections
                    .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            )
        })
    }

    /// Session key and cookie switches for the session middleware.
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.cookie_secure,
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing from the environment.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "SWAPMEET_BIND_ADDR",
        "SWAPMEET_DATABASE_URL",
        "SWAPMEET_DB_MAX_CONNECTIONS",
        "SWAPMEET_SESSION_KEY_FILE",
        "SWAPMEET_SESSION_ALLOW_EPHEMERAL",
        "SWAPMEET_COOKIE_SECURE",
        "SWAPMEET_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("swapmeet")]).expect("config should load")
    }

    /// Every settings variable, unset unless named in `overrides`.
    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert!(settings.pool_config().is_none());
        assert!(settings.cookie_secure);
        assert!(settings.run_migrations);
        assert!(!settings.session_allow_ephemeral);

        let toggles = settings.session_toggles();
        assert!(toggles.key_file.is_none());
        assert!(toggles.cookie_secure);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("SWAPMEET_BIND_ADDR", "127.0.0.1:9000"),
            ("SWAPMEET_DATABASE_URL", "postgres://localhost/swapmeet"),
            ("SWAPMEET_DB_MAX_CONNECTIONS", "4"),
            ("SWAPMEET_SESSION_KEY_FILE", "/run/key"),
            ("SWAPMEET_COOKIE_SECURE", "false"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address parses"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        let pool = settings.pool_config().expect("pool configured");
        assert_eq!(pool.database_url(), "postgres://localhost/swapmeet");
        assert_eq!(pool.max_size(), 4);
        assert!(!settings.cookie_secure);
        assert_eq!(
            settings.session_toggles().key_file,
            Some(PathBuf::from("/run/key"))
        );
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env(env_with(&[("SWAPMEET_BIND_ADDR", "not-an-address")]));

        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
